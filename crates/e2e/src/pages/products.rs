//! Inventory (products) screen
//!
//! @see https://www.saucedemo.com/inventory.html

use saucedemo_common::SortOrder;
use tracing::debug;

use crate::browser::{LoadState, Page};
use crate::error::E2eResult;
use crate::expect::expect;
use crate::locator::{Locator, TextMatch};
use crate::pages::trimmed;

#[derive(Debug, Clone)]
pub struct ProductsPage {
    page: Page,
}

impl ProductsPage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    // ==================== Locators ====================

    pub fn sort_dropdown(&self) -> Locator {
        self.page.get_by_test_id("product-sort-container")
    }

    pub fn cart_link(&self) -> Locator {
        self.page.get_by_test_id("shopping-cart-link")
    }

    pub fn inventory(&self) -> Locator {
        self.page.get_by_test_id("inventory-container")
    }

    pub fn inventory_item(&self) -> Locator {
        self.page.get_by_test_id("inventory-item")
    }

    /// Add-to-cart button of the item at `index` (0-based)
    pub fn add_to_cart_button(&self, index: usize) -> Locator {
        self.inventory_item()
            .nth(index as i64)
            .get_by_role("button", Some(TextMatch::contains("add to cart")))
    }

    /// Name link of the item at `index`; clicking opens the detail page
    pub fn item_name_link(&self, index: usize) -> Locator {
        self.inventory_item()
            .nth(index as i64)
            .get_by_test_id("inventory-item-name")
    }

    /// First inventory item whose text contains `name`
    pub fn item_by_name(&self, name: &str) -> Locator {
        self.inventory_item().filter_has_text(name).first()
    }

    pub fn add_to_cart_button_for_item(&self, name: &str) -> Locator {
        self.item_by_name(name)
            .get_by_role("button", Some(TextMatch::contains("add to cart")))
    }

    // ==================== Actions ====================

    pub async fn sort_by(&self, order: SortOrder) -> E2eResult<()> {
        self.sort_dropdown().select_option(order.as_str()).await?;
        self.page.wait_for_load_state(LoadState::DomContentLoaded).await
    }

    /// Add every listed item to the cart, one click at a time.
    ///
    /// Returns how many items were listed.
    pub async fn add_all_to_cart(&self) -> E2eResult<usize> {
        expect(&self.inventory()).to_be_visible().await?;
        let count = self.inventory_item().count().await?;
        for i in 0..count {
            debug!(index = i, "Adding item to cart");
            self.add_to_cart_button(i).click().await?;
            self.page.wait_for_load_state(LoadState::DomContentLoaded).await?;
        }
        Ok(count)
    }

    /// Add the item matching `name` and let the page settle
    pub async fn add_to_cart_by_name(&self, name: &str) -> E2eResult<()> {
        self.add_to_cart_button_for_item(name).click().await?;
        self.page.wait_for_load_state(LoadState::DomContentLoaded).await
    }

    /// Open the detail page of the item matching `name`
    pub async fn open_product_by_name(&self, name: &str) -> E2eResult<()> {
        self.item_by_name(name)
            .get_by_test_id("inventory-item-name")
            .click()
            .await?;
        expect(&self.page.get_by_test_id("inventory-item-name").first())
            .to_be_visible()
            .await
    }

    pub async fn go_to_cart(&self) -> E2eResult<()> {
        self.cart_link().click().await?;
        expect(&self.page.get_by_text(TextMatch::exact("Your Cart")))
            .to_be_visible()
            .await
    }

    /// Product names in display order
    pub async fn product_names(&self) -> E2eResult<Vec<String>> {
        let names = self
            .page
            .get_by_test_id("inventory-item-name")
            .all_text_contents()
            .await?;
        Ok(trimmed(names))
    }
}
