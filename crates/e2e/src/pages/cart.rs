//! Cart screen
//!
//! @see https://www.saucedemo.com/cart.html

use crate::browser::{LoadState, Page};
use crate::error::E2eResult;
use crate::expect::expect;
use crate::locator::{Locator, TextMatch};
use crate::pages::trimmed;

#[derive(Debug, Clone)]
pub struct CartPage {
    page: Page,
}

impl CartPage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    // ==================== Locators ====================

    pub fn cart_items(&self) -> Locator {
        self.page.get_by_test_id("inventory-item")
    }

    pub fn checkout_button(&self) -> Locator {
        self.page
            .get_by_role("button", Some(TextMatch::contains("checkout")))
    }

    /// Remove button of the cart line at `index` (0-based)
    pub fn remove_button(&self, index: usize) -> Locator {
        self.cart_items()
            .nth(index as i64)
            .get_by_role("button", Some(TextMatch::contains("remove")))
    }

    pub fn item_name(&self, index: usize) -> Locator {
        self.cart_items()
            .nth(index as i64)
            .get_by_test_id("inventory-item-name")
    }

    // ==================== Actions ====================

    pub async fn remove_item(&self, index: usize) -> E2eResult<()> {
        self.remove_button(index).click().await?;
        self.page.wait_for_load_state(LoadState::DomContentLoaded).await
    }

    /// Proceed to checkout step one
    pub async fn checkout(&self) -> E2eResult<()> {
        self.checkout_button().click().await?;
        expect(&self.page.get_by_test_id("checkout-info-container"))
            .to_be_visible()
            .await
    }

    pub async fn cart_item_names(&self) -> E2eResult<Vec<String>> {
        let names = self
            .cart_items()
            .get_by_test_id("inventory-item-name")
            .all_text_contents()
            .await?;
        Ok(trimmed(names))
    }

    pub async fn cart_count(&self) -> E2eResult<usize> {
        self.cart_items().count().await
    }
}
