//! Product detail screen
//!
//! @see https://www.saucedemo.com/inventory-item.html?id=*

use crate::browser::Page;
use crate::error::E2eResult;
use crate::expect::expect;
use crate::locator::{Locator, TextMatch};

#[derive(Debug, Clone)]
pub struct ProductDetailPage {
    page: Page,
}

impl ProductDetailPage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    pub fn product_title(&self) -> Locator {
        self.page.get_by_test_id("inventory-item-name")
    }

    pub fn add_to_cart_button(&self) -> Locator {
        self.page
            .get_by_role("button", Some(TextMatch::contains("add to cart")))
    }

    pub fn back_to_products_link(&self) -> Locator {
        self.page.get_by_test_id("back-to-products")
    }

    pub fn cart_link(&self) -> Locator {
        self.page.get_by_test_id("shopping-cart-link")
    }

    pub async fn add_to_cart(&self) -> E2eResult<()> {
        self.add_to_cart_button().click().await?;
        expect(&self.page.get_by_test_id("add-to-cart"))
            .to_be_visible()
            .await
    }

    pub async fn go_to_cart(&self) -> E2eResult<()> {
        self.cart_link().click().await?;
        expect(&self.page.get_by_test_id("cart-contents-container"))
            .to_be_visible()
            .await
    }
}
