//! Checkout flow: information, overview and completion steps
//!
//! @see https://www.saucedemo.com/checkout-step-one.html

use tracing::info;

use crate::browser::Page;
use crate::error::E2eResult;
use crate::expect::expect;
use crate::locator::{Locator, TextMatch};
use crate::pages::trimmed;

/// Header shown once an order is placed
pub const ORDER_CONFIRMATION_HEADER: &str = "Thank you for your order!";

/// Leading text of the completion message
pub const ORDER_CONFIRMATION_TEXT: &str = "Your order has been dispatched";

#[derive(Debug, Clone)]
pub struct CheckoutPage {
    page: Page,
}

impl CheckoutPage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    // ==================== Locators ====================

    pub fn first_name_input(&self) -> Locator {
        self.page.get_by_test_id("firstName")
    }

    pub fn last_name_input(&self) -> Locator {
        self.page.get_by_test_id("lastName")
    }

    pub fn postal_code_input(&self) -> Locator {
        self.page.get_by_test_id("postalCode")
    }

    pub fn continue_button(&self) -> Locator {
        self.page
            .get_by_role("button", Some(TextMatch::contains("continue")))
    }

    pub fn finish_button(&self) -> Locator {
        self.page
            .get_by_role("button", Some(TextMatch::contains("finish")))
    }

    pub fn overview_cart_items(&self) -> Locator {
        self.page.get_by_test_id("inventory-item")
    }

    pub fn complete_header(&self) -> Locator {
        self.page.get_by_test_id("complete-header")
    }

    pub fn complete_text(&self) -> Locator {
        self.page.get_by_test_id("complete-text")
    }

    // ==================== Actions ====================

    /// Fill the shipping form and continue to the overview
    pub async fn fill_info_and_continue(
        &self,
        first_name: &str,
        last_name: &str,
        postal_code: &str,
    ) -> E2eResult<()> {
        self.first_name_input().fill(first_name).await?;
        self.last_name_input().fill(last_name).await?;
        self.postal_code_input().fill(postal_code).await?;
        self.continue_button().click().await?;
        expect(&self.page.get_by_test_id("checkout-summary-container"))
            .to_be_visible()
            .await
    }

    pub async fn finish(&self) -> E2eResult<()> {
        self.finish_button().click().await?;
        expect(&self.complete_header()).to_be_visible().await?;
        info!("Order placed");
        Ok(())
    }

    /// Product names listed on the overview
    pub async fn overview_item_names(&self) -> E2eResult<Vec<String>> {
        let names = self
            .page
            .get_by_test_id("checkout-summary-container")
            .locator(r#"[data-test="inventory-item-name"]"#)
            .all_text_contents()
            .await?;
        Ok(trimmed(names))
    }

    pub async fn overview_item_count(&self) -> E2eResult<usize> {
        self.overview_cart_items().count().await
    }

    pub async fn expect_order_confirmation(&self) -> E2eResult<()> {
        expect(&self.complete_header())
            .to_have_text(ORDER_CONFIRMATION_HEADER)
            .await?;
        expect(&self.complete_text())
            .to_contain_text(ORDER_CONFIRMATION_TEXT)
            .await
    }
}
