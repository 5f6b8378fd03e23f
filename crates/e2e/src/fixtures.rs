//! Per-test fixture set
//!
//! Every test attempt receives a fresh `Fixtures` bound to its own page, so
//! page objects never leak state between tests.

use saucedemo_common::AppConfig;

use crate::browser::{BrowserContext, Page};
use crate::error::E2eResult;
use crate::pages::{CartPage, CheckoutPage, LoginPage, ProductDetailPage, ProductsPage};

#[derive(Clone)]
pub struct Fixtures {
    pub page: Page,
    context: BrowserContext,
    pub login_page: LoginPage,
    pub products_page: ProductsPage,
    pub product_detail_page: ProductDetailPage,
    pub cart_page: CartPage,
    pub checkout_page: CheckoutPage,
}

impl Fixtures {
    pub fn new(page: Page, context: BrowserContext, config: &AppConfig) -> Self {
        Self {
            login_page: LoginPage::new(page.clone(), config.app_url.clone()),
            products_page: ProductsPage::new(page.clone()),
            product_detail_page: ProductDetailPage::new(page.clone()),
            cart_page: CartPage::new(page.clone()),
            checkout_page: CheckoutPage::new(page.clone()),
            page,
            context,
        }
    }

    pub fn context(&self) -> &BrowserContext {
        &self.context
    }

    /// Clear cookies and granted permissions of this test's context.
    ///
    /// Other tests run in their own contexts and are not affected.
    pub async fn reset_storage_state(&self) -> E2eResult<()> {
        self.context.clear_cookies().await?;
        self.context.clear_permissions().await
    }
}
