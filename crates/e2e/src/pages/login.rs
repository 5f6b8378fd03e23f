//! Login screen
//!
//! @see https://www.saucedemo.com/

use tracing::info;
use url::Url;

use saucedemo_common::SaucedemoUser;

use crate::browser::Page;
use crate::error::E2eResult;
use crate::expect::expect;
use crate::locator::{Locator, TextMatch};

#[derive(Debug, Clone)]
pub struct LoginPage {
    page: Page,
    app_url: Url,
}

impl LoginPage {
    pub fn new(page: Page, app_url: Url) -> Self {
        Self { page, app_url }
    }

    // ==================== Locators ====================

    pub fn username_input(&self) -> Locator {
        self.page.get_by_placeholder(TextMatch::contains("Username"))
    }

    pub fn password_input(&self) -> Locator {
        self.page.get_by_placeholder(TextMatch::contains("Password"))
    }

    pub fn login_button(&self) -> Locator {
        self.page.get_by_role("button", Some(TextMatch::contains("Login")))
    }

    pub fn error_message(&self) -> Locator {
        self.page.get_by_test_id("error")
    }

    // ==================== Actions ====================

    /// Navigate to the application root
    pub async fn open(&self) -> E2eResult<()> {
        self.page.goto(self.app_url.as_str()).await
    }

    /// Fill the credentials and submit.
    ///
    /// Does not wait for the inventory, so it is also usable when login is
    /// expected to fail.
    pub async fn login(&self, user: SaucedemoUser, password: &str) -> E2eResult<()> {
        info!(user = %user, "Logging in");
        self.username_input().fill(user.username()).await?;
        self.password_input().fill(password).await?;
        self.login_button().click().await
    }

    /// Log in and wait for the cart link of the inventory header
    pub async fn login_and_verify(&self, user: SaucedemoUser, password: &str) -> E2eResult<()> {
        self.login(user, password).await?;
        expect(&self.page.locator(r#"[data-test="shopping-cart-link"]"#))
            .to_be_visible()
            .await
    }
}
