//! Saucedemo journeys, run with fresh sessions

mod accounts;
mod complete_checkout;
mod scenarios;

use futures::future::BoxFuture;
use saucedemo_common::SaucedemoUser;
use saucedemo_common::SAUCEDEMO_PASSWORD;
use saucedemo_e2e::{E2eResult, Suite, TestContext};

pub fn suites() -> Vec<Suite> {
    let mut suites = vec![accounts::suite(), complete_checkout::suite()];
    suites.extend(scenarios::suites());
    suites
}

/// Clear the session and land on the login form
pub(crate) fn reset_and_open(t: &TestContext) -> BoxFuture<'_, E2eResult<()>> {
    Box::pin(async move {
        t.fixtures.reset_storage_state().await?;
        t.fixtures.login_page.open().await
    })
}

pub(crate) async fn reset_and_login(t: &TestContext, user: SaucedemoUser) -> E2eResult<()> {
    reset_and_open(t).await?;
    t.fixtures
        .login_page
        .login_and_verify(user, SAUCEDEMO_PASSWORD)
        .await
}
