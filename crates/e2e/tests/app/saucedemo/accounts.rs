//! Login outcome for every Saucedemo account

use futures::future::BoxFuture;
use saucedemo_common::{SaucedemoUser, SAUCEDEMO_PASSWORD};
use saucedemo_e2e::project::SAUCEDEMO_GROUP;
use saucedemo_e2e::{expect, E2eResult, Suite, TestCase, TestContext};

use super::reset_and_open;

pub fn suite() -> Suite {
    Suite::new("Saucedemo accounts: login outcome per user @functional", SAUCEDEMO_GROUP)
        .tag("@functional")
        .test(
            TestCase::new(
                "every account except the blocked one reaches the inventory",
                login_every_account,
            )
            .tag("@regression"),
        )
}

fn login_every_account(t: &TestContext) -> BoxFuture<'_, E2eResult<()>> {
    Box::pin(async move {
        let fx = &t.fixtures;

        for user in SaucedemoUser::ALL {
            reset_and_open(t).await?;

            if user.is_blocked() {
                t.step(format!("{} is refused with an error", user), async {
                    fx.login_page.login(user, SAUCEDEMO_PASSWORD).await?;
                    expect(&fx.login_page.error_message()).to_be_visible().await?;
                    expect(&fx.products_page.inventory()).to_be_hidden().await
                })
                .await?;
            } else {
                t.step(
                    format!("{} sees the cart link", user),
                    fx.login_page.login_and_verify(user, SAUCEDEMO_PASSWORD),
                )
                .await?;
            }
        }
        Ok(())
    })
}
