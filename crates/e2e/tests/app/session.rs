//! Runs in the `chromium` project, whose contexts start from the saved
//! storage state.

use futures::future::BoxFuture;
use saucedemo_e2e::project::APP_GROUP;
use saucedemo_e2e::{expect, E2eResult, Suite, TestCase, TestContext};

pub fn suite() -> Suite {
    Suite::new("Saved session @auth", APP_GROUP)
        .tag("@auth")
        .test(
            TestCase::new(
                "stored session opens the inventory without logging in",
                opens_inventory,
            )
            .tag("@smoke"),
        )
}

fn opens_inventory(t: &TestContext) -> BoxFuture<'_, E2eResult<()>> {
    Box::pin(async move {
        let fx = &t.fixtures;

        t.step("WHEN user opens the inventory page directly", async {
            let url = t.config().url(t.config().paths.inventory)?;
            fx.page.goto(url.as_str()).await
        })
        .await?;

        t.step("THEN products are listed", async {
            expect(&fx.products_page.inventory()).to_be_visible().await
        })
        .await?;

        t.step("AND the login form is not shown", async {
            expect(&fx.login_page.login_button()).to_be_hidden().await
        })
        .await
    })
}
