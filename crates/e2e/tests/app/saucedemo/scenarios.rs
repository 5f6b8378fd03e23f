//! Saucedemo functional scenarios 1-4

use futures::future::BoxFuture;
use saucedemo_common::{SaucedemoUser, SortOrder, SAUCEDEMO_PASSWORD};
use saucedemo_e2e::expect::{ensure_contains, ensure_eq};
use saucedemo_e2e::project::SAUCEDEMO_GROUP;
use saucedemo_e2e::{expect, E2eResult, Suite, TestCase, TestContext};

use super::{reset_and_login, reset_and_open};

/// Product added by name in scenario 2
const ITEM_NAME: &str = "Sauce Labs Onesie";

/// Cart position removed in scenario 1
const REMOVED_INDEX: usize = 2;

pub fn suites() -> Vec<Suite> {
    vec![
        Suite::new("Saucedemo Scenario 1: Cart, checkout, purchase @functional", SAUCEDEMO_GROUP)
            .tag("@functional")
            .before_each(login_standard_user)
            .test(
                TestCase::new(
                    "add all items, remove third, validate overview and complete purchase",
                    cart_checkout_purchase,
                )
                .tag("@smoke"),
            ),
        Suite::new(
            "Saucedemo Scenario 2: Problem user, add by name @known-bug @functional",
            SAUCEDEMO_GROUP,
        )
        .tag("@known-bug")
        .tag("@functional")
        .before_each(login_problem_user)
        .test(
            TestCase::new(
                "find item by name, add from detail page, validate in cart",
                add_by_name_from_detail,
            )
            .tag("@regression")
            .skip("known bug: for problem_user the item added from the detail page never reaches the cart"),
        ),
        Suite::new("Saucedemo Scenario 3: Sort products by name @functional", SAUCEDEMO_GROUP)
            .tag("@functional")
            .before_each(login_standard_user)
            .test(TestCase::new("sort by name A-Z and validate order", sort_by_name).tag("@smoke")),
        Suite::new(
            "Saucedemo Scenario 4: Locked-out user login fails @functional",
            SAUCEDEMO_GROUP,
        )
        .tag("@functional")
        .before_each(reset_and_open)
        .test(
            TestCase::new("locked_out_user cannot login and sees error", locked_out_login)
                .tag("@regression"),
        ),
    ]
}

fn login_standard_user(t: &TestContext) -> BoxFuture<'_, E2eResult<()>> {
    Box::pin(reset_and_login(t, SaucedemoUser::StandardUser))
}

fn login_problem_user(t: &TestContext) -> BoxFuture<'_, E2eResult<()>> {
    Box::pin(reset_and_login(t, SaucedemoUser::ProblemUser))
}

fn cart_checkout_purchase(t: &TestContext) -> BoxFuture<'_, E2eResult<()>> {
    Box::pin(async move {
        let fx = &t.fixtures;

        t.step(
            "GIVEN user has added all items to cart",
            fx.products_page.add_all_to_cart(),
        )
        .await?;

        let expected = t
            .step("WHEN user goes to cart and removes third item", async {
                fx.products_page.go_to_cart().await?;
                let before = fx.cart_page.cart_item_names().await?;
                let expected: Vec<String> = before
                    .into_iter()
                    .enumerate()
                    .filter(|(i, _)| *i != REMOVED_INDEX)
                    .map(|(_, name)| name)
                    .collect();
                fx.cart_page.remove_item(REMOVED_INDEX).await?;
                ensure_eq(&fx.cart_page.cart_item_names().await?, &expected, "cart items")?;
                Ok(expected)
            })
            .await?;

        t.step("THEN checkout overview shows correct items and count", async {
            fx.cart_page.checkout().await?;
            fx.checkout_page
                .fill_info_and_continue("Test", "User", "12345")
                .await?;
            let names = fx.checkout_page.overview_item_names().await?;
            let count = fx.checkout_page.overview_item_count().await?;
            ensure_eq(&names, &expected, "overview items")?;
            ensure_eq(&count, &expected.len(), "overview count")
        })
        .await?;

        t.step("AND user finishes purchase and sees confirmation", async {
            fx.checkout_page.finish().await?;
            fx.checkout_page.expect_order_confirmation().await
        })
        .await
    })
}

// Asserts the intended behaviour; the test stays skipped until the defect is
// fixed.
fn add_by_name_from_detail(t: &TestContext) -> BoxFuture<'_, E2eResult<()>> {
    Box::pin(async move {
        let fx = &t.fixtures;

        t.step(
            "GIVEN user is on products page and finds item by name",
            fx.products_page.open_product_by_name(ITEM_NAME),
        )
        .await?;

        t.step("WHEN user adds item to cart from detail page and goes to cart", async {
            fx.product_detail_page.add_to_cart().await?;
            fx.product_detail_page.go_to_cart().await
        })
        .await?;

        t.step("THEN cart contains the added item", async {
            let names = fx.cart_page.cart_item_names().await?;
            ensure_contains(&names, &ITEM_NAME.to_string(), "cart items")
        })
        .await
    })
}

fn sort_by_name(t: &TestContext) -> BoxFuture<'_, E2eResult<()>> {
    Box::pin(async move {
        let fx = &t.fixtures;

        t.step("GIVEN user is on products page", async {
            expect(&fx.products_page.sort_dropdown()).to_be_visible().await
        })
        .await?;

        t.step(
            "WHEN user sorts products by name A-Z",
            fx.products_page.sort_by(SortOrder::NameAsc),
        )
        .await?;

        t.step("THEN product names are sorted alphabetically", async {
            let names = fx.products_page.product_names().await?;
            let mut sorted = names.clone();
            sorted.sort_by_key(|n| n.to_lowercase());
            ensure_eq(&names, &sorted, "product order")
        })
        .await
    })
}

fn locked_out_login(t: &TestContext) -> BoxFuture<'_, E2eResult<()>> {
    Box::pin(async move {
        let fx = &t.fixtures;

        t.step("GIVEN user is on login page with locked_out credentials", async {
            expect(&fx.login_page.login_button()).to_be_visible().await
        })
        .await?;

        t.step(
            "WHEN user attempts to login",
            fx.login_page
                .login(SaucedemoUser::LockedOutUser, SAUCEDEMO_PASSWORD),
        )
        .await?;

        t.step("THEN login fails and error message is displayed", async {
            expect(&fx.login_page.error_message()).to_be_visible().await
        })
        .await
    })
}
