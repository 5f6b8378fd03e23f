//! Complete checkout flow
//!
//! Login, product selection, cart management, checkout and order
//! confirmation, driven by `test-data/app/saucedemo-checkout.json`.

use futures::future::BoxFuture;
use saucedemo_common::{CheckoutTestData, SaucedemoUser, CHECKOUT_TEST_DATA_PATH, SAUCEDEMO_PASSWORD};
use saucedemo_e2e::expect::{ensure, ensure_eq, ensure_not_contains};
use saucedemo_e2e::project::SAUCEDEMO_GROUP;
use saucedemo_e2e::{expect, E2eError, E2eResult, Suite, TestCase, TestContext};

use super::reset_and_open;

pub fn suite() -> Suite {
    Suite::new("Saucedemo Complete Checkout Flow @e2e", SAUCEDEMO_GROUP)
        .tag("@e2e")
        .before_each(reset_and_open)
        .test(
            TestCase::new(
                "should complete end-to-end purchase with specific items and receive order confirmation",
                complete_purchase,
            )
            .tag("@smoke"),
        )
}

fn complete_purchase(t: &TestContext) -> BoxFuture<'_, E2eResult<()>> {
    Box::pin(async move {
        let data = CheckoutTestData::from_file(&t.root_dir().join(CHECKOUT_TEST_DATA_PATH))?;
        let fx = &t.fixtures;

        // ==================== GIVEN ====================

        t.step("GIVEN user authenticates with valid credentials", async {
            fx.login_page
                .login_and_verify(SaucedemoUser::StandardUser, SAUCEDEMO_PASSWORD)
                .await?;
            expect(&fx.products_page.inventory()).to_be_visible().await
        })
        .await?;

        // ==================== WHEN ====================

        for (i, item) in data.items_to_add.iter().enumerate() {
            let prefix = if i == 0 { "WHEN" } else { "AND" };
            t.step(
                format!("{} user adds \"{}\" to cart", prefix, item),
                fx.products_page.add_to_cart_by_name(item),
            )
            .await?;
        }

        t.step(
            "AND user navigates to the shopping cart",
            fx.products_page.go_to_cart(),
        )
        .await?;

        t.step(
            format!("AND user removes \"{}\" from cart", data.item_to_remove),
            async {
                let names = fx.cart_page.cart_item_names().await?;
                let index = names
                    .iter()
                    .position(|n| *n == data.item_to_remove)
                    .ok_or_else(|| {
                        E2eError::AssertionFailed(format!(
                            "\"{}\" is not in the cart {:?}",
                            data.item_to_remove, names
                        ))
                    })?;
                fx.cart_page.remove_item(index).await
            },
        )
        .await?;

        t.step(
            format!(
                "AND verify correct item remains in cart after removing \"{}\"",
                data.item_to_remove
            ),
            async {
                let names = fx.cart_page.cart_item_names().await?;
                ensure_not_contains(&names, &data.item_to_remove, "cart items")?;
                ensure_eq(&names, &data.remaining_items(), "cart items")
            },
        )
        .await?;

        t.step("AND user proceeds to the checkout page", fx.cart_page.checkout())
            .await?;

        t.step(
            "AND user enters shipping information",
            fx.checkout_page.fill_info_and_continue(
                &data.checkout.first_name,
                &data.checkout.last_name,
                &data.checkout.postal_code,
            ),
        )
        .await?;

        t.step("AND user completes the purchase", fx.checkout_page.finish())
            .await?;

        // ==================== THEN ====================

        t.step(
            format!(
                "THEN user should see confirmation message \"{}\"",
                data.expected_confirmation
            ),
            async {
                expect(&fx.checkout_page.complete_header())
                    .to_have_text(&data.expected_confirmation)
                    .await
            },
        )
        .await?;

        t.step(
            "AND confirmation page should be captured for documentation",
            async {
                let path = fx
                    .page
                    .screenshot(&t.output_dir().join("order-confirmation.png"))
                    .await?;
                ensure(path.exists(), format!("{} was not written", path.display()))
            },
        )
        .await
    })
}
