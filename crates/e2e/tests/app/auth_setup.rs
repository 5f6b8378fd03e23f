//! Generates the browser storage state with the session cookies, so projects
//! that depend on `setup` start already logged in.

use futures::future::BoxFuture;
use saucedemo_e2e::project::SETUP_GROUP;
use saucedemo_e2e::{create_app_storage_state, E2eResult, Suite, TestCase, TestContext, STORAGE_STATE_PATH};

pub fn suite() -> Suite {
    Suite::new("Auth setup", SETUP_GROUP).test(TestCase::new(
        "Setup Saucedemo authentication - Browser storage state",
        authenticate,
    ))
}

fn authenticate(t: &TestContext) -> BoxFuture<'_, E2eResult<()>> {
    Box::pin(async move {
        let path = t.root_dir().join(STORAGE_STATE_PATH);
        t.step(
            "log in as standard_user and save the storage state",
            create_app_storage_state(t.launch_options(), t.page_settings(), t.config(), &path),
        )
        .await?;
        Ok(())
    })
}
