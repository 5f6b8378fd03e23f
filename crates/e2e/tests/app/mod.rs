//! Suite registry

pub mod auth_setup;
pub mod saucedemo;
pub mod session;

use saucedemo_e2e::Suite;

/// Every suite, in declaration order
pub fn suites() -> Vec<Suite> {
    let mut suites = vec![auth_setup::suite(), session::suite()];
    suites.extend(saucedemo::suites());
    suites
}
