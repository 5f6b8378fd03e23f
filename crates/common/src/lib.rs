//! Saucedemo E2E Common Library
//!
//! Configuration records, domain values and externalized test data shared by
//! the page objects and the scenarios.

pub mod config;
pub mod error;
pub mod test_data;
pub mod types;
pub mod util;

// Re-export commonly used types
pub use config::{load_environment, AppConfig, AppPaths, UtilityConfig, UtilityPaths};
pub use error::{Error, Result};
pub use test_data::{CheckoutInfo, CheckoutTestData, CHECKOUT_TEST_DATA_PATH};
pub use types::{SaucedemoUser, SortOrder, SAUCEDEMO_PASSWORD};
pub use util::{format_date, DateInput};

/// Suite version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
