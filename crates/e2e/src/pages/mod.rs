//! Page objects for the Saucedemo screens
//!
//! Each page object wraps a `Page` handle and exposes locator accessors plus
//! actions. Accessors build a fresh `Locator` on every call; actions end by
//! waiting for the element that proves the screen transition happened.

pub mod cart;
pub mod checkout;
pub mod login;
pub mod product_detail;
pub mod products;

pub use cart::CartPage;
pub use checkout::CheckoutPage;
pub use login::LoginPage;
pub use product_detail::ProductDetailPage;
pub use products::ProductsPage;

/// Trim every entry of a text-content list
pub(crate) fn trimmed(names: Vec<String>) -> Vec<String> {
    names.into_iter().map(|s| s.trim().to_string()).collect()
}
