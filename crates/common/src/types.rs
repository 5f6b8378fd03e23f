//! Domain values of the Saucedemo store

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Password shared by every Saucedemo user
pub const SAUCEDEMO_PASSWORD: &str = "secret_sauce";

/// Saucedemo user accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaucedemoUser {
    /// Regular account
    StandardUser,
    /// Account with deliberately broken UI behavior
    ProblemUser,
    /// Account that is refused at login
    LockedOutUser,
}

impl SaucedemoUser {
    pub const ALL: [SaucedemoUser; 3] = [
        SaucedemoUser::StandardUser,
        SaucedemoUser::ProblemUser,
        SaucedemoUser::LockedOutUser,
    ];

    /// Username typed into the login form
    pub fn username(&self) -> &'static str {
        match self {
            SaucedemoUser::StandardUser => "standard_user",
            SaucedemoUser::ProblemUser => "problem_user",
            SaucedemoUser::LockedOutUser => "locked_out_user",
        }
    }

    /// Whether login is refused for this account
    pub fn is_blocked(&self) -> bool {
        matches!(self, SaucedemoUser::LockedOutUser)
    }
}

impl fmt::Display for SaucedemoUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.username())
    }
}

/// Option values of the inventory sort dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortOrder {
    /// Name (A to Z)
    #[serde(rename = "az")]
    NameAsc,
    /// Name (Z to A)
    #[serde(rename = "za")]
    NameDesc,
    /// Price (low to high)
    #[serde(rename = "lohi")]
    PriceAsc,
    /// Price (high to low)
    #[serde(rename = "hilo")]
    PriceDesc,
}

impl SortOrder {
    /// Value of the `<option>` element
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::NameAsc => "az",
            SortOrder::NameDesc => "za",
            SortOrder::PriceAsc => "lohi",
            SortOrder::PriceDesc => "hilo",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "az" => Ok(SortOrder::NameAsc),
            "za" => Ok(SortOrder::NameDesc),
            "lohi" => Ok(SortOrder::PriceAsc),
            "hilo" => Ok(SortOrder::PriceDesc),
            other => Err(Error::UnknownSortOrder(other.to_string())),
        }
    }
}
