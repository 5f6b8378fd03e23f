//! Externalized data for the checkout journey

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Relative location of the checkout data file
pub const CHECKOUT_TEST_DATA_PATH: &str = "test-data/app/saucedemo-checkout.json";

/// Shipping details typed on checkout step one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutInfo {
    pub first_name: String,
    pub last_name: String,
    pub postal_code: String,
}

/// Items, shipping details and expected outcome of the checkout journey
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutTestData {
    pub items_to_add: Vec<String>,
    pub item_to_remove: String,
    pub checkout: CheckoutInfo,
    pub expected_confirmation: String,
}

impl CheckoutTestData {
    pub fn from_json(json: &str) -> Result<Self> {
        let data: Self = serde_json::from_str(json)?;
        data.validate()?;
        Ok(data)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Names expected in the cart once `item_to_remove` is gone
    pub fn remaining_items(&self) -> Vec<String> {
        self.items_to_add
            .iter()
            .filter(|name| **name != self.item_to_remove)
            .cloned()
            .collect()
    }

    fn validate(&self) -> Result<()> {
        if self.items_to_add.is_empty() {
            return Err(Error::InvalidTestData("itemsToAdd is empty".into()));
        }
        if !self.items_to_add.contains(&self.item_to_remove) {
            return Err(Error::InvalidTestData(format!(
                "itemToRemove '{}' is not in itemsToAdd",
                self.item_to_remove
            )));
        }
        Ok(())
    }
}
