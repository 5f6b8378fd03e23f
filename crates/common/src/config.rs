//! Environment-backed configuration records
//!
//! Base URLs come from the process environment (after the optional
//! `env/.env.<ENVIRONMENT>` file has been loaded). Records are built once at
//! startup and handed to whoever needs them; nothing reads the environment at
//! the point of use.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use crate::error::{Error, Result};

/// Environment name used when `ENVIRONMENT` is unset
pub const DEFAULT_ENVIRONMENT: &str = "saucedemo";

/// Load `env/.env.<ENVIRONMENT>` relative to `root`.
///
/// A missing file is not an error; variables may already be present in the
/// real environment. Variables that are already set are never overridden.
/// Returns the path that was loaded, if any.
pub fn load_environment(root: &Path) -> Result<Option<PathBuf>> {
    let environment =
        std::env::var("ENVIRONMENT").unwrap_or_else(|_| DEFAULT_ENVIRONMENT.to_string());
    let path = env_file_path(root, &environment);

    match dotenvy::from_path(&path) {
        Ok(()) => {
            info!("Loaded environment file {}", path.display());
            Ok(Some(path))
        }
        Err(e) if e.not_found() => {
            debug!("No environment file at {}", path.display());
            Ok(None)
        }
        Err(e) => Err(Error::EnvFile {
            path: path.display().to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Location of the env file for a named environment
pub fn env_file_path(root: &Path, environment: &str) -> PathBuf {
    root.join("env").join(format!(".env.{}", environment))
}

/// Route paths of the application under test
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppPaths {
    pub home: &'static str,
    pub login: &'static str,
    pub dashboard: &'static str,
    pub inventory: &'static str,
    pub cart: &'static str,
    pub checkout_step_one: &'static str,
    pub checkout_step_two: &'static str,
    pub checkout_complete: &'static str,
}

impl Default for AppPaths {
    fn default() -> Self {
        Self {
            home: "/",
            login: "/login",
            dashboard: "/dashboard",
            inventory: "/inventory.html",
            cart: "/cart.html",
            checkout_step_one: "/checkout-step-one.html",
            checkout_step_two: "/checkout-step-two.html",
            checkout_complete: "/checkout-complete.html",
        }
    }
}

impl AppPaths {
    /// Logical name / path pairs
    pub fn entries(&self) -> [(&'static str, &'static str); 8] {
        [
            ("HOME", self.home),
            ("LOGIN", self.login),
            ("DASHBOARD", self.dashboard),
            ("INVENTORY", self.inventory),
            ("CART", self.cart),
            ("CHECKOUT_STEP_ONE", self.checkout_step_one),
            ("CHECKOUT_STEP_TWO", self.checkout_step_two),
            ("CHECKOUT_COMPLETE", self.checkout_complete),
        ]
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    /// Frontend application URL (`APP_URL`)
    pub app_url: Url,

    /// Backend API URL (`API_URL`)
    pub api_url: Option<Url>,

    /// Application route paths
    pub paths: AppPaths,
}

impl AppConfig {
    /// Build from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_url = lookup("APP_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(Error::MissingEnv("APP_URL"))?;

        Ok(Self {
            app_url: parse_url("APP_URL", &app_url)?,
            api_url: optional_url("API_URL", lookup("API_URL"))?,
            paths: AppPaths::default(),
        })
    }

    /// Resolve a route path against the application URL
    pub fn url(&self, path: &str) -> Result<Url> {
        join(&self.app_url, "APP_URL", path)
    }
}

/// Utility service paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UtilityPaths {
    pub example: &'static str,
}

impl Default for UtilityPaths {
    fn default() -> Self {
        Self {
            example: "/api/v2/example",
        }
    }
}

/// Utility/helper service configuration
#[derive(Debug, Clone, Serialize)]
pub struct UtilityConfig {
    /// Utility service base URL (`UTILITY_URL`)
    pub base_url: Option<Url>,

    /// Utility API paths
    pub paths: UtilityPaths,
}

impl UtilityConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            base_url: optional_url("UTILITY_URL", lookup("UTILITY_URL"))?,
            paths: UtilityPaths::default(),
        })
    }

    /// Resolve a utility path; fails when `UTILITY_URL` is not configured
    pub fn url(&self, path: &str) -> Result<Url> {
        let base = self
            .base_url
            .as_ref()
            .ok_or(Error::MissingEnv("UTILITY_URL"))?;
        join(base, "UTILITY_URL", path)
    }
}

fn parse_url(var: &'static str, value: &str) -> Result<Url> {
    Url::parse(value.trim()).map_err(|e| Error::InvalidUrl {
        var,
        reason: e.to_string(),
    })
}

fn optional_url(var: &'static str, value: Option<String>) -> Result<Option<Url>> {
    match value {
        Some(v) if !v.trim().is_empty() => parse_url(var, &v).map(Some),
        _ => Ok(None),
    }
}

fn join(base: &Url, var: &'static str, path: &str) -> Result<Url> {
    base.join(path).map_err(|e| Error::InvalidUrl {
        var,
        reason: e.to_string(),
    })
}
