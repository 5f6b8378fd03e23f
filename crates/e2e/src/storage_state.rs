//! Authenticated session snapshots
//!
//! The file format matches Playwright's `storageState` JSON so snapshots can be
//! shared with other tooling.

use std::path::{Path, PathBuf};

use chromiumoxide::cdp::browser_protocol::network::{Cookie, CookieParam};
use saucedemo_common::{AppConfig, SaucedemoUser, SAUCEDEMO_PASSWORD};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::browser::{BrowserSession, LaunchOptions, PageSettings};
use crate::error::{E2eError, E2eResult};
use crate::pages::LoginPage;

/// Where the setup project writes the application session
pub const STORAGE_STATE_PATH: &str = ".auth/app/appStorageState.json";

/// One cookie in Playwright's storage-state layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    /// Unix seconds; `-1` for session cookies
    #[serde(default = "session_expiry")]
    pub expires: f64,
    #[serde(default)]
    pub http_only: bool,
    #[serde(default)]
    pub secure: bool,
    #[serde(default = "default_same_site")]
    pub same_site: String,
}

fn session_expiry() -> f64 {
    -1.0
}

fn default_same_site() -> String {
    "Lax".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEntry {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginState {
    pub origin: String,
    #[serde(default)]
    pub local_storage: Vec<StorageEntry>,
}

/// Cookies plus per-origin local storage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageState {
    #[serde(default)]
    pub cookies: Vec<StoredCookie>,
    #[serde(default)]
    pub origins: Vec<OriginState>,
}

impl StorageState {
    pub(crate) fn from_cdp_cookies(cookies: &[Cookie]) -> E2eResult<Self> {
        let cookies = cookies
            .iter()
            .map(|c| Ok(serde_json::from_value(serde_json::to_value(c)?)?))
            .collect::<E2eResult<Vec<StoredCookie>>>()?;
        Ok(Self {
            cookies,
            origins: Vec::new(),
        })
    }

    /// Add an origin; entries for an origin already present are replaced
    pub fn push_origin(&mut self, origin: OriginState) {
        if origin.origin == "null" || origin.origin.is_empty() {
            return;
        }
        self.origins.retain(|o| o.origin != origin.origin);
        if !origin.local_storage.is_empty() {
            self.origins.push(origin);
        }
    }

    pub(crate) fn cdp_cookie_params(&self) -> E2eResult<Vec<CookieParam>> {
        self.cookies
            .iter()
            .map(|c| {
                let mut value = serde_json::json!({
                    "name": c.name,
                    "value": c.value,
                    "domain": c.domain,
                    "path": c.path,
                    "secure": c.secure,
                    "httpOnly": c.http_only,
                    "sameSite": c.same_site,
                });
                if c.expires > 0.0 {
                    value["expires"] = serde_json::json!(c.expires);
                }
                Ok(serde_json::from_value(value)?)
            })
            .collect()
    }

    /// Scripts that restore local storage when a page of the origin loads
    pub fn init_scripts(&self) -> Vec<String> {
        self.origins
            .iter()
            .map(|o| {
                let origin = serde_json::Value::String(o.origin.clone());
                let entries = serde_json::to_string(&o.local_storage)
                    .unwrap_or_else(|_| "[]".to_string());
                format!(
                    "if (location.origin === {}) {{ for (const e of {}) {{ localStorage.setItem(e.name, e.value); }} }}",
                    origin, entries
                )
            })
            .collect()
    }

    pub fn load(path: &Path) -> E2eResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the snapshot, creating parent directories and replacing any
    /// previous file
    pub fn save(&self, path: &Path) -> E2eResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Log in as the standard user in a throwaway browser and save the session.
///
/// The browser is closed whether or not login succeeds; a login failure is
/// returned to the caller.
pub async fn create_app_storage_state(
    launch: &LaunchOptions,
    settings: &PageSettings,
    config: &AppConfig,
    path: &Path,
) -> E2eResult<PathBuf> {
    let session = BrowserSession::launch(launch).await?;

    let result = async {
        let context = session.new_context(settings.clone()).await?;
        let page = context.new_page().await?;
        let login = LoginPage::new(page.clone(), config.app_url.clone());

        login.open().await?;
        login
            .login_and_verify(SaucedemoUser::StandardUser, SAUCEDEMO_PASSWORD)
            .await?;

        let state = context.storage_state(&page).await?;
        state.save(path)?;
        info!(
            cookies = state.cookies.len(),
            origins = state.origins.len(),
            "Storage state written to {}",
            path.display()
        );
        Ok::<_, E2eError>(path.to_path_buf())
    }
    .await;

    if let Err(e) = session.close().await {
        warn!("Failed to close setup browser: {}", e);
    }
    result
}
