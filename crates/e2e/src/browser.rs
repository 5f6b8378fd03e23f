//! Chromium session, isolated contexts and page handles
//!
//! One `BrowserSession` is launched per run. Every test attempt gets its own
//! `BrowserContext` (separate cookie jar and storage) and a single `Page`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::{BrowserContextId, ResetPermissionsParams};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::{
    AddScriptToEvaluateOnNewDocumentParams, CaptureScreenshotFormat, CaptureScreenshotParams,
};
use chromiumoxide::cdp::browser_protocol::storage::{
    ClearCookiesParams, GetCookiesParams, SetCookiesParams,
};
use chromiumoxide::cdp::browser_protocol::target::{
    CreateBrowserContextParams, CreateTargetParams, DisposeBrowserContextParams,
};
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{E2eError, E2eResult};
use crate::locator::{Locator, Segment, TextMatch};
use crate::storage_state::StorageState;

/// Interval between polls of an auto-waiting operation
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Timeouts applied to page interactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeouts {
    /// Click/fill/select auto-wait
    pub action_ms: u64,
    /// `goto` and load-state waits
    pub navigation_ms: u64,
    /// Web-first assertions
    pub expect_ms: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            action_ms: 10_000,
            navigation_ms: 30_000,
            expect_ms: 10_000,
        }
    }
}

impl Timeouts {
    pub fn action(&self) -> Duration {
        Duration::from_millis(self.action_ms)
    }

    pub fn navigation(&self) -> Duration {
        Duration::from_millis(self.navigation_ms)
    }

    pub fn expect(&self) -> Duration {
        Duration::from_millis(self.expect_ms)
    }
}

/// Per-page settings shared by every locator created from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSettings {
    pub timeouts: Timeouts,
    /// Attribute consulted by `get_by_test_id`
    pub test_id_attribute: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            timeouts: Timeouts::default(),
            test_id_attribute: "data-test".to_string(),
            viewport_width: 1366,
            viewport_height: 768,
        }
    }
}

/// How the Chromium process is started
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchOptions {
    pub headless: bool,
    pub sandbox: bool,
    /// Explicit Chrome/Chromium binary; auto-detected when unset
    pub chrome_executable: Option<PathBuf>,
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: true,
            sandbox: false,
            chrome_executable: None,
            window_width: 1366,
            window_height: 768,
        }
    }
}

/// A running Chromium process
pub struct BrowserSession {
    browser: Arc<Mutex<Browser>>,
    handler: JoinHandle<()>,
    // Keeps the profile directory alive for the lifetime of the process.
    _profile_dir: tempfile::TempDir,
}

impl BrowserSession {
    /// Launch Chromium and start the CDP event loop
    pub async fn launch(options: &LaunchOptions) -> E2eResult<Self> {
        let profile_dir = tempfile::Builder::new()
            .prefix("saucedemo-e2e-profile")
            .tempdir()?;

        let mut builder = BrowserConfig::builder()
            .user_data_dir(profile_dir.path())
            .window_size(options.window_width, options.window_height);

        if !options.headless {
            builder = builder.with_head();
        }
        if !options.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = options.chrome_executable {
            builder = builder.chrome_executable(path);
        }

        let config = builder.build().map_err(E2eError::BrowserLaunch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| E2eError::BrowserLaunch(e.to_string()))?;
        let handler = tokio::spawn(async move { while handler.next().await.is_some() {} });

        info!(headless = options.headless, "Browser launched");

        Ok(Self {
            browser: Arc::new(Mutex::new(browser)),
            handler,
            _profile_dir: profile_dir,
        })
    }

    /// Create an isolated browser context
    pub async fn new_context(&self, settings: PageSettings) -> E2eResult<BrowserContext> {
        let id = {
            let browser = self.browser.lock().await;
            browser
                .execute(CreateBrowserContextParams::default())
                .await?
                .result
                .browser_context_id
        };
        debug!(context = ?id, "Created browser context");

        Ok(BrowserContext {
            id,
            browser: Arc::clone(&self.browser),
            settings: Arc::new(settings),
            storage_state: None,
        })
    }

    /// Close the browser process
    pub async fn close(self) -> E2eResult<()> {
        {
            let mut browser = self.browser.lock().await;
            browser.close().await?;
            if let Err(e) = browser.wait().await {
                warn!("Browser process did not exit cleanly: {}", e);
            }
        }
        self.handler.abort();
        info!("Browser closed");
        Ok(())
    }
}

/// An isolated cookie/storage partition inside the browser
#[derive(Clone)]
pub struct BrowserContext {
    id: BrowserContextId,
    browser: Arc<Mutex<Browser>>,
    settings: Arc<PageSettings>,
    storage_state: Option<Arc<StorageState>>,
}

impl BrowserContext {
    pub fn settings(&self) -> &PageSettings {
        &self.settings
    }

    /// Open a page in this context, sized to the configured viewport
    pub async fn new_page(&self) -> E2eResult<Page> {
        let params = CreateTargetParams::builder()
            .url("about:blank")
            .browser_context_id(self.id.clone())
            .build()
            .map_err(E2eError::CdpCommand)?;

        let page = {
            let browser = self.browser.lock().await;
            browser.new_page(params).await?
        };

        let metrics = SetDeviceMetricsOverrideParams::builder()
            .width(i64::from(self.settings.viewport_width))
            .height(i64::from(self.settings.viewport_height))
            .device_scale_factor(1.0)
            .mobile(false)
            .build()
            .map_err(E2eError::CdpCommand)?;
        page.execute(metrics).await?;

        if let Some(state) = &self.storage_state {
            for script in state.init_scripts() {
                page.evaluate_on_new_document(AddScriptToEvaluateOnNewDocumentParams::new(script))
                    .await?;
            }
        }

        Ok(Page {
            inner: Arc::new(page),
            settings: Arc::clone(&self.settings),
        })
    }

    /// Remove every cookie stored in this context
    pub async fn clear_cookies(&self) -> E2eResult<()> {
        let mut params = ClearCookiesParams::default();
        params.browser_context_id = Some(self.id.clone());
        self.browser.lock().await.execute(params).await?;
        debug!("Cleared cookies");
        Ok(())
    }

    /// Revoke every permission granted in this context
    pub async fn clear_permissions(&self) -> E2eResult<()> {
        let mut params = ResetPermissionsParams::default();
        params.browser_context_id = Some(self.id.clone());
        self.browser.lock().await.execute(params).await?;
        debug!("Cleared permissions");
        Ok(())
    }

    /// Snapshot cookies plus the local storage of `page`'s current origin
    pub async fn storage_state(&self, page: &Page) -> E2eResult<StorageState> {
        let mut params = GetCookiesParams::default();
        params.browser_context_id = Some(self.id.clone());
        let cookies = self.browser.lock().await.execute(params).await?.result.cookies;

        let mut state = StorageState::from_cdp_cookies(&cookies)?;
        let origin: serde_json::Value = page
            .evaluate(
                "(() => ({ origin: location.origin, \
                 localStorage: Object.entries(localStorage).map(([name, value]) => ({ name, value })) }))()",
            )
            .await?;
        state.push_origin(serde_json::from_value(origin)?);
        Ok(state)
    }

    /// Seed this context with a saved session.
    ///
    /// Cookies are installed immediately; local storage is written by an init
    /// script on every page opened afterwards.
    pub async fn apply_storage_state(&mut self, state: StorageState) -> E2eResult<()> {
        let mut params = SetCookiesParams::new(state.cdp_cookie_params()?);
        params.browser_context_id = Some(self.id.clone());
        self.browser.lock().await.execute(params).await?;
        debug!(cookies = state.cookies.len(), "Applied storage state");
        self.storage_state = Some(Arc::new(state));
        Ok(())
    }

    /// Dispose of the context and every page in it
    pub async fn close(self) -> E2eResult<()> {
        let browser = self.browser.lock().await;
        browser
            .execute(DisposeBrowserContextParams::new(self.id.clone()))
            .await?;
        Ok(())
    }
}

/// Document readiness levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    DomContentLoaded,
    Load,
}

impl LoadState {
    fn ready_states(&self) -> &'static str {
        match self {
            LoadState::DomContentLoaded => "['interactive', 'complete']",
            LoadState::Load => "['complete']",
        }
    }
}

/// Handle to one browser tab
#[derive(Clone)]
pub struct Page {
    inner: Arc<chromiumoxide::Page>,
    settings: Arc<PageSettings>,
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page").field("settings", &self.settings).finish()
    }
}

impl Page {
    pub fn settings(&self) -> &PageSettings {
        &self.settings
    }

    pub fn timeouts(&self) -> Timeouts {
        self.settings.timeouts
    }

    /// Navigate and wait for DOMContentLoaded
    pub async fn goto(&self, url: &str) -> E2eResult<()> {
        debug!("goto {}", url);
        let navigation = self.inner.goto(url);
        match tokio::time::timeout(self.settings.timeouts.navigation(), navigation).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                return Err(E2eError::Navigation {
                    url: url.to_string(),
                    reason: e.to_string(),
                })
            }
            Err(_) => {
                return Err(E2eError::Navigation {
                    url: url.to_string(),
                    reason: format!(
                        "timed out after {} ms",
                        self.settings.timeouts.navigation_ms
                    ),
                })
            }
        }
        self.wait_for_load_state(LoadState::DomContentLoaded).await
    }

    /// Wait until `document.readyState` reaches `state`
    pub async fn wait_for_load_state(&self, state: LoadState) -> E2eResult<()> {
        let script = format!("{}.includes(document.readyState)", state.ready_states());
        let timeout = self.settings.timeouts.navigation();
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let last = match self.evaluate::<bool>(&script).await {
                Ok(true) => return Ok(()),
                Ok(false) => "loading".to_string(),
                // The execution context is replaced while a navigation commits.
                Err(e) => e.to_string(),
            };
            if tokio::time::Instant::now() >= deadline {
                return Err(E2eError::Timeout {
                    what: format!("load state {:?}", state),
                    state: last,
                    timeout_ms: self.settings.timeouts.navigation_ms,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Evaluate a JavaScript expression and deserialize its value
    pub async fn evaluate<T: DeserializeOwned>(&self, script: &str) -> E2eResult<T> {
        let result = self.inner.evaluate(script).await?;
        Ok(result.into_value()?)
    }

    /// Current document URL
    pub async fn url(&self) -> E2eResult<String> {
        self.evaluate("location.href").await
    }

    /// Capture the viewport as PNG and write it to `path`
    pub async fn screenshot(&self, path: &Path) -> E2eResult<PathBuf> {
        let params = CaptureScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        let screenshot = self.inner.execute(params).await?;
        let bytes = base64::engine::general_purpose::STANDARD.decode(&screenshot.data)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, bytes).await?;
        debug!("Screenshot saved to {}", path.display());
        Ok(path.to_path_buf())
    }

    // ==================== Locator factories ====================

    pub fn locator(&self, css: &str) -> Locator {
        Locator::new(
            self.clone(),
            Segment::Css {
                selector: css.to_string(),
            },
        )
    }

    pub fn get_by_test_id(&self, id: &str) -> Locator {
        Locator::new(self.clone(), Segment::TestId { id: id.to_string() })
    }

    pub fn get_by_role(&self, role: &str, name: Option<TextMatch>) -> Locator {
        Locator::new(
            self.clone(),
            Segment::Role {
                role: role.to_string(),
                name,
            },
        )
    }

    pub fn get_by_placeholder(&self, text: TextMatch) -> Locator {
        Locator::new(self.clone(), Segment::Placeholder { text })
    }

    pub fn get_by_text(&self, text: TextMatch) -> Locator {
        Locator::new(self.clone(), Segment::Text { text })
    }
}
