//! Saucedemo E2E Test Framework
//!
//! This crate provides a Rust-controlled browser suite for the Saucedemo store:
//! - Drives Chromium over the DevTools protocol, one isolated context per test
//! - Models each screen as a page object built from lazy locators
//! - Injects a fresh fixture set into every test
//! - Runs suites per project with workers, retries and a JSON report
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    E2E Test Runner (Rust)                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestRunner                                                 │
//! │    ├── plan(filter) -> [(Project, [PlannedTest])]           │
//! │    ├── wait_for_reachable(APP_URL)                          │
//! │    ├── BrowserSession::launch() -> BrowserContext per test  │
//! │    └── run(filter) -> TestSuiteResult                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Fixtures                                                   │
//! │    ├── login / products / product detail / cart / checkout  │
//! │    └── reset_storage_state()                                │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Page -> Locator (query chain, auto-wait actions)           │
//! │    ├── get_by_test_id / get_by_role / get_by_placeholder    │
//! │    ├── click / fill / select_option                         │
//! │    └── expect(locator).to_be_visible() / to_have_text()     │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod browser;
pub mod error;
pub mod expect;
pub mod fixtures;
pub mod locator;
pub mod pages;
pub mod project;
pub mod report;
pub mod runner;
pub mod server;
pub mod storage_state;
pub mod suite;

pub use browser::{BrowserContext, BrowserSession, LaunchOptions, LoadState, Page, PageSettings, Timeouts};
pub use error::{E2eError, E2eResult};
pub use expect::expect;
pub use fixtures::Fixtures;
pub use locator::{Locator, TextMatch};
pub use project::Project;
pub use report::{TestResult, TestStatus, TestSuiteResult};
pub use runner::{RunnerConfig, TestFilter, TestRunner};
pub use storage_state::{create_app_storage_state, StorageState, STORAGE_STATE_PATH};
pub use suite::{Suite, TestCase, TestContext, TestFn};
