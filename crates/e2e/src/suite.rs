//! Suites, test cases and the per-test context handed to test bodies
//!
//! Test bodies are plain functions returning a boxed future borrowing the
//! context:
//!
//! ```ignore
//! fn sorts_by_name(t: &TestContext) -> BoxFuture<'_, E2eResult<()>> {
//!     Box::pin(async move {
//!         t.step("WHEN user sorts products by name A-Z", async {
//!             t.fixtures.products_page.sort_by(SortOrder::NameAsc).await
//!         })
//!         .await
//!     })
//! }
//! ```

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use futures::future::BoxFuture;
use parking_lot::Mutex;
use saucedemo_common::AppConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::browser::{LaunchOptions, PageSettings};
use crate::error::E2eResult;
use crate::fixtures::Fixtures;

/// Body of a test or of a before-each hook
pub type TestFn = for<'a> fn(&'a TestContext) -> BoxFuture<'a, E2eResult<()>>;

/// A group of tests sharing tags and a before-each hook
#[derive(Clone)]
pub struct Suite {
    pub title: &'static str,
    /// Test group the projects match against (e.g. `saucedemo`, `setup`)
    pub group: &'static str,
    pub tags: Vec<&'static str>,
    pub before_each: Option<TestFn>,
    pub tests: Vec<TestCase>,
}

impl Suite {
    pub fn new(title: &'static str, group: &'static str) -> Self {
        Self {
            title,
            group,
            tags: Vec::new(),
            before_each: None,
            tests: Vec::new(),
        }
    }

    pub fn tag(mut self, tag: &'static str) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn before_each(mut self, hook: TestFn) -> Self {
        self.before_each = Some(hook);
        self
    }

    pub fn test(mut self, test: TestCase) -> Self {
        self.tests.push(test);
        self
    }
}

impl std::fmt::Debug for Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Suite")
            .field("title", &self.title)
            .field("group", &self.group)
            .field("tags", &self.tags)
            .field("tests", &self.tests)
            .finish()
    }
}

#[derive(Clone)]
pub struct TestCase {
    pub title: &'static str,
    pub tags: Vec<&'static str>,
    /// Statically skipped, with the reason
    pub skip: Option<&'static str>,
    /// Focused test; when any test is focused only focused tests run
    pub only: bool,
    pub body: TestFn,
}

impl TestCase {
    pub fn new(title: &'static str, body: TestFn) -> Self {
        Self {
            title,
            tags: Vec::new(),
            skip: None,
            only: false,
            body,
        }
    }

    pub fn tag(mut self, tag: &'static str) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn skip(mut self, reason: &'static str) -> Self {
        self.skip = Some(reason);
        self
    }

    pub fn only(mut self) -> Self {
        self.only = true;
        self
    }
}

impl std::fmt::Debug for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestCase")
            .field("title", &self.title)
            .field("tags", &self.tags)
            .field("skip", &self.skip)
            .field("only", &self.only)
            .finish()
    }
}

/// Outcome of one `TestContext::step`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    pub title: String,
    pub success: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// Ordered record of the steps a test attempt went through
#[derive(Debug, Default)]
pub struct StepLog {
    steps: Mutex<Vec<StepResult>>,
}

impl StepLog {
    pub fn record(&self, step: StepResult) {
        self.steps.lock().push(step);
    }

    pub fn snapshot(&self) -> Vec<StepResult> {
        self.steps.lock().clone()
    }

    /// Title of the most recent step, if any
    pub fn last_title(&self) -> Option<String> {
        self.steps.lock().last().map(|s| s.title.clone())
    }
}

/// Everything a test body can reach
pub struct TestContext {
    pub fixtures: Fixtures,
    config: Arc<AppConfig>,
    launch: LaunchOptions,
    root_dir: PathBuf,
    output_dir: PathBuf,
    project: String,
    steps: StepLog,
}

impl TestContext {
    pub fn new(
        fixtures: Fixtures,
        config: Arc<AppConfig>,
        launch: LaunchOptions,
        root_dir: PathBuf,
        output_dir: PathBuf,
        project: String,
    ) -> Self {
        Self {
            fixtures,
            config,
            launch,
            root_dir,
            output_dir,
            project,
            steps: StepLog::default(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn launch_options(&self) -> &LaunchOptions {
        &self.launch
    }

    pub fn page_settings(&self) -> &PageSettings {
        self.fixtures.context().settings()
    }

    /// Repository root; relative artifact paths resolve against it
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn steps(&self) -> &StepLog {
        &self.steps
    }

    /// Run `fut` as a named step and record its outcome
    pub async fn step<T, F>(&self, title: impl Into<String>, fut: F) -> E2eResult<T>
    where
        F: Future<Output = E2eResult<T>>,
    {
        let title = title.into();
        debug!(project = %self.project, "step: {}", title);
        let start = Instant::now();
        let result = fut.await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => info!("  ✓ {} ({} ms)", title, duration_ms),
            Err(e) => info!("  ✗ {} ({} ms): {}", title, duration_ms, e),
        }
        self.steps.record(StepResult {
            title,
            success: result.is_ok(),
            duration_ms,
            error: result.as_ref().err().map(|e| e.to_string()),
        });
        result
    }
}
