//! Main test runner that orchestrates projects, workers, retries and reporting

use std::any::Any;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use saucedemo_common::AppConfig;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::{Id, JoinError, JoinSet};
use tracing::{debug, error, info, warn};

use crate::browser::{BrowserSession, LaunchOptions, PageSettings};
use crate::error::{E2eError, E2eResult};
use crate::fixtures::Fixtures;
use crate::project::{self, Project};
use crate::report::{TestResult, TestStatus, TestSuiteResult};
use crate::server::{wait_for_reachable, ReachabilityConfig};
use crate::storage_state::StorageState;
use crate::suite::{StepResult, Suite, TestCase, TestContext};

/// Whether a `CI` value means "running on CI" (set and non-empty)
pub fn is_ci(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

/// Configuration for the test runner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub launch: LaunchOptions,
    pub page: PageSettings,
    /// Budget for before-each hook plus body, per attempt
    pub test_timeout_ms: u64,
    /// Extra attempts after a failure
    pub retries: u32,
    pub workers: usize,
    /// Reject focused tests
    pub forbid_only: bool,
    /// Repository root; storage-state paths resolve against it
    pub root_dir: PathBuf,
    pub output_dir: PathBuf,
    pub projects: Vec<Project>,
    /// Probe the application before the first project
    pub preflight: bool,
    /// Treat a browser that cannot launch as a failed run
    pub require_browser: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self::for_ci(is_ci(std::env::var("CI").ok().as_deref()))
    }
}

impl RunnerConfig {
    /// Defaults for a CI or local run: CI retries twice on one worker and
    /// rejects focused tests
    pub fn for_ci(ci: bool) -> Self {
        Self {
            launch: LaunchOptions::default(),
            page: PageSettings::default(),
            test_timeout_ms: 60_000,
            retries: if ci { 2 } else { 0 },
            workers: if ci { 1 } else { default_workers() },
            forbid_only: ci,
            root_dir: PathBuf::from("."),
            output_dir: PathBuf::from("test-results"),
            projects: Project::defaults(),
            preflight: true,
            require_browser: ci,
        }
    }

    /// Whether `err` may end the run without a report.
    ///
    /// Only a browser that cannot launch qualifies, and only when the browser
    /// is not required. An unreachable target always fails the run.
    pub fn tolerates(&self, err: &E2eError) -> bool {
        matches!(err, E2eError::BrowserLaunch(_)) && !self.require_browser
    }

    pub fn test_timeout(&self) -> Duration {
        Duration::from_millis(self.test_timeout_ms)
    }
}

/// Half the available cores, at least one
fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| (n.get() / 2).max(1))
        .unwrap_or(1)
}

/// Which tests to run
#[derive(Debug, Clone, Default)]
pub struct TestFilter {
    /// Project names; empty means all
    pub projects: Vec<String>,
    /// Substring of `suite › test`
    pub grep: Option<String>,
    /// Tags; a test matches when it carries any of them
    pub tags: Vec<String>,
}

/// One test selected for one project
#[derive(Clone)]
pub struct PlannedTest {
    pub suite: Suite,
    pub test: TestCase,
}

impl PlannedTest {
    pub fn title(&self) -> String {
        format!("{} › {}", self.suite.title, self.test.title)
    }

    /// Suite tags followed by test tags
    pub fn tags(&self) -> Vec<String> {
        self.suite
            .tags
            .iter()
            .chain(self.test.tags.iter())
            .map(|t| t.to_string())
            .collect()
    }

    fn skipped(&self, project: &str, reason: &str) -> TestResult {
        TestResult::skipped(project, self.suite.title, self.test.title, self.tags(), reason)
    }

    /// A failure recorded without running an attempt to completion
    fn failed(&self, project: &str, error: &str) -> TestResult {
        let mut result = self.skipped(project, error);
        result.status = TestStatus::Failed;
        result.attempts = 1;
        result
    }
}

/// Tests of `suites` that `project` runs under `filter`.
///
/// When any selected test is focused with `only`, the rest are dropped.
pub fn select_tests(suites: &[Suite], project: &Project, filter: &TestFilter) -> Vec<PlannedTest> {
    let selected: Vec<PlannedTest> = suites
        .iter()
        .filter(|s| project.matches(s))
        .flat_map(|s| {
            s.tests.iter().map(move |t| PlannedTest {
                suite: s.clone(),
                test: t.clone(),
            })
        })
        .filter(|p| {
            filter
                .grep
                .as_ref()
                .map_or(true, |g| p.title().contains(g.as_str()))
        })
        .filter(|p| {
            filter.tags.is_empty() || p.tags().iter().any(|t| filter.tags.contains(t))
        })
        .collect();

    if selected.iter().any(|p| p.test.only) {
        selected.into_iter().filter(|p| p.test.only).collect()
    } else {
        selected
    }
}

/// Focused tests anywhere in the registry
fn focused_tests(suites: &[Suite]) -> Vec<String> {
    suites
        .iter()
        .flat_map(|s| {
            s.tests
                .iter()
                .filter(|t| t.only)
                .map(move |t| format!("{} › {}", s.title, t.title))
        })
        .collect()
}

/// Status of a test given the outcome of its last attempt
fn final_status(passed: bool, attempt: u32) -> TestStatus {
    match (passed, attempt) {
        (true, 0) => TestStatus::Passed,
        (true, _) => TestStatus::Flaky,
        (false, _) => TestStatus::Failed,
    }
}

/// Lowercase alphanumeric slug for artifact directories
fn slug(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}

/// Main E2E test runner
pub struct TestRunner {
    config: RunnerConfig,
    app: Arc<AppConfig>,
    suites: Vec<Suite>,
}

impl TestRunner {
    pub fn new(config: RunnerConfig, app: AppConfig, suites: Vec<Suite>) -> Self {
        Self {
            config,
            app: Arc::new(app),
            suites,
        }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Projects to run with their selected tests, in dependency order
    pub fn plan(&self, filter: &TestFilter) -> E2eResult<Vec<(Project, Vec<PlannedTest>)>> {
        let projects = project::plan(&self.config.projects, &filter.projects)?;
        let dependencies: Vec<String> = projects
            .iter()
            .flat_map(|p| p.dependencies.iter().cloned())
            .collect();

        Ok(projects
            .into_iter()
            .map(|p| {
                // grep and tag filters never narrow a dependency.
                let tests = if dependencies.contains(&p.name) {
                    select_tests(&self.suites, &p, &TestFilter::default())
                } else {
                    select_tests(&self.suites, &p, filter)
                };
                (p, tests)
            })
            .collect())
    }

    /// Run every planned project and collect results
    pub async fn run(&self, filter: &TestFilter) -> E2eResult<TestSuiteResult> {
        let start = Instant::now();

        let focused = focused_tests(&self.suites);
        if self.config.forbid_only && !focused.is_empty() {
            return Err(E2eError::RunnerConfig(format!(
                "focused tests are not allowed here: {}",
                focused.join(", ")
            )));
        }

        let plan = self.plan(filter)?;
        let total: usize = plan.iter().map(|(_, tests)| tests.len()).sum();
        info!(
            "Running {} test(s) in {} project(s) using {} worker(s)",
            total,
            plan.len(),
            self.config.workers
        );

        if total == 0 {
            warn!("No tests matched the filter");
            return TestSuiteResult::from_results(Vec::new(), start.elapsed().as_millis() as u64);
        }

        if self.config.preflight {
            wait_for_reachable(&self.app.app_url, &ReachabilityConfig::default()).await?;
        }

        let session = Arc::new(BrowserSession::launch(&self.config.launch).await?);
        let mut results = Vec::new();
        let mut failed_projects: Vec<String> = Vec::new();

        for (project, tests) in plan {
            let blocked = project
                .dependencies
                .iter()
                .find(|d| failed_projects.contains(d));

            if let Some(dep) = blocked {
                warn!(
                    "Skipping project '{}': dependency '{}' failed",
                    project.name, dep
                );
                let reason = format!("dependency '{}' failed", dep);
                results.extend(tests.iter().map(|t| t.skipped(&project.name, &reason)));
                failed_projects.push(project.name.clone());
                continue;
            }

            let project_results = self.run_project(&session, &project, tests).await;
            if project_results.iter().any(|r| r.status == TestStatus::Failed) {
                failed_projects.push(project.name.clone());
            }
            results.extend(project_results);
        }

        match Arc::try_unwrap(session) {
            Ok(session) => {
                if let Err(e) = session.close().await {
                    warn!("Failed to close browser: {}", e);
                }
            }
            Err(_) => warn!("Browser still referenced after the run; not closing"),
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        let summary = TestSuiteResult::from_results(results, duration_ms)?;

        info!("");
        info!(
            "Test Results: {} passed, {} flaky, {} failed, {} skipped ({} ms)",
            summary.passed, summary.flaky, summary.failed, summary.skipped, duration_ms
        );
        Ok(summary)
    }

    /// Run one project's tests on the worker pool
    async fn run_project(
        &self,
        session: &Arc<BrowserSession>,
        project: &Project,
        tests: Vec<PlannedTest>,
    ) -> Vec<TestResult> {
        info!("Project '{}': {} test(s)", project.name, tests.len());

        let storage_state = match &project.storage_state {
            Some(path) => match StorageState::load(&self.config.root_dir.join(path)) {
                Ok(state) => Some(Arc::new(state)),
                Err(e) => {
                    let reason = format!("storage state {} unavailable: {}", path.display(), e);
                    error!("Project '{}': {}", project.name, reason);
                    return tests
                        .iter()
                        .map(|t| t.failed(&project.name, &reason))
                        .collect();
                }
            },
            None => None,
        };

        let semaphore = Arc::new(Semaphore::new(self.config.workers.max(1)));
        let mut set = JoinSet::new();
        let mut pending = HashMap::new();

        for (index, planned) in tests.into_iter().enumerate() {
            let worker = Worker {
                session: Arc::clone(session),
                app: Arc::clone(&self.app),
                config: self.config.clone(),
                project: project.name.clone(),
                storage_state: storage_state.clone(),
            };
            let semaphore = Arc::clone(&semaphore);

            let task = planned.clone();
            let handle = set.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                (index, worker.run_test(task).await)
            });
            pending.insert(handle.id(), (index, planned));
        }

        collect_results(set, pending, &project.name).await
    }
}

/// Join every worker task in planned order.
///
/// A task that panics or is cancelled still yields a failed result for its
/// test, so nothing drops out of the report.
async fn collect_results(
    mut set: JoinSet<(usize, TestResult)>,
    mut pending: HashMap<Id, (usize, PlannedTest)>,
    project: &str,
) -> Vec<TestResult> {
    let mut results = Vec::new();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok(result) => results.push(result),
            Err(e) => match pending.remove(&e.id()) {
                Some((index, planned)) => {
                    let message = join_error_message(e);
                    error!("✗ {} [{}] - {}", planned.title(), project, message);
                    results.push((index, planned.failed(project, &message)));
                }
                None => error!("Worker task for an unknown test failed: {}", e),
            },
        }
    }
    results.sort_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, r)| r).collect()
}

fn join_error_message(e: JoinError) -> String {
    if e.is_cancelled() {
        return "worker task was cancelled".to_string();
    }
    match e.try_into_panic() {
        Ok(payload) => format!("test panicked: {}", panic_message(payload.as_ref())),
        Err(e) => e.to_string(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "non-string panic payload"
    }
}

/// State a worker task needs to run one test
struct Worker {
    session: Arc<BrowserSession>,
    app: Arc<AppConfig>,
    config: RunnerConfig,
    project: String,
    storage_state: Option<Arc<StorageState>>,
}

impl Worker {
    async fn run_test(&self, planned: PlannedTest) -> TestResult {
        let title = planned.title();

        if let Some(reason) = planned.test.skip {
            info!("- {} [{}] skipped: {}", title, self.project, reason);
            return planned.skipped(&self.project, reason);
        }

        let start = Instant::now();
        let mut screenshots = Vec::new();
        let mut attempt = 0;

        let (passed, steps, error) = loop {
            if attempt > 0 {
                warn!("Retrying {} [{}] (retry #{})", title, self.project, attempt);
            }
            let (outcome, steps, shot) = self.run_attempt(&planned, attempt).await;
            screenshots.extend(shot);

            match outcome {
                Ok(()) => break (true, steps, None),
                Err(e) if attempt < self.config.retries => {
                    debug!("Attempt {} of {} failed: {}", attempt + 1, title, e);
                    attempt += 1;
                }
                Err(e) => break (false, steps, Some(e.to_string())),
            }
        };

        let status = final_status(passed, attempt);
        let duration_ms = start.elapsed().as_millis() as u64;
        match status {
            TestStatus::Failed => error!(
                "✗ {} [{}] - {}",
                title,
                self.project,
                error.as_deref().unwrap_or("unknown error")
            ),
            _ => info!("✓ {} [{}] ({} ms)", title, self.project, duration_ms),
        }

        TestResult {
            project: self.project.clone(),
            suite: planned.suite.title.to_string(),
            name: planned.test.title.to_string(),
            tags: planned.tags(),
            status,
            attempts: attempt + 1,
            duration_ms,
            steps,
            screenshots,
            error,
        }
    }

    /// One attempt in a fresh context; screenshots the page on failure
    async fn run_attempt(
        &self,
        planned: &PlannedTest,
        attempt: u32,
    ) -> (E2eResult<()>, Vec<StepResult>, Option<PathBuf>) {
        let ctx = match self.prepare().await {
            Ok(ctx) => ctx,
            Err(e) => return (Err(e), Vec::new(), None),
        };

        let before_each = planned.suite.before_each;
        let body = planned.test.body;
        let run = async {
            if let Some(hook) = before_each {
                hook(&ctx).await?;
            }
            body(&ctx).await
        };

        let outcome = match tokio::time::timeout(self.config.test_timeout(), run).await {
            Ok(result) => result,
            Err(_) => Err(E2eError::Timeout {
                what: format!("test '{}'", planned.test.title),
                state: ctx
                    .steps()
                    .last_title()
                    .unwrap_or_else(|| "before first step".to_string()),
                timeout_ms: self.config.test_timeout_ms,
            }),
        };

        let mut screenshot = None;
        if outcome.is_err() {
            let path = failure_screenshot_path(
                &self.config.output_dir,
                &self.project,
                &planned.title(),
                attempt,
            );
            match ctx.fixtures.page.screenshot(&path).await {
                Ok(path) => screenshot = Some(path),
                Err(e) => warn!("Failed to capture failure screenshot: {}", e),
            }
        }

        let steps = ctx.steps().snapshot();
        if let Err(e) = ctx.fixtures.context().clone().close().await {
            warn!("Failed to close browser context: {}", e);
        }
        (outcome, steps, screenshot)
    }

    /// Fresh context and page, seeded with the project's storage state
    async fn prepare(&self) -> E2eResult<TestContext> {
        let mut context = self.session.new_context(self.config.page.clone()).await?;
        if let Some(state) = &self.storage_state {
            context.apply_storage_state(state.as_ref().clone()).await?;
        }
        let page = context.new_page().await?;
        let fixtures = Fixtures::new(page, context, &self.app);

        Ok(TestContext::new(
            fixtures,
            Arc::clone(&self.app),
            self.config.launch.clone(),
            self.config.root_dir.clone(),
            self.config.output_dir.clone(),
            self.project.clone(),
        ))
    }
}

/// `<output>/<project>-<test>/test-failed-<attempt>.png`
fn failure_screenshot_path(output: &Path, project: &str, title: &str, attempt: u32) -> PathBuf {
    output
        .join(format!("{}-{}", slug(project), slug(title)))
        .join(format!("test-failed-{}.png", attempt + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{SAUCEDEMO_GROUP, SETUP_GROUP};
    use futures::future::BoxFuture;
    use test_case::test_case;

    fn noop(_: &TestContext) -> BoxFuture<'_, E2eResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn registry() -> Vec<Suite> {
        vec![
            Suite::new("Auth", SETUP_GROUP).test(TestCase::new("authenticate", noop)),
            Suite::new("Scenario 1 @functional", SAUCEDEMO_GROUP)
                .tag("@functional")
                .test(TestCase::new("add all and purchase", noop).tag("@smoke")),
            Suite::new("Scenario 4 @functional", SAUCEDEMO_GROUP)
                .tag("@functional")
                .test(TestCase::new("locked out user sees error", noop).tag("@regression")),
        ]
    }

    fn titles(tests: &[PlannedTest]) -> Vec<String> {
        tests.iter().map(|t| t.test.title.to_string()).collect()
    }

    #[test_case(None, 0, 1, false; "local")]
    #[test_case(Some(""), 0, 1, false; "empty CI value")]
    #[test_case(Some("true"), 2, 1, true; "ci")]
    fn test_ci_policy(ci: Option<&str>, retries: u32, min_workers: usize, forbid_only: bool) {
        let config = RunnerConfig::for_ci(is_ci(ci));
        assert_eq!(config.retries, retries);
        assert!(config.workers >= min_workers);
        assert_eq!(config.forbid_only, forbid_only);
        assert_eq!(config.require_browser, forbid_only);
        if forbid_only {
            assert_eq!(config.workers, 1);
        }
    }

    #[test_case(false, true; "local run")]
    #[test_case(true, false; "ci run")]
    fn test_missing_browser_policy(ci: bool, tolerated: bool) {
        let config = RunnerConfig::for_ci(ci);
        let launch = E2eError::BrowserLaunch("no chrome binary".into());
        assert_eq!(config.tolerates(&launch), tolerated);
    }

    #[test_case(false; "local run")]
    #[test_case(true; "ci run")]
    fn test_unreachable_target_is_never_tolerated(ci: bool) {
        let mut config = RunnerConfig::for_ci(ci);
        config.require_browser = false;
        let unreachable = E2eError::TargetUnreachable {
            url: "http://127.0.0.1:9/".into(),
            attempts: 61,
        };
        assert!(!config.tolerates(&unreachable));
    }

    #[test]
    fn test_runner_defaults() {
        let config = RunnerConfig::for_ci(false);
        assert_eq!(config.test_timeout(), Duration::from_secs(60));
        assert_eq!(config.output_dir, PathBuf::from("test-results"));
        assert_eq!(config.projects.len(), 3);
    }

    #[test]
    fn test_select_by_project_group() {
        let project = Project::new("saucedemo-chromium", &[SAUCEDEMO_GROUP]);
        let selected = select_tests(&registry(), &project, &TestFilter::default());
        assert_eq!(
            titles(&selected),
            vec!["add all and purchase", "locked out user sees error"]
        );
    }

    #[test_case(Some("locked"), vec![], vec!["locked out user sees error"]; "grep title")]
    #[test_case(Some("Scenario 1"), vec![], vec!["add all and purchase"]; "grep suite title")]
    #[test_case(None, vec!["@smoke"], vec!["add all and purchase"]; "test tag")]
    #[test_case(None, vec!["@functional"], vec!["add all and purchase", "locked out user sees error"]; "suite tag")]
    #[test_case(Some("locked"), vec!["@smoke"], vec![]; "grep and tag")]
    fn test_filters(grep: Option<&str>, tags: Vec<&str>, expected: Vec<&str>) {
        let project = Project::new("saucedemo-chromium", &[SAUCEDEMO_GROUP]);
        let filter = TestFilter {
            projects: vec![],
            grep: grep.map(String::from),
            tags: tags.into_iter().map(String::from).collect(),
        };
        assert_eq!(titles(&select_tests(&registry(), &project, &filter)), expected);
    }

    #[test]
    fn test_only_narrows_selection() {
        let mut suites = registry();
        suites[2].tests[0] = suites[2].tests[0].clone().only();
        let project = Project::new("saucedemo-chromium", &[SAUCEDEMO_GROUP]);

        let selected = select_tests(&suites, &project, &TestFilter::default());
        assert_eq!(titles(&selected), vec!["locked out user sees error"]);
        assert_eq!(focused_tests(&suites).len(), 1);
    }

    #[test]
    fn test_plan_keeps_dependencies_unfiltered() {
        let runner = TestRunner::new(
            RunnerConfig::for_ci(false),
            AppConfig::from_lookup(|k| (k == "APP_URL").then(|| "https://www.saucedemo.com/".to_string()))
                .unwrap(),
            registry(),
        );
        let filter = TestFilter {
            projects: vec!["chromium".into()],
            grep: Some("nothing matches this".into()),
            tags: vec![],
        };
        let plan = runner.plan(&filter).unwrap();
        assert_eq!(plan[0].0.name, "setup");
        assert_eq!(plan[0].1.len(), 1);
        assert_eq!(plan[1].0.name, "chromium");
        assert!(plan[1].1.is_empty());
    }

    #[test]
    fn test_tag_filter_does_not_drop_setup() {
        let runner = TestRunner::new(
            RunnerConfig::for_ci(false),
            AppConfig::from_lookup(|k| (k == "APP_URL").then(|| "https://www.saucedemo.com/".to_string()))
                .unwrap(),
            registry(),
        );
        let filter = TestFilter {
            tags: vec!["@smoke".into()],
            ..Default::default()
        };
        let plan = runner.plan(&filter).unwrap();
        let setup = plan.iter().find(|(p, _)| p.name == "setup").unwrap();
        assert_eq!(titles(&setup.1), vec!["authenticate"]);
        let saucedemo = plan.iter().find(|(p, _)| p.name == "saucedemo-chromium").unwrap();
        assert_eq!(titles(&saucedemo.1), vec!["add all and purchase"]);
    }

    #[test_case(true, 0, TestStatus::Passed)]
    #[test_case(true, 2, TestStatus::Flaky)]
    #[test_case(false, 0, TestStatus::Failed)]
    #[test_case(false, 2, TestStatus::Failed)]
    fn test_final_status(passed: bool, attempt: u32, expected: TestStatus) {
        assert_eq!(final_status(passed, attempt), expected);
    }

    fn planned(suites: &[Suite], suite: usize) -> PlannedTest {
        PlannedTest {
            suite: suites[suite].clone(),
            test: suites[suite].tests[0].clone(),
        }
    }

    #[tokio::test]
    async fn test_panicking_worker_is_reported_as_failed() {
        let suites = registry();
        let mut set: JoinSet<(usize, TestResult)> = JoinSet::new();
        let mut pending = HashMap::new();

        let ok = planned(&suites, 1);
        let mut passed = ok.failed("saucedemo-chromium", "");
        passed.status = TestStatus::Passed;
        passed.error = None;
        let handle = set.spawn(async move { (0, passed) });
        pending.insert(handle.id(), (0, ok));

        let boom = planned(&suites, 2);
        let handle = set.spawn(async move {
            panic!("cart badge missing");
        });
        pending.insert(handle.id(), (1, boom));

        let results = collect_results(set, pending, "saucedemo-chromium").await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].status, TestStatus::Passed);
        assert_eq!(results[1].status, TestStatus::Failed);
        assert_eq!(results[1].name, "locked out user sees error");
        assert_eq!(
            results[1].error.as_deref(),
            Some("test panicked: cart badge missing")
        );

        let summary = TestSuiteResult::from_results(results, 0).unwrap();
        assert_eq!(summary.failed, 1);
        assert!(!summary.success());
    }

    #[tokio::test]
    async fn test_cancelled_worker_is_reported_as_failed() {
        let suites = registry();
        let mut set: JoinSet<(usize, TestResult)> = JoinSet::new();
        let mut pending = HashMap::new();

        let handle = set.spawn(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            unreachable!()
        });
        handle.abort();
        pending.insert(handle.id(), (0, planned(&suites, 1)));

        let results = collect_results(set, pending, "saucedemo-chromium").await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, TestStatus::Failed);
        assert_eq!(results[0].error.as_deref(), Some("worker task was cancelled"));
    }

    #[test]
    fn test_failure_screenshot_path() {
        let path = failure_screenshot_path(
            Path::new("test-results"),
            "saucedemo-chromium",
            "Scenario 3: Sort › sort by name A-Z",
            0,
        );
        assert_eq!(
            path,
            PathBuf::from("test-results/saucedemo-chromium-scenario-3-sort-sort-by-name-a-z/test-failed-1.png")
        );
    }
}
