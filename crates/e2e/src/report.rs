//! Test results and the JSON report

use std::path::{Path, PathBuf};

use chrono::Utc;
use saucedemo_common::format_date;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::E2eResult;
use crate::suite::StepResult;

pub const RESULTS_FILE: &str = "test-results.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    Passed,
    /// Passed on a retry
    Flaky,
    Failed,
    Skipped,
}

/// Result of running a single test in one project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub project: String,
    pub suite: String,
    pub name: String,
    pub tags: Vec<String>,
    pub status: TestStatus,
    pub attempts: u32,
    pub duration_ms: u64,
    /// Steps of the last attempt
    pub steps: Vec<StepResult>,
    pub screenshots: Vec<PathBuf>,
    pub error: Option<String>,
}

impl TestResult {
    pub fn skipped(project: &str, suite: &str, name: &str, tags: Vec<String>, reason: &str) -> Self {
        Self {
            project: project.to_string(),
            suite: suite.to_string(),
            name: name.to_string(),
            tags,
            status: TestStatus::Skipped,
            attempts: 0,
            duration_ms: 0,
            steps: Vec::new(),
            screenshots: Vec::new(),
            error: Some(reason.to_string()),
        }
    }

    /// `suite › name`, the form `--grep` matches against
    pub fn full_title(&self) -> String {
        format!("{} › {}", self.suite, self.name)
    }
}

/// Result of running all tests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    /// Human-readable run date, e.g. `October 16, 2026`
    pub run_date: String,
    pub total: usize,
    pub passed: usize,
    pub flaky: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl TestSuiteResult {
    pub fn from_results(results: Vec<TestResult>, duration_ms: u64) -> E2eResult<Self> {
        let count = |status| results.iter().filter(|r| r.status == status).count();
        Ok(Self {
            run_date: format_date(Utc::now().timestamp_millis())?,
            total: results.len(),
            passed: count(TestStatus::Passed),
            flaky: count(TestStatus::Flaky),
            failed: count(TestStatus::Failed),
            skipped: count(TestStatus::Skipped),
            duration_ms,
            results,
        })
    }

    pub fn success(&self) -> bool {
        self.failed == 0
    }

    /// Write results to `<dir>/test-results.json`
    pub fn write(&self, dir: &Path) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(dir)?;

        let path = dir.join(RESULTS_FILE);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}
