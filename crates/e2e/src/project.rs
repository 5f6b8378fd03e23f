//! Projects: named slices of the suite with their own browser setup
//!
//! A project selects suites by group, may start every context from a saved
//! storage state, and may depend on other projects finishing first.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{E2eError, E2eResult};
use crate::storage_state::STORAGE_STATE_PATH;
use crate::suite::Suite;

pub const SETUP_PROJECT: &str = "setup";
pub const CHROMIUM_PROJECT: &str = "chromium";
pub const SAUCEDEMO_CHROMIUM_PROJECT: &str = "saucedemo-chromium";

/// Suite group holding the authentication setup
pub const SETUP_GROUP: &str = "setup";
/// Suite group of tests that start from the saved session
pub const APP_GROUP: &str = "app";
/// Suite group of the Saucedemo journeys
pub const SAUCEDEMO_GROUP: &str = "saucedemo";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    /// Suite groups this project runs
    pub test_match: Vec<String>,
    /// Snapshot loaded into every context, relative to the root directory
    #[serde(default)]
    pub storage_state: Option<PathBuf>,
    /// Projects that must pass before this one starts
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl Project {
    pub fn new(name: &str, test_match: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            test_match: test_match.iter().map(|g| g.to_string()).collect(),
            storage_state: None,
            dependencies: Vec::new(),
        }
    }

    pub fn with_storage_state(mut self, path: impl Into<PathBuf>) -> Self {
        self.storage_state = Some(path.into());
        self
    }

    pub fn depends_on(mut self, project: &str) -> Self {
        self.dependencies.push(project.to_string());
        self
    }

    pub fn matches(&self, suite: &Suite) -> bool {
        self.test_match.iter().any(|g| g == suite.group)
    }

    /// `setup`, `chromium` (authenticated, after setup) and
    /// `saucedemo-chromium` (fresh sessions)
    pub fn defaults() -> Vec<Project> {
        vec![
            Project::new(SETUP_PROJECT, &[SETUP_GROUP]),
            Project::new(CHROMIUM_PROJECT, &[APP_GROUP])
                .with_storage_state(STORAGE_STATE_PATH)
                .depends_on(SETUP_PROJECT),
            Project::new(SAUCEDEMO_CHROMIUM_PROJECT, &[SAUCEDEMO_GROUP]),
        ]
    }
}

/// Pick the requested projects plus everything they depend on, ordered so
/// each project follows its dependencies.
///
/// An empty `requested` list selects every project.
pub fn plan(projects: &[Project], requested: &[String]) -> E2eResult<Vec<Project>> {
    let by_name: HashMap<&str, &Project> =
        projects.iter().map(|p| (p.name.as_str(), p)).collect();

    for p in projects {
        for dep in &p.dependencies {
            if !by_name.contains_key(dep.as_str()) {
                return Err(E2eError::RunnerConfig(format!(
                    "project '{}' depends on unknown project '{}'",
                    p.name, dep
                )));
            }
        }
    }

    let roots: Vec<&str> = if requested.is_empty() {
        projects.iter().map(|p| p.name.as_str()).collect()
    } else {
        let mut roots = Vec::new();
        for name in requested {
            if !by_name.contains_key(name.as_str()) {
                return Err(E2eError::RunnerConfig(format!("unknown project '{}'", name)));
            }
            roots.push(name.as_str());
        }
        roots
    };

    let mut ordered = Vec::new();
    let mut done = HashSet::new();
    let mut visiting = Vec::new();
    for name in roots {
        visit(name, &by_name, &mut done, &mut visiting, &mut ordered)?;
    }
    Ok(ordered)
}

fn visit<'a>(
    name: &'a str,
    by_name: &HashMap<&'a str, &'a Project>,
    done: &mut HashSet<&'a str>,
    visiting: &mut Vec<&'a str>,
    ordered: &mut Vec<Project>,
) -> E2eResult<()> {
    if done.contains(name) {
        return Ok(());
    }
    if visiting.contains(&name) {
        visiting.push(name);
        return Err(E2eError::RunnerConfig(format!(
            "project dependency cycle: {}",
            visiting.join(" -> ")
        )));
    }

    let Some(&project) = by_name.get(name) else {
        return Err(E2eError::RunnerConfig(format!("unknown project '{}'", name)));
    };
    visiting.push(name);
    for dep in &project.dependencies {
        visit(dep.as_str(), by_name, done, visiting, ordered)?;
    }
    visiting.pop();

    done.insert(name);
    ordered.push(project.clone());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(projects: &[Project]) -> Vec<&str> {
        projects.iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn test_default_projects() {
        let projects = Project::defaults();
        assert_eq!(
            names(&projects),
            vec![SETUP_PROJECT, CHROMIUM_PROJECT, SAUCEDEMO_CHROMIUM_PROJECT]
        );
        assert_eq!(
            projects[1].storage_state,
            Some(PathBuf::from(".auth/app/appStorageState.json"))
        );
        assert_eq!(projects[1].dependencies, vec![SETUP_PROJECT.to_string()]);
        assert!(projects[2].storage_state.is_none());
    }

    #[test]
    fn test_plan_pulls_in_dependencies_first() {
        let planned = plan(&Project::defaults(), &[CHROMIUM_PROJECT.to_string()]).unwrap();
        assert_eq!(names(&planned), vec![SETUP_PROJECT, CHROMIUM_PROJECT]);
    }

    #[test]
    fn test_plan_everything_when_nothing_requested() {
        let planned = plan(&Project::defaults(), &[]).unwrap();
        assert_eq!(planned.len(), 3);
        let setup = planned.iter().position(|p| p.name == SETUP_PROJECT).unwrap();
        let chromium = planned.iter().position(|p| p.name == CHROMIUM_PROJECT).unwrap();
        assert!(setup < chromium);
    }

    #[test]
    fn test_plan_rejects_unknown_project() {
        let err = plan(&Project::defaults(), &["saucedemo-webkit".to_string()]).unwrap_err();
        assert!(matches!(err, E2eError::RunnerConfig(_)));
    }

    #[test]
    fn test_plan_detects_cycles() {
        let projects = vec![
            Project::new("a", &["x"]).depends_on("b"),
            Project::new("b", &["x"]).depends_on("a"),
        ];
        let err = plan(&projects, &[]).unwrap_err();
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn test_matches_by_group() {
        let project = Project::new(SAUCEDEMO_CHROMIUM_PROJECT, &[SAUCEDEMO_GROUP]);
        assert!(project.matches(&Suite::new("Checkout", SAUCEDEMO_GROUP)));
        assert!(!project.matches(&Suite::new("Auth", SETUP_GROUP)));
    }
}
