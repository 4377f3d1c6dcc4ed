use super::{AnalysisContext, Analyzer, Tally};
use crate::error::Result;
use crate::scan::filesystem::display_path;
use crate::scan::Snapshot;
use crate::types::finding::{Check, Dimension, Severity};
use crate::types::scoring::DimensionScore;
use std::path::{Component, Path, PathBuf};

const DIMENSION: Dimension = Dimension::Testing;

const TEST_DIRS: [&str; 5] = ["test", "tests", "__tests__", "spec", "specs"];
const TEST_FILE_MARKERS: [&str; 5] = ["test_", "_test.", ".test.", ".spec.", "tests."];
const WORKFLOW_DIR: &str = ".github/workflows";
const GITLAB_CI: &str = ".gitlab-ci.yml";

const NO_TESTS: Check = Check {
    title: "No test suite found",
    severity: Severity::Critical,
    description: "No test files or test directories detected",
    impact: "No automated verification of code correctness",
    root_cause: "Tests not implemented",
    remediation: "Implement unit and integration tests",
    validation: "Achieve minimum 80% code coverage",
    effort_hours: 40.0,
    penalty: 40.0,
    references: &[],
};

const NO_CI_TESTS: Check = Check {
    title: "Tests not run in CI",
    severity: Severity::High,
    description: "CI pipeline does not appear to run tests",
    impact: "Regressions can be merged without detection",
    root_cause: "Test step missing from CI configuration",
    remediation: "Add test execution to CI pipeline",
    validation: "Verify CI fails on test failures",
    effort_hours: 4.0,
    penalty: 20.0,
    references: &[],
};

pub struct TestingAnalyzer;

impl Analyzer for TestingAnalyzer {
    fn dimension(&self) -> Dimension {
        DIMENSION
    }

    fn analyze(&self, snapshot: &Snapshot, _ctx: &AnalysisContext) -> Result<DimensionScore> {
        snapshot.ensure_present()?;
        let mut tally = Tally::new(DIMENSION);

        if !has_tests(snapshot) {
            tally.record(&NO_TESTS, "project root");
        }

        let ci_files = ci_config_files(snapshot);
        if !ci_files.is_empty() {
            let runs_tests = ci_files.iter().any(|path| {
                snapshot
                    .read_text(path)
                    .is_some_and(|text| text.to_lowercase().contains("test"))
            });
            if !runs_tests {
                let location = ci_files
                    .first()
                    .and_then(|path| path.parent())
                    .map(display_path)
                    .filter(|parent| !parent.is_empty())
                    .unwrap_or_else(|| GITLAB_CI.to_string());
                tally.record(&NO_CI_TESTS, location);
            }
        }

        Ok(tally.finish())
    }
}

fn has_tests(snapshot: &Snapshot) -> bool {
    if TEST_DIRS
        .iter()
        .any(|dir| snapshot.root().join(dir).is_dir())
    {
        return true;
    }
    snapshot.files().iter().any(|path| {
        in_test_dir(path)
            || is_test_file(path)
            || (path.extension().is_some_and(|ext| ext == "rs")
                && snapshot
                    .read_text(path)
                    .is_some_and(|text| text.contains("#[cfg(test)]")))
    })
}

fn in_test_dir(path: &Path) -> bool {
    path.parent().is_some_and(|parent| {
        parent.components().any(|component| match component {
            Component::Normal(name) => name
                .to_str()
                .is_some_and(|name| TEST_DIRS.contains(&name.to_lowercase().as_str())),
            _ => false,
        })
    })
}

fn is_test_file(path: &Path) -> bool {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_lowercase();
    TEST_FILE_MARKERS.iter().any(|marker| name.contains(marker))
}

fn ci_config_files(snapshot: &Snapshot) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = snapshot
        .dir_files(WORKFLOW_DIR)
        .into_iter()
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext == "yml" || ext == "yaml")
        })
        .collect();
    if snapshot.exists(GITLAB_CI) {
        files.push(PathBuf::from(GITLAB_CI));
    }
    files
}
