use super::{AnalysisContext, Analyzer, Tally};
use crate::error::Result;
use crate::scan::Snapshot;
use crate::types::finding::{Check, Dimension, Severity};
use crate::types::scoring::DimensionScore;

const DIMENSION: Dimension = Dimension::Devops;

const CI_MARKERS: [&str; 4] = [
    ".github/workflows",
    ".gitlab-ci.yml",
    "Jenkinsfile",
    ".circleci/config.yml",
];

const NO_CI: Check = Check {
    title: "No CI/CD pipeline detected",
    severity: Severity::High,
    description: "No continuous integration configuration found",
    impact: "Manual deployments are error-prone and slow",
    root_cause: "CI/CD not configured",
    remediation: "Implement CI/CD pipeline with GitHub Actions or similar",
    validation: "Verify automated builds and deployments",
    effort_hours: 16.0,
    penalty: 25.0,
    references: &[],
};

const NO_CONTAINER: Check = Check {
    title: "No Dockerfile found",
    severity: Severity::Medium,
    description: "Application is not containerized",
    impact: "Inconsistent environments between dev and production",
    root_cause: "Containerization not implemented",
    remediation: "Create Dockerfile for consistent deployments",
    validation: "Verify container builds and runs correctly",
    effort_hours: 4.0,
    penalty: 10.0,
    references: &[],
};

pub struct DevopsAnalyzer;

impl Analyzer for DevopsAnalyzer {
    fn dimension(&self) -> Dimension {
        DIMENSION
    }

    fn analyze(&self, snapshot: &Snapshot, _ctx: &AnalysisContext) -> Result<DimensionScore> {
        snapshot.ensure_present()?;
        let mut tally = Tally::new(DIMENSION);

        if !snapshot.any_exists(&CI_MARKERS) {
            tally.record(&NO_CI, "project root");
        }

        let containerized = snapshot.files().iter().any(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("Dockerfile"))
        });
        if !containerized {
            tally.record(&NO_CONTAINER, "project root");
        }

        Ok(tally.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::test_support::{snapshot, write};
    use tempfile::TempDir;

    #[test]
    fn bare_repository_lacks_pipeline_and_container() {
        let dir = TempDir::new().expect("temp dir should be created");
        write(dir.path(), "main.py", "print(1)\n");

        let score = DevopsAnalyzer
            .analyze(&snapshot(&dir), &AnalysisContext::default())
            .expect("analysis should succeed");
        assert_eq!(score.findings.len(), 2);
        assert_eq!(score.score, 65.0);
    }

    #[test]
    fn jenkins_and_nested_dockerfile_satisfy_checks() {
        let dir = TempDir::new().expect("temp dir should be created");
        write(dir.path(), "Jenkinsfile", "pipeline {}\n");
        write(dir.path(), "deploy/Dockerfile.prod", "FROM alpine\n");

        let score = DevopsAnalyzer
            .analyze(&snapshot(&dir), &AnalysisContext::default())
            .expect("analysis should succeed");
        assert!(score.findings.is_empty());
        assert_eq!(score.summary, "devops analysis complete with no issues found.");
    }
}
