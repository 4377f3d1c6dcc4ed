use super::{AnalysisContext, Analyzer, Tally};
use crate::error::Result;
use crate::scan::Snapshot;
use crate::types::finding::{Check, Dimension, Severity};
use crate::types::scoring::DimensionScore;

const DIMENSION: Dimension = Dimension::TeamReadiness;

const CONTRIBUTING: [&str; 3] = ["CONTRIBUTING.md", ".github/CONTRIBUTING.md", "docs/CONTRIBUTING.md"];
const CODEOWNERS: [&str; 3] = ["CODEOWNERS", ".github/CODEOWNERS", "docs/CODEOWNERS"];

const NO_CONTRIBUTING: Check = Check {
    title: "No contributing guidelines",
    severity: Severity::Low,
    description: "CONTRIBUTING.md not found",
    impact: "New contributors lack guidance",
    root_cause: "Contribution process not documented",
    remediation: "Create CONTRIBUTING.md with development workflow",
    validation: "Verify contributing guide is comprehensive",
    effort_hours: 2.0,
    penalty: 10.0,
    references: &[],
};

const NO_CODEOWNERS: Check = Check {
    title: "No CODEOWNERS file",
    severity: Severity::Low,
    description: "Code ownership is not declared",
    impact: "Reviews are not routed to the responsible maintainers",
    root_cause: "Ownership not documented",
    remediation: "Add a CODEOWNERS file mapping paths to owners",
    validation: "Verify pull requests request the right reviewers",
    effort_hours: 1.0,
    penalty: 5.0,
    references: &[],
};

pub struct TeamAnalyzer;

impl Analyzer for TeamAnalyzer {
    fn dimension(&self) -> Dimension {
        DIMENSION
    }

    fn analyze(&self, snapshot: &Snapshot, _ctx: &AnalysisContext) -> Result<DimensionScore> {
        snapshot.ensure_present()?;
        let mut tally = Tally::new(DIMENSION);
        if !snapshot.any_exists(&CONTRIBUTING) {
            tally.record(&NO_CONTRIBUTING, "project root");
        }
        if !snapshot.any_exists(&CODEOWNERS) {
            tally.record(&NO_CODEOWNERS, "project root");
        }
        Ok(tally.finish())
    }
}
