use super::{AnalysisContext, Analyzer, Tally};
use crate::error::Result;
use crate::scan::Snapshot;
use crate::types::finding::{Check, Dimension, Finding, Severity};
use crate::types::scoring::DimensionScore;

const DIMENSION: Dimension = Dimension::Documentation;

const README_NAMES: [&str; 4] = ["README.md", "README.rst", "README", "readme.md"];
const MIN_README_BYTES: u64 = 500;

const NO_README: Check = Check {
    title: "Missing README",
    severity: Severity::High,
    description: "No README file found",
    impact: "New developers cannot understand or set up the project",
    root_cause: "Documentation not created",
    remediation: "Create README with setup, usage, and architecture overview",
    validation: "Verify README covers essential information",
    effort_hours: 4.0,
    penalty: 30.0,
    references: &[],
};

const THIN_README: Check = Check {
    title: "Minimal README",
    severity: Severity::Low,
    description: "README is very short",
    impact: "Insufficient documentation for onboarding",
    root_cause: "Documentation incomplete",
    remediation: "Expand README with setup, usage, and contribution guidelines",
    validation: "Verify README is comprehensive",
    effort_hours: 2.0,
    penalty: 10.0,
    references: &[],
};

pub struct DocumentationAnalyzer;

impl Analyzer for DocumentationAnalyzer {
    fn dimension(&self) -> Dimension {
        DIMENSION
    }

    fn analyze(&self, snapshot: &Snapshot, _ctx: &AnalysisContext) -> Result<DimensionScore> {
        snapshot.ensure_present()?;
        let mut tally = Tally::new(DIMENSION);

        if !snapshot.any_exists(&README_NAMES) {
            tally.record(&NO_README, "project root");
        } else if let Ok(metadata) = std::fs::metadata(snapshot.root().join("README.md")) {
            let size = metadata.len();
            if size < MIN_README_BYTES {
                let finding = Finding {
                    description: format!("README is only {size} bytes"),
                    ..THIN_README.finding(DIMENSION, "README.md")
                };
                tally.record_finding(finding, THIN_README.penalty);
            }
        }

        Ok(tally.finish())
    }
}
