use super::{tree_mentions, AnalysisContext, Analyzer, Tally};
use crate::error::Result;
use crate::scan::Snapshot;
use crate::types::finding::{Check, Dimension, Severity};
use crate::types::scoring::DimensionScore;

const DIMENSION: Dimension = Dimension::Reliability;

const SOURCE_SUFFIXES: [&str; 9] = [".py", ".js", ".ts", ".jsx", ".tsx", ".java", ".go", ".rs", ".rb"];

/// Lowercase markers that indicate some form of error handling.
const ERROR_HANDLING_MARKERS: [&str; 6] = ["try:", "try {", "catch", "except", "result<", "err != nil"];

const NO_ERROR_HANDLING: Check = Check {
    title: "No error handling detected",
    severity: Severity::High,
    description: "Codebase lacks visible error handling patterns",
    impact: "Unhandled errors can crash services",
    root_cause: "Missing try/catch or error handling",
    remediation: "Implement comprehensive error handling",
    validation: "Review error handling coverage",
    effort_hours: 16.0,
    penalty: 20.0,
    references: &[],
};

const NO_HEALTH_ENDPOINT: Check = Check {
    title: "No health check endpoint",
    severity: Severity::Medium,
    description: "No health check endpoint detected",
    impact: "Load balancers and orchestrators cannot verify service health",
    root_cause: "Health endpoint not implemented",
    remediation: "Add /health endpoint returning service status",
    validation: "Verify health endpoint responds correctly",
    effort_hours: 2.0,
    penalty: 10.0,
    references: &[],
};

pub struct ReliabilityAnalyzer;

impl Analyzer for ReliabilityAnalyzer {
    fn dimension(&self) -> Dimension {
        DIMENSION
    }

    fn analyze(&self, snapshot: &Snapshot, _ctx: &AnalysisContext) -> Result<DimensionScore> {
        snapshot.ensure_present()?;
        let mut tally = Tally::new(DIMENSION);

        if !tree_mentions(snapshot, Some(&SOURCE_SUFFIXES[..]), &ERROR_HANDLING_MARKERS) {
            tally.record(&NO_ERROR_HANDLING, "project root");
        }
        if !has_health_endpoint(snapshot) {
            tally.record(&NO_HEALTH_ENDPOINT, "project root");
        }

        Ok(tally.finish())
    }
}

fn has_health_endpoint(snapshot: &Snapshot) -> bool {
    snapshot
        .texts_with_suffix(&SOURCE_SUFFIXES)
        .any(|(_, text)| {
            let lowered = text.to_lowercase();
            lowered.contains("health")
                && (lowered.contains("endpoint") || lowered.contains("route"))
        })
}
