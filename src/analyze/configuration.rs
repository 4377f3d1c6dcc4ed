use super::{AnalysisContext, Analyzer, Tally};
use crate::error::Result;
use crate::scan::Snapshot;
use crate::types::finding::{Check, Dimension, Severity};
use crate::types::scoring::DimensionScore;

const DIMENSION: Dimension = Dimension::Configuration;
const ENV_FILE: &str = ".env";
const ENV_TEMPLATES: [&str; 3] = [".env.example", ".env.sample", ".env.template"];

const NO_ENV_TEMPLATE: Check = Check {
    title: "No .env.example file",
    severity: Severity::Low,
    description: "Environment variables not documented",
    impact: "Developers don't know required configuration",
    root_cause: "Missing environment template",
    remediation: "Create .env.example with all required variables",
    validation: "Verify all env vars are documented",
    effort_hours: 0.5,
    penalty: 10.0,
    references: &[],
};

pub struct ConfigurationAnalyzer;

impl Analyzer for ConfigurationAnalyzer {
    fn dimension(&self) -> Dimension {
        DIMENSION
    }

    fn analyze(&self, snapshot: &Snapshot, _ctx: &AnalysisContext) -> Result<DimensionScore> {
        snapshot.ensure_present()?;
        let mut tally = Tally::new(DIMENSION);
        if snapshot.exists(ENV_FILE) && !snapshot.any_exists(&ENV_TEMPLATES) {
            tally.record(&NO_ENV_TEMPLATE, ENV_FILE);
        }
        Ok(tally.finish())
    }
}
