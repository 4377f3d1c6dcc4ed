use super::{tree_mentions, AnalysisContext, Analyzer, Tally};
use crate::error::Result;
use crate::scan::Snapshot;
use crate::types::finding::{Check, Dimension, Severity};
use crate::types::scoring::DimensionScore;

const DIMENSION: Dimension = Dimension::Performance;
const CACHE_MARKERS: [&str; 3] = ["redis", "cache", "memcached"];

const NO_CACHING: Check = Check {
    title: "No caching layer detected",
    severity: Severity::Medium,
    description: "No caching implementation found",
    impact: "Repeated expensive operations, higher latency",
    root_cause: "Caching not implemented",
    remediation: "Implement caching for frequently accessed data",
    validation: "Measure cache hit rates and latency improvement",
    effort_hours: 16.0,
    penalty: 15.0,
    references: &[],
};

pub struct PerformanceAnalyzer;

impl Analyzer for PerformanceAnalyzer {
    fn dimension(&self) -> Dimension {
        DIMENSION
    }

    fn analyze(&self, snapshot: &Snapshot, _ctx: &AnalysisContext) -> Result<DimensionScore> {
        snapshot.ensure_present()?;
        let mut tally = Tally::new(DIMENSION);
        if !tree_mentions(snapshot, None, &CACHE_MARKERS) {
            tally.record(&NO_CACHING, "project root");
        }
        Ok(tally.finish())
    }
}
