//! Logging, metrics and tracing presence.

use super::{tree_mentions, AnalysisContext, Analyzer, Tally};
use crate::error::Result;
use crate::scan::Snapshot;
use crate::types::finding::{Check, Dimension, Severity};
use crate::types::scoring::DimensionScore;

const DIMENSION: Dimension = Dimension::Observability;

const SOURCE_SUFFIXES: [&str; 8] = [".py", ".js", ".ts", ".java", ".go", ".rs", ".rb", ".toml"];

/// Marker lists paired with the check raised when none of them appear.
const CHECKS: [(&[&str], Check); 3] = [
    (
        &["logger", "logging", "winston", "tracing::", "log::"],
        Check {
            title: "No logging framework detected",
            severity: Severity::High,
            description: "No structured logging implementation found",
            impact: "Difficult to debug production issues",
            root_cause: "Logging not implemented",
            remediation: "Implement structured logging with correlation IDs",
            validation: "Verify logs are structured and searchable",
            effort_hours: 8.0,
            penalty: 25.0,
            references: &[],
        },
    ),
    (
        &["prometheus", "datadog", "statsd"],
        Check {
            title: "No metrics collection detected",
            severity: Severity::Medium,
            description: "No metrics instrumentation found",
            impact: "Cannot monitor performance or set up alerts",
            root_cause: "Metrics not implemented",
            remediation: "Implement metrics with Prometheus or similar",
            validation: "Verify metrics are exported and dashboards exist",
            effort_hours: 16.0,
            penalty: 15.0,
            references: &[],
        },
    ),
    (
        &["opentelemetry", "jaeger", "zipkin"],
        Check {
            title: "No distributed tracing detected",
            severity: Severity::Low,
            description: "No distributed tracing instrumentation found",
            impact: "Hard to follow requests across service boundaries",
            root_cause: "Tracing not implemented",
            remediation: "Instrument services with OpenTelemetry",
            validation: "Verify traces are collected end to end",
            effort_hours: 8.0,
            penalty: 5.0,
            references: &[],
        },
    ),
];

pub struct ObservabilityAnalyzer;

impl Analyzer for ObservabilityAnalyzer {
    fn dimension(&self) -> Dimension {
        DIMENSION
    }

    fn analyze(&self, snapshot: &Snapshot, _ctx: &AnalysisContext) -> Result<DimensionScore> {
        snapshot.ensure_present()?;
        let mut tally = Tally::new(DIMENSION);
        for (markers, check) in &CHECKS {
            if !tree_mentions(snapshot, Some(&SOURCE_SUFFIXES[..]), markers) {
                tally.record(check, "project root");
            }
        }
        Ok(tally.finish())
    }
}
