pub mod api;
pub mod architecture;
pub mod compliance;
pub mod configuration;
pub mod cost;
pub mod data;
pub mod dependencies;
pub mod devops;
pub mod documentation;
pub mod observability;
pub mod performance;
pub mod reliability;
pub mod security;
pub mod team;
pub mod testing;

use crate::error::Result;
use crate::scan::Snapshot;
use crate::types::finding::{Check, Dimension, Finding};
use crate::types::scoring::{DimensionScore, Score, MAX_SCORE};
use std::sync::Arc;
use tracing::warn;

/// One readiness check suite, bound to a single dimension.
///
/// Implementations only read the snapshot and must return the same result
/// for the same tree. Unreadable files are skipped rather than reported.
pub trait Analyzer: Send + Sync {
    fn dimension(&self) -> Dimension;

    fn analyze(&self, snapshot: &Snapshot, ctx: &AnalysisContext) -> Result<DimensionScore>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComplianceFramework {
    Soc2,
    Gdpr,
    Hipaa,
    Pci,
}

impl ComplianceFramework {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "soc2" => Some(Self::Soc2),
            "gdpr" => Some(Self::Gdpr),
            "hipaa" => Some(Self::Hipaa),
            "pci" | "pcidss" => Some(Self::Pci),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Soc2 => "SOC 2",
            Self::Gdpr => "GDPR",
            Self::Hipaa => "HIPAA",
            Self::Pci => "PCI DSS",
        }
    }
}

/// Per-run options shared by every analyzer.
#[derive(Debug, Clone, Default)]
pub struct AnalysisContext {
    pub compliance: Vec<ComplianceFramework>,
}

impl AnalysisContext {
    pub fn new(frameworks: &[String]) -> Self {
        let mut compliance = Vec::new();
        for raw in frameworks.iter().filter(|raw| !raw.trim().is_empty()) {
            match ComplianceFramework::parse(raw) {
                Some(framework) if !compliance.contains(&framework) => compliance.push(framework),
                Some(_) => {}
                None => warn!(framework = raw.as_str(), "ignoring unknown compliance framework"),
            }
        }
        compliance.sort();
        Self { compliance }
    }
}

/// Accumulates findings for one dimension and deducts each check's penalty
/// from a ceiling of 100.
#[derive(Debug)]
pub struct Tally {
    dimension: Dimension,
    score: Score,
    findings: Vec<Finding>,
}

impl Tally {
    pub fn new(dimension: Dimension) -> Self {
        Self {
            dimension,
            score: MAX_SCORE,
            findings: Vec::new(),
        }
    }

    pub fn record(&mut self, check: &Check, location: impl Into<String>) {
        let finding = check.finding(self.dimension, location);
        self.record_finding(finding, check.penalty);
    }

    pub fn record_finding(&mut self, finding: Finding, penalty: f64) {
        self.score -= penalty;
        self.findings.push(finding);
    }

    pub fn finish(self) -> DimensionScore {
        DimensionScore::from_findings(self.dimension, self.score, self.findings)
    }
}

/// True when any readable file (optionally limited to `suffixes`) mentions one
/// of the lowercase `markers`.
pub(crate) fn tree_mentions(snapshot: &Snapshot, suffixes: Option<&[&str]>, markers: &[&str]) -> bool {
    let matches = |text: String| {
        let lowered = text.to_lowercase();
        markers.iter().any(|marker| lowered.contains(marker))
    };
    match suffixes {
        Some(suffixes) => snapshot
            .texts_with_suffix(suffixes)
            .any(|(_, text)| matches(text)),
        None => snapshot.texts().any(|(_, text)| matches(text)),
    }
}

/// One analyzer per dimension, in declaration order.
pub fn builtin_analyzers() -> Vec<Arc<dyn Analyzer>> {
    let analyzers: Vec<Arc<dyn Analyzer>> = vec![
        Arc::new(security::SecurityAnalyzer),
        Arc::new(architecture::ArchitectureAnalyzer),
        Arc::new(reliability::ReliabilityAnalyzer),
        Arc::new(performance::PerformanceAnalyzer),
        Arc::new(observability::ObservabilityAnalyzer),
        Arc::new(testing::TestingAnalyzer),
        Arc::new(devops::DevopsAnalyzer),
        Arc::new(data::DataAnalyzer),
        Arc::new(api::ApiAnalyzer),
        Arc::new(documentation::DocumentationAnalyzer),
        Arc::new(compliance::ComplianceAnalyzer),
        Arc::new(cost::CostAnalyzer),
        Arc::new(dependencies::DependenciesAnalyzer),
        Arc::new(configuration::ConfigurationAnalyzer),
        Arc::new(team::TeamAnalyzer),
    ];
    debug_assert!(analyzers
        .iter()
        .map(|analyzer| analyzer.dimension())
        .eq(Dimension::ALL));
    analyzers
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::finding::Severity;

    const PENALTY_CHECK: Check = Check {
        title: "Heavy",
        severity: Severity::Critical,
        description: "d",
        impact: "i",
        root_cause: "r",
        remediation: "fix",
        validation: "v",
        effort_hours: 2.0,
        penalty: 40.0,
        references: &[],
    };

    #[test]
    fn tally_clamps_after_repeated_penalties() {
        let mut tally = Tally::new(Dimension::Testing);
        for _ in 0..3 {
            tally.record(&PENALTY_CHECK, "project root");
        }
        let score = tally.finish();
        assert_eq!(score.score, 0.0);
        assert_eq!(score.findings.len(), 3);
        assert!(score
            .findings
            .iter()
            .all(|finding| finding.dimension == Dimension::Testing));
    }

    #[test]
    fn context_parses_known_frameworks_and_drops_unknown() {
        let ctx = AnalysisContext::new(&[
            "gdpr".to_string(),
            "PCI-DSS".to_string(),
            "iso9001".to_string(),
            "GDPR".to_string(),
        ]);
        assert_eq!(
            ctx.compliance,
            vec![ComplianceFramework::Gdpr, ComplianceFramework::Pci]
        );
    }

    #[test]
    fn builtin_analyzers_cover_every_dimension_in_order() {
        let dimensions: Vec<Dimension> = builtin_analyzers()
            .iter()
            .map(|analyzer| analyzer.dimension())
            .collect();
        assert_eq!(dimensions, Dimension::ALL.to_vec());
    }
}
