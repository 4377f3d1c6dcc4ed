use super::finding::{Dimension, Finding, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

pub type Score = f64;

pub const MAX_SCORE: Score = 100.0;
pub const MAX_RECOMMENDATIONS: usize = 5;

pub fn clamp_score(raw: Score) -> Score {
    if raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, MAX_SCORE)
}

#[derive(Debug, Clone, PartialEq)]
pub struct DimensionScore {
    pub dimension: Dimension,
    pub score: Score,
    pub findings: Vec<Finding>,
    pub summary: String,
    pub recommendations: Vec<String>,
}

impl DimensionScore {
    pub fn from_findings(dimension: Dimension, raw_score: Score, findings: Vec<Finding>) -> Self {
        debug_assert!(findings.iter().all(|f| f.dimension == dimension));
        let summary = summarize(dimension, &findings);
        let recommendations = findings
            .iter()
            .take(MAX_RECOMMENDATIONS)
            .map(|finding| finding.remediation.clone())
            .collect();
        Self {
            dimension,
            score: clamp_score(raw_score),
            findings,
            summary,
            recommendations,
        }
    }

    /// Outcome of an analyzer that had nothing applicable to check.
    pub fn neutral(
        dimension: Dimension,
        score: Score,
        summary: impl Into<String>,
        recommendations: &[&str],
    ) -> Self {
        Self {
            dimension,
            score: clamp_score(score),
            findings: Vec::new(),
            summary: summary.into(),
            recommendations: recommendations
                .iter()
                .take(MAX_RECOMMENDATIONS)
                .map(|r| r.to_string())
                .collect(),
        }
    }
}

fn summarize(dimension: Dimension, findings: &[Finding]) -> String {
    if findings.is_empty() {
        return format!("{} analysis complete with no issues found.", dimension.id());
    }
    let count = |severity: Severity| findings.iter().filter(|f| f.severity == severity).count();
    format!(
        "{}: {} critical, {} high, {} medium issues found.",
        dimension.id(),
        count(Severity::Critical),
        count(Severity::High),
        count(Severity::Medium)
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadinessLevel {
    #[serde(rename = "Production Ready")]
    ProductionReady,
    #[serde(rename = "Nearly Ready")]
    NearlyReady,
    #[serde(rename = "Significant Work Needed")]
    SignificantWorkNeeded,
    #[serde(rename = "Not Ready")]
    NotReady,
    #[serde(rename = "Substantial Rebuild Required")]
    SubstantialRebuildRequired,
}

impl ReadinessLevel {
    pub fn from_score(score: Score) -> Self {
        if score >= 90.0 {
            Self::ProductionReady
        } else if score >= 75.0 {
            Self::NearlyReady
        } else if score >= 50.0 {
            Self::SignificantWorkNeeded
        } else if score >= 25.0 {
            Self::NotReady
        } else {
            Self::SubstantialRebuildRequired
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::ProductionReady => "Production Ready",
            Self::NearlyReady => "Nearly Ready",
            Self::SignificantWorkNeeded => "Significant Work Needed",
            Self::NotReady => "Not Ready",
            Self::SubstantialRebuildRequired => "Substantial Rebuild Required",
        }
    }
}

impl fmt::Display for ReadinessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
