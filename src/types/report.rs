use super::finding::{Dimension, Finding, Severity};
use super::scoring::{ReadinessLevel, Score};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub repository: String,
    pub assessment_date: String,
    pub duration_seconds: f64,
    pub tool_version: String,
    #[serde(default)]
    pub partial: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub incomplete_dimensions: Vec<Dimension>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutiveSummary {
    pub overall_score: Score,
    pub readiness_level: ReadinessLevel,
    pub total_findings: usize,
    pub critical_count: usize,
    pub high_count: usize,
    pub medium_count: usize,
    pub low_count: usize,
    pub estimated_remediation_hours: f64,
    pub recommendation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechStack {
    pub languages: Vec<String>,
    pub frameworks: Vec<String>,
    pub databases: Vec<String>,
    pub infrastructure: Vec<String>,
}

impl TechStack {
    pub fn add(list: &mut Vec<String>, tech: &str) {
        if !list.iter().any(|existing| existing == tech) {
            list.push(tech.to_string());
        }
    }

    pub fn categories(&self) -> [(&'static str, &[String]); 4] {
        [
            ("languages", &self.languages),
            ("frameworks", &self.frameworks),
            ("databases", &self.databases),
            ("infrastructure", &self.infrastructure),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_files: usize,
    pub total_lines: usize,
    pub file_types: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScoreView {
    pub score: Score,
    pub weight: f64,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub finding_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorizedFindings {
    pub critical: Vec<Finding>,
    pub high: Vec<Finding>,
    pub medium: Vec<Finding>,
    pub low: Vec<Finding>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub info: Vec<Finding>,
}

impl CategorizedFindings {
    pub fn partition(findings: &[Finding]) -> Self {
        let mut categorized = Self::default();
        for finding in findings {
            let bucket = match finding.severity {
                Severity::Critical => &mut categorized.critical,
                Severity::High => &mut categorized.high,
                Severity::Medium => &mut categorized.medium,
                Severity::Low => &mut categorized.low,
                Severity::Info => &mut categorized.info,
            };
            bucket.push(finding.clone());
        }
        categorized
    }

    pub fn iter(&self) -> impl Iterator<Item = &Finding> {
        self.critical
            .iter()
            .chain(&self.high)
            .chain(&self.medium)
            .chain(&self.low)
            .chain(&self.info)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapPhase {
    pub phase: u8,
    pub name: String,
    pub duration: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportModel {
    pub metadata: Metadata,
    pub executive_summary: ExecutiveSummary,
    pub technology_stack: TechStack,
    pub statistics: Statistics,
    pub dimension_scores: BTreeMap<Dimension, DimensionScoreView>,
    pub findings: CategorizedFindings,
    pub remediation_roadmap: Vec<RoadmapPhase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureReport {
    pub error: String,
}

/// Result of one run: a full report, or `{"error": ...}` when the repository
/// could not be obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AssessmentOutcome {
    Completed(Box<ReportModel>),
    Failed(FailureReport),
}

impl AssessmentOutcome {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(FailureReport {
            error: message.into(),
        })
    }

    pub fn report(&self) -> Option<&ReportModel> {
        match self {
            Self::Completed(report) => Some(report),
            Self::Failed(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_outcome_serializes_to_error_only() {
        let outcome = AssessmentOutcome::failed("Failed to clone repository");
        let value = serde_json::to_value(&outcome).expect("outcome should serialize");
        assert_eq!(value, serde_json::json!({"error": "Failed to clone repository"}));
        assert!(value.get("dimension_scores").is_none());
    }

    #[test]
    fn failed_outcome_parses_back() {
        let outcome: AssessmentOutcome =
            serde_json::from_str(r#"{"error":"boom"}"#).expect("error document should parse");
        assert!(outcome.report().is_none());
    }

    #[test]
    fn tech_stack_add_skips_duplicates() {
        let mut stack = TechStack::default();
        TechStack::add(&mut stack.infrastructure, "Kubernetes");
        TechStack::add(&mut stack.infrastructure, "Kubernetes");
        assert_eq!(stack.infrastructure, vec!["Kubernetes"]);
    }
}
