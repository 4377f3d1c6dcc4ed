use super::roadmap::build_roadmap;
use super::scoring::{executive_recommendation, overall_score, round_tenth};
use crate::scan::Discovery;
use crate::types::finding::{Dimension, Finding};
use crate::types::report::{
    CategorizedFindings, DimensionScoreView, ExecutiveSummary, Metadata, ReportModel,
};
use crate::types::scoring::{DimensionScore, ReadinessLevel};
use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

/// Everything a finished run accumulated, ready to be frozen into a report.
#[derive(Debug)]
pub struct RunRecord {
    pub repository: String,
    pub assessment_date: String,
    pub duration: Duration,
    pub discovery: Discovery,
    pub scores: BTreeMap<Dimension, DimensionScore>,
    pub incomplete: BTreeSet<Dimension>,
}

/// Findings in dimension declaration order, then discovery order.
pub fn merge_findings(scores: &BTreeMap<Dimension, DimensionScore>) -> Vec<Finding> {
    scores
        .values()
        .flat_map(|score| score.findings.iter().cloned())
        .collect()
}

pub fn assemble(record: RunRecord) -> ReportModel {
    let findings = merge_findings(&record.scores);
    let categorized = CategorizedFindings::partition(&findings);

    // Banding uses the unrounded score; rounding is for display only.
    let raw_overall = overall_score(record.scores.values());
    let level = ReadinessLevel::from_score(raw_overall);
    let effort: f64 = findings.iter().map(|finding| finding.effort_hours).sum();

    let executive_summary = ExecutiveSummary {
        overall_score: round_tenth(raw_overall),
        readiness_level: level,
        total_findings: findings.len(),
        critical_count: categorized.critical.len(),
        high_count: categorized.high.len(),
        medium_count: categorized.medium.len(),
        low_count: categorized.low.len(),
        estimated_remediation_hours: round_tenth(effort),
        recommendation: executive_recommendation(level, categorized.critical.len()),
    };

    let dimension_scores = record
        .scores
        .iter()
        .map(|(dimension, score)| {
            (
                *dimension,
                DimensionScoreView {
                    score: score.score,
                    weight: dimension.weight(),
                    summary: score.summary.clone(),
                    recommendations: score.recommendations.clone(),
                    finding_count: score.findings.len(),
                },
            )
        })
        .collect();

    ReportModel {
        metadata: Metadata {
            repository: record.repository,
            assessment_date: record.assessment_date,
            duration_seconds: round_tenth(record.duration.as_secs_f64()),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            partial: !record.incomplete.is_empty(),
            incomplete_dimensions: record.incomplete.into_iter().collect(),
        },
        executive_summary,
        technology_stack: record.discovery.tech_stack,
        statistics: record.discovery.statistics,
        dimension_scores,
        remediation_roadmap: build_roadmap(&findings),
        findings: categorized,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::finding::{Check, Severity};

    const SECRET: Check = Check {
        title: "Hardcoded API Key detected",
        severity: Severity::Critical,
        description: "d",
        impact: "i",
        root_cause: "r",
        remediation: "Remove secret",
        validation: "v",
        effort_hours: 2.0,
        penalty: 15.0,
        references: &[],
    };

    const THIN_DOCS: Check = Check {
        title: "Minimal README",
        severity: Severity::Low,
        description: "d",
        impact: "i",
        root_cause: "r",
        remediation: "Expand README",
        validation: "v",
        effort_hours: 0.25,
        penalty: 10.0,
        references: &[],
    };

    fn record(scores: Vec<DimensionScore>, incomplete: &[Dimension]) -> RunRecord {
        RunRecord {
            repository: "acme/api".to_string(),
            assessment_date: "2026-01-01T00:00:00+00:00".to_string(),
            duration: Duration::from_millis(1234),
            discovery: Discovery::default(),
            scores: scores
                .into_iter()
                .map(|score| (score.dimension, score))
                .collect(),
            incomplete: incomplete.iter().copied().collect(),
        }
    }

    #[test]
    fn report_reflects_scores_findings_and_effort() {
        let security = DimensionScore::from_findings(
            Dimension::Security,
            85.0,
            vec![SECRET.finding(Dimension::Security, "config.py")],
        );
        let docs = DimensionScore::from_findings(
            Dimension::Documentation,
            90.0,
            vec![THIN_DOCS.finding(Dimension::Documentation, "README.md")],
        );

        let report = assemble(record(vec![docs, security], &[]));
        let expected = round_tenth((85.0 * 3.0 + 90.0 * 1.5) / 4.5);
        assert_eq!(report.executive_summary.overall_score, expected);
        assert_eq!(report.executive_summary.readiness_level, ReadinessLevel::NearlyReady);
        assert_eq!(report.executive_summary.critical_count, 1);
        assert_eq!(report.executive_summary.estimated_remediation_hours, 2.3);
        assert_eq!(report.findings.critical[0].location, "config.py");
        assert_eq!(report.remediation_roadmap[0].items, vec!["Hardcoded API Key detected"]);
        assert_eq!(report.metadata.duration_seconds, 1.2);
        assert!(!report.metadata.partial);

        let keys: Vec<Dimension> = report.dimension_scores.keys().copied().collect();
        assert_eq!(keys, vec![Dimension::Security, Dimension::Documentation]);
        assert_eq!(report.dimension_scores[&Dimension::Security].weight, 3.0);
        assert_eq!(report.dimension_scores[&Dimension::Security].finding_count, 1);
    }

    #[test]
    fn merge_order_follows_dimension_declaration() {
        let docs = DimensionScore::from_findings(
            Dimension::Documentation,
            90.0,
            vec![THIN_DOCS.finding(Dimension::Documentation, "README.md")],
        );
        let security = DimensionScore::from_findings(
            Dimension::Security,
            85.0,
            vec![SECRET.finding(Dimension::Security, "a.py")],
        );
        let scores: BTreeMap<Dimension, DimensionScore> =
            [(Dimension::Documentation, docs), (Dimension::Security, security)]
                .into_iter()
                .collect();

        let merged = merge_findings(&scores);
        assert_eq!(merged[0].dimension, Dimension::Security);
        assert_eq!(merged[1].dimension, Dimension::Documentation);
    }

    #[test]
    fn incomplete_dimensions_mark_the_report_partial() {
        let security = DimensionScore::from_findings(Dimension::Security, 100.0, Vec::new());
        let report = assemble(record(vec![security], &[Dimension::Testing]));

        assert!(report.metadata.partial);
        assert_eq!(report.metadata.incomplete_dimensions, vec![Dimension::Testing]);
        assert_eq!(report.dimension_scores.len(), 1);
        assert_eq!(report.executive_summary.overall_score, 100.0);
        assert!(report.remediation_roadmap.is_empty());
    }

    #[test]
    fn level_bands_the_unrounded_score() {
        let security = DimensionScore::from_findings(Dimension::Security, 89.97, Vec::new());
        let report = assemble(record(vec![security], &[]));

        assert_eq!(report.executive_summary.overall_score, 90.0);
        assert_eq!(report.executive_summary.readiness_level, ReadinessLevel::NearlyReady);
    }

    #[test]
    fn no_dimensions_scores_zero() {
        let report = assemble(record(Vec::new(), &[]));
        assert_eq!(report.executive_summary.overall_score, 0.0);
        assert_eq!(
            report.executive_summary.readiness_level,
            ReadinessLevel::SubstantialRebuildRequired
        );
    }
}
