use crate::types::finding::Finding;
use crate::types::report::{AssessmentOutcome, ReportModel};
use crate::types::scoring::Score;

const TITLE: &str = "# Production Readiness Assessment Report";
const DETAIL_RECOMMENDATIONS: usize = 3;

pub fn to_markdown(outcome: &AssessmentOutcome) -> String {
    match outcome {
        AssessmentOutcome::Completed(report) => report_markdown(report),
        AssessmentOutcome::Failed(failure) => {
            format!("{TITLE}\n\n**Assessment failed:** {}\n", failure.error)
        }
    }
}

fn overall_badge(score: Score) -> &'static str {
    if score >= 90.0 {
        "🟢"
    } else if score >= 75.0 {
        "🟡"
    } else if score >= 50.0 {
        "🟠"
    } else {
        "🔴"
    }
}

fn dimension_badge(score: Score) -> &'static str {
    if score >= 80.0 {
        "🟢"
    } else if score >= 60.0 {
        "🟡"
    } else if score >= 40.0 {
        "🟠"
    } else {
        "🔴"
    }
}

fn title_case(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn report_markdown(report: &ReportModel) -> String {
    let summary = &report.executive_summary;
    let mut output = String::new();

    output.push_str(&format!("{TITLE}\n\n"));
    output.push_str(&format!("**Generated:** {}\n\n", report.metadata.assessment_date));
    output.push_str(&format!("**Repository:** {}\n\n", report.metadata.repository));
    if report.metadata.partial {
        let missing: Vec<&str> = report
            .metadata
            .incomplete_dimensions
            .iter()
            .map(|dimension| dimension.id())
            .collect();
        output.push_str(&format!(
            "> **Partial report:** no result for {}\n\n",
            missing.join(", ")
        ));
    }

    output.push_str("## Executive Summary\n\n");
    output.push_str(&format!(
        "### Overall Score: {} {:.1}/100\n\n",
        overall_badge(summary.overall_score),
        summary.overall_score
    ));
    output.push_str(&format!("**Readiness Level:** {}\n\n", summary.readiness_level));
    output.push_str(&format!("**Recommendation:** {}\n\n", summary.recommendation));

    output.push_str("### Findings Summary\n\n");
    output.push_str("| Severity | Count |\n|----------|-------|\n");
    output.push_str(&format!("| 🔴 Critical | {} |\n", summary.critical_count));
    output.push_str(&format!("| 🟠 High | {} |\n", summary.high_count));
    output.push_str(&format!("| 🟡 Medium | {} |\n", summary.medium_count));
    output.push_str(&format!("| 🔵 Low | {} |\n", summary.low_count));
    output.push_str(&format!("| **Total** | **{}** |\n\n", summary.total_findings));
    output.push_str(&format!(
        "**Estimated Remediation Effort:** {:.1} hours\n\n",
        summary.estimated_remediation_hours
    ));

    let categories: Vec<_> = report
        .technology_stack
        .categories()
        .into_iter()
        .filter(|(_, techs)| !techs.is_empty())
        .collect();
    if !categories.is_empty() {
        output.push_str("## Technology Stack\n\n");
        for (category, techs) in categories {
            output.push_str(&format!("- **{}:** {}\n", title_case(category), techs.join(", ")));
        }
        output.push('\n');
    }

    output.push_str("## Dimension Scores\n\n");
    output.push_str("| Dimension | Score | Weight | Findings |\n");
    output.push_str("|-----------|-------|--------|----------|\n");
    let mut ranked: Vec<_> = report.dimension_scores.iter().collect();
    ranked.sort_by(|a, b| a.1.score.total_cmp(&b.1.score));
    for (dimension, view) in ranked {
        output.push_str(&format!(
            "| {} | {} {:.1}/100 | {} | {} |\n",
            dimension.display_name(),
            dimension_badge(view.score),
            view.score,
            view.weight,
            view.finding_count
        ));
    }
    output.push('\n');

    let findings = &report.findings;
    if !findings.critical.is_empty() {
        output.push_str("## 🔴 Critical Issues (Immediate Action Required)\n\n");
        for (index, finding) in findings.critical.iter().enumerate() {
            push_detail(&mut output, index + 1, finding, true);
        }
    }
    if !findings.high.is_empty() {
        output.push_str("## 🟠 High Priority Issues (Address Before Production)\n\n");
        for (index, finding) in findings.high.iter().enumerate() {
            push_detail(&mut output, index + 1, finding, false);
        }
    }
    if !findings.medium.is_empty() {
        output.push_str("## 🟡 Medium Priority Issues\n\n");
        output.push_str("| Issue | Location | Effort |\n|-------|----------|--------|\n");
        for finding in &findings.medium {
            output.push_str(&format!(
                "| {} | `{}` | {:.1}h |\n",
                finding.title, finding.location, finding.effort_hours
            ));
        }
        output.push('\n');
    }
    if !findings.low.is_empty() {
        output.push_str("## 🔵 Low Priority Issues (Technical Debt)\n\n");
        output.push_str("| Issue | Location |\n|-------|----------|\n");
        for finding in &findings.low {
            output.push_str(&format!("| {} | `{}` |\n", finding.title, finding.location));
        }
        output.push('\n');
    }

    if !report.remediation_roadmap.is_empty() {
        output.push_str("## Remediation Roadmap\n\n");
        for phase in &report.remediation_roadmap {
            output.push_str(&format!(
                "### Phase {}: {} ({})\n\n",
                phase.phase, phase.name, phase.duration
            ));
            for item in &phase.items {
                output.push_str(&format!("- [ ] {item}\n"));
            }
            output.push('\n');
        }
    }

    output.push_str("## Dimension Details\n\n");
    for (dimension, view) in &report.dimension_scores {
        output.push_str(&format!("### {}\n\n", dimension.display_name()));
        output.push_str(&format!("**Score:** {:.1}/100\n\n", view.score));
        output.push_str(&format!("{}\n\n", view.summary));
        if !view.recommendations.is_empty() {
            output.push_str("**Recommendations:**\n");
            for recommendation in view.recommendations.iter().take(DETAIL_RECOMMENDATIONS) {
                output.push_str(&format!("- {recommendation}\n"));
            }
            output.push('\n');
        }
    }

    output.push_str("---\n\n");
    output.push_str(&format!(
        "*Report generated by readiness {}*\n\n",
        report.metadata.tool_version
    ));
    output.push_str(&format!(
        "*Assessment Duration: {:.1} seconds*\n",
        report.metadata.duration_seconds
    ));

    output
}

fn push_detail(output: &mut String, number: usize, finding: &Finding, full: bool) {
    output.push_str(&format!("### {number}. {}\n\n", finding.title));
    output.push_str(&format!("**Location:** `{}`\n\n", finding.location));
    output.push_str(&format!("**Impact:** {}\n\n", finding.impact));
    if full {
        output.push_str(&format!("**Root Cause:** {}\n\n", finding.root_cause));
        output.push_str(&format!("**Remediation:**\n{}\n\n", finding.remediation));
        output.push_str(&format!("**Validation:**\n{}\n\n", finding.validation));
    } else {
        output.push_str(&format!("**Remediation:** {}\n\n", finding.remediation));
    }
    output.push_str(&format!("**Effort:** {:.1} hours\n\n---\n\n", finding.effort_hours));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures;
    use crate::types::finding::Dimension;

    #[test]
    fn markdown_report_contains_sections() {
        let outcome = AssessmentOutcome::Completed(Box::new(fixtures::report()));
        let rendered = to_markdown(&outcome);

        assert!(rendered.starts_with(TITLE));
        assert!(rendered.contains("**Repository:** https://example.com/acme/api.git"));
        assert!(rendered.contains("### Overall Score: 🟡 88.3/100"));
        assert!(rendered.contains("| 🔴 Critical | 1 |"));
        assert!(rendered.contains("- **Languages:** Python"));
        assert!(!rendered.contains("**Databases:**"));
        assert!(rendered.contains("### 1. Hardcoded API Key detected"));
        assert!(rendered.contains("| No CODEOWNERS file | `project root` |"));
        assert!(rendered.contains("### Phase 1: Critical Security Remediation (Week 1)"));
        assert!(rendered.contains("- [ ] Hardcoded API Key detected"));
        assert!(rendered.contains("*Assessment Duration: 3.4 seconds*"));
        assert!(!rendered.contains("Partial report"));
    }

    #[test]
    fn dimension_table_is_sorted_by_ascending_score() {
        let outcome = AssessmentOutcome::Completed(Box::new(fixtures::report()));
        let rendered = to_markdown(&outcome);
        let security = rendered
            .find("| Security | 🟢 85.0/100")
            .expect("security row present");
        let team = rendered
            .find("| Team Readiness | 🟢 95.0/100")
            .expect("team row present");
        assert!(security < team);
    }

    #[test]
    fn partial_report_names_missing_dimensions() {
        let mut report = fixtures::report();
        report.metadata.partial = true;
        report.metadata.incomplete_dimensions = vec![Dimension::Testing, Dimension::Devops];

        let rendered = to_markdown(&AssessmentOutcome::Completed(Box::new(report)));
        assert!(rendered.contains("> **Partial report:** no result for testing, devops"));
    }

    #[test]
    fn failure_renders_error_only() {
        let rendered = to_markdown(&AssessmentOutcome::failed("clone timed out"));
        assert!(rendered.contains("**Assessment failed:** clone timed out"));
        assert!(!rendered.contains("Dimension Scores"));
    }
}
