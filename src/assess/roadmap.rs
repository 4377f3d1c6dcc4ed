use crate::types::finding::{Dimension, Finding, Severity};
use crate::types::report::RoadmapPhase;

const MAX_PHASE_ITEMS: usize = 5;

struct PhaseRule {
    phase: u8,
    name: &'static str,
    duration: &'static str,
    severity: Severity,
    dimension: Option<Dimension>,
}

const PHASES: [PhaseRule; 3] = [
    PhaseRule {
        phase: 1,
        name: "Critical Security Remediation",
        duration: "Week 1",
        severity: Severity::Critical,
        dimension: Some(Dimension::Security),
    },
    PhaseRule {
        phase: 2,
        name: "High Priority Issues",
        duration: "Weeks 2-3",
        severity: Severity::High,
        dimension: None,
    },
    PhaseRule {
        phase: 3,
        name: "Medium Priority Improvements",
        duration: "Weeks 4-6",
        severity: Severity::Medium,
        dimension: None,
    },
];

/// Builds the remediation roadmap from the merged finding list.
///
/// Empty phases are omitted and the remaining ones keep their fixed numbers,
/// so a report may jump from phase 1 to phase 3. LOW and INFO findings never
/// appear here.
pub fn build_roadmap(findings: &[Finding]) -> Vec<RoadmapPhase> {
    PHASES
        .iter()
        .filter_map(|rule| {
            let items: Vec<String> = findings
                .iter()
                .filter(|finding| finding.severity == rule.severity)
                .filter(|finding| rule.dimension.map_or(true, |d| finding.dimension == d))
                .take(MAX_PHASE_ITEMS)
                .map(|finding| finding.title.clone())
                .collect();
            (!items.is_empty()).then(|| RoadmapPhase {
                phase: rule.phase,
                name: rule.name.to_string(),
                duration: rule.duration.to_string(),
                items,
            })
        })
        .collect()
}
