//! Cost checks only apply when the repository carries infrastructure-as-code;
//! otherwise the dimension reports a fixed neutral score.

use super::{AnalysisContext, Analyzer, Tally};
use crate::error::Result;
use crate::scan::Snapshot;
use crate::types::finding::{Check, Dimension, Severity};
use crate::types::scoring::DimensionScore;
use std::path::PathBuf;

const DIMENSION: Dimension = Dimension::CostOptimization;

const IAC_DIRS: [&str; 4] = ["terraform", "kubernetes", "k8s", "cloudformation"];
const IAC_FILES: [&str; 2] = ["serverless.yml", "serverless.yaml"];
const K8S_DIRS: [&str; 2] = ["kubernetes", "k8s"];
const IAC_SUFFIXES: [&str; 5] = [".tf", ".yml", ".yaml", ".json", ".template"];
const AUTOSCALING_MARKERS: [&str; 3] = ["autoscal", "horizontalpodautoscaler", "scaling_config"];

const NEUTRAL_SUMMARY: &str = "Cost optimization analysis requires infrastructure review";
const NEUTRAL_RECOMMENDATIONS: [&str; 2] = ["Review cloud resource sizing", "Implement auto-scaling"];

const NO_AUTOSCALING: Check = Check {
    title: "No autoscaling configuration",
    severity: Severity::Medium,
    description: "Infrastructure definitions do not configure autoscaling",
    impact: "Capacity is provisioned for peak load around the clock",
    root_cause: "Static resource allocation",
    remediation: "Configure autoscaling based on load metrics",
    validation: "Verify capacity scales down during low traffic",
    effort_hours: 8.0,
    penalty: 10.0,
    references: &[],
};

const NO_RESOURCE_LIMITS: Check = Check {
    title: "Kubernetes workloads without resource limits",
    severity: Severity::Low,
    description: "Manifests do not declare CPU or memory limits",
    impact: "Workloads can over-consume cluster capacity",
    root_cause: "Resource requests and limits not set",
    remediation: "Set resource requests and limits on every container",
    validation: "Verify all pods declare resources",
    effort_hours: 2.0,
    penalty: 5.0,
    references: &[],
};

pub struct CostAnalyzer;

impl Analyzer for CostAnalyzer {
    fn dimension(&self) -> Dimension {
        DIMENSION
    }

    fn analyze(&self, snapshot: &Snapshot, _ctx: &AnalysisContext) -> Result<DimensionScore> {
        snapshot.ensure_present()?;
        let iac_files = infrastructure_files(snapshot);
        if iac_files.is_empty() {
            return Ok(DimensionScore::neutral(
                DIMENSION,
                100.0,
                NEUTRAL_SUMMARY,
                &NEUTRAL_RECOMMENDATIONS,
            ));
        }

        let mut tally = Tally::new(DIMENSION);
        let texts: Vec<(PathBuf, String)> = iac_files
            .into_iter()
            .filter_map(|path| snapshot.read_text(&path).map(|text| (path, text.to_lowercase())))
            .collect();

        let autoscaled = texts
            .iter()
            .any(|(_, text)| AUTOSCALING_MARKERS.iter().any(|marker| text.contains(marker)));
        if !autoscaled {
            tally.record(&NO_AUTOSCALING, "project root");
        }

        let manifests: Vec<&String> = texts
            .iter()
            .filter(|(path, _)| K8S_DIRS.iter().any(|dir| path.starts_with(dir)))
            .map(|(_, text)| text)
            .collect();
        if let Some(dir) = K8S_DIRS.iter().find(|dir| snapshot.root().join(dir).is_dir()) {
            if !manifests.is_empty() && !manifests.iter().any(|text| text.contains("limits:")) {
                tally.record(&NO_RESOURCE_LIMITS, *dir);
            }
        }

        Ok(tally.finish())
    }
}

fn infrastructure_files(snapshot: &Snapshot) -> Vec<PathBuf> {
    snapshot
        .files()
        .iter()
        .filter(|path| {
            let under_iac_dir = IAC_DIRS.iter().any(|dir| path.starts_with(dir));
            let is_iac_file = path
                .to_str()
                .is_some_and(|name| IAC_FILES.contains(&name) || name.ends_with(".tf"));
            let suffix_ok = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| IAC_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)));
            (under_iac_dir && suffix_ok) || is_iac_file
        })
        .cloned()
        .collect()
}
