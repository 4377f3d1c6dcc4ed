use super::{AnalysisContext, Analyzer, Tally};
use crate::error::Result;
use crate::scan::Snapshot;
use crate::types::finding::{Check, Dimension, Severity};
use crate::types::scoring::DimensionScore;

const DIMENSION: Dimension = Dimension::ApiContracts;

const SPEC_DIRS: [&str; 3] = ["", "docs/", "api/"];
const SPEC_NAMES: [&str; 5] = [
    "openapi.yaml",
    "openapi.yml",
    "openapi.json",
    "swagger.yaml",
    "swagger.yml",
];

const NO_API_SPEC: Check = Check {
    title: "No API specification found",
    severity: Severity::Medium,
    description: "No OpenAPI/Swagger specification detected",
    impact: "API contracts are undocumented, integration is error-prone",
    root_cause: "API documentation not maintained",
    remediation: "Create OpenAPI specification for all endpoints",
    validation: "Validate spec with openapi-validator",
    effort_hours: 8.0,
    penalty: 15.0,
    references: &["OpenAPI Specification 3.1"],
};

pub struct ApiAnalyzer;

impl Analyzer for ApiAnalyzer {
    fn dimension(&self) -> Dimension {
        DIMENSION
    }

    fn analyze(&self, snapshot: &Snapshot, _ctx: &AnalysisContext) -> Result<DimensionScore> {
        snapshot.ensure_present()?;
        let mut tally = Tally::new(DIMENSION);

        let documented = SPEC_DIRS.iter().any(|dir| {
            SPEC_NAMES
                .iter()
                .any(|name| snapshot.exists(&format!("{dir}{name}")))
        });
        if !documented {
            tally.record(&NO_API_SPEC, "project root");
        }

        Ok(tally.finish())
    }
}
