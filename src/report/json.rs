use crate::types::report::AssessmentOutcome;

pub fn to_json(outcome: &AssessmentOutcome) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(outcome)
}
