pub mod html;
pub mod json;
pub mod md;

use crate::error::{ReadinessError, Result};
use crate::types::report::AssessmentOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
    Html,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
            Self::Html => "html",
        }
    }
}

pub fn render(outcome: &AssessmentOutcome, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::to_json(outcome).map_err(ReadinessError::Json),
        OutputFormat::Markdown => Ok(md::to_markdown(outcome)),
        OutputFormat::Html => Ok(html::to_html(outcome)),
    }
}

/// Loads a structured report written by an earlier run.
pub fn parse_saved(content: &str) -> Result<AssessmentOutcome> {
    serde_json::from_str(content).map_err(|e| ReadinessError::ReportParse(e.to_string()))
}
