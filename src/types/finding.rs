use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Readiness dimensions in execution order. The derived `Ord` follows this
/// order, so maps keyed by dimension iterate the same way the analyzers run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Security,
    Architecture,
    Reliability,
    Performance,
    Observability,
    Testing,
    Devops,
    DataManagement,
    ApiContracts,
    Documentation,
    Compliance,
    CostOptimization,
    Dependencies,
    Configuration,
    TeamReadiness,
}

impl Dimension {
    pub const ALL: [Dimension; 15] = [
        Self::Security,
        Self::Architecture,
        Self::Reliability,
        Self::Performance,
        Self::Observability,
        Self::Testing,
        Self::Devops,
        Self::DataManagement,
        Self::ApiContracts,
        Self::Documentation,
        Self::Compliance,
        Self::CostOptimization,
        Self::Dependencies,
        Self::Configuration,
        Self::TeamReadiness,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Security => "security",
            Self::Architecture => "architecture",
            Self::Reliability => "reliability",
            Self::Performance => "performance",
            Self::Observability => "observability",
            Self::Testing => "testing",
            Self::Devops => "devops",
            Self::DataManagement => "data_management",
            Self::ApiContracts => "api_contracts",
            Self::Documentation => "documentation",
            Self::Compliance => "compliance",
            Self::CostOptimization => "cost_optimization",
            Self::Dependencies => "dependencies",
            Self::Configuration => "configuration",
            Self::TeamReadiness => "team_readiness",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Security => "Security",
            Self::Architecture => "Architecture",
            Self::Reliability => "Reliability",
            Self::Performance => "Performance",
            Self::Observability => "Observability",
            Self::Testing => "Testing",
            Self::Devops => "DevOps",
            Self::DataManagement => "Data Management",
            Self::ApiContracts => "API Contracts",
            Self::Documentation => "Documentation",
            Self::Compliance => "Compliance",
            Self::CostOptimization => "Cost Optimization",
            Self::Dependencies => "Dependencies",
            Self::Configuration => "Configuration",
            Self::TeamReadiness => "Team Readiness",
        }
    }

    /// Relative importance used by the overall weighted score.
    pub fn weight(self) -> f64 {
        match self {
            Self::Security | Self::Architecture | Self::Reliability => 3.0,
            Self::Performance
            | Self::Observability
            | Self::Testing
            | Self::Devops
            | Self::DataManagement => 2.0,
            Self::ApiContracts
            | Self::Documentation
            | Self::Compliance
            | Self::CostOptimization
            | Self::Dependencies
            | Self::Configuration
            | Self::TeamReadiness => 1.5,
        }
    }

    /// Accepts ids in any case with `-` or spaces in place of underscores.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|dimension| dimension.id() == normalized)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub title: String,
    pub severity: Severity,
    pub dimension: Dimension,
    pub location: String,
    pub description: String,
    pub impact: String,
    pub root_cause: String,
    pub remediation: String,
    pub validation: String,
    pub effort_hours: f64,
    #[serde(default)]
    pub references: Vec<String>,
}

/// Static description of one rule. Analyzers keep tables of these and turn a
/// match into a [`Finding`] plus the check's score penalty.
#[derive(Debug, Clone, Copy)]
pub struct Check {
    pub title: &'static str,
    pub severity: Severity,
    pub description: &'static str,
    pub impact: &'static str,
    pub root_cause: &'static str,
    pub remediation: &'static str,
    pub validation: &'static str,
    pub effort_hours: f64,
    pub penalty: f64,
    pub references: &'static [&'static str],
}

impl Check {
    pub fn finding(&self, dimension: Dimension, location: impl Into<String>) -> Finding {
        Finding {
            title: self.title.to_string(),
            severity: self.severity,
            dimension,
            location: location.into(),
            description: self.description.to_string(),
            impact: self.impact.to_string(),
            root_cause: self.root_cause.to_string(),
            remediation: self.remediation.to_string(),
            validation: self.validation.to_string(),
            effort_hours: self.effort_hours.max(0.0),
            references: self.references.iter().map(|r| r.to_string()).collect(),
        }
    }
}
