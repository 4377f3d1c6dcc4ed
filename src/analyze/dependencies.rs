use super::{AnalysisContext, Analyzer, Tally};
use crate::error::Result;
use crate::scan::Snapshot;
use crate::types::finding::{Check, Dimension, Severity};
use crate::types::scoring::DimensionScore;

const DIMENSION: Dimension = Dimension::Dependencies;

const MANIFESTS: [&str; 9] = [
    "package.json",
    "requirements.txt",
    "pyproject.toml",
    "Pipfile",
    "Cargo.toml",
    "go.mod",
    "Gemfile",
    "composer.json",
    "pom.xml",
];

const LOCK_FILES: [&str; 9] = [
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "Pipfile.lock",
    "poetry.lock",
    "Cargo.lock",
    "go.sum",
    "Gemfile.lock",
    "composer.lock",
];

const UPDATE_BOTS: [&str; 6] = [
    ".github/dependabot.yml",
    ".github/dependabot.yaml",
    "renovate.json",
    ".renovaterc",
    ".renovaterc.json",
    ".github/renovate.json",
];

const NO_LOCK_FILE: Check = Check {
    title: "No dependency lock file",
    severity: Severity::Medium,
    description: "Dependencies not locked to specific versions",
    impact: "Non-reproducible builds, potential supply chain attacks",
    root_cause: "Lock file not committed",
    remediation: "Generate and commit lock file",
    validation: "Verify builds are reproducible",
    effort_hours: 1.0,
    penalty: 15.0,
    references: &[],
};

const NO_UPDATE_AUTOMATION: Check = Check {
    title: "No automated dependency updates",
    severity: Severity::Low,
    description: "No Dependabot or Renovate configuration found",
    impact: "Dependencies drift and security patches are applied late",
    root_cause: "Dependency updates are manual",
    remediation: "Enable Dependabot or Renovate for dependency updates",
    validation: "Verify update pull requests are opened automatically",
    effort_hours: 1.0,
    penalty: 5.0,
    references: &[],
};

pub struct DependenciesAnalyzer;

impl Analyzer for DependenciesAnalyzer {
    fn dimension(&self) -> Dimension {
        DIMENSION
    }

    /// Repositories without a dependency manifest have nothing to lock or update.
    fn analyze(&self, snapshot: &Snapshot, _ctx: &AnalysisContext) -> Result<DimensionScore> {
        snapshot.ensure_present()?;
        let mut tally = Tally::new(DIMENSION);

        if snapshot.any_exists(&MANIFESTS) {
            if !snapshot.any_exists(&LOCK_FILES) {
                tally.record(&NO_LOCK_FILE, "project root");
            }
            if !snapshot.any_exists(&UPDATE_BOTS) {
                tally.record(&NO_UPDATE_AUTOMATION, "project root");
            }
        }

        Ok(tally.finish())
    }
}
