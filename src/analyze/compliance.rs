use super::{tree_mentions, AnalysisContext, Analyzer, ComplianceFramework, Tally};
use crate::error::Result;
use crate::scan::Snapshot;
use crate::types::finding::{Check, Dimension, Finding, Severity};
use crate::types::scoring::DimensionScore;

const DIMENSION: Dimension = Dimension::Compliance;

const LICENSE_FILES: [&str; 4] = ["LICENSE", "LICENSE.md", "LICENSE.txt", "COPYING"];
const PRIVACY_DOCS: [&str; 3] = ["PRIVACY.md", "privacy-policy.md", "docs/privacy.md"];
const SECURITY_POLICIES: [&str; 2] = ["SECURITY.md", ".github/SECURITY.md"];
const AUDIT_MARKERS: [&str; 1] = ["audit"];
const AUDIT_SUFFIXES: [&str; 7] = [".py", ".js", ".ts", ".java", ".go", ".rs", ".rb"];

const NO_LICENSE: Check = Check {
    title: "No LICENSE file",
    severity: Severity::Medium,
    description: "Project lacks a license file",
    impact: "Legal ambiguity for users and contributors",
    root_cause: "License not specified",
    remediation: "Add appropriate LICENSE file",
    validation: "Verify license is appropriate for project",
    effort_hours: 1.0,
    penalty: 15.0,
    references: &[],
};

const NO_PRIVACY_POLICY: Check = Check {
    title: "No privacy policy documentation",
    severity: Severity::Medium,
    description: "Privacy documentation required for data protection compliance",
    impact: "Personal data processing is not documented",
    root_cause: "Privacy policy not written",
    remediation: "Create privacy policy documentation",
    validation: "Verify privacy policy covers data processing activities",
    effort_hours: 4.0,
    penalty: 10.0,
    references: &["GDPR Article 13"],
};

const NO_SECURITY_POLICY: Check = Check {
    title: "No security policy",
    severity: Severity::Medium,
    description: "Security policy required for audit readiness",
    impact: "No documented process for reporting and handling vulnerabilities",
    root_cause: "Security policy not written",
    remediation: "Create SECURITY.md with a vulnerability disclosure process",
    validation: "Verify security policy is published and current",
    effort_hours: 2.0,
    penalty: 10.0,
    references: &[],
};

const NO_AUDIT_LOGGING: Check = Check {
    title: "No audit logging detected",
    severity: Severity::Medium,
    description: "Audit trail required for regulated data access",
    impact: "Access to sensitive data cannot be reconstructed",
    root_cause: "Audit logging not implemented",
    remediation: "Implement audit logging for access to sensitive data",
    validation: "Verify audit records are immutable and retained",
    effort_hours: 16.0,
    penalty: 10.0,
    references: &[],
};

pub struct ComplianceAnalyzer;

impl Analyzer for ComplianceAnalyzer {
    fn dimension(&self) -> Dimension {
        DIMENSION
    }

    fn analyze(&self, snapshot: &Snapshot, ctx: &AnalysisContext) -> Result<DimensionScore> {
        snapshot.ensure_present()?;
        let mut tally = Tally::new(DIMENSION);

        if !snapshot.any_exists(&LICENSE_FILES) {
            tally.record(&NO_LICENSE, "project root");
        }

        for framework in &ctx.compliance {
            let (check, satisfied) = match framework {
                ComplianceFramework::Gdpr => (&NO_PRIVACY_POLICY, snapshot.any_exists(&PRIVACY_DOCS)),
                ComplianceFramework::Soc2 => {
                    (&NO_SECURITY_POLICY, snapshot.any_exists(&SECURITY_POLICIES))
                }
                ComplianceFramework::Hipaa | ComplianceFramework::Pci => (
                    &NO_AUDIT_LOGGING,
                    tree_mentions(snapshot, Some(&AUDIT_SUFFIXES[..]), &AUDIT_MARKERS),
                ),
            };
            if !satisfied {
                let finding = Finding {
                    title: format!("{}: {}", framework.label(), check.title),
                    ..check.finding(DIMENSION, "project root")
                };
                tally.record_finding(finding, check.penalty);
            }
        }

        Ok(tally.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::test_support::{snapshot, write};
    use tempfile::TempDir;

    #[test]
    fn license_is_checked_without_frameworks() {
        let dir = TempDir::new().expect("temp dir should be created");
        let score = ComplianceAnalyzer
            .analyze(&snapshot(&dir), &AnalysisContext::default())
            .expect("analysis should succeed");
        assert_eq!(score.findings.len(), 1);
        assert_eq!(score.score, 85.0);
    }

    #[test]
    fn selected_frameworks_add_their_own_checks() {
        let dir = TempDir::new().expect("temp dir should be created");
        write(dir.path(), "LICENSE", "MIT\n");
        write(dir.path(), "SECURITY.md", "Report issues privately.\n");
        let ctx = AnalysisContext::new(&[
            "gdpr".to_string(),
            "soc2".to_string(),
            "hipaa".to_string(),
        ]);

        let score = ComplianceAnalyzer
            .analyze(&snapshot(&dir), &ctx)
            .expect("analysis should succeed");
        let titles: Vec<&str> = score.findings.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "GDPR: No privacy policy documentation",
                "HIPAA: No audit logging detected"
            ]
        );
        assert_eq!(score.score, 80.0);
    }

    #[test]
    fn audit_logging_in_code_satisfies_pci() {
        let dir = TempDir::new().expect("temp dir should be created");
        write(dir.path(), "COPYING", "GPL\n");
        write(dir.path(), "src/audit.py", "def record_audit_event(user): pass\n");
        let ctx = AnalysisContext::new(&["pci-dss".to_string()]);

        let score = ComplianceAnalyzer
            .analyze(&snapshot(&dir), &ctx)
            .expect("analysis should succeed");
        assert!(score.findings.is_empty());
    }
}
