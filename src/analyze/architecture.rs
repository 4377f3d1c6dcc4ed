use super::{AnalysisContext, Analyzer, Tally};
use crate::error::Result;
use crate::scan::filesystem::display_path;
use crate::scan::{Snapshot, CODE_EXTENSIONS};
use crate::types::finding::{Check, Dimension, Finding, Severity};
use crate::types::scoring::DimensionScore;

const DIMENSION: Dimension = Dimension::Architecture;
const SOURCE_DIRS: [&str; 1] = ["src"];
const LARGE_FILE_LINES: usize = 1000;
const MAX_LARGE_FILE_FINDINGS: usize = 5;

const NO_SOURCE_DIR: Check = Check {
    title: "No standard source directory",
    severity: Severity::Low,
    description: "Project lacks a conventional src directory",
    impact: "Harder to navigate and maintain codebase",
    root_cause: "Non-standard project structure",
    remediation: "Consider organizing code into a src directory",
    validation: "Verify project structure follows conventions",
    effort_hours: 8.0,
    penalty: 5.0,
    references: &[],
};

const LARGE_FILE: Check = Check {
    title: "Large file detected",
    severity: Severity::Low,
    description: "File is very large",
    impact: "Harder to maintain and understand",
    root_cause: "Insufficient modularization",
    remediation: "Consider splitting into smaller modules",
    validation: "Verify file is split into cohesive modules",
    effort_hours: 4.0,
    penalty: 2.0,
    references: &[],
};

pub struct ArchitectureAnalyzer;

impl Analyzer for ArchitectureAnalyzer {
    fn dimension(&self) -> Dimension {
        DIMENSION
    }

    fn analyze(&self, snapshot: &Snapshot, _ctx: &AnalysisContext) -> Result<DimensionScore> {
        snapshot.ensure_present()?;
        let mut tally = Tally::new(DIMENSION);

        if !SOURCE_DIRS
            .iter()
            .any(|dir| snapshot.root().join(dir).is_dir())
        {
            tally.record(&NO_SOURCE_DIR, "project root");
        }

        let large_files = snapshot
            .files()
            .iter()
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| CODE_EXTENSIONS.contains(&ext))
            })
            .filter_map(|path| {
                let lines = snapshot.read_text(path)?.lines().count();
                (lines > LARGE_FILE_LINES).then_some((path, lines))
            })
            .take(MAX_LARGE_FILE_FINDINGS);

        for (path, lines) in large_files {
            let finding = Finding {
                description: format!("File has {lines} lines"),
                ..LARGE_FILE.finding(DIMENSION, display_path(path))
            };
            tally.record_finding(finding, LARGE_FILE.penalty);
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
    fn missing_src_and_oversized_files_are_low_findings() {
        let dir = TempDir::new().expect("temp dir should be created");
        write(dir.path(), "app/huge.py", &"x = 1\n".repeat(1200));
        write(dir.path(), "app/small.py", "x = 1\n");
        write(dir.path(), "notes.txt", &"line\n".repeat(5000));

        let score = ArchitectureAnalyzer
            .analyze(&snapshot(&dir), &AnalysisContext::default())
            .expect("analysis should succeed");
        let titles: Vec<&str> = score.findings.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(titles, vec!["No standard source directory", "Large file detected"]);
        assert_eq!(score.findings[1].location, "app/huge.py");
        assert_eq!(score.findings[1].description, "File has 1200 lines");
        assert_eq!(score.score, 93.0);
    }

    #[test]
    fn large_file_findings_are_capped() {
        let dir = TempDir::new().expect("temp dir should be created");
        let body = "fn f() {}\n".repeat(1001);
        for index in 0..7 {
            write(dir.path(), &format!("src/module_{index}.rs"), &body);
        }

        let score = ArchitectureAnalyzer
            .analyze(&snapshot(&dir), &AnalysisContext::default())
            .expect("analysis should succeed");
        assert_eq!(score.findings.len(), MAX_LARGE_FILE_FINDINGS);
        assert_eq!(score.score, 90.0);
    }
}
