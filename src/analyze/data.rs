use super::{tree_mentions, AnalysisContext, Analyzer, Tally};
use crate::error::Result;
use crate::scan::Snapshot;
use crate::types::finding::{Check, Dimension, Severity};
use crate::types::scoring::DimensionScore;
use std::path::Component;

const DIMENSION: Dimension = Dimension::DataManagement;

const DATABASE_MARKERS: [&str; 4] = ["database", "postgres", "mysql", "mongo"];
const MIGRATION_DIRS: [&str; 4] = ["migrations", "db/migrations", "alembic", "prisma/migrations"];

const NO_MIGRATIONS: Check = Check {
    title: "No database migrations found",
    severity: Severity::High,
    description: "Database used but no migration system detected",
    impact: "Schema changes are manual and error-prone",
    root_cause: "Migration system not implemented",
    remediation: "Implement database migrations with Alembic, Prisma, or similar",
    validation: "Verify migrations can be applied and rolled back",
    effort_hours: 16.0,
    penalty: 20.0,
    references: &[],
};

pub struct DataAnalyzer;

impl Analyzer for DataAnalyzer {
    fn dimension(&self) -> Dimension {
        DIMENSION
    }

    fn analyze(&self, snapshot: &Snapshot, _ctx: &AnalysisContext) -> Result<DimensionScore> {
        snapshot.ensure_present()?;
        let mut tally = Tally::new(DIMENSION);
        if tree_mentions(snapshot, None, &DATABASE_MARKERS) && !has_migrations(snapshot) {
            tally.record(&NO_MIGRATIONS, "project root");
        }
        Ok(tally.finish())
    }
}

fn has_migrations(snapshot: &Snapshot) -> bool {
    MIGRATION_DIRS
        .iter()
        .any(|dir| snapshot.root().join(dir).is_dir())
        || snapshot.files().iter().any(|path| {
            path.components()
                .any(|component| component == Component::Normal("migrations".as_ref()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::test_support::{snapshot, write};
    use tempfile::TempDir;

    #[test]
    fn database_without_migrations_is_high() {
        let dir = TempDir::new().expect("temp dir should be created");
        write(dir.path(), "app/db.py", "engine = create_engine('postgresql://db')\n");

        let score = DataAnalyzer
            .analyze(&snapshot(&dir), &AnalysisContext::default())
            .expect("analysis should succeed");
        assert_eq!(score.findings.len(), 1);
        assert_eq!(score.score, 80.0);
    }

    #[test]
    fn nested_migrations_or_no_database_pass() {
        let dir = TempDir::new().expect("temp dir should be created");
        write(dir.path(), "README.md", "Plain CLI tool\n");
        let score = DataAnalyzer
            .analyze(&snapshot(&dir), &AnalysisContext::default())
            .expect("analysis should succeed");
        assert!(score.findings.is_empty());

        write(dir.path(), "app/db.py", "DATABASE = 'mysql'\n");
        write(dir.path(), "service/migrations/0001_init.sql", "CREATE TABLE t ();\n");
        let score = DataAnalyzer
            .analyze(&snapshot(&dir), &AnalysisContext::default())
            .expect("analysis should succeed");
        assert!(score.findings.is_empty());
    }
}
