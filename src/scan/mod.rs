pub mod filesystem;
pub mod git_meta;
pub mod source;
pub mod stack;

use crate::error::{ReadinessError, Result};
use crate::types::config::ReadinessConfig;
use crate::types::report::{Statistics, TechStack};
use filesystem::{display_path, list_files, read_text};
use std::path::{Path, PathBuf};

pub const CODE_EXTENSIONS: [&str; 14] = [
    "py", "js", "ts", "jsx", "tsx", "java", "go", "rs", "rb", "php", "cs", "cpp", "c", "swift",
];

/// Read-only view of the repository under assessment: the root plus a cached,
/// sorted listing of root-relative file paths.
#[derive(Debug, Clone)]
pub struct Snapshot {
    root: PathBuf,
    files: Vec<PathBuf>,
    max_file_bytes: u64,
}

impl Snapshot {
    pub fn open(root: &Path, config: &ReadinessConfig) -> Result<Self> {
        if !root.is_dir() {
            return Err(ReadinessError::PathNotFound(root.display().to_string()));
        }
        let files = list_files(root, &config.excluded_dirs());
        Ok(Self {
            root: root.to_path_buf(),
            files,
            max_file_bytes: config.scan.max_file_bytes,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Fails when the tree disappeared after the snapshot was taken.
    pub fn ensure_present(&self) -> Result<()> {
        if self.root.is_dir() {
            Ok(())
        } else {
            Err(ReadinessError::SnapshotUnavailable(
                self.root.display().to_string(),
            ))
        }
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.root.join(relative).exists()
    }

    pub fn any_exists(&self, candidates: &[&str]) -> bool {
        candidates.iter().any(|candidate| self.exists(candidate))
    }

    pub fn read_text(&self, relative: &Path) -> Option<String> {
        read_text(&self.root.join(relative), self.max_file_bytes)
    }

    pub fn read_text_at(&self, relative: &str) -> Option<String> {
        self.read_text(Path::new(relative))
    }

    /// Files whose name ends with one of `suffixes` (e.g. `".py"`, `".env"`).
    pub fn files_with_suffix<'a>(
        &'a self,
        suffixes: &'a [&'a str],
    ) -> impl Iterator<Item = &'a PathBuf> + 'a {
        self.files.iter().filter(move |path| {
            let name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or_default();
            suffixes.iter().any(|suffix| name.ends_with(suffix))
        })
    }

    /// Readable text of every file matching `suffixes`, skipping the rest.
    pub fn texts_with_suffix<'a>(
        &'a self,
        suffixes: &'a [&'a str],
    ) -> impl Iterator<Item = (&'a PathBuf, String)> + 'a {
        self.files_with_suffix(suffixes)
            .filter_map(move |path| self.read_text(path).map(|text| (path, text)))
    }

    /// Readable text of every listed file.
    pub fn texts(&self) -> impl Iterator<Item = (&PathBuf, String)> + '_ {
        self.files
            .iter()
            .filter_map(move |path| self.read_text(path).map(|text| (path, text)))
    }

    /// Direct children of `relative` that are files, sorted; hidden
    /// directories such as `.github/workflows` are reachable this way.
    pub fn dir_files(&self, relative: &str) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(self.root.join(relative)) else {
            return Vec::new();
        };
        let mut files: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
            .map(|entry| Path::new(relative).join(entry.file_name()))
            .collect();
        files.sort();
        files
    }
}

/// Secret-like matches under test or example paths are treated as fixtures.
pub fn is_test_or_example(path: &Path) -> bool {
    let lowered = display_path(path).to_lowercase();
    lowered.contains("test") || lowered.contains("example")
}

#[derive(Debug, Clone, Default)]
pub struct Discovery {
    pub tech_stack: TechStack,
    pub statistics: Statistics,
}

pub fn discover(snapshot: &Snapshot) -> Discovery {
    Discovery {
        tech_stack: stack::detect_stack(snapshot),
        statistics: collect_statistics(snapshot),
    }
}

fn collect_statistics(snapshot: &Snapshot) -> Statistics {
    let mut stats = Statistics::default();
    for path in snapshot.files() {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        if name.starts_with('.') {
            continue;
        }
        stats.total_files += 1;

        let extension = path.extension().and_then(|ext| ext.to_str());
        let key = extension.map(|ext| format!(".{ext}")).unwrap_or_default();
        *stats.file_types.entry(key).or_insert(0) += 1;

        if extension.is_some_and(|ext| CODE_EXTENSIONS.contains(&ext)) {
            if let Some(text) = snapshot.read_text(path) {
                stats.total_lines += text.lines().count();
            }
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn discover_counts_files_and_code_lines() {
        let dir = TempDir::new().expect("temp dir should be created");
        fs::create_dir_all(dir.path().join("src")).expect("src should create");
        fs::create_dir_all(dir.path().join("target/debug")).expect("target should create");
        fs::write(dir.path().join("src/main.rs"), "fn main() {\n}\n").expect("main write");
        fs::write(dir.path().join("src/lib.py"), "a = 1\nb = 2\nc = 3\n").expect("py write");
        fs::write(dir.path().join("README.md"), "# Title\n").expect("readme write");
        fs::write(dir.path().join(".env"), "A=1").expect("env write");
        fs::write(dir.path().join("target/debug/out.rs"), "x\n").expect("target write");

        let snapshot =
            Snapshot::open(dir.path(), &ReadinessConfig::default()).expect("snapshot opens");
        let discovery = discover(&snapshot);
        assert_eq!(discovery.statistics.total_files, 3);
        assert_eq!(discovery.statistics.total_lines, 5);
        assert_eq!(discovery.statistics.file_types.get(".rs"), Some(&1));
        assert_eq!(discovery.statistics.file_types.get(".md"), Some(&1));
    }

    #[test]
    fn test_and_example_paths_are_recognised() {
        assert!(is_test_or_example(Path::new("tests/fixtures/keys.py")));
        assert!(is_test_or_example(Path::new("src/Example/config.json")));
        assert!(is_test_or_example(Path::new("src/contest.py")));
        assert!(!is_test_or_example(Path::new("src/config.py")));
    }

    #[test]
    fn dir_files_reaches_hidden_directories() {
        let dir = TempDir::new().expect("temp dir should be created");
        fs::create_dir_all(dir.path().join(".github/workflows")).expect("workflows create");
        fs::write(dir.path().join(".github/workflows/ci.yml"), "on: push").expect("ci write");

        let snapshot =
            Snapshot::open(dir.path(), &ReadinessConfig::default()).expect("snapshot opens");
        assert!(snapshot.files().is_empty());
        assert_eq!(
            snapshot.dir_files(".github/workflows"),
            vec![PathBuf::from(".github/workflows/ci.yml")]
        );
    }

    #[test]
    fn open_rejects_missing_root() {
        let dir = TempDir::new().expect("temp dir should be created");
        let err = Snapshot::open(&dir.path().join("gone"), &ReadinessConfig::default())
            .expect_err("missing root should fail");
        assert!(err.to_string().contains("path does not exist"));
    }
}
