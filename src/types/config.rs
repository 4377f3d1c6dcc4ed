use crate::error::ReadinessError;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_EXCLUDED_DIRS: [&str; 7] = [
    ".git",
    "node_modules",
    "vendor",
    "__pycache__",
    "target",
    "dist",
    "build",
];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReadinessConfig {
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub clone: CloneConfig,
    #[serde(default)]
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExecutionConfig {
    /// 0 means one worker per available core.
    #[serde(default)]
    pub workers: usize,
    #[serde(default = "default_analyzer_timeout")]
    pub analyzer_timeout_secs: u64,
    pub run_deadline_secs: Option<u64>,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            analyzer_timeout_secs: default_analyzer_timeout(),
            run_deadline_secs: None,
        }
    }
}

fn default_analyzer_timeout() -> u64 {
    120
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloneConfig {
    /// 0 clones the full history.
    #[serde(default = "default_clone_depth")]
    pub depth: u32,
    #[serde(default = "default_clone_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub recurse_submodules: bool,
}

impl Default for CloneConfig {
    fn default() -> Self {
        Self {
            depth: default_clone_depth(),
            timeout_secs: default_clone_timeout(),
            recurse_submodules: false,
        }
    }
}

fn default_clone_depth() -> u32 {
    100
}

fn default_clone_timeout() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub excluded_dirs: Vec<String>,
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            excluded_dirs: Vec::new(),
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

fn default_max_file_bytes() -> u64 {
    2 * 1024 * 1024
}

impl ReadinessConfig {
    pub fn worker_count(&self) -> usize {
        if self.execution.workers > 0 {
            return self.execution.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }

    pub fn analyzer_timeout(&self) -> Duration {
        Duration::from_secs(self.execution.analyzer_timeout_secs)
    }

    pub fn run_deadline(&self) -> Option<Duration> {
        self.execution.run_deadline_secs.map(Duration::from_secs)
    }

    pub fn excluded_dirs(&self) -> Vec<String> {
        let mut dirs: Vec<String> = DEFAULT_EXCLUDED_DIRS
            .iter()
            .map(|dir| dir.to_string())
            .collect();
        for extra in &self.scan.excluded_dirs {
            let trimmed = extra.trim().trim_matches('/');
            if !trimmed.is_empty() && !dirs.iter().any(|dir| dir == trimmed) {
                dirs.push(trimmed.to_string());
            }
        }
        dirs
    }

    pub fn validate(&self) -> Result<(), ReadinessError> {
        if self.execution.analyzer_timeout_secs == 0 {
            return Err(ReadinessError::ConfigParse(
                "execution.analyzer_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.execution.run_deadline_secs == Some(0) {
            return Err(ReadinessError::ConfigParse(
                "execution.run_deadline_secs must be greater than 0 when set".to_string(),
            ));
        }
        if self.clone.timeout_secs == 0 {
            return Err(ReadinessError::ConfigParse(
                "clone.timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.scan.max_file_bytes == 0 {
            return Err(ReadinessError::ConfigParse(
                "scan.max_file_bytes must be greater than 0".to_string(),
            ));
        }
        if let Some(bad) = self
            .scan
            .excluded_dirs
            .iter()
            .find(|dir| dir.contains("..") || dir.trim().is_empty())
        {
            return Err(ReadinessError::ConfigParse(format!(
                "scan.excluded_dirs contains an invalid entry: {bad:?}"
            )));
        }
        Ok(())
    }
}
