use super::git_meta::describe_head;
use crate::error::{ReadinessError, Result};
use crate::types::config::CloneConfig;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tracing::{debug, info};

const CLONE_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Local(PathBuf),
    Remote(String),
}

impl SourceLocation {
    pub fn resolve(source: &str) -> Self {
        let trimmed = source.trim();
        let local = Path::new(trimmed);
        if local.is_dir() {
            return Self::Local(local.to_path_buf());
        }
        if is_remote(trimmed) {
            Self::Remote(trimmed.to_string())
        } else {
            Self::Local(local.to_path_buf())
        }
    }
}

fn is_remote(source: &str) -> bool {
    const SCHEMES: [&str; 5] = ["http://", "https://", "ssh://", "git://", "file://"];
    if SCHEMES.iter().any(|scheme| source.starts_with(scheme)) {
        return true;
    }
    // scp-like syntax: user@host:path
    match (source.find('@'), source.find(':')) {
        (Some(at), Some(colon)) => at < colon && !source.contains("://"),
        _ => false,
    }
}

/// A ready-to-read checkout. Clones live in a temp workspace that is removed
/// when the checkout is dropped.
#[derive(Debug)]
pub struct Checkout {
    root: PathBuf,
    _workspace: Option<TempDir>,
}

impl Checkout {
    pub fn local(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            _workspace: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

pub trait SnapshotProvider: Send + Sync {
    fn obtain(&self, source: &str) -> Result<Checkout>;
}

#[derive(Debug, Clone, Default)]
pub struct GitProvider {
    config: CloneConfig,
}

impl GitProvider {
    pub fn new(config: CloneConfig) -> Self {
        Self { config }
    }

    fn clone_remote(&self, url: &str) -> Result<Checkout> {
        let workspace = tempfile::Builder::new()
            .prefix("prod_readiness_")
            .tempdir()?;
        let target = workspace.path().join("project");
        let stderr_path = workspace.path().join("clone.stderr");
        let stderr_file = File::create(&stderr_path)?;

        let mut command = Command::new("git");
        command.arg("clone");
        if self.config.depth > 0 {
            command.arg(format!("--depth={}", self.config.depth));
        }
        if self.config.recurse_submodules {
            command.arg("--recurse-submodules");
        }
        command
            .arg("--")
            .arg(url)
            .arg(&target)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(stderr_file));

        info!(url, depth = self.config.depth, "cloning repository");
        let mut child = command
            .spawn()
            .map_err(|e| ReadinessError::GitUnavailable(e.to_string()))?;

        let timeout = Duration::from_secs(self.config.timeout_secs);
        let started = Instant::now();
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if started.elapsed() >= timeout {
                let _ = child.kill();
                let _ = child.wait();
                return Err(ReadinessError::CloneTimedOut {
                    url: url.to_string(),
                    secs: self.config.timeout_secs,
                });
            }
            thread::sleep(CLONE_POLL_INTERVAL);
        };

        if !status.success() {
            let stderr = std::fs::read_to_string(&stderr_path).unwrap_or_default();
            let reason = stderr
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .unwrap_or("git clone exited with a failure status")
                .trim()
                .to_string();
            return Err(ReadinessError::CloneFailed {
                url: url.to_string(),
                reason,
            });
        }

        let head = describe_head(&target);
        info!(
            path = %target.display(),
            branch = head.branch.as_deref().unwrap_or("unknown"),
            commits = head.commit_count.unwrap_or(0),
            "repository cloned"
        );
        if let Some(latest) = head.latest_commit.as_deref() {
            debug!(latest, "latest commit");
        }

        Ok(Checkout {
            root: target,
            _workspace: Some(workspace),
        })
    }
}

impl SnapshotProvider for GitProvider {
    fn obtain(&self, source: &str) -> Result<Checkout> {
        match SourceLocation::resolve(source) {
            SourceLocation::Local(path) => {
                if !path.is_dir() {
                    return Err(ReadinessError::PathNotFound(path.display().to_string()));
                }
                debug!(path = %path.display(), "using local repository in place");
                Ok(Checkout::local(path))
            }
            SourceLocation::Remote(url) => self.clone_remote(&url),
        }
    }
}
