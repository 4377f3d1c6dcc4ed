use std::path::Path;
use std::process::Command;

#[derive(Debug, Clone, Default)]
pub struct HeadInfo {
    pub branch: Option<String>,
    pub commit_count: Option<u64>,
    pub latest_commit: Option<String>,
}

/// Best-effort description of a checkout's HEAD; every field is optional.
pub fn describe_head(root: &Path) -> HeadInfo {
    HeadInfo {
        branch: git_stdout(root, &["branch", "--show-current"]).filter(|b| !b.is_empty()),
        commit_count: git_stdout(root, &["rev-list", "--count", "HEAD"])
            .and_then(|count| count.parse::<u64>().ok()),
        latest_commit: git_stdout(root, &["log", "-1", "--format=%H %s"]),
    }
}

fn git_stdout(root: &Path, args: &[&str]) -> Option<String> {
    let output = Command::new("git")
        .arg("-C")
        .arg(root)
        .args(args)
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8(output.stdout).ok()?;
    Some(stdout.trim().to_string())
}
