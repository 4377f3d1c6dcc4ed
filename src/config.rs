use crate::error::{ReadinessError, Result};
use crate::types::config::ReadinessConfig;
use std::path::{Path, PathBuf};
use toml::map::Map;
use toml::Value;

pub const DEFAULT_GLOBAL_CONFIG_FILE: &str = ".config/readiness/config.toml";

/// Loads the global config (if any) and overlays the explicit file on top.
pub fn load_config(explicit: Option<&Path>) -> Result<ReadinessConfig> {
    let global = std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(DEFAULT_GLOBAL_CONFIG_FILE));
    load_config_with_global(explicit, global.as_deref())
}

pub(crate) fn load_config_with_global(
    explicit: Option<&Path>,
    global_path: Option<&Path>,
) -> Result<ReadinessConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(ReadinessError::ConfigParse(format!(
                "config file not found: {}",
                path.display()
            )));
        }
    }

    let mut merged = Value::Table(Map::new());
    if let Some(path) = global_path {
        merge_file_if_exists(&mut merged, path)?;
    }
    if let Some(path) = explicit {
        merge_file_if_exists(&mut merged, path)?;
    }

    let cfg: ReadinessConfig = merged.try_into()?;
    cfg.validate()?;
    Ok(cfg)
}

fn merge_file_if_exists(merged: &mut Value, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let value = read_toml_value(path)?;
    merge_toml(merged, value);
    Ok(())
}

fn read_toml_value(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| ReadinessError::ConfigParse(format!("{}: {}", path.display(), e)))
}

fn merge_toml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Table(base_table), Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => {
            *slot = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_config_uses_defaults_without_files() {
        let cfg = load_config_with_global(None, None).expect("defaults should load");
        assert_eq!(cfg.execution.analyzer_timeout_secs, 120);
        assert_eq!(cfg.clone.depth, 100);
    }

    #[test]
    fn load_config_rejects_missing_explicit_file() {
        let dir = TempDir::new().expect("temp dir should be created");
        let err = load_config_with_global(Some(&dir.path().join("nope.toml")), None)
            .expect_err("missing explicit config should fail");
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_config_overlays_explicit_on_global() {
        let dir = TempDir::new().expect("temp dir should be created");
        let global_path = dir.path().join("global.toml");
        let explicit_path = dir.path().join("readiness.toml");

        fs::write(
            &global_path,
            r#"
[execution]
workers = 2
analyzer_timeout_secs = 30

[clone]
depth = 1
"#,
        )
        .expect("global config should write");
        fs::write(
            &explicit_path,
            r#"
[execution]
analyzer_timeout_secs = 45

[scan]
excluded_dirs = ["generated"]
"#,
        )
        .expect("explicit config should write");

        let cfg = load_config_with_global(Some(&explicit_path), Some(&global_path))
            .expect("merged config should load");
        assert_eq!(cfg.execution.workers, 2);
        assert_eq!(cfg.execution.analyzer_timeout_secs, 45);
        assert_eq!(cfg.clone.depth, 1);
        assert!(cfg.excluded_dirs().contains(&"generated".to_string()));
    }

    #[test]
    fn load_config_rejects_mistyped_values() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("readiness.toml");
        fs::write(&path, "[execution]\nworkers = \"many\"\n").expect("config should write");
        let err = load_config_with_global(Some(&path), None).expect_err("bad type should fail");
        assert!(matches!(err, ReadinessError::Toml(_)));
        assert!(err.to_string().contains("invalid values"));
    }

    #[test]
    fn load_config_reports_parse_errors_with_path() {
        let dir = TempDir::new().expect("temp dir should be created");
        let path = dir.path().join("broken.toml");
        fs::write(&path, "[execution\nworkers = ").expect("broken config should write");
        let err = load_config_with_global(Some(&path), None).expect_err("parse should fail");
        assert!(err.to_string().contains("broken.toml"));
    }
}
