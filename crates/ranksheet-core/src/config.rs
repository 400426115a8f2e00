use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::gate::DEFAULT_COOLDOWN_SECS;

/// Operator-facing settings. Every field has a default so the file is
/// optional; CLI flags override whatever is loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub exam: String,
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_seconds: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db: Option<PathBuf>,
    /// Declared category/shift sets are informational for operators; match
    /// rules stay exact trimmed-string equality regardless.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shifts: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            exam: String::new(),
            cooldown_seconds: DEFAULT_COOLDOWN_SECS,
            db: None,
            categories: Vec::new(),
            shifts: Vec::new(),
        }
    }
}

fn default_cooldown_secs() -> u64 {
    DEFAULT_COOLDOWN_SECS
}

pub fn load_config(path: &Path, strict: bool) -> Result<AppConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError(format!("failed to read config {}: {}", path.display(), e)))?;

    let mut ignored_keys = std::collections::HashSet::new();
    let deserializer = serde_yaml::Deserializer::from_str(&raw);

    // serde_ignored wrapper to capture unknown fields
    let cfg: AppConfig = serde_ignored::deserialize(deserializer, |path| {
        ignored_keys.insert(path.to_string());
    })
    .map_err(|e| ConfigError(format!("failed to parse YAML: {}", e)))?;

    if !ignored_keys.is_empty() {
        if strict {
            return Err(ConfigError(format!(
                "Unknown fields detected in strict mode: {:?} (file: {})",
                ignored_keys,
                path.display()
            )));
        }
        tracing::warn!(
            file = %path.display(),
            keys = ?ignored_keys,
            "ignored unknown config fields"
        );
    }

    Ok(cfg)
}

pub fn write_sample_config(path: &Path) -> Result<(), ConfigError> {
    std::fs::write(
        path,
        r#"# ranksheet configuration
exam: demo-exam
cooldown_seconds: 120
# db: .ranksheet/scores.db
categories: [General, EWS, OBC, SC, ST]
shifts: ["1", "2", "3", "4", "5", "6"]
"#,
    )
    .map_err(|e| ConfigError(format!("failed to write {}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranksheet.yaml");
        write_sample_config(&path).unwrap();

        let cfg = load_config(&path, true).unwrap();
        assert_eq!(cfg.exam, "demo-exam");
        assert_eq!(cfg.cooldown_seconds, 120);
        assert_eq!(cfg.categories.len(), 5);
        assert_eq!(cfg.shifts.len(), 6);
    }

    #[test]
    fn unknown_keys_fail_in_strict_mode_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranksheet.yaml");
        std::fs::write(&path, "exam: x\nretention_days: 30\n").unwrap();

        assert!(load_config(&path, true).is_err());
        let cfg = load_config(&path, false).unwrap();
        assert_eq!(cfg.exam, "x");
        assert_eq!(cfg.cooldown_seconds, DEFAULT_COOLDOWN_SECS);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranksheet.yaml");
        std::fs::write(&path, "exam: mains-2026\n").unwrap();

        let cfg = load_config(&path, true).unwrap();
        assert_eq!(cfg.exam, "mains-2026");
        assert_eq!(cfg.cooldown_seconds, DEFAULT_COOLDOWN_SECS);
        assert!(cfg.db.is_none());
    }
}
