use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

const CONFIG_FILE: &str = "config.json";
const CONFIG_VERSION: u32 = 1;

/// Contents of `.tasks/config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub version: u32,
    /// Editor command line used by `descr`, split on whitespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            editor: None,
        }
    }
}

impl Config {
    /// Load the config from a store root. A missing file yields the defaults.
    pub fn load(store_root: &Path) -> Result<Self> {
        let path = store_root.join(CONFIG_FILE);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, store_root: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(store_root.join(CONFIG_FILE), json)?;
        Ok(())
    }

    /// Editor candidates in resolution order: config, `$VISUAL`, `$EDITOR`, `vi`.
    pub fn editor_candidates(&self) -> Vec<String> {
        let mut out = Vec::new();
        let configured = self.editor.clone();
        let env = [std::env::var("VISUAL").ok(), std::env::var("EDITOR").ok()];
        for value in std::iter::once(configured).chain(env).flatten() {
            if !value.trim().is_empty() {
                out.push(value);
            }
        }
        out.push("vi".to_string());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());
    }

    #[test]
    fn saved_config_round_trips_editor() {
        let dir = tempdir().unwrap();
        let config = Config {
            version: 1,
            editor: Some("nano -w".into()),
        };
        config.save(dir.path()).unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), config);
    }

    #[test]
    fn default_config_omits_editor() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert_eq!(json, r#"{"version":1}"#);
    }

    #[test]
    fn configured_editor_comes_first() {
        let config = Config {
            version: 1,
            editor: Some("my-editor".into()),
        };
        let candidates = config.editor_candidates();
        assert_eq!(candidates.first().map(String::as_str), Some("my-editor"));
        assert_eq!(candidates.last().map(String::as_str), Some("vi"));
    }
}
