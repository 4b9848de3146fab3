use anyhow::Context;
use pagesmith_editor::DEFAULT_HISTORY_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_NAME: &str = "pagesmith.config.json";

/// Pagesmith configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Title used for exported documents
    pub title: String,

    /// `lang` attribute of exported documents
    pub lang: String,

    /// Directory exported HTML is written to
    pub out_dir: String,

    /// Snapshots kept by the editing session
    pub history_limit: usize,

    /// Indent exported markup
    pub pretty: bool,
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Invalid config in {}", config_path.display()))?;
            debug!(path = %config_path.display(), ?config, "Loaded config");
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the output directory
    pub fn get_out_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.out_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "My Page".to_string(),
            lang: "en".to_string(),
            out_dir: "dist".to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
            pretty: true,
        }
    }
}
