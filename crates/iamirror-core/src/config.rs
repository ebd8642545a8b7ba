use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default download base; every item's files live under `{base}{item}/`.
pub const DEFAULT_BASE_URL: &str = "https://archive.org/download/";

/// Global configuration loaded from `~/.config/iamirror/config.toml`.
/// CLI flags take precedence over these values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Number of concurrent worker threads for download and validation runs.
    pub threads: usize,
    /// Base URL item files are fetched from.
    pub base_url: String,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            threads: 2,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("iamirror")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MirrorConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MirrorConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: MirrorConfig = toml::from_str(&data)?;
    Ok(cfg)
}
