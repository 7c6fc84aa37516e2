use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

const XDG_PREFIX: &str = "ips";

/// Global configuration loaded from `~/.config/ips/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareConfig {
    /// Process identity; the share authority is derived from it.
    pub app_id: String,
    /// Authority for issued cache handles. Defaults to `<app_id>.fileprovider`.
    #[serde(default)]
    pub authority: Option<String>,
    /// Cache store directory. Defaults to `~/.cache/ips/share`.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Key-value state file used by the liveness stamp. Defaults to `~/.local/state/ips/state.json`.
    #[serde(default)]
    pub state_file: Option<PathBuf>,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            app_id: XDG_PREFIX.to_string(),
            authority: None,
            cache_dir: None,
            state_file: None,
        }
    }
}

impl ShareConfig {
    /// Authority string used when issuing handles for cached files.
    pub fn authority(&self) -> String {
        match &self.authority {
            Some(a) if !a.trim().is_empty() => a.trim().to_string(),
            _ => format!("{}.fileprovider", self.app_id),
        }
    }

    /// Cache store directory (not created here).
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.cache_dir {
            return Ok(dir.clone());
        }
        let xdg_dirs = xdg::BaseDirectories::with_prefix(XDG_PREFIX)?;
        Ok(xdg_dirs.get_cache_home().join("share"))
    }

    /// Location of the key-value state file (not created here).
    pub fn state_file(&self) -> Result<PathBuf> {
        if let Some(path) = &self.state_file {
            return Ok(path.clone());
        }
        let xdg_dirs = xdg::BaseDirectories::with_prefix(XDG_PREFIX)?;
        Ok(xdg_dirs.get_state_home().join("state.json"))
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix(XDG_PREFIX)?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ShareConfig> {
    load_or_init_at(&config_path()?)
}

/// Same as [`load_or_init`] but at an explicit path.
pub fn load_or_init_at(path: &std::path::Path) -> Result<ShareConfig> {
    if !path.exists() {
        let default_cfg = ShareConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create config dir: {}", parent.display()))?;
        }
        fs::write(path, toml).with_context(|| format!("write config: {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data =
        fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let cfg: ShareConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}
