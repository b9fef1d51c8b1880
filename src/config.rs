use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub perccli: PercCliConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PercCliConfig {
    /// perccli executable; None = first installed generation
    pub path: Option<PathBuf>,
    /// Kill perccli after this many seconds
    pub timeout_secs: u64,
}

// ── Defaults ─────────────────────────────────────────────────────────

impl Default for PercCliConfig {
    fn default() -> Self {
        Self { path: None, timeout_secs: 20 }
    }
}

// ── Load ─────────────────────────────────────────────────────────────

impl Config {
    /// Read `path`, or the per-user config file when None. A missing file
    /// yields defaults; a broken one is logged and ignored.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path.map(Path::to_path_buf).or_else(Config::config_path) else {
            return Config::default();
        };
        match try_load(&path) {
            Ok(Some(c)) => {
                debug!("loaded config from {}", path.display());
                c
            }
            Ok(None) => Config::default(),
            Err(e) => {
                warn!("ignoring config {}: {:#}", path.display(), e);
                Config::default()
            }
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("perccli-status").join("perccli-status.toml"))
    }
}

fn try_load(path: &Path) -> Result<Option<Config>> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e).context("cannot read file"),
    };
    let cfg = toml::from_str(&text).context("invalid TOML")?;
    Ok(Some(cfg))
}
