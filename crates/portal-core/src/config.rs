use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use portal_util::errors::PortalError;
use portal_util::fs::{expand_home, home_dir};

/// Global user configuration loaded from `~/.portal/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub pull: PullConfig,

    #[serde(default)]
    pub cache: CacheConfig,
}

/// Pull settings from `[pull]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullConfig {
    /// Package manager used to install missing dependencies.
    #[serde(default, rename = "npm-client")]
    pub npm_client: Option<String>,
    /// Rewrite plural folder names and imports to their singular form.
    #[serde(default)]
    pub singular: bool,
    #[serde(default = "default_branch", rename = "default-branch")]
    pub default_branch: String,
}

impl Default for PullConfig {
    fn default() -> Self {
        Self {
            npm_client: None,
            singular: false,
            default_branch: default_branch(),
        }
    }
}

fn default_branch() -> String {
    "master".to_string()
}

/// Block repository cache from `[cache]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_dir")]
    pub dir: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
        }
    }
}

fn default_cache_dir() -> String {
    "~/.portal/blocks".to_string()
}

impl CacheConfig {
    /// The cache directory with `~` expanded.
    pub fn resolved_dir(&self) -> PathBuf {
        expand_home(&self.dir)
    }
}

impl GlobalConfig {
    /// Load the global configuration from `~/.portal/config.toml`, or return defaults if the file doesn't exist.
    pub fn load() -> miette::Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load configuration from an explicit path, or return defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> miette::Result<Self> {
        if !path.is_file() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| PortalError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        toml::from_str(&content).map_err(|e| {
            PortalError::Config {
                message: format!("Failed to parse {}: {e}", path.display()),
            }
            .into()
        })
    }

    /// `config.toml` inside [`dirs_path`].
    pub fn default_path() -> PathBuf {
        dirs_path().join("config.toml")
    }
}

/// Returns the path to the portal data directory.
///
/// `PORTAL_HOME` overrides the default of `~/.portal/`.
pub fn dirs_path() -> PathBuf {
    match std::env::var("PORTAL_HOME") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => home_dir().join(".portal"),
    }
}
