use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use portal_util::errors::PortalError;

/// Package name to version-range expression.
pub type DependencyMap = BTreeMap<String, String>;

/// The parsed representation of a `package.json` file.
///
/// Only the fields a pull reads are modelled; everything else in the file is
/// ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub version: Option<String>,

    #[serde(default)]
    pub dependencies: DependencyMap,

    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: DependencyMap,

    #[serde(default, rename = "blockConfig")]
    pub block_config: Option<BlockConfig>,
}

/// Block metadata from the `blockConfig` key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockConfig {
    /// Sub-block locations, relative to the block repository root.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl PackageManifest {
    /// Load and parse a `package.json` file from the given path.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PortalError::Manifest {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::from_str(&content).map_err(|e| {
            PortalError::Manifest {
                message: format!("Failed to parse {}: {e}", path.display()),
            }
            .into()
        })
    }

    /// Parse a `package.json` from a string.
    pub fn from_str(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// The block name: the last `/` segment of `name`, so `@scope/foo` gives `foo`.
    pub fn block_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .and_then(|n| n.rsplit('/').next())
            .filter(|n| !n.is_empty())
    }

    /// Sub-block locations declared under `blockConfig.dependencies`.
    pub fn sub_blocks(&self) -> &[String] {
        self.block_config
            .as_ref()
            .map(|c| c.dependencies.as_slice())
            .unwrap_or_default()
    }
}

/// Normalize a route path so it always starts with `/`.
pub fn normalize_route_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
