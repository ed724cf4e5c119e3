//! Defaults for the command line tools, read from `tilenames.toml`
//!
//! Looked up in order:
//! 1. An explicit `--config` path
//! 2. `$TILEUTILS_CONFIG`
//! 3. The platform config directory from `directories` (`$XDG_CONFIG_HOME/tileutils`
//!    or `~/.config/tileutils` on Linux)
//! 4. `.tileutils/tilenames.toml` in the current directory

use directories::ProjectDirs;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::OutputFormat;

pub const CONFIG_FILE_NAME: &str = "tilenames.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings that persist between runs of `tilenames`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TilenamesConfig {
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

impl TilenamesConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load a config file that must exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Using config {}", path.display());
        Ok(config)
    }

    /// Load the explicit file if given, else the first existing default location
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidates =
            candidate_paths(std::env::var("TILEUTILS_CONFIG").ok(), project_config_dir());
        match candidates.iter().find(|path| path.is_file()) {
            Some(path) => Self::load(path),
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Default config locations, most specific first
pub fn candidate_paths(
    env_override: Option<String>,
    project_config_dir: Option<PathBuf>,
) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(path) = env_override {
        paths.push(PathBuf::from(path));
    }

    if let Some(dir) = project_config_dir {
        paths.push(dir.join(CONFIG_FILE_NAME));
    }

    // Fallback to local directory
    paths.push(PathBuf::from(".tileutils").join(CONFIG_FILE_NAME));
    paths
}

/// Platform config directory for tileutils (honours `$XDG_CONFIG_HOME` on Linux)
fn project_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "tileutils").map(|dirs| dirs.config_dir().to_path_buf())
}
