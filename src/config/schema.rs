//! Configuration schema for pylayer
//!
//! Configuration is stored at `~/.config/pylayer/config.toml`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Image builder settings
    pub builder: BuilderConfig,

    /// Order cache settings
    pub cache: CacheConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Container engine used to build images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    #[default]
    Podman,
    Docker,
}

impl Engine {
    /// Executable name
    pub fn program(&self) -> &'static str {
        match self {
            Self::Podman => "podman",
            Self::Docker => "docker",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program())
    }
}

/// Image builder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Container engine
    pub engine: Engine,

    /// Base image repository; the Python version is used as its tag
    pub base_image: String,

    /// Install command; each dependency token is appended to it
    pub installer: String,

    /// Working directory inside the image
    pub workdir: String,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            engine: Engine::Podman,
            base_image: "python".to_string(),
            installer: "pip install --no-cache-dir".to_string(),
            workdir: "/app".to_string(),
        }
    }
}

/// When the reconciled order is written back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommitPolicy {
    /// Before the image build runs, regardless of its outcome
    #[default]
    Always,
    /// Only after the image build succeeds
    OnSuccess,
}

/// Order cache configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding order files (default: state dir)
    pub dir: Option<PathBuf>,

    /// Commit policy on build failure
    pub commit: CommitPolicy,
}
