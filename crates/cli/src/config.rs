//! Configuration management for the CLI
//!
//! Values come from an optional TOML file layered under `PODCHAOS_*`
//! environment variables. Command-line flags override both.

use anyhow::{Context, Result};
use chaos_lib::FailurePolicy;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "PODCHAOS";

/// CLI configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Namespace used when `--namespace` is not given
    pub namespace: Option<String>,
    /// Image of the companion agent
    pub companion_image: Option<String>,
    /// Container runtime socket on the nodes
    pub runtime_socket: Option<String>,
    /// `abort` or `best-effort`
    pub failure_policy: Option<String>,
    /// `json` or `pretty`
    pub log_format: Option<String>,
    /// Write metrics here after every run
    pub metrics_textfile: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `path` (or the default location) and the
    /// environment. A missing file is not an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::config_path(),
        };

        let mut builder = config::Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(config::File::from(file).required(false));
        }

        builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    pub fn failure_policy(&self) -> Result<FailurePolicy> {
        match &self.failure_policy {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("Invalid failure_policy '{}'", raw)),
            None => Ok(FailurePolicy::default()),
        }
    }

    /// Default configuration file path
    fn config_path() -> Option<PathBuf> {
        dirs_next::home_dir().map(|home| home.join(".config").join("podchaos").join("config.toml"))
    }
}

/// Resolve the kubeconfig file to use, if any.
///
/// `None` means no file exists and the in-cluster environment is tried.
pub fn kubeconfig_path(override_path: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        return Some(PathBuf::from(path));
    }

    if let Ok(path) = std::env::var("KUBECONFIG") {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs_next::home_dir()
        .map(|home| home.join(".kube").join("config"))
        .filter(|path| path.exists())
}
