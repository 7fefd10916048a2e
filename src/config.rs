//! Configuration loading.
//!
//! The configuration is read once at startup from a YAML file and then
//! passed explicitly to the plugin registry and to every plugin factory.
//!
//! Lookup order for the file:
//! 1. `MESOS_CLI_CONFIG` (if set and non-empty)
//! 2. `~/.mesos/config.yaml`
//!
//! A missing or empty file yields the defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::CliError;

pub const CONFIG_ENV: &str = "MESOS_CLI_CONFIG";
pub const DEFAULT_MASTER: &str = "127.0.0.1:5050";
pub const DEFAULT_NAMESPACE: &str = "plugins";

/// Effective configuration for one process invocation.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Base URL of the Mesos master (always ends with `/`).
    pub master: Url,
    /// Namespace plugin identifiers are resolved against.
    pub namespace: String,
    /// Plugin identifiers to load, in declaration order.
    pub plugins: Vec<String>,
    /// File the configuration was read from, if any.
    #[serde(skip)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    master: Option<String>,
    namespace: Option<String>,
    plugins: Option<Vec<String>>,
}

impl Config {
    /// Load the configuration from the default location.
    pub fn load() -> Result<Self, CliError> {
        Self::load_from(config_path())
    }

    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load_from(path: Option<PathBuf>) -> Result<Self, CliError> {
        let raw = match path.as_deref() {
            Some(p) => read_yaml(p)?.unwrap_or_default(),
            None => RawConfig::default(),
        };
        Self::from_raw(raw, path)
    }

    /// Load from `path`, which must exist.
    pub fn read(path: &Path) -> Result<Self, CliError> {
        let Some(raw) = read_yaml(path)? else {
            return Err(CliError::Config(format!(
                "configuration file '{}' does not exist",
                path.display()
            )));
        };
        Self::from_raw(raw, Some(path.to_path_buf()))
    }

    fn from_raw(raw: RawConfig, path: Option<PathBuf>) -> Result<Self, CliError> {
        let master = parse_master(raw.master.as_deref().unwrap_or(DEFAULT_MASTER))?;
        let namespace = raw
            .namespace
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());
        let plugins = raw
            .plugins
            .unwrap_or_else(crate::plugins::builtin_ids)
            .into_iter()
            .map(|id| id.trim().to_string())
            .collect();

        Ok(Config {
            master,
            namespace,
            plugins,
            path,
        })
    }
}

/// Path of the configuration file consulted by [`Config::load`].
pub fn config_path() -> Option<PathBuf> {
    if let Ok(p) = std::env::var(CONFIG_ENV)
        && !p.trim().is_empty()
    {
        return Some(PathBuf::from(p));
    }
    dirs::home_dir().map(|home| home.join(".mesos").join("config.yaml"))
}

/// Parse a master address. Accepts a full URL or a bare `host:port`.
pub fn parse_master(raw: &str) -> Result<Url, CliError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CliError::Config("master address is empty".into()));
    }
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    let mut url = Url::parse(&candidate)
        .map_err(|e| CliError::Config(format!("invalid master address '{trimmed}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(CliError::Config(format!(
            "master address '{trimmed}' must use http or https"
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(CliError::Config(format!(
            "master address '{trimmed}' has no host"
        )));
    }
    // Endpoint joins treat the last segment as a directory.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// `Ok(None)` when the file does not exist or is blank.
fn read_yaml(path: &Path) -> Result<Option<RawConfig>, CliError> {
    let contents = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(CliError::Config(format!(
                "unable to read '{}': {e}",
                path.display()
            )));
        }
    };
    if contents.trim().is_empty() {
        return Ok(Some(RawConfig::default()));
    }
    serde_yaml::from_str(&contents)
        .map(Some)
        .map_err(|e| CliError::Config(format!("invalid configuration '{}': {e}", path.display())))
}
