//! `alias-sync.toml` configuration and setting resolution.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Config file searched for from the working directory upward.
pub const CONFIG_FILE: &str = "alias-sync.toml";

/// Registry file used when nothing else is configured.
pub const DEFAULT_REGISTRY: &str = "alias.json";

/// Environment variable carrying the listing API base URL.
pub const API_URL_ENV: &str = "API_URL";

/// The top-level config file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    /// Registry file settings.
    #[serde(default)]
    pub registry: RegistrySection,
    /// Remote listing API settings.
    #[serde(default)]
    pub remote: RemoteSection,
}

/// `[registry]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrySection {
    /// Registry file, relative to the config file's directory.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// `[remote]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RemoteSection {
    /// Base URL of the listing API.
    #[serde(default)]
    pub api_url: Option<String>,
    /// Per-request timeout in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl SyncConfig {
    /// Search upward from `start_dir` for `alias-sync.toml`, parse and return
    /// it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let config: SyncConfig = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                return Ok(Some((config, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Parse a config from a TOML string.
    #[cfg(test)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing alias-sync.toml")
    }
}

/// Effective settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Registry file to read and write.
    pub registry: PathBuf,
    /// Listing API base URL, if any source configured one.
    pub api_url: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub registry: Option<PathBuf>,
    pub api_url: Option<String>,
}

impl Settings {
    /// Merge command line, environment and config file.
    ///
    /// Precedence is flag, then `API_URL`, then the config file. Empty values
    /// count as unset. Relative registry paths from the config file resolve
    /// against the config file's directory; everything else against `cwd`.
    pub fn resolve(
        cwd: &Path,
        overrides: Overrides,
        env_api_url: Option<String>,
        config: Option<(SyncConfig, PathBuf)>,
    ) -> Self {
        let (config, config_dir) = match config {
            Some((config, dir)) => (config, Some(dir)),
            None => (SyncConfig::default(), None),
        };

        let registry = match (overrides.registry, config.registry.path, config_dir) {
            (Some(path), _, _) => cwd.join(path),
            (None, Some(path), Some(dir)) => dir.join(path),
            (None, Some(path), None) => cwd.join(path),
            (None, None, _) => cwd.join(DEFAULT_REGISTRY),
        };

        let api_url = [overrides.api_url, env_api_url, config.remote.api_url]
            .into_iter()
            .flatten()
            .map(|url| url.trim().to_string())
            .find(|url| !url.is_empty());

        let timeout = config
            .remote
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(alias_registry::DEFAULT_TIMEOUT);

        Settings {
            registry,
            api_url,
            timeout,
        }
    }
}
