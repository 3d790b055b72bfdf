//! Configuration file loading
//!
//! The config is a TOML file, by default `<config dir>/automerge/config.toml`.
//! Every duration in it is parsed at load time so a typo fails the run
//! before any pull request is touched.

use crate::error::{Error, Result};
use crate::gate::CiPolicy;
use crate::requirements::{RequirementsConfig, parse_duration};
use crate::types::MergeMethod;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Application directory name under the platform config/data dirs.
const APP_DIR: &str = "automerge";

/// Config filename.
const CONFIG_FILE: &str = "config.toml";

/// Default tracking filename.
const TRACKING_FILE: &str = "tracked.toml";

/// CI polling settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CiConfig {
    /// Wait between two polls (e.g. `"60s"`)
    #[serde(default = "default_poll_interval")]
    pub poll_interval: String,
    /// Maximum number of polls
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for CiConfig {
    fn default() -> Self {
        Self {
            poll_interval: default_poll_interval(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_poll_interval() -> String {
    "60s".to_string()
}

const fn default_max_attempts() -> u32 {
    100
}

fn default_workflow_name() -> String {
    APP_DIR.to_string()
}

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Owner (user or organization) of the repository running automerge
    #[serde(default)]
    pub owner: Option<String>,
    /// Check-run name of automerge's own workflow job, excluded from CI
    #[serde(default = "default_workflow_name")]
    pub workflow_name: String,
    /// Organizations or `org/repo` pairs to search for open PRs
    #[serde(default)]
    pub monitor: Vec<String>,
    /// Organizations or `org/repo` pairs to leave alone
    #[serde(default)]
    pub ignore: Vec<String>,
    /// How PRs are merged
    #[serde(default)]
    pub merge_method: MergeMethod,
    /// Tracking file location
    #[serde(default)]
    pub tracking_file: Option<PathBuf>,
    /// GitHub Enterprise host (None for github.com)
    #[serde(default)]
    pub host: Option<String>,
    /// Per-association requirements
    #[serde(flatten)]
    pub requirements: RequirementsConfig,
    /// CI polling
    #[serde(default)]
    pub ci: CiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            owner: None,
            workflow_name: default_workflow_name(),
            monitor: Vec::new(),
            ignore: Vec::new(),
            merge_method: MergeMethod::default(),
            tracking_file: None,
            host: None,
            requirements: RequirementsConfig::default(),
            ci: CiConfig::default(),
        }
    }
}

impl Config {
    /// Parse and validate config text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| Error::Config(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from `path`, or the default location when `None`
    ///
    /// A missing default file yields the default config; a missing explicit
    /// file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match default_config_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if explicit {
                return Err(Error::Config(format!("{} does not exist", path.display())));
            }
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Check every duration and the CI attempt cap
    pub fn validate(&self) -> Result<()> {
        self.requirements.collaborator.timeout()?;
        self.requirements.contributor.timeout()?;
        parse_duration(&self.ci.poll_interval)?;
        if self.ci.max_attempts == 0 {
            return Err(Error::Config("ci.max_attempts must be at least 1".to_string()));
        }
        Ok(())
    }

    /// The configured owner, required by search and target parsing
    pub fn owner(&self) -> Result<&str> {
        self.owner
            .as_deref()
            .filter(|o| !o.is_empty())
            .ok_or_else(|| {
                Error::Config("no owner configured (set `owner` or pass --owner)".to_string())
            })
    }

    /// CI polling policy derived from this config
    pub fn ci_policy(&self) -> Result<CiPolicy> {
        Ok(CiPolicy {
            self_check_name: self.workflow_name.clone(),
            poll_interval: parse_duration(&self.ci.poll_interval)?,
            max_attempts: self.ci.max_attempts,
        })
    }

    /// Tracking file location, falling back to the data directory
    pub fn tracking_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.tracking_file {
            return Ok(path.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR).join(TRACKING_FILE))
            .ok_or_else(|| {
                Error::Config("no data directory; set `tracking_file` in the config".to_string())
            })
    }
}

/// `<config dir>/automerge/config.toml`, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}
