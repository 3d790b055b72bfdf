//! Shared command context for CLI commands
//!
//! Extracts common setup code shared by the commands.

use automerge::auth::get_github_auth;
use automerge::config::Config;
use automerge::error::{Error, Result};
use automerge::platform::{GitHubService, PlatformService};
use automerge::tracking::FileStore;
use std::path::PathBuf;
use tracing::debug;

/// Options accepted by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Explicit config file
    pub config: Option<PathBuf>,
    /// Owner override
    pub owner: Option<String>,
}

/// Loaded config plus the tracking store
pub struct LocalContext {
    /// Configuration with CLI overrides applied
    pub config: Config,
    /// Watch list
    pub store: FileStore,
}

impl LocalContext {
    /// Load config and open the tracking file; no network access
    pub fn new(options: &GlobalOptions) -> Result<Self> {
        let mut config = Config::load(options.config.as_deref())?;
        if let Some(owner) = &options.owner {
            config.owner = Some(owner.clone());
        }
        let store = FileStore::new(config.tracking_path()?);
        debug!(tracking = %store.path().display(), "loaded config");
        Ok(Self { config, store })
    }
}

/// Local context plus an authenticated platform service
pub struct CommandContext {
    /// Config and watch list
    pub local: LocalContext,
    /// Platform service (GitHub)
    pub platform: Box<dyn PlatformService>,
}

impl CommandContext {
    /// Load config, find a token and create the GitHub service
    pub fn new(options: &GlobalOptions) -> Result<Self> {
        let local = LocalContext::new(options)?;
        let auth = get_github_auth()?;
        debug!(source = auth.source, "using GitHub token");

        let platform = GitHubService::new(&auth.token, local.config.host.as_deref())
            .map_err(|e| Error::Auth(format!("failed to create GitHub client: {e}")))?;

        Ok(Self {
            local,
            platform: Box::new(platform),
        })
    }
}
