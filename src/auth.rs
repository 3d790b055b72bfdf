//! GitHub token discovery

use crate::error::{Error, Result};
use std::env;

/// Environment variables checked for a token, in order
pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// A GitHub token and where it came from
#[derive(Debug, Clone)]
pub struct GitHubAuth {
    /// API token
    pub token: String,
    /// Environment variable that supplied it
    pub source: &'static str,
}

/// Read the token from `GITHUB_TOKEN`, then `GH_TOKEN`
pub fn get_github_auth() -> Result<GitHubAuth> {
    for var in TOKEN_ENV_VARS {
        if let Ok(token) = env::var(var)
            && !token.trim().is_empty()
        {
            return Ok(GitHubAuth {
                token: token.trim().to_string(),
                source: var,
            });
        }
    }
    Err(Error::Auth(format!(
        "no GitHub token found; set {}",
        TOKEN_ENV_VARS.join(" or ")
    )))
}
