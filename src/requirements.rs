//! Merge requirements per author association

use crate::error::{Error, Result};
use crate::types::AuthorAssociation;
use serde::Deserialize;
use std::time::Duration;

/// What a pull request must satisfy before it is merged
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Requirements {
    /// Inactivity period before the PR may be merged (e.g. `"3 days"`)
    pub merge_timeout: String,
    /// Minimum number of approving reviews
    pub required_approvals: u32,
}

impl Requirements {
    /// Parse `merge_timeout`
    pub fn timeout(&self) -> Result<Duration> {
        parse_duration(&self.merge_timeout)
    }
}

/// Requirements for trusted authors and for everyone else
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RequirementsConfig {
    /// Owners, members and collaborators
    #[serde(default = "default_collaborator")]
    pub collaborator: Requirements,
    /// Everyone else
    #[serde(default = "default_contributor")]
    pub contributor: Requirements,
}

impl Default for RequirementsConfig {
    fn default() -> Self {
        Self {
            collaborator: default_collaborator(),
            contributor: default_contributor(),
        }
    }
}

fn default_collaborator() -> Requirements {
    Requirements {
        merge_timeout: "3 days".to_string(),
        required_approvals: 1,
    }
}

fn default_contributor() -> Requirements {
    Requirements {
        merge_timeout: "7 days".to_string(),
        required_approvals: 2,
    }
}

/// Pick the requirements that apply to an author
pub const fn resolve_requirements<'a>(
    association: &AuthorAssociation,
    config: &'a RequirementsConfig,
) -> &'a Requirements {
    if association.is_collaborator() {
        &config.collaborator
    } else {
        &config.contributor
    }
}

/// Parse a human duration such as `"3 days"`, `"36h"` or `"1day 12h"`
pub fn parse_duration(value: &str) -> Result<Duration> {
    let compact: String = value.split_whitespace().collect();
    humantime::parse_duration(&compact).map_err(|e| Error::InvalidDuration {
        value: value.to_string(),
        reason: e.to_string(),
    })
}
