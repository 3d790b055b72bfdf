//! Tracked pull requests
//!
//! The watch list of PR URLs that `automerge update` evaluates. URLs are
//! added by `automerge track` / `automerge find --track` and removed once
//! the PR is closed, merged, or about to be merged.

mod storage;

pub use storage::{FileStore, load_tracking, save_tracking};

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current tracking file format version.
pub const TRACKING_VERSION: u32 = 1;

/// A pull request URL under consideration for auto-merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedPullRequest {
    /// PR web URL
    pub url: String,
    /// When the URL was added
    pub added_at: DateTime<Utc>,
}

/// Persisted tracking state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingState {
    /// File format version
    pub version: u32,
    /// Tracked PRs in insertion order
    #[serde(default)]
    pub pull_requests: Vec<TrackedPullRequest>,
}

impl Default for TrackingState {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackingState {
    /// Empty state at the current version
    pub const fn new() -> Self {
        Self {
            version: TRACKING_VERSION,
            pull_requests: Vec::new(),
        }
    }

    /// Add `url` unless already tracked; returns whether it was added
    pub fn track(&mut self, url: &str) -> bool {
        if self.is_tracked(url) {
            return false;
        }
        self.pull_requests.push(TrackedPullRequest {
            url: url.to_string(),
            added_at: Utc::now(),
        });
        true
    }

    /// Remove `url`; returns whether it was tracked
    pub fn untrack(&mut self, url: &str) -> bool {
        let before = self.pull_requests.len();
        self.pull_requests.retain(|pr| pr.url != url);
        self.pull_requests.len() != before
    }

    /// Whether `url` is tracked
    pub fn is_tracked(&self, url: &str) -> bool {
        self.pull_requests.iter().any(|pr| pr.url == url)
    }

    /// Tracked URLs in order
    pub fn urls(&self) -> Vec<&str> {
        self.pull_requests.iter().map(|pr| pr.url.as_str()).collect()
    }
}

/// Storage for the watch list
///
/// Each mutation is applied to the persisted list immediately.
pub trait TrackedStore: Send + Sync {
    /// All tracked URLs in order
    fn list(&self) -> Result<Vec<String>>;

    /// Track `url`; returns false if it already was
    fn add(&self, url: &str) -> Result<bool>;

    /// Stop tracking `url`; returns false if it was not tracked
    fn remove(&self, url: &str) -> Result<bool>;
}
