//! Watch targets and the open-PR search
//!
//! Targets are `org` or `org/repo` strings. Only targets inside the current
//! owner's organization are honored; the rest are dropped with a warning.

use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::SearchHit;
use tracing::{error, info, warn};

/// Fixed part of the open-PR search
pub const OPEN_PR_QUERY: &str = "is:pr is:open draft:false";

/// A normalized organization or repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchTarget {
    /// Organization (as written in the current owner)
    pub org: String,
    /// Repository, when the target names one
    pub repo: Option<String>,
}

impl WatchTarget {
    /// Parse `target` against the current owner
    ///
    /// Returns `None` when the organization is not `owner` (compared
    /// case-insensitively, like GitHub logins) or the string is malformed.
    pub fn parse(target: &str, owner: &str) -> Option<Self> {
        let target = target.trim();
        let (org, repo) = match target.split_once('/') {
            Some((org, repo)) => (org, Some(repo)),
            None => (target, None),
        };

        if org.is_empty() || repo.is_some_and(|r| r.is_empty() || r.contains('/')) {
            warn!(target, "ignoring malformed watch target");
            return None;
        }
        if !org.eq_ignore_ascii_case(owner) {
            warn!(target, owner, "ignoring watch target outside the current owner");
            return None;
        }

        Some(Self {
            org: owner.to_string(),
            repo: repo.map(str::to_string),
        })
    }

    /// Search qualifier selecting this target (`org:x` or `repo:x/y`)
    pub fn qualifier(&self) -> String {
        match &self.repo {
            Some(repo) => format!("repo:{}/{repo}", self.org),
            None => format!("org:{}", self.org),
        }
    }
}

/// Search filter for the monitor and ignore lists
///
/// Falls back to the owner's whole organization when no monitor target
/// survives parsing.
pub fn build_search_filter<M, I>(monitor: M, ignore: I, owner: &str) -> String
where
    M: IntoIterator,
    M::Item: AsRef<str>,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut terms: Vec<String> = monitor
        .into_iter()
        .filter_map(|t| WatchTarget::parse(t.as_ref(), owner))
        .map(|t| t.qualifier())
        .collect();

    if terms.is_empty() {
        terms.push(format!("org:{owner}"));
    }

    terms.extend(
        ignore
            .into_iter()
            .filter_map(|t| WatchTarget::parse(t.as_ref(), owner))
            .map(|t| format!("-{}", t.qualifier())),
    );

    terms.join(" ")
}

/// Full search query for open, non-draft pull requests
pub fn build_search_query<M, I>(monitor: M, ignore: I, owner: &str) -> String
where
    M: IntoIterator,
    M::Item: AsRef<str>,
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    format!(
        "{OPEN_PR_QUERY} {}",
        build_search_filter(monitor, ignore, owner)
    )
}

/// Find open, non-draft PRs in the watched targets
pub async fn find_open_pull_requests(
    platform: &dyn PlatformService,
    monitor: &[String],
    ignore: &[String],
    owner: &str,
) -> Result<Vec<SearchHit>> {
    let query = build_search_query(monitor, ignore, owner);
    match platform.search_pull_requests(&query).await {
        Ok(hits) => {
            info!(query, count = hits.len(), "found open pull requests");
            Ok(hits)
        }
        Err(e) => {
            error!(query, error = %e, "pull request search failed");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_org_and_repo() {
        assert_eq!(
            WatchTarget::parse("acme", "acme"),
            Some(WatchTarget {
                org: "acme".to_string(),
                repo: None
            })
        );
        assert_eq!(
            WatchTarget::parse("ACME/widgets", "acme"),
            Some(WatchTarget {
                org: "acme".to_string(),
                repo: Some("widgets".to_string())
            })
        );
    }

    #[test]
    fn test_parse_drops_foreign_and_malformed() {
        assert_eq!(WatchTarget::parse("otherorg/repo", "acme"), None);
        assert_eq!(WatchTarget::parse("otherorg", "acme"), None);
        assert_eq!(WatchTarget::parse("", "acme"), None);
        assert_eq!(WatchTarget::parse("acme/", "acme"), None);
        assert_eq!(WatchTarget::parse("acme/a/b", "acme"), None);
    }

    #[test]
    fn test_filter_defaults_to_owner_org() {
        let filter = build_search_filter(Vec::<String>::new(), ["acme/legacy"], "acme");
        assert_eq!(filter, "org:acme -repo:acme/legacy");
    }

    #[test]
    fn test_foreign_ignore_target_not_in_filter() {
        let filter = build_search_filter(["acme/widgets"], ["otherorg/repo"], "acme");
        assert_eq!(filter, "repo:acme/widgets");
        assert!(!filter.contains("otherorg"));
    }

    #[test]
    fn test_query_shape() {
        insta::assert_snapshot!(
            build_search_query(["acme/widgets", "acme/gears"], ["acme"], "acme"),
            @"is:pr is:open draft:false repo:acme/widgets repo:acme/gears -org:acme"
        );
    }
}
