//! Pull request references parsed from web URLs

use crate::error::{Error, Result};
use url::Url;

/// Number of `/`-separated path segments in `/owner/repo/pull/<n>`,
/// counting the empty segment before the leading slash.
const PR_PATH_SEGMENTS: usize = 5;

/// Identifies a pull request (or issue) on the hosting service
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrRef {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Issue / PR number
    pub issue_number: u64,
}

impl PrRef {
    /// Parse `https://<host>/<owner>/<repo>/pull/<number>`
    ///
    /// The path must have exactly five segments; the third one (`pull`,
    /// `issues`, ...) is not inspected.
    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw).map_err(|_| Error::InvalidPrUrl(raw.to_string()))?;
        let segments: Vec<&str> = url.path().split('/').collect();

        if segments.len() != PR_PATH_SEGMENTS {
            return Err(Error::InvalidPrUrl(raw.to_string()));
        }

        let issue_number = segments[4]
            .parse()
            .map_err(|_| Error::InvalidPrUrl(raw.to_string()))?;

        Ok(Self {
            owner: segments[1].to_string(),
            repo: segments[2].to_string(),
            issue_number,
        })
    }
}

impl std::fmt::Display for PrRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.issue_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pull_url() {
        let pr = PrRef::parse("https://github.com/OWNER/REPO/pull/42").unwrap();
        assert_eq!(pr.owner, "OWNER");
        assert_eq!(pr.repo, "REPO");
        assert_eq!(pr.issue_number, 42);
        assert_eq!(pr.to_string(), "OWNER/REPO#42");
    }

    #[test]
    fn test_parse_ignores_query_string() {
        let pr = PrRef::parse("https://github.com/acme/widgets/pull/7?tab=files").unwrap();
        assert_eq!(pr.issue_number, 7);
    }

    #[test]
    fn test_wrong_segment_count_names_url() {
        for raw in [
            "https://github.com/acme/widgets",
            "https://github.com/acme/widgets/pull",
            "https://github.com/acme/widgets/pull/1/files",
            "https://github.com/acme/widgets/pull/1/",
        ] {
            match PrRef::parse(raw) {
                Err(Error::InvalidPrUrl(url)) => assert_eq!(url, raw),
                other => panic!("expected InvalidPrUrl for {raw}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_non_numeric_number_rejected() {
        assert!(PrRef::parse("https://github.com/acme/widgets/pull/abc").is_err());
    }

    #[test]
    fn test_not_a_url_rejected() {
        assert!(PrRef::parse("acme/widgets#3").is_err());
    }
}
