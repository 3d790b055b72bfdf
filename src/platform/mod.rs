//! Platform services
//!
//! Everything automerge needs from the hosting API sits behind
//! [`PlatformService`], so the decision logic can run against a mock.

mod github;

pub use github::GitHubService;

use crate::error::Result;
use crate::pr_ref::PrRef;
use crate::types::{
    CheckRun, CheckSuite, MergeMethod, MergeResult, PullRequestDetails, Review, SearchHit,
    TimelineEvent,
};
use async_trait::async_trait;

/// Platform service trait for the reads and the merge automerge performs
///
/// Tracked pull requests can live in any repository the token can see, so
/// every call names the PR (or its repository) explicitly.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Get PR details: state, author association, head commit
    async fn get_pr_details(&self, pr: &PrRef) -> Result<PullRequestDetails>;

    /// List every review on a PR (all pages)
    async fn list_reviews(&self, pr: &PrRef) -> Result<Vec<Review>>;

    /// List the check suites attached to a commit in the PR's repository
    async fn list_check_suites(&self, pr: &PrRef, sha: &str) -> Result<Vec<CheckSuite>>;

    /// List the check runs of one suite
    async fn list_check_runs(&self, pr: &PrRef, suite_id: u64) -> Result<Vec<CheckRun>>;

    /// Fetch the full timeline of a PR (all pages)
    async fn list_timeline(&self, pr: &PrRef) -> Result<Vec<TimelineEvent>>;

    /// Run an issue search and return every matching pull request
    async fn search_pull_requests(&self, query: &str) -> Result<Vec<SearchHit>>;

    /// Merge a PR with the specified method
    async fn merge_pr(&self, pr: &PrRef, method: MergeMethod) -> Result<MergeResult>;
}
