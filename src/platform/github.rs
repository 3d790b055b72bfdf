//! GitHub platform service implementation

use crate::error::{Error, Result};
use crate::platform::PlatformService;
use crate::pr_ref::PrRef;
use crate::types::{
    AuthorAssociation, CheckConclusion, CheckRun, CheckStatus, CheckSuite, MergeMethod,
    MergeResult, PrState, PullRequestDetails, Review, ReviewState, SearchHit, TimelineEvent,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Public GitHub API
const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Page size for every listing call (GitHub's maximum)
const PER_PAGE: u8 = 100;

/// The search API never returns more than this many results
const SEARCH_RESULT_CAP: usize = 1000;

// Wire types: only the fields automerge reads, converted to crate types
// before leaving this module.

#[derive(Serialize)]
struct PageParams {
    per_page: u8,
    page: u32,
}

#[derive(Serialize)]
struct SearchParams<'a> {
    q: &'a str,
    per_page: u8,
    page: u32,
}

#[derive(Deserialize)]
struct WirePullRequest {
    title: Option<String>,
    state: String,
    merged_at: Option<String>,
    merged: Option<bool>,
    author_association: Option<AuthorAssociation>,
    head: WireHead,
    created_at: Option<String>,
}

#[derive(Deserialize)]
struct WireHead {
    sha: String,
}

#[derive(Deserialize)]
struct WireUser {
    login: String,
}

#[derive(Deserialize)]
struct WireReview {
    state: ReviewState,
    user: Option<WireUser>,
}

#[derive(Deserialize)]
struct WireTimelineEvent {
    event: Option<String>,
    created_at: Option<String>,
    updated_at: Option<String>,
    submitted_at: Option<String>,
    author: Option<WireGitActor>,
    committer: Option<WireGitActor>,
}

#[derive(Deserialize)]
struct WireGitActor {
    date: Option<String>,
}

#[derive(Deserialize)]
struct WireSearchResponse {
    total_count: u64,
    items: Vec<WireSearchItem>,
}

#[derive(Deserialize)]
struct WireSearchItem {
    number: u64,
    title: String,
    html_url: String,
}

#[derive(Deserialize)]
struct WireCheckSuites {
    total_count: u64,
    check_suites: Vec<WireCheckSuite>,
}

#[derive(Deserialize)]
struct WireCheckSuite {
    id: u64,
    app: Option<WireApp>,
}

#[derive(Deserialize)]
struct WireApp {
    slug: Option<String>,
}

#[derive(Deserialize)]
struct WireCheckRuns {
    total_count: u64,
    check_runs: Vec<WireCheckRun>,
}

#[derive(Deserialize)]
struct WireCheckRun {
    id: u64,
    name: String,
    status: CheckStatus,
    conclusion: Option<CheckConclusion>,
}

/// Parse an RFC 3339 timestamp, dropping values GitHub should never send
fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Some(ts.with_timezone(&Utc)),
        Err(e) => {
            debug!(raw, error = %e, "ignoring unparseable timestamp");
            None
        }
    }
}

impl From<WirePullRequest> for PullRequestDetails {
    fn from(pr: WirePullRequest) -> Self {
        let state = if pr.state == "open" {
            PrState::Open
        } else if pr.merged_at.is_some() || pr.merged == Some(true) {
            PrState::Merged
        } else {
            PrState::Closed
        };

        Self {
            title: pr.title.unwrap_or_default(),
            state,
            author_association: pr.author_association.unwrap_or(AuthorAssociation::None),
            head_sha: pr.head.sha,
            created_at: parse_timestamp(pr.created_at.as_deref()),
        }
    }
}

impl From<WireTimelineEvent> for TimelineEvent {
    fn from(raw: WireTimelineEvent) -> Self {
        match raw.event.as_deref() {
            Some("commented") => Self::Commented {
                created_at: parse_timestamp(raw.created_at.as_deref()),
                updated_at: parse_timestamp(raw.updated_at.as_deref()),
            },
            Some("committed") => Self::Committed {
                authored_at: parse_timestamp(
                    raw.author.as_ref().and_then(|a| a.date.as_deref()),
                ),
                committed_at: parse_timestamp(
                    raw.committer.as_ref().and_then(|c| c.date.as_deref()),
                ),
            },
            Some("reviewed") => Self::Reviewed {
                submitted_at: parse_timestamp(raw.submitted_at.as_deref()),
            },
            kind => Self::Other {
                kind: kind.unwrap_or("unknown").to_string(),
                created_at: parse_timestamp(raw.created_at.as_deref()),
                updated_at: parse_timestamp(raw.updated_at.as_deref()),
            },
        }
    }
}

/// GitHub service using octocrab
pub struct GitHubService {
    client: Octocrab,
    /// Token for raw HTTP requests (check suites)
    token: String,
    /// HTTP client for raw requests (check suites)
    http_client: Client,
    /// API base URL, without trailing slash
    api_base: String,
}

impl GitHubService {
    /// Create a service for github.com, or a GitHub Enterprise host
    pub fn new(token: &str, host: Option<&str>) -> Result<Self> {
        let api_base = host.map_or_else(
            || DEFAULT_API_BASE.to_string(),
            |h| format!("https://{h}/api/v3"),
        );
        Self::with_base_url(token, &api_base)
    }

    /// Create a service talking to an explicit API base URL
    pub fn with_base_url(token: &str, api_base: &str) -> Result<Self> {
        let api_base = api_base.trim_end_matches('/').to_string();

        let client = Octocrab::builder()
            .personal_token(token.to_string())
            .base_uri(api_base.as_str())
            .map_err(|e| Error::GitHubApi(e.to_string()))?
            .build()
            .map_err(|e| Error::GitHubApi(e.to_string()))?;

        let http_client = Client::builder()
            .user_agent("automerge")
            .build()
            .map_err(|e| Error::GitHubApi(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token: token.to_string(),
            http_client,
            api_base,
        })
    }

    /// Fetch every page of a plain JSON array listing
    async fn get_all_pages<T: DeserializeOwned>(&self, route: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page = 1;
        loop {
            let batch: Vec<T> = self
                .client
                .get(
                    route,
                    Some(&PageParams {
                        per_page: PER_PAGE,
                        page,
                    }),
                )
                .await?;
            let last_page = batch.len() < usize::from(PER_PAGE);
            items.extend(batch);
            if last_page {
                return Ok(items);
            }
            page += 1;
        }
    }

    /// GET a JSON document through the raw HTTP client
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .http_client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to fetch {url}: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::GitHubApi(format!(
                "{url} returned {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::GitHubApi(format!("Failed to parse {url}: {e}")))
    }
}

#[async_trait]
impl PlatformService for GitHubService {
    async fn get_pr_details(&self, pr: &PrRef) -> Result<PullRequestDetails> {
        debug!(%pr, "getting PR details");
        let route = format!("/repos/{}/{}/pulls/{}", pr.owner, pr.repo, pr.issue_number);
        let raw: WirePullRequest = self.client.get(route, None::<&()>).await?;

        let details = PullRequestDetails::from(raw);
        debug!(%pr, state = %details.state, "got PR details");
        Ok(details)
    }

    async fn list_reviews(&self, pr: &PrRef) -> Result<Vec<Review>> {
        debug!(%pr, "listing reviews");
        let route = format!(
            "/repos/{}/{}/pulls/{}/reviews",
            pr.owner, pr.repo, pr.issue_number
        );
        let raw: Vec<WireReview> = self.get_all_pages(&route).await?;

        let reviews: Vec<Review> = raw
            .into_iter()
            .map(|r| Review {
                reviewer: r.user.map(|u| u.login),
                state: r.state,
            })
            .collect();
        debug!(%pr, count = reviews.len(), "listed reviews");
        Ok(reviews)
    }

    async fn list_check_suites(&self, pr: &PrRef, sha: &str) -> Result<Vec<CheckSuite>> {
        debug!(%pr, sha, "listing check suites");
        let mut suites = Vec::new();
        let mut page = 1;
        loop {
            let url = format!(
                "{}/repos/{}/{}/commits/{sha}/check-suites?per_page={PER_PAGE}&page={page}",
                self.api_base, pr.owner, pr.repo
            );
            let batch: WireCheckSuites = self.get_json(&url).await?;
            let fetched = batch.check_suites.len();
            suites.extend(batch.check_suites.into_iter().map(|s| CheckSuite {
                id: s.id,
                app_slug: s.app.and_then(|a| a.slug),
            }));
            if fetched == 0 || suites.len() as u64 >= batch.total_count {
                break;
            }
            page += 1;
        }
        debug!(%pr, count = suites.len(), "listed check suites");
        Ok(suites)
    }

    async fn list_check_runs(&self, pr: &PrRef, suite_id: u64) -> Result<Vec<CheckRun>> {
        let mut runs = Vec::new();
        let mut page = 1;
        loop {
            let url = format!(
                "{}/repos/{}/{}/check-suites/{suite_id}/check-runs?per_page={PER_PAGE}&page={page}",
                self.api_base, pr.owner, pr.repo
            );
            let batch: WireCheckRuns = self.get_json(&url).await?;
            let fetched = batch.check_runs.len();
            runs.extend(batch.check_runs.into_iter().map(|r| CheckRun {
                id: r.id,
                name: r.name,
                status: r.status,
                conclusion: r.conclusion,
            }));
            if fetched == 0 || runs.len() as u64 >= batch.total_count {
                break;
            }
            page += 1;
        }
        debug!(%pr, suite_id, count = runs.len(), "listed check runs");
        Ok(runs)
    }

    async fn list_timeline(&self, pr: &PrRef) -> Result<Vec<TimelineEvent>> {
        debug!(%pr, "listing timeline");
        let route = format!(
            "/repos/{}/{}/issues/{}/timeline",
            pr.owner, pr.repo, pr.issue_number
        );
        let raw: Vec<WireTimelineEvent> = self.get_all_pages(&route).await?;

        let events: Vec<TimelineEvent> = raw.into_iter().map(TimelineEvent::from).collect();
        debug!(%pr, count = events.len(), "listed timeline");
        Ok(events)
    }

    async fn search_pull_requests(&self, query: &str) -> Result<Vec<SearchHit>> {
        debug!(query, "searching pull requests");
        let mut hits = Vec::new();
        let mut page = 1;
        loop {
            let response: WireSearchResponse = self
                .client
                .get(
                    "/search/issues",
                    Some(&SearchParams {
                        q: query,
                        per_page: PER_PAGE,
                        page,
                    }),
                )
                .await?;
            let fetched = response.items.len();
            hits.extend(response.items.into_iter().map(|item| SearchHit {
                number: item.number,
                title: item.title,
                html_url: item.html_url,
            }));
            if fetched < usize::from(PER_PAGE)
                || hits.len() as u64 >= response.total_count
                || hits.len() >= SEARCH_RESULT_CAP
            {
                break;
            }
            page += 1;
        }
        debug!(query, count = hits.len(), "search complete");
        Ok(hits)
    }

    async fn merge_pr(&self, pr: &PrRef, method: MergeMethod) -> Result<MergeResult> {
        debug!(%pr, %method, "merging PR");

        let octocrab_method = match method {
            MergeMethod::Squash => octocrab::params::pulls::MergeMethod::Squash,
            MergeMethod::Merge => octocrab::params::pulls::MergeMethod::Merge,
            MergeMethod::Rebase => octocrab::params::pulls::MergeMethod::Rebase,
        };

        let result = self
            .client
            .pulls(&pr.owner, &pr.repo)
            .merge(pr.issue_number)
            .method(octocrab_method)
            .send()
            .await
            .map_err(|e| Error::GitHubApi(format!("Merge failed: {e}")))?;

        let merge_result = MergeResult {
            merged: result.merged,
            sha: result.sha,
            message: result.message,
        };

        debug!(
            %pr,
            merged = merge_result.merged,
            sha = ?merge_result.sha,
            "merge complete"
        );
        Ok(merge_result)
    }
}
