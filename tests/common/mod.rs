//! Shared fixtures for automerge tests

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::{MergePrCall, MockPlatformService};

use async_trait::async_trait;
use automerge::activity::Clock;
use automerge::error::Result;
use automerge::gate::{CiPolicy, Sleeper};
use automerge::pr_ref::PrRef;
use automerge::tracking::TrackedStore;
use automerge::types::{
    AuthorAssociation, CheckConclusion, CheckRun, CheckStatus, CheckSuite, PrState,
    PullRequestDetails, Review, ReviewState, TimelineEvent,
};
use chrono::{DateTime, Utc};
use std::sync::Mutex;
use std::time::Duration;

/// Head SHA used by `make_pr_details`
pub const HEAD_SHA: &str = "abc123";

/// URL of PR `number` in acme/widgets
pub fn pr_url(number: u64) -> String {
    format!("https://github.com/acme/widgets/pull/{number}")
}

/// `PrRef` for PR `number` in acme/widgets
pub fn pr_ref(number: u64) -> PrRef {
    PrRef::parse(&pr_url(number)).unwrap()
}

/// Parse an RFC 3339 timestamp
pub fn ts(raw: &str) -> DateTime<Utc> {
    raw.parse().unwrap()
}

/// PR details with the given state and author association
pub fn make_pr_details(
    number: u64,
    state: PrState,
    association: AuthorAssociation,
) -> PullRequestDetails {
    PullRequestDetails {
        title: format!("PR {number}"),
        state,
        author_association: association,
        head_sha: HEAD_SHA.to_string(),
        created_at: Some(ts("2024-01-01T00:00:00Z")),
    }
}

/// Review with the given state
pub fn make_review(id: u64, state: ReviewState) -> Review {
    Review {
        reviewer: Some(format!("reviewer-{id}")),
        state,
    }
}

/// Check run with the given name, status and conclusion
pub fn make_run(name: &str, status: CheckStatus, conclusion: Option<CheckConclusion>) -> CheckRun {
    CheckRun {
        id: 0,
        name: name.to_string(),
        status,
        conclusion,
    }
}

/// Completed, successful check run
pub fn passing_run(name: &str) -> CheckRun {
    make_run(name, CheckStatus::Completed, Some(CheckConclusion::Success))
}

/// Single GitHub Actions suite
pub fn make_suite(id: u64) -> CheckSuite {
    CheckSuite {
        id,
        app_slug: Some("github-actions".to_string()),
    }
}

/// Comment event at `at`
pub fn comment_at(at: &str) -> TimelineEvent {
    TimelineEvent::Commented {
        created_at: Some(ts(at)),
        updated_at: None,
    }
}

/// Fast CI policy: 60s interval, 100 attempts, own job named `automerge`
pub fn ci_policy() -> CiPolicy {
    CiPolicy::default()
}

/// Clock frozen at a fixed instant
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Sleeper that returns immediately and records each requested duration
#[derive(Default)]
pub struct RecordingSleeper {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// In-memory watch list
#[derive(Default)]
pub struct MemoryStore {
    urls: Mutex<Vec<String>>,
    removed: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub fn with_urls(urls: &[String]) -> Self {
        Self {
            urls: Mutex::new(urls.to_vec()),
            removed: Mutex::new(Vec::new()),
        }
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }

    pub fn removed(&self) -> Vec<String> {
        self.removed.lock().unwrap().clone()
    }
}

impl TrackedStore for MemoryStore {
    fn list(&self) -> Result<Vec<String>> {
        Ok(self.urls())
    }

    fn add(&self, url: &str) -> Result<bool> {
        let mut urls = self.urls.lock().unwrap();
        if urls.iter().any(|u| u == url) {
            return Ok(false);
        }
        urls.push(url.to_string());
        Ok(true)
    }

    fn remove(&self, url: &str) -> Result<bool> {
        let mut urls = self.urls.lock().unwrap();
        let before = urls.len();
        urls.retain(|u| u != url);
        let removed = urls.len() != before;
        if removed {
            self.removed.lock().unwrap().push(url.to_string());
        }
        Ok(removed)
    }
}
