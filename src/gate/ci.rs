//! CI gate: poll check runs until they settle

use crate::error::Result;
use crate::platform::PlatformService;
use crate::pr_ref::PrRef;
use crate::types::{CheckConclusion, CheckRun, CheckStatus, CheckSuite};
use async_trait::async_trait;
use futures::future::try_join_all;
use std::time::Duration;
use tracing::{debug, error, info};

/// Aggregate state of a commit's check runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CiStatus {
    /// At least one run has not completed
    Pending,
    /// Every run completed and none failed
    Passed,
    /// A run failed, or CI state could not be fetched
    Failed,
}

impl CiStatus {
    /// Only `Passed` allows a merge
    pub const fn is_green(self) -> bool {
        matches!(self, Self::Passed)
    }
}

impl std::fmt::Display for CiStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Passed => write!(f, "passed"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// How long to keep polling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiPolicy {
    /// Check-run name of automerge's own job; never waited on
    pub self_check_name: String,
    /// Wait between attempts
    pub poll_interval: Duration,
    /// Attempts before giving up with `Pending`
    pub max_attempts: u32,
}

impl Default for CiPolicy {
    fn default() -> Self {
        Self {
            self_check_name: "automerge".to_string(),
            poll_interval: Duration::from_secs(60),
            max_attempts: 100,
        }
    }
}

/// Suspends between CI polls
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Wait for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Real wall-clock sleeping on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Reduce check runs to a single status, ignoring automerge's own run
pub fn evaluate_check_runs<'a, I>(runs: I, self_check_name: &str) -> CiStatus
where
    I: IntoIterator<Item = &'a CheckRun>,
{
    let runs: Vec<&CheckRun> = runs
        .into_iter()
        .filter(|run| run.name != self_check_name)
        .collect();

    if runs.iter().any(|run| run.status != CheckStatus::Completed) {
        return CiStatus::Pending;
    }
    if runs
        .iter()
        .any(|run| run.conclusion == Some(CheckConclusion::Failure))
    {
        return CiStatus::Failed;
    }
    CiStatus::Passed
}

/// Fetch the runs of every suite concurrently and evaluate them
async fn poll_once(
    platform: &dyn PlatformService,
    pr: &PrRef,
    suites: &[CheckSuite],
    self_check_name: &str,
) -> Result<CiStatus> {
    let runs = try_join_all(
        suites
            .iter()
            .map(|suite| platform.list_check_runs(pr, suite.id)),
    )
    .await?;
    Ok(evaluate_check_runs(runs.iter().flatten(), self_check_name))
}

async fn poll_until_settled(
    platform: &dyn PlatformService,
    pr: &PrRef,
    sha: &str,
    policy: &CiPolicy,
    sleeper: &dyn Sleeper,
) -> Result<CiStatus> {
    let suites = platform.list_check_suites(pr, sha).await?;
    let mut status = CiStatus::Pending;

    for attempt in 1..=policy.max_attempts {
        status = poll_once(platform, pr, &suites, &policy.self_check_name).await?;
        debug!(%pr, sha, attempt, %status, "polled CI");

        if status != CiStatus::Pending {
            return Ok(status);
        }
        if attempt < policy.max_attempts {
            sleeper.sleep(policy.poll_interval).await;
        }
    }

    info!(%pr, sha, attempts = policy.max_attempts, "CI still pending after last attempt");
    Ok(status)
}

/// Wait for the checks on `sha` to settle
///
/// Polls every `policy.poll_interval` for at most `policy.max_attempts`
/// attempts. Returns `Pending` if checks are still running after the last
/// attempt and `Failed` if anything could not be fetched.
pub async fn wait_for_ci(
    platform: &dyn PlatformService,
    pr: &PrRef,
    sha: &str,
    policy: &CiPolicy,
    sleeper: &dyn Sleeper,
) -> CiStatus {
    match poll_until_settled(platform, pr, sha, policy, sleeper).await {
        Ok(status) => status,
        Err(e) => {
            error!(%pr, sha, error = %e, "failed to fetch CI state, treating as failed");
            CiStatus::Failed
        }
    }
}
