//! Update run: evaluate every tracked pull request once
//!
//! Each tracked URL moves through the same checks in order, stopping at the
//! first one that says "not yet":
//! 1. closed or merged PRs leave the watch list
//! 2. PRs with activity inside their timeout wait
//! 3. PRs short on approvals wait
//! 4. PRs whose CI is not green wait
//! 5. everything else is untracked and merged
//!
//! Items are processed sequentially; an error on one is logged and recorded
//! in the summary without stopping the rest.

use crate::activity::{Clock, due_at, is_past_due, last_activity};
use crate::error::{Error, Result};
use crate::gate::{CiPolicy, CiStatus, Sleeper, count_approvals, wait_for_ci};
use crate::platform::PlatformService;
use crate::pr_ref::PrRef;
use crate::requirements::{RequirementsConfig, resolve_requirements};
use crate::tracking::TrackedStore;
use crate::types::{MergeMethod, PrState, PullRequestDetails};
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

/// What happened to one tracked PR
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// PR was already closed or merged and left the watch list
    Removed {
        /// State found on GitHub
        state: PrState,
    },
    /// Inactivity timeout has not elapsed yet
    NotDue {
        /// When it will elapse, if known
        due_at: Option<DateTime<Utc>>,
    },
    /// Not enough approving reviews
    InsufficientApprovals {
        /// Approvals found
        have: u32,
        /// Approvals required
        need: u32,
    },
    /// CI did not pass
    CiNotGreen {
        /// Final CI status
        status: CiStatus,
    },
    /// PR was untracked and merged
    Merged {
        /// Merge commit SHA
        sha: Option<String>,
    },
}

impl std::fmt::Display for UpdateOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Removed { state } => write!(f, "removed from tracking ({state})"),
            Self::NotDue { due_at: Some(due) } => write!(f, "waiting until {}", due.to_rfc3339()),
            Self::NotDue { due_at: None } => write!(f, "waiting"),
            Self::InsufficientApprovals { have, need } => {
                write!(f, "{have}/{need} approvals")
            }
            Self::CiNotGreen { status } => write!(f, "CI {status}"),
            Self::Merged { sha: Some(sha) } => write!(f, "merged ({sha})"),
            Self::Merged { sha: None } => write!(f, "merged"),
        }
    }
}

/// One evaluated PR in an update report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluatedPr {
    /// Tracked URL
    pub url: String,
    /// PR title as found on GitHub
    pub title: String,
    /// What happened
    pub outcome: UpdateOutcome,
}

/// Per-URL results of one run, in tracking order
#[derive(Debug, Default)]
pub struct UpdateSummary {
    /// PRs that were evaluated without error
    pub outcomes: Vec<EvaluatedPr>,
    /// URLs whose evaluation failed, with the error
    pub failures: Vec<(String, Error)>,
}

impl UpdateSummary {
    /// Number of PRs merged in this run
    pub fn merged_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|e| matches!(e.outcome, UpdateOutcome::Merged { .. }))
            .count()
    }

    /// Whether any item failed
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Everything an update run talks to
pub struct UpdateContext<'a> {
    /// Hosting API
    pub platform: &'a dyn PlatformService,
    /// Watch list
    pub store: &'a dyn TrackedStore,
    /// Requirements per author association
    pub requirements: &'a RequirementsConfig,
    /// CI polling policy
    pub ci_policy: &'a CiPolicy,
    /// Merge method
    pub merge_method: MergeMethod,
    /// Time source
    pub clock: &'a dyn Clock,
    /// Sleep between CI polls
    pub sleeper: &'a dyn Sleeper,
}

/// Evaluate every tracked PR once
///
/// Fails only if the watch list itself cannot be read.
pub async fn run_update(ctx: &UpdateContext<'_>) -> Result<UpdateSummary> {
    let tracked = ctx.store.list()?;
    info!(count = tracked.len(), "evaluating tracked pull requests");

    let mut summary = UpdateSummary::default();
    for url in tracked {
        match evaluate(ctx, &url).await {
            Ok((title, outcome)) => {
                info!(url, title, %outcome, "evaluated");
                summary.outcomes.push(EvaluatedPr {
                    url,
                    title,
                    outcome,
                });
            }
            Err(e) => {
                error!(url, error = %e, "failed to evaluate tracked pull request");
                summary.failures.push((url, e));
            }
        }
    }

    info!(
        evaluated = summary.outcomes.len(),
        merged = summary.merged_count(),
        failed = summary.failures.len(),
        "update complete"
    );
    Ok(summary)
}

/// Evaluate a single tracked PR and act on it
pub async fn evaluate_tracked(ctx: &UpdateContext<'_>, url: &str) -> Result<UpdateOutcome> {
    evaluate(ctx, url).await.map(|(_, outcome)| outcome)
}

async fn evaluate(ctx: &UpdateContext<'_>, url: &str) -> Result<(String, UpdateOutcome)> {
    let pr = PrRef::parse(url)?;
    let details = ctx.platform.get_pr_details(&pr).await?;
    let outcome = decide(ctx, url, &pr, &details).await?;
    Ok((details.title, outcome))
}

async fn decide(
    ctx: &UpdateContext<'_>,
    url: &str,
    pr: &PrRef,
    details: &PullRequestDetails,
) -> Result<UpdateOutcome> {
    if details.state != PrState::Open {
        ctx.store.remove(url)?;
        return Ok(UpdateOutcome::Removed {
            state: details.state,
        });
    }

    let events = ctx.platform.list_timeline(pr).await?;
    let last = last_activity(&events).or_else(|| {
        warn!(%pr, "no timestamps in timeline, falling back to PR creation time");
        details.created_at
    });
    if last.is_none() {
        warn!(%pr, "no activity timestamp at all, treating as past due");
    }

    let requirements = resolve_requirements(&details.author_association, ctx.requirements);
    let timeout = requirements.timeout()?;

    if !is_past_due(last, timeout, ctx.clock.now()) {
        return Ok(UpdateOutcome::NotDue {
            due_at: last.and_then(|l| due_at(l, timeout)),
        });
    }

    let approvals = count_approvals(ctx.platform, pr).await;
    if approvals < requirements.required_approvals {
        return Ok(UpdateOutcome::InsufficientApprovals {
            have: approvals,
            need: requirements.required_approvals,
        });
    }

    let status = wait_for_ci(
        ctx.platform,
        pr,
        &details.head_sha,
        ctx.ci_policy,
        ctx.sleeper,
    )
    .await;
    if !status.is_green() {
        return Ok(UpdateOutcome::CiNotGreen { status });
    }

    ctx.store.remove(url)?;
    let result = ctx.platform.merge_pr(pr, ctx.merge_method).await?;
    if !result.merged {
        return Err(Error::MergeRejected {
            pr: pr.to_string(),
            message: result.message.unwrap_or_default(),
        });
    }

    info!(%pr, sha = ?result.sha, "merged");
    Ok(UpdateOutcome::Merged { sha: result.sha })
}
