//! Core types for automerge

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Relationship of a pull request author to the repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorAssociation {
    /// Owner of the repository
    Owner,
    /// Member of the owning organization
    Member,
    /// Invited collaborator
    Collaborator,
    /// Has previously committed to the repository
    Contributor,
    /// First contribution to this repository
    FirstTimeContributor,
    /// First contribution on GitHub at all
    FirstTimer,
    /// Placeholder user from an import
    Mannequin,
    /// No association
    None,
    /// Any value GitHub adds later
    Other(String),
}

impl AuthorAssociation {
    /// Owners, members and collaborators get the collaborator requirements
    pub const fn is_collaborator(&self) -> bool {
        matches!(self, Self::Owner | Self::Member | Self::Collaborator)
    }
}

impl FromStr for AuthorAssociation {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "OWNER" => Self::Owner,
            "MEMBER" => Self::Member,
            "COLLABORATOR" => Self::Collaborator,
            "CONTRIBUTOR" => Self::Contributor,
            "FIRST_TIME_CONTRIBUTOR" => Self::FirstTimeContributor,
            "FIRST_TIMER" => Self::FirstTimer,
            "MANNEQUIN" => Self::Mannequin,
            "NONE" => Self::None,
            other => Self::Other(other.to_string()),
        })
    }
}

impl<'de> Deserialize<'de> for AuthorAssociation {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or(Self::None))
    }
}

impl std::fmt::Display for AuthorAssociation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Owner => write!(f, "OWNER"),
            Self::Member => write!(f, "MEMBER"),
            Self::Collaborator => write!(f, "COLLABORATOR"),
            Self::Contributor => write!(f, "CONTRIBUTOR"),
            Self::FirstTimeContributor => write!(f, "FIRST_TIME_CONTRIBUTOR"),
            Self::FirstTimer => write!(f, "FIRST_TIMER"),
            Self::Mannequin => write!(f, "MANNEQUIN"),
            Self::None => write!(f, "NONE"),
            Self::Other(other) => write!(f, "{other}"),
        }
    }
}

/// PR state (open, closed, merged)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrState {
    /// PR is open and can be merged
    Open,
    /// PR was closed without merging
    Closed,
    /// PR was merged
    Merged,
}

impl std::fmt::Display for PrState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Merged => write!(f, "merged"),
        }
    }
}

/// Pull request facts needed to decide on a merge
#[derive(Debug, Clone)]
pub struct PullRequestDetails {
    /// PR title, shown in the update report
    pub title: String,
    /// Current state of the PR
    pub state: PrState,
    /// Author's relationship to the repository
    pub author_association: AuthorAssociation,
    /// Commit SHA at the head of the PR branch
    pub head_sha: String,
    /// When the PR was opened
    pub created_at: Option<DateTime<Utc>>,
}

/// Review verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewState {
    /// Reviewer approved the changes
    Approved,
    /// Reviewer asked for changes
    ChangesRequested,
    /// Review only left comments
    Commented,
    /// Review was dismissed
    Dismissed,
    /// Review not yet submitted
    Pending,
    /// State GitHub added after this was written
    #[serde(other)]
    Unknown,
}

/// A submitted pull request review
#[derive(Debug, Clone)]
pub struct Review {
    /// Reviewer login, if the account still exists
    pub reviewer: Option<String>,
    /// Verdict
    pub state: ReviewState,
}

/// A check suite attached to a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSuite {
    /// Suite ID
    pub id: u64,
    /// Slug of the app that created the suite
    pub app_slug: Option<String>,
}

/// Lifecycle of a check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    /// Waiting for a runner
    Queued,
    /// Running
    InProgress,
    /// Finished; see the conclusion
    Completed,
    /// Waiting on a deployment protection rule
    Waiting,
    /// Requested but not created yet
    Requested,
    /// Pending
    Pending,
    /// Status GitHub added after this was written
    #[serde(other)]
    Unknown,
}

/// Outcome of a completed check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    /// Passed
    Success,
    /// Failed
    Failure,
    /// Neither passed nor failed
    Neutral,
    /// Cancelled before finishing
    Cancelled,
    /// Skipped
    Skipped,
    /// Ran out of time
    TimedOut,
    /// Needs manual action
    ActionRequired,
    /// Marked stale by GitHub
    Stale,
    /// Conclusion GitHub added after this was written
    #[serde(other)]
    Other,
}

/// A single CI job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRun {
    /// Run ID
    pub id: u64,
    /// Job name
    pub name: String,
    /// Lifecycle status
    pub status: CheckStatus,
    /// Conclusion, present once completed
    pub conclusion: Option<CheckConclusion>,
}

/// Activity on a pull request's timeline
///
/// Built from the raw API payload in the platform layer so the core never
/// probes optional fields itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineEvent {
    /// Issue comment
    Commented {
        /// When the comment was posted
        created_at: Option<DateTime<Utc>>,
        /// When the comment was last edited
        updated_at: Option<DateTime<Utc>>,
    },
    /// Commit pushed to the branch
    Committed {
        /// Author date
        authored_at: Option<DateTime<Utc>>,
        /// Committer date
        committed_at: Option<DateTime<Utc>>,
    },
    /// Review submitted
    Reviewed {
        /// Submission time
        submitted_at: Option<DateTime<Utc>>,
    },
    /// Any other event (labeled, renamed, ready_for_review, ...)
    Other {
        /// Raw event name
        kind: String,
        /// When it happened
        created_at: Option<DateTime<Utc>>,
        /// When it was last updated, if the event carries that
        updated_at: Option<DateTime<Utc>>,
    },
}

impl TimelineEvent {
    /// All timestamps carried by this event
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        match self {
            Self::Commented {
                created_at,
                updated_at,
            } => [*created_at, *updated_at].into_iter().flatten().collect(),
            Self::Committed {
                authored_at,
                committed_at,
            } => [*authored_at, *committed_at].into_iter().flatten().collect(),
            Self::Reviewed { submitted_at } => submitted_at.iter().copied().collect(),
            Self::Other {
                created_at,
                updated_at,
                ..
            } => [*created_at, *updated_at].into_iter().flatten().collect(),
        }
    }
}

/// Pull request returned by a search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// PR number
    pub number: u64,
    /// PR title
    pub title: String,
    /// Web URL for the PR
    pub html_url: String,
}

/// Result of a merge operation
#[derive(Debug, Clone)]
pub struct MergeResult {
    /// Whether the merge was successful
    pub merged: bool,
    /// The SHA of the merge commit (if successful)
    pub sha: Option<String>,
    /// Message from the merge operation (especially on failure)
    pub message: Option<String>,
}

/// Merge strategy/method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMethod {
    /// Create a merge commit
    #[default]
    Merge,
    /// Squash all commits into one
    Squash,
    /// Rebase commits onto base branch
    Rebase,
}

impl std::fmt::Display for MergeMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Squash => write!(f, "squash"),
            Self::Merge => write!(f, "merge"),
            Self::Rebase => write!(f, "rebase"),
        }
    }
}
