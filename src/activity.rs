//! Last-activity tracking and the "past due" test

use crate::types::TimelineEvent;
use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;

/// Latest timestamp found anywhere in the timeline
pub fn last_activity(events: &[TimelineEvent]) -> Option<DateTime<Utc>> {
    events.iter().flat_map(TimelineEvent::timestamps).max()
}

/// Whether `timeout` has elapsed since `last_activity`
///
/// With no known activity the PR counts as past due. A timeout too large
/// to add to the timestamp never elapses.
pub fn is_past_due(
    last_activity: Option<DateTime<Utc>>,
    timeout: Duration,
    now: DateTime<Utc>,
) -> bool {
    let Some(last) = last_activity else {
        return true;
    };
    due_at(last, timeout).is_some_and(|due| due <= now)
}

/// When a PR last active at `last` becomes mergeable
pub fn due_at(last: DateTime<Utc>, timeout: Duration) -> Option<DateTime<Utc>> {
    TimeDelta::from_std(timeout)
        .ok()
        .and_then(|delta| last.checked_add_signed(delta))
}

/// Source of the current time
pub trait Clock: Send + Sync {
    /// Current UTC time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
