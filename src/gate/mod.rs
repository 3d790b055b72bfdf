//! Merge gates: approvals and CI
//!
//! Both gates fail closed. A fetch error reads as "zero approvals" or
//! "CI failed", never as permission to merge.

mod approvals;
mod ci;

pub use approvals::count_approvals;
pub use ci::{CiPolicy, CiStatus, Sleeper, TokioSleeper, evaluate_check_runs, wait_for_ci};
