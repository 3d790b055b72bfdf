//! automerge - merge pull requests once they have been quiet long enough
//!
//! Tracked pull requests are re-evaluated on every run: closed or merged ones
//! are dropped from tracking, and open ones are merged once their inactivity
//! timeout has elapsed, they carry enough approving reviews, and CI is green.

pub mod activity;
pub mod auth;
pub mod config;
pub mod error;
pub mod gate;
pub mod platform;
pub mod pr_ref;
pub mod requirements;
pub mod targets;
pub mod tracking;
pub mod types;
pub mod update;
