//! Mock platform service for testing
//!
//! These are test utilities - not all may be used by every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use automerge::error::{Error, Result};
use automerge::platform::PlatformService;
use automerge::pr_ref::PrRef;
use automerge::types::{
    CheckRun, CheckSuite, MergeMethod, MergeResult, PullRequestDetails, Review, SearchHit,
    TimelineEvent,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Call record for `merge_pr`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePrCall {
    pub pr: PrRef,
    pub method: MergeMethod,
}

/// Simple mock platform service for testing
///
/// Responses are keyed by `owner/repo#number` (or SHA / suite ID for
/// checks). Check runs are scripted per suite: each call consumes the next
/// response, and the last one repeats forever.
#[derive(Default)]
pub struct MockPlatformService {
    pr_details_responses: Mutex<HashMap<String, PullRequestDetails>>,
    reviews_responses: Mutex<HashMap<String, Vec<Review>>>,
    timeline_responses: Mutex<HashMap<String, Vec<TimelineEvent>>>,
    check_suite_responses: Mutex<HashMap<String, Vec<CheckSuite>>>,
    check_run_responses: Mutex<HashMap<u64, VecDeque<Vec<CheckRun>>>>,
    search_response: Mutex<Vec<SearchHit>>,
    merge_response: Mutex<Option<MergeResult>>,
    // Call tracking
    get_pr_details_calls: Mutex<Vec<PrRef>>,
    list_reviews_calls: Mutex<Vec<PrRef>>,
    list_check_suites_calls: Mutex<Vec<String>>,
    list_check_runs_calls: Mutex<Vec<u64>>,
    search_calls: Mutex<Vec<String>>,
    merge_pr_calls: Mutex<Vec<MergePrCall>>,
    // Error injection
    error_on_reviews: Mutex<Option<String>>,
    error_on_timeline: Mutex<Option<String>>,
    error_on_check_suites: Mutex<Option<String>>,
    error_on_check_runs: Mutex<Option<String>>,
    error_on_search: Mutex<Option<String>>,
    error_on_details: Mutex<HashMap<String, String>>,
}

fn key(pr: &PrRef) -> String {
    pr.to_string()
}

fn injected(slot: &Mutex<Option<String>>) -> Result<()> {
    match slot.lock().unwrap().as_ref() {
        Some(msg) => Err(Error::GitHubApi(msg.clone())),
        None => Ok(()),
    }
}

impl MockPlatformService {
    pub fn new() -> Self {
        Self::default()
    }

    // === Response setup ===

    pub fn set_pr_details(&self, pr: &PrRef, details: PullRequestDetails) {
        self.pr_details_responses
            .lock()
            .unwrap()
            .insert(key(pr), details);
    }

    pub fn set_reviews(&self, pr: &PrRef, reviews: Vec<Review>) {
        self.reviews_responses
            .lock()
            .unwrap()
            .insert(key(pr), reviews);
    }

    pub fn set_timeline(&self, pr: &PrRef, events: Vec<TimelineEvent>) {
        self.timeline_responses
            .lock()
            .unwrap()
            .insert(key(pr), events);
    }

    pub fn set_check_suites(&self, sha: &str, suites: Vec<CheckSuite>) {
        self.check_suite_responses
            .lock()
            .unwrap()
            .insert(sha.to_string(), suites);
    }

    /// Script the check runs returned for a suite, one entry per call
    pub fn set_check_runs_sequence(&self, suite_id: u64, sequence: Vec<Vec<CheckRun>>) {
        self.check_run_responses
            .lock()
            .unwrap()
            .insert(suite_id, sequence.into());
    }

    pub fn set_check_runs(&self, suite_id: u64, runs: Vec<CheckRun>) {
        self.set_check_runs_sequence(suite_id, vec![runs]);
    }

    pub fn set_search_response(&self, hits: Vec<SearchHit>) {
        *self.search_response.lock().unwrap() = hits;
    }

    pub fn set_merge_response(&self, result: MergeResult) {
        *self.merge_response.lock().unwrap() = Some(result);
    }

    // === Error injection ===

    pub fn fail_reviews(&self, msg: &str) {
        *self.error_on_reviews.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_timeline(&self, msg: &str) {
        *self.error_on_timeline.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_check_suites(&self, msg: &str) {
        *self.error_on_check_suites.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_check_runs(&self, msg: &str) {
        *self.error_on_check_runs.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_search(&self, msg: &str) {
        *self.error_on_search.lock().unwrap() = Some(msg.to_string());
    }

    pub fn fail_details(&self, pr: &PrRef, msg: &str) {
        self.error_on_details
            .lock()
            .unwrap()
            .insert(key(pr), msg.to_string());
    }

    // === Call inspection ===

    pub fn get_pr_details_calls(&self) -> Vec<PrRef> {
        self.get_pr_details_calls.lock().unwrap().clone()
    }

    pub fn list_reviews_calls(&self) -> Vec<PrRef> {
        self.list_reviews_calls.lock().unwrap().clone()
    }

    pub fn list_check_suites_calls(&self) -> Vec<String> {
        self.list_check_suites_calls.lock().unwrap().clone()
    }

    pub fn list_check_runs_calls(&self) -> Vec<u64> {
        self.list_check_runs_calls.lock().unwrap().clone()
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.search_calls.lock().unwrap().clone()
    }

    pub fn merge_pr_calls(&self) -> Vec<MergePrCall> {
        self.merge_pr_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn get_pr_details(&self, pr: &PrRef) -> Result<PullRequestDetails> {
        self.get_pr_details_calls.lock().unwrap().push(pr.clone());
        if let Some(msg) = self.error_on_details.lock().unwrap().get(&key(pr)) {
            return Err(Error::GitHubApi(msg.clone()));
        }
        self.pr_details_responses
            .lock()
            .unwrap()
            .get(&key(pr))
            .cloned()
            .ok_or_else(|| Error::GitHubApi(format!("no PR {pr}")))
    }

    async fn list_reviews(&self, pr: &PrRef) -> Result<Vec<Review>> {
        self.list_reviews_calls.lock().unwrap().push(pr.clone());
        injected(&self.error_on_reviews)?;
        Ok(self
            .reviews_responses
            .lock()
            .unwrap()
            .get(&key(pr))
            .cloned()
            .unwrap_or_default())
    }

    async fn list_check_suites(&self, _pr: &PrRef, sha: &str) -> Result<Vec<CheckSuite>> {
        self.list_check_suites_calls
            .lock()
            .unwrap()
            .push(sha.to_string());
        injected(&self.error_on_check_suites)?;
        Ok(self
            .check_suite_responses
            .lock()
            .unwrap()
            .get(sha)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_check_runs(&self, _pr: &PrRef, suite_id: u64) -> Result<Vec<CheckRun>> {
        self.list_check_runs_calls.lock().unwrap().push(suite_id);
        injected(&self.error_on_check_runs)?;
        let mut responses = self.check_run_responses.lock().unwrap();
        let Some(sequence) = responses.get_mut(&suite_id) else {
            return Ok(Vec::new());
        };
        if sequence.len() > 1 {
            Ok(sequence.pop_front().unwrap_or_default())
        } else {
            Ok(sequence.front().cloned().unwrap_or_default())
        }
    }

    async fn list_timeline(&self, pr: &PrRef) -> Result<Vec<TimelineEvent>> {
        injected(&self.error_on_timeline)?;
        Ok(self
            .timeline_responses
            .lock()
            .unwrap()
            .get(&key(pr))
            .cloned()
            .unwrap_or_default())
    }

    async fn search_pull_requests(&self, query: &str) -> Result<Vec<SearchHit>> {
        self.search_calls.lock().unwrap().push(query.to_string());
        injected(&self.error_on_search)?;
        Ok(self.search_response.lock().unwrap().clone())
    }

    async fn merge_pr(&self, pr: &PrRef, method: MergeMethod) -> Result<MergeResult> {
        self.merge_pr_calls.lock().unwrap().push(MergePrCall {
            pr: pr.clone(),
            method,
        });
        Ok(self
            .merge_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| MergeResult {
                merged: true,
                sha: Some(format!("merge-{}", pr.issue_number)),
                message: None,
            }))
    }
}
