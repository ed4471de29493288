//! Mock platform client for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use pr_automerge::error::{Error, Result};
use pr_automerge::platform::PlatformClient;
use pr_automerge::types::{CheckRun, MergeMethod, MergeOutcome, PullRequest};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Call record for `request_merge`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeCall {
    pub number: u64,
    pub method: MergeMethod,
    pub commit_title: String,
}

/// Call record for `request_reviewers`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewerCall {
    pub number: u64,
    pub usernames: Vec<String>,
}

/// Simple mock platform client for testing
///
/// Features:
/// - Configurable responses per PR / commit / email
/// - Sequenced merge responses (first call pops the front of a queue)
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockPlatformClient {
    list_response: Mutex<Vec<PullRequest>>,
    detail_responses: Mutex<HashMap<u64, VecDeque<PullRequest>>>,
    check_run_responses: Mutex<HashMap<String, VecDeque<Vec<CheckRun>>>>,
    merge_responses: Mutex<HashMap<u64, VecDeque<Result<MergeOutcome>>>>,
    username_responses: Mutex<HashMap<String, Option<String>>>,
    // Call tracking
    detail_calls: Mutex<Vec<u64>>,
    check_run_calls: Mutex<Vec<String>>,
    merge_calls: Mutex<Vec<MergeCall>>,
    auto_merge_calls: Mutex<Vec<u64>>,
    reviewer_calls: Mutex<Vec<ReviewerCall>>,
    resolve_calls: Mutex<Vec<String>>,
    // Error injection
    error_on_list: Mutex<Option<Error>>,
    error_on_auto_merge: Mutex<Option<Error>>,
    error_on_request_reviewers: Mutex<Option<Error>>,
}

fn clone_error(e: &Error) -> Error {
    match e {
        Error::Config(m) => Error::Config(m.clone()),
        Error::Transport(m) => Error::Transport(m.clone()),
        Error::Rejected { status, message } => Error::Rejected {
            status: *status,
            message: message.clone(),
        },
        Error::Internal(m) => Error::Internal(m.clone()),
    }
}

impl MockPlatformClient {
    pub fn new() -> Self {
        Self {
            list_response: Mutex::new(Vec::new()),
            detail_responses: Mutex::new(HashMap::new()),
            check_run_responses: Mutex::new(HashMap::new()),
            merge_responses: Mutex::new(HashMap::new()),
            username_responses: Mutex::new(HashMap::new()),
            detail_calls: Mutex::new(Vec::new()),
            check_run_calls: Mutex::new(Vec::new()),
            merge_calls: Mutex::new(Vec::new()),
            auto_merge_calls: Mutex::new(Vec::new()),
            reviewer_calls: Mutex::new(Vec::new()),
            resolve_calls: Mutex::new(Vec::new()),
            error_on_list: Mutex::new(None),
            error_on_auto_merge: Mutex::new(None),
            error_on_request_reviewers: Mutex::new(None),
        }
    }

    // === Response configuration ===

    /// Set the pull requests returned by `list_open_pull_requests`
    /// (returned in the order given, deliberately unsorted if so set)
    pub fn set_open_pull_requests(&self, prs: Vec<PullRequest>) {
        *self.list_response.lock().unwrap() = prs;
    }

    /// Queue a detail snapshot for a PR; the last queued snapshot repeats
    /// once the queue is drained
    pub fn push_detail_response(&self, pr: PullRequest) {
        self.detail_responses
            .lock()
            .unwrap()
            .entry(pr.number)
            .or_default()
            .push_back(pr);
    }

    /// Queue a check-run snapshot for a commit; the last snapshot repeats
    pub fn push_check_runs(&self, head_sha: &str, runs: Vec<CheckRun>) {
        self.check_run_responses
            .lock()
            .unwrap()
            .entry(head_sha.to_string())
            .or_default()
            .push_back(runs);
    }

    /// Queue a merge response for a PR; consumed one per call, last repeats
    pub fn push_merge_response(&self, number: u64, response: Result<MergeOutcome>) {
        self.merge_responses
            .lock()
            .unwrap()
            .entry(number)
            .or_default()
            .push_back(response);
    }

    /// Set the resolution result for an email
    pub fn set_username_for_email(&self, email: &str, login: Option<&str>) {
        self.username_responses
            .lock()
            .unwrap()
            .insert(email.to_string(), login.map(ToString::to_string));
    }

    // === Error injection ===

    pub fn fail_list(&self, error: Error) {
        *self.error_on_list.lock().unwrap() = Some(error);
    }

    pub fn fail_auto_merge(&self, error: Error) {
        *self.error_on_auto_merge.lock().unwrap() = Some(error);
    }

    pub fn fail_request_reviewers(&self, error: Error) {
        *self.error_on_request_reviewers.lock().unwrap() = Some(error);
    }

    // === Call verification ===

    pub fn detail_calls(&self) -> Vec<u64> {
        self.detail_calls.lock().unwrap().clone()
    }

    pub fn check_run_calls(&self) -> Vec<String> {
        self.check_run_calls.lock().unwrap().clone()
    }

    pub fn merge_calls(&self) -> Vec<MergeCall> {
        self.merge_calls.lock().unwrap().clone()
    }

    pub fn merge_call_count(&self) -> usize {
        self.merge_calls.lock().unwrap().len()
    }

    pub fn auto_merge_calls(&self) -> Vec<u64> {
        self.auto_merge_calls.lock().unwrap().clone()
    }

    pub fn reviewer_calls(&self) -> Vec<ReviewerCall> {
        self.reviewer_calls.lock().unwrap().clone()
    }

    pub fn resolve_calls(&self) -> Vec<String> {
        self.resolve_calls.lock().unwrap().clone()
    }

    pub fn assert_merge_called(&self, number: u64) {
        let calls = self.merge_calls();
        assert!(
            calls.iter().any(|c| c.number == number),
            "Expected request_merge({number}) but got: {calls:?}"
        );
    }

    pub fn assert_merge_not_called(&self, number: u64) {
        let calls = self.merge_calls();
        assert!(
            !calls.iter().any(|c| c.number == number),
            "Expected request_merge({number}) NOT to be called but it was: {calls:?}"
        );
    }

    fn pop_or_repeat<K, V>(map: &Mutex<HashMap<K, VecDeque<V>>>, key: &K) -> Option<V>
    where
        K: std::hash::Hash + Eq + Clone,
        V: Clone,
    {
        let mut map = map.lock().unwrap();
        let queue = map.get_mut(key)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl Default for MockPlatformClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PlatformClient for MockPlatformClient {
    async fn list_open_pull_requests(&self) -> Result<Vec<PullRequest>> {
        if let Some(e) = self.error_on_list.lock().unwrap().as_ref() {
            return Err(clone_error(e));
        }
        Ok(self.list_response.lock().unwrap().clone())
    }

    async fn get_pull_request(&self, number: u64) -> Result<PullRequest> {
        self.detail_calls.lock().unwrap().push(number);
        Self::pop_or_repeat(&self.detail_responses, &number).ok_or_else(|| Error::Rejected {
            status: 404,
            message: format!("get_pull_request: no response configured for PR #{number}"),
        })
    }

    async fn get_check_runs(&self, head_sha: &str) -> Result<Vec<CheckRun>> {
        self.check_run_calls.lock().unwrap().push(head_sha.to_string());
        Ok(Self::pop_or_repeat(&self.check_run_responses, &head_sha.to_string())
            .unwrap_or_default())
    }

    async fn request_merge(
        &self,
        number: u64,
        method: MergeMethod,
        commit_title: &str,
    ) -> Result<MergeOutcome> {
        self.merge_calls.lock().unwrap().push(MergeCall {
            number,
            method,
            commit_title: commit_title.to_string(),
        });

        match Self::pop_or_repeat_merge(&self.merge_responses, number) {
            Some(response) => response,
            None => Err(Error::Rejected {
                status: 404,
                message: format!("request_merge: no response configured for PR #{number}"),
            }),
        }
    }

    async fn enable_auto_merge(&self, pr: &PullRequest, _method: MergeMethod) -> Result<()> {
        self.auto_merge_calls.lock().unwrap().push(pr.number);
        if let Some(e) = self.error_on_auto_merge.lock().unwrap().as_ref() {
            return Err(clone_error(e));
        }
        Ok(())
    }

    async fn request_reviewers(&self, number: u64, usernames: &[String]) -> Result<()> {
        self.reviewer_calls.lock().unwrap().push(ReviewerCall {
            number,
            usernames: usernames.to_vec(),
        });
        if let Some(e) = self.error_on_request_reviewers.lock().unwrap().as_ref() {
            return Err(clone_error(e));
        }
        Ok(())
    }

    async fn resolve_username(&self, email: &str) -> Result<Option<String>> {
        self.resolve_calls.lock().unwrap().push(email.to_string());
        Ok(self
            .username_responses
            .lock()
            .unwrap()
            .get(email)
            .cloned()
            .flatten())
    }
}

impl MockPlatformClient {
    fn pop_or_repeat_merge(
        map: &Mutex<HashMap<u64, VecDeque<Result<MergeOutcome>>>>,
        key: u64,
    ) -> Option<Result<MergeOutcome>> {
        let mut map = map.lock().unwrap();
        let queue = map.get_mut(&key)?;
        let response = if queue.len() > 1 {
            queue.pop_front()?
        } else {
            match queue.front()? {
                Ok(outcome) => Ok(outcome.clone()),
                Err(e) => Err(clone_error(e)),
            }
        };
        Some(response)
    }
}
