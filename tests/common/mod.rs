//! Shared test fixtures

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::{MergeCall, MockPlatformClient, ReviewerCall};

use pr_automerge::config::Config;
use pr_automerge::types::{
    CheckConclusion, CheckRun, CheckStatus, MergeOutcome, MergeableState, PullRequest,
};
use std::time::Duration;

/// Build a PR snapshot targeting `main` with a clean mergeable state
pub fn make_pr(number: u64, title: &str) -> PullRequest {
    PullRequest {
        number,
        title: title.to_string(),
        head_sha: format!("sha-{number}"),
        head_ref: format!("cherry-pick-{number}"),
        base_ref: "main".to_string(),
        mergeable: Some(true),
        mergeable_state: MergeableState::Clean,
        node_id: Some(format!("PR_node_{number}")),
        html_url: format!("https://github.com/test/repo/pull/{number}"),
    }
}

/// Variant of [`make_pr`] with explicit base branch
pub fn make_pr_on(number: u64, title: &str, base_ref: &str) -> PullRequest {
    PullRequest {
        base_ref: base_ref.to_string(),
        ..make_pr(number, title)
    }
}

/// Build a check run in the given state
pub fn make_check_run(
    name: &str,
    status: CheckStatus,
    conclusion: Option<CheckConclusion>,
) -> CheckRun {
    CheckRun {
        name: name.to_string(),
        status,
        conclusion,
        summary: None,
    }
}

/// Completed check run with a success conclusion
pub fn passing_check(name: &str) -> CheckRun {
    make_check_run(name, CheckStatus::Completed, Some(CheckConclusion::Success))
}

/// Completed check run with a failure conclusion
pub fn failing_check(name: &str) -> CheckRun {
    make_check_run(name, CheckStatus::Completed, Some(CheckConclusion::Failure))
}

/// Check run still in progress
pub fn pending_check(name: &str) -> CheckRun {
    make_check_run(name, CheckStatus::InProgress, None)
}

/// Successful merge outcome
pub fn merged_outcome(sha: &str) -> MergeOutcome {
    MergeOutcome {
        merged: true,
        sha: Some(sha.to_string()),
        message: None,
    }
}

/// Configuration with short timings suitable for virtual-time tests
pub fn test_config() -> Config {
    let mut config = Config::new("test", "repo", "token-123").expect("test config");
    config.check_timeout = Duration::from_secs(300);
    config.poll_interval = Duration::from_secs(10);
    config.conflict_retry_delay = Duration::from_secs(5);
    config.mergeability_backoff = Duration::from_secs(2);
    config
}
