//! Check-run monitoring - cooperative poll until checks settle
//!
//! The monitor blocks the per-PR state machine: PRs are processed one at
//! a time, so this loop directly serializes overall run latency. All
//! waiting goes through `tokio::time`, which lets tests drive the loop
//! with virtual time.

use crate::error::Result;
use crate::platform::PlatformClient;
use crate::types::{CheckRun, CheckStatus};
use std::collections::BTreeSet;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

/// Outcome of waiting for a commit's check runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecksVerdict {
    /// Every check run completed and none failed
    Passed,
    /// At least one check run failed; carries the failed set observed
    Failed(Vec<CheckRun>),
    /// Checks did not settle before the deadline (ambiguous, distinct
    /// from a confirmed failure)
    TimedOut,
}

/// Names of the check runs that have not completed yet
pub fn running_names(runs: &[CheckRun]) -> BTreeSet<String> {
    runs.iter()
        .filter(|r| r.status != CheckStatus::Completed)
        .map(|r| r.name.clone())
        .collect()
}

/// Tracks the still-running check names between polls.
///
/// [`observe`](Self::observe) returns `true` only when the set differs
/// from the previous observation, so the monitor logs on change rather
/// than on every poll.
#[derive(Debug, Default)]
pub struct RunningSet {
    last: Option<BTreeSet<String>>,
}

impl RunningSet {
    /// Record an observation; `true` means the set changed
    pub fn observe(&mut self, running: &BTreeSet<String>) -> bool {
        if self.last.as_ref() == Some(running) {
            false
        } else {
            self.last = Some(running.clone());
            true
        }
    }
}

/// Poll check runs for a commit until they settle, fail, or time out.
///
/// Fail-fast: the first observed failing conclusion returns immediately
/// without waiting for the remaining runs. Zero configured check runs
/// count as passed. A status line is logged only when the set of
/// still-running check names changes between polls.
pub async fn await_checks(
    platform: &dyn PlatformClient,
    head_sha: &str,
    interval: Duration,
    timeout: Duration,
) -> Result<ChecksVerdict> {
    let deadline = Instant::now() + timeout;
    let mut observed = RunningSet::default();

    loop {
        let runs = platform.get_check_runs(head_sha).await?;

        let failed: Vec<CheckRun> = runs.iter().filter(|r| r.has_failed()).cloned().collect();
        if !failed.is_empty() {
            let names: Vec<&str> = failed.iter().map(|r| r.name.as_str()).collect();
            warn!(head_sha, failed = ?names, "check run failed");
            return Ok(ChecksVerdict::Failed(failed));
        }

        let running = running_names(&runs);

        if running.is_empty() {
            debug!(head_sha, count = runs.len(), "all check runs passed");
            return Ok(ChecksVerdict::Passed);
        }

        if observed.observe(&running) {
            info!(head_sha, pending = ?running, "waiting for check runs");
        }

        let now = Instant::now();
        if now >= deadline {
            warn!(head_sha, "check runs did not settle before the deadline");
            return Ok(ChecksVerdict::TimedOut);
        }
        sleep(interval.min(deadline - now)).await;
    }
}
