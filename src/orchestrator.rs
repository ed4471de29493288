//! Orchestrator - drives each pull request to a terminal disposition
//!
//! PRs are processed strictly sequentially in ascending-number order.
//! Per PR: eligibility filter, bounded mergeability resolution, check-run
//! monitoring, merge execution, and escalation on any non-success
//! terminal. One PR's failure never blocks the rest of the run; only
//! transport-level errors abort the whole run.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::escalate::escalate;
use crate::executor::{MergeAttempt, execute_merge};
use crate::filter::EligibilityFilter;
use crate::monitor::{ChecksVerdict, await_checks};
use crate::platform::PlatformClient;
use crate::types::{Disposition, MergeableState, PullRequest, RunOutcome};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Aggregated result of one orchestrator run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// One record per processed pull request, in processing order
    pub outcomes: Vec<RunOutcome>,
}

impl RunSummary {
    /// Create an empty summary stamped with the current time
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            outcomes: Vec::new(),
        }
    }

    /// Record one settled pull request
    pub fn record(&mut self, outcome: RunOutcome) {
        self.outcomes.push(outcome);
    }

    /// Number of merged (or auto-merge-registered) PRs
    pub fn merged_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.disposition == Disposition::Merged)
            .count()
    }

    /// Number of PRs skipped as ineligible
    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.disposition == Disposition::SkippedIneligible)
            .count()
    }

    /// Number of PRs that ended in escalation
    pub fn escalated_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.disposition.is_escalated())
            .count()
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Sequential merge orchestrator over one repository's open PRs
pub struct Orchestrator {
    platform: Arc<dyn PlatformClient>,
    config: Config,
    filter: EligibilityFilter,
}

impl Orchestrator {
    /// Create an orchestrator from a platform client and configuration
    pub fn new(platform: Arc<dyn PlatformClient>, config: Config) -> Self {
        let filter = EligibilityFilter::from_config(&config);
        Self {
            platform,
            config,
            filter,
        }
    }

    /// Process every open pull request once, each to a terminal
    /// disposition, and return the run summary.
    ///
    /// Escalations and per-PR rejections are absorbed into dispositions;
    /// only an unrecovered transport failure aborts the run.
    pub async fn run(&self) -> Result<RunSummary> {
        let mut prs = self.platform.list_open_pull_requests().await?;
        // Deterministic processing order regardless of listing order
        prs.sort_by_key(|pr| pr.number);

        info!(count = prs.len(), "found open pull requests");
        let mut summary = RunSummary::new();

        for pr in prs {
            info!(number = pr.number, title = %pr.title, "processing pull request");
            match self.process_pr(&pr).await {
                Ok(disposition) => {
                    info!(number = pr.number, %disposition, "pull request settled");
                    summary.record(RunOutcome::new(&pr, disposition));
                }
                Err(e @ Error::Transport(_)) => return Err(e),
                Err(e) => {
                    warn!(number = pr.number, error = %e, "pull request processing failed");
                    let reason = format!("automated merge failed: {e}");
                    escalate(self.platform.as_ref(), &pr, &reason, &self.config.reviewers)
                        .await?;
                    summary.record(RunOutcome::new(&pr, Disposition::EscalatedMergeFailure));
                }
            }
        }

        Ok(summary)
    }

    /// Drive one PR through filter, monitor, executor, and notifier
    async fn process_pr(&self, pr: &PullRequest) -> Result<Disposition> {
        if !self.filter.is_eligible(pr) {
            info!(
                number = pr.number,
                base = %pr.base_ref,
                "ineligible; skipping"
            );
            return Ok(Disposition::SkippedIneligible);
        }

        // Fresh snapshot with mergeability resolved (bounded retry, since
        // the platform computes mergeability asynchronously)
        let fresh = self.resolve_mergeability(pr.number).await?;

        let ready = fresh.mergeable == Some(true)
            && fresh.mergeable_state == MergeableState::Clean;

        if !ready {
            debug!(
                number = fresh.number,
                mergeable = ?fresh.mergeable,
                state = %fresh.mergeable_state,
                "not clean yet; waiting for check runs"
            );
            match await_checks(
                self.platform.as_ref(),
                &fresh.head_sha,
                self.config.poll_interval,
                self.config.check_timeout,
            )
            .await?
            {
                ChecksVerdict::Passed => {}
                ChecksVerdict::Failed(failed) => {
                    let names: Vec<&str> = failed.iter().map(|r| r.name.as_str()).collect();
                    let reason = format!("checks failed: {}", names.join(", "));
                    escalate(self.platform.as_ref(), &fresh, &reason, &self.config.reviewers)
                        .await?;
                    return Ok(Disposition::EscalatedChecksFailed);
                }
                ChecksVerdict::TimedOut => {
                    let reason = format!(
                        "checks did not settle within {}s",
                        self.config.check_timeout.as_secs()
                    );
                    escalate(self.platform.as_ref(), &fresh, &reason, &self.config.reviewers)
                        .await?;
                    return Ok(Disposition::EscalatedChecksTimedOut);
                }
            }
        }

        match execute_merge(
            self.platform.as_ref(),
            &fresh,
            self.config.merge_method,
            self.config.merge_policy,
            self.config.conflict_retry_delay,
        )
        .await?
        {
            MergeAttempt::Merged { .. } | MergeAttempt::AutoMergeEnabled => {
                Ok(Disposition::Merged)
            }
            MergeAttempt::Failed { reason } => {
                let reason = format!("merge failed: {reason}");
                escalate(self.platform.as_ref(), &fresh, &reason, &self.config.reviewers)
                    .await?;
                Ok(Disposition::EscalatedMergeFailure)
            }
        }
    }

    /// Re-fetch a PR until its mergeable flag is known, up to the
    /// configured attempt count. A still-unknown flag after the last
    /// attempt is handled conservatively by the caller (treated as not
    /// mergeable).
    async fn resolve_mergeability(&self, number: u64) -> Result<PullRequest> {
        let mut attempt = 0;
        loop {
            let pr = self.platform.get_pull_request(number).await?;
            attempt += 1;
            if pr.mergeable.is_some() || attempt >= self.config.mergeability_attempts {
                if pr.mergeable.is_none() {
                    warn!(
                        number,
                        attempts = attempt,
                        "mergeability still unknown; treating as not mergeable"
                    );
                }
                return Ok(pr);
            }
            debug!(number, attempt, "mergeability unknown, retrying");
            sleep(self.config.mergeability_backoff).await;
        }
    }
}
