//! Core types for pr-automerge

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A pull request snapshot
///
/// Snapshots are read-only: whenever fresher state is needed the PR is
/// re-fetched from the platform rather than mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number, unique per repository
    pub number: u64,
    /// PR title
    pub title: String,
    /// SHA of the head commit
    pub head_sha: String,
    /// Head branch name
    pub head_ref: String,
    /// Base branch name
    pub base_ref: String,
    /// Whether the PR can be merged without conflict
    /// - `Some(true)` = mergeable
    /// - `Some(false)` = has conflicts
    /// - `None` = unknown (platform still computing)
    pub mergeable: Option<bool>,
    /// Platform-computed mergeability classification
    pub mergeable_state: MergeableState,
    /// GraphQL node ID (used for auto-merge mutations)
    pub node_id: Option<String>,
    /// Web URL for the PR
    pub html_url: String,
}

/// Platform-computed classification of whether a PR can be merged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeableState {
    /// No conflicts, required checks and reviews satisfied
    Clean,
    /// Merge conflicts present
    Dirty,
    /// Blocked by branch protection
    Blocked,
    /// Mergeable but a non-required check is failing
    Unstable,
    /// Head is behind the base branch
    Behind,
    /// PR is a draft
    Draft,
    /// Pre-receive hooks are still running
    HasHooks,
    /// Not yet computed by the platform
    Unknown,
}

impl MergeableState {
    /// Parse the platform's `mergeable_state` string, defaulting to
    /// `Unknown` for anything unrecognized.
    pub fn parse(s: &str) -> Self {
        match s {
            "clean" => Self::Clean,
            "dirty" => Self::Dirty,
            "blocked" => Self::Blocked,
            "unstable" => Self::Unstable,
            "behind" => Self::Behind,
            "draft" => Self::Draft,
            "has_hooks" => Self::HasHooks,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for MergeableState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Clean => "clean",
            Self::Dirty => "dirty",
            Self::Blocked => "blocked",
            Self::Unstable => "unstable",
            Self::Behind => "behind",
            Self::Draft => "draft",
            Self::HasHooks => "has_hooks",
            Self::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// A CI check run attached to a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRun {
    /// Check name (e.g., "build", "lint")
    pub name: String,
    /// Current status
    pub status: CheckStatus,
    /// Conclusion, defined only once the run completes
    pub conclusion: Option<CheckConclusion>,
    /// Output summary reported by the check, if any
    pub summary: Option<String>,
}

impl CheckRun {
    /// Whether this run has completed with a failing conclusion.
    ///
    /// A completed run with no conclusion counts as failed.
    pub fn has_failed(&self) -> bool {
        self.status == CheckStatus::Completed && !self.has_passed()
    }

    /// Whether this run has completed with a passing conclusion
    pub fn has_passed(&self) -> bool {
        self.status == CheckStatus::Completed
            && matches!(
                self.conclusion,
                Some(
                    CheckConclusion::Success
                        | CheckConclusion::Neutral
                        | CheckConclusion::Skipped
                )
            )
    }
}

/// Status of a check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    /// Queued but not started
    Queued,
    /// Currently running
    InProgress,
    /// Finished (see conclusion)
    Completed,
}

impl CheckStatus {
    /// Parse the platform's `status` string
    pub fn parse(s: &str) -> Self {
        match s {
            "completed" => Self::Completed,
            "in_progress" => Self::InProgress,
            _ => Self::Queued,
        }
    }
}

/// Conclusion of a completed check run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckConclusion {
    /// Check passed
    Success,
    /// Check failed
    Failure,
    /// Neither pass nor fail
    Neutral,
    /// Cancelled before completion
    Cancelled,
    /// Skipped
    Skipped,
    /// Exceeded its own time limit
    TimedOut,
    /// Requires user action
    ActionRequired,
}

impl CheckConclusion {
    /// Parse the platform's `conclusion` string; anything unrecognized is
    /// treated as failing.
    pub fn parse(s: &str) -> Self {
        match s {
            "success" => Self::Success,
            "neutral" => Self::Neutral,
            "cancelled" => Self::Cancelled,
            "skipped" => Self::Skipped,
            "timed_out" => Self::TimedOut,
            "action_required" => Self::ActionRequired,
            _ => Self::Failure,
        }
    }
}

/// Merge strategy/method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMethod {
    /// Squash all commits into one
    Squash,
    /// Create a merge commit
    Merge,
    /// Rebase commits onto the base branch
    Rebase,
}

impl MergeMethod {
    /// GraphQL `PullRequestMergeMethod` value
    pub const fn as_graphql(self) -> &'static str {
        match self {
            Self::Squash => "SQUASH",
            Self::Merge => "MERGE",
            Self::Rebase => "REBASE",
        }
    }
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

impl std::str::FromStr for MergeMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "squash" => Ok(Self::Squash),
            "merge" => Ok(Self::Merge),
            "rebase" => Ok(Self::Rebase),
            other => Err(Error::Config(format!(
                "unknown merge method '{other}' (expected squash, merge, or rebase)"
            ))),
        }
    }
}

/// How the executor performs a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Issue the merge call now and retry once on a conflict
    ForceNow,
    /// Register the PR for the platform's deferred auto-merge
    RegisterAutoMerge,
}

/// Result of a merge API call
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// Whether the merge was performed
    pub merged: bool,
    /// SHA of the merge commit (if merged)
    pub sha: Option<String>,
    /// Message from the platform (especially on failure)
    pub message: Option<String>,
}

/// A configured reviewer, either a platform username or an email that
/// must be resolved to one per run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewerSpec {
    /// Email address, resolved via user search
    Email(String),
    /// Platform username, used as-is
    Username(String),
}

impl ReviewerSpec {
    /// Classify a reviewer string: anything containing `@` is an email
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.contains('@') {
            Self::Email(trimmed.to_string())
        } else {
            Self::Username(trimmed.to_string())
        }
    }
}

/// Terminal disposition of one pull request in one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Merged (or registered for platform auto-merge)
    Merged,
    /// Did not match the eligibility filter; no action taken
    SkippedIneligible,
    /// A check run failed; reviewers were requested
    EscalatedChecksFailed,
    /// Checks did not settle before the deadline; reviewers were requested
    EscalatedChecksTimedOut,
    /// The merge call failed; reviewers were requested
    EscalatedMergeFailure,
}

impl Disposition {
    /// Whether this disposition ended in escalation
    pub const fn is_escalated(self) -> bool {
        matches!(
            self,
            Self::EscalatedChecksFailed
                | Self::EscalatedChecksTimedOut
                | Self::EscalatedMergeFailure
        )
    }
}

impl std::fmt::Display for Disposition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Merged => "merged",
            Self::SkippedIneligible => "skipped (ineligible)",
            Self::EscalatedChecksFailed => "escalated (checks failed)",
            Self::EscalatedChecksTimedOut => "escalated (checks timed out)",
            Self::EscalatedMergeFailure => "escalated (merge failed)",
        };
        write!(f, "{s}")
    }
}

/// Record of one processed pull request
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// PR number
    pub number: u64,
    /// PR title at processing time
    pub title: String,
    /// Final disposition
    pub disposition: Disposition,
}

impl RunOutcome {
    /// Build an outcome record for a PR
    pub fn new(pr: &PullRequest, disposition: Disposition) -> Self {
        Self {
            number: pr.number,
            title: pr.title.clone(),
            disposition,
        }
    }
}
