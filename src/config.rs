//! Run configuration
//!
//! All tunables live in one immutable [`Config`] value handed to the
//! orchestrator at construction. Nothing in this crate reads process-wide
//! state after startup.

use crate::error::{Error, Result};
use crate::types::{MergeMethod, MergePolicy, ReviewerSpec};
use regex::{Regex, RegexBuilder};
use std::time::Duration;

/// Title pattern identifying PRs the orchestrator may act on
pub const DEFAULT_TITLE_PATTERN: &str = "cherry[- ]?pick";

/// Base branch merged into by default
pub const DEFAULT_BASE_BRANCH: &str = "main";

/// Immutable configuration for one orchestrator run
#[derive(Debug, Clone)]
pub struct Config {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// API credential (personal access token or app token)
    pub token: String,
    /// Base branch PRs must target to be eligible
    pub base_branch: String,
    /// Case-insensitive pattern the PR title must match
    pub title_pattern: Regex,
    /// Reviewers to request when escalating
    pub reviewers: Vec<ReviewerSpec>,
    /// Merge method for eligible PRs
    pub merge_method: MergeMethod,
    /// Force-merge-now vs. register-for-auto-merge
    pub merge_policy: MergePolicy,
    /// Deadline for check runs to settle
    pub check_timeout: Duration,
    /// Interval between check-run polls
    pub poll_interval: Duration,
    /// Delay before the single conflict retry of a merge call
    pub conflict_retry_delay: Duration,
    /// Attempts to resolve a transiently-unknown mergeable flag
    pub mergeability_attempts: u32,
    /// Backoff between mergeability attempts
    pub mergeability_backoff: Duration,
    /// Custom API host (None for github.com)
    pub host: Option<String>,
}

impl Config {
    /// Create a configuration with default tunables
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            owner: owner.into(),
            repo: repo.into(),
            token: token.into(),
            base_branch: DEFAULT_BASE_BRANCH.to_string(),
            title_pattern: compile_title_pattern(DEFAULT_TITLE_PATTERN)?,
            reviewers: Vec::new(),
            merge_method: MergeMethod::Squash,
            merge_policy: MergePolicy::ForceNow,
            check_timeout: Duration::from_secs(30 * 60),
            poll_interval: Duration::from_secs(30),
            conflict_retry_delay: Duration::from_secs(5),
            mergeability_attempts: 3,
            mergeability_backoff: Duration::from_secs(2),
            host: None,
        })
    }

    /// Parse a `owner/name` repository slug
    pub fn parse_repo_slug(slug: &str) -> Result<(String, String)> {
        match slug.split_once('/') {
            Some((owner, name)) if !owner.is_empty() && !name.is_empty() => {
                Ok((owner.to_string(), name.to_string()))
            }
            _ => Err(Error::Config(format!(
                "invalid repository '{slug}' (expected owner/name)"
            ))),
        }
    }
}

/// Compile a case-insensitive title pattern
pub fn compile_title_pattern(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| Error::Config(format!("invalid title pattern '{pattern}': {e}")))
}
