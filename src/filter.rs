//! Eligibility filtering - pure predicate over PR metadata
//!
//! No I/O happens here; the filter only looks at the snapshot the
//! orchestrator already holds, making the rule trivially testable.

use crate::config::Config;
use crate::types::PullRequest;
use regex::Regex;

/// Decides whether the orchestrator should act on a pull request at all
#[derive(Debug, Clone)]
pub struct EligibilityFilter {
    base_branch: String,
    title_pattern: Regex,
}

impl EligibilityFilter {
    /// Create a filter for a base branch and title pattern
    pub const fn new(base_branch: String, title_pattern: Regex) -> Self {
        Self {
            base_branch,
            title_pattern,
        }
    }

    /// Build the filter from run configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.base_branch.clone(), config.title_pattern.clone())
    }

    /// A PR is eligible iff it targets the configured base branch and its
    /// title matches the configured pattern
    pub fn is_eligible(&self, pr: &PullRequest) -> bool {
        pr.base_ref == self.base_branch && self.title_pattern.is_match(&pr.title)
    }
}
