//! Platform client for the code-hosting API
//!
//! Provides the thin I/O boundary the orchestrator talks through. Each
//! operation issues exactly one network call; retry policy and business
//! interpretation are caller concerns.

mod github;

pub use github::GitHubClient;

use crate::error::Result;
use crate::types::{CheckRun, MergeMethod, MergeOutcome, PullRequest};
use async_trait::async_trait;

/// Thin, retry-free client for pull request operations
///
/// Implementations map network failures to [`Error::Transport`] and 4xx
/// rejections (with the platform's error body) to [`Error::Rejected`].
///
/// [`Error::Transport`]: crate::error::Error::Transport
/// [`Error::Rejected`]: crate::error::Error::Rejected
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// List every open pull request, following result pagination,
    /// ordered ascending by number
    async fn list_open_pull_requests(&self) -> Result<Vec<PullRequest>>;

    /// Fetch a fresh snapshot of one pull request, including its
    /// mergeability fields
    async fn get_pull_request(&self, number: u64) -> Result<PullRequest>;

    /// Fetch the check runs attached to a commit
    async fn get_check_runs(&self, head_sha: &str) -> Result<Vec<CheckRun>>;

    /// Request a merge with the given method and commit title.
    ///
    /// A `Rejected` error carries the platform's reason (conflict, branch
    /// protection, ...); the caller classifies it.
    async fn request_merge(
        &self,
        number: u64,
        method: MergeMethod,
        commit_title: &str,
    ) -> Result<MergeOutcome>;

    /// Register the PR for the platform's deferred auto-merge
    async fn enable_auto_merge(&self, pr: &PullRequest, method: MergeMethod) -> Result<()>;

    /// Request the given usernames as reviewers on a PR.
    ///
    /// The platform deduplicates repeated requests, so this is idempotent
    /// in effect.
    async fn request_reviewers(&self, number: u64, usernames: &[String]) -> Result<()>;

    /// Resolve an email address to a platform username.
    ///
    /// Returns `None` when no account matches; resolution is never cached.
    async fn resolve_username(&self, email: &str) -> Result<Option<String>>;
}
