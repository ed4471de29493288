//! Merge execution - the effectful merge call with its bounded retry
//!
//! The executor assumes the caller already judged checks acceptable, but
//! the remote merge call stays the authoritative gate: mergeability can
//! change between check completion and the merge attempt, a race this
//! design tolerates via one retry rather than prevention.

use crate::error::{Error, Result};
use crate::platform::PlatformClient;
use crate::types::{MergeMethod, MergeOutcome, MergePolicy, PullRequest};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Outcome of one executor invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeAttempt {
    /// The PR was merged
    Merged {
        /// SHA of the merge commit, when the platform reports one
        sha: Option<String>,
    },
    /// The PR was registered for the platform's deferred auto-merge
    AutoMergeEnabled,
    /// The merge was refused and will not be retried further
    Failed {
        /// Platform-reported reason
        reason: String,
    },
}

/// Whether a merge rejection looks like a transient conflict.
///
/// GitHub reports conflicts as 405 ("not mergeable") or 409 (head
/// mismatch); the body is matched as a fallback for proxied responses.
/// Only conflict-shaped rejections earn the single retry.
pub fn is_conflict_shaped(status: Option<u16>, message: &str) -> bool {
    if matches!(status, Some(405 | 409)) {
        return true;
    }
    let msg = message.to_ascii_lowercase();
    msg.contains("conflict") || msg.contains("not mergeable")
}

enum MergeResponse {
    Merged(Option<String>),
    Conflict(String),
    Other(String),
}

fn classify(result: Result<MergeOutcome>) -> Result<MergeResponse> {
    match result {
        Ok(outcome) if outcome.merged => Ok(MergeResponse::Merged(outcome.sha)),
        Ok(outcome) => {
            let message = outcome.message.unwrap_or_else(|| "merge not performed".to_string());
            if is_conflict_shaped(None, &message) {
                Ok(MergeResponse::Conflict(message))
            } else {
                Ok(MergeResponse::Other(message))
            }
        }
        Err(Error::Rejected { status, message }) => {
            if is_conflict_shaped(Some(status), &message) {
                Ok(MergeResponse::Conflict(message))
            } else {
                Ok(MergeResponse::Other(message))
            }
        }
        Err(e) => Err(e),
    }
}

/// Attempt to merge a PR under the configured policy.
///
/// `ForceNow` issues the merge call and retries exactly once, after
/// `conflict_retry_delay`, when the rejection is conflict-shaped; any
/// other rejection, or a second failure, becomes `Failed`.
/// `RegisterAutoMerge` registers the PR with the platform and returns
/// without polling for completion. Transport errors propagate.
pub async fn execute_merge(
    platform: &dyn PlatformClient,
    pr: &PullRequest,
    method: MergeMethod,
    policy: MergePolicy,
    conflict_retry_delay: Duration,
) -> Result<MergeAttempt> {
    if policy == MergePolicy::RegisterAutoMerge {
        return match platform.enable_auto_merge(pr, method).await {
            Ok(()) => {
                info!(number = pr.number, "registered for auto-merge");
                Ok(MergeAttempt::AutoMergeEnabled)
            }
            Err(Error::Rejected { status, message }) => {
                warn!(number = pr.number, status, message, "auto-merge registration rejected");
                Ok(MergeAttempt::Failed { reason: message })
            }
            Err(e) => Err(e),
        };
    }

    let commit_title = format!("{} (#{})", pr.title, pr.number);

    let first = platform.request_merge(pr.number, method, &commit_title).await;
    match classify(first)? {
        MergeResponse::Merged(sha) => {
            info!(number = pr.number, sha = ?sha, "merged");
            Ok(MergeAttempt::Merged { sha })
        }
        MergeResponse::Conflict(reason) => {
            warn!(number = pr.number, reason, "conflict on merge, retrying once");
            sleep(conflict_retry_delay).await;

            let retry = platform.request_merge(pr.number, method, &commit_title).await;
            match classify(retry)? {
                MergeResponse::Merged(sha) => {
                    info!(number = pr.number, sha = ?sha, "merged on retry");
                    Ok(MergeAttempt::Merged { sha })
                }
                MergeResponse::Conflict(reason) | MergeResponse::Other(reason) => {
                    warn!(number = pr.number, reason, "merge retry failed");
                    Ok(MergeAttempt::Failed { reason })
                }
            }
        }
        MergeResponse::Other(reason) => {
            warn!(number = pr.number, reason, "merge rejected");
            Ok(MergeAttempt::Failed { reason })
        }
    }
}
