//! Escalation - requesting human review when automation cannot proceed
//!
//! Best-effort by design: a reviewer that fails to resolve is skipped and
//! logged, and a rejected review request is reported as a false return,
//! never as a run failure. Only transport errors propagate.

use crate::error::{Error, Result};
use crate::platform::PlatformClient;
use crate::types::{PullRequest, ReviewerSpec};
use tracing::{info, warn};

/// Resolve the configured reviewers and request their review on a PR.
///
/// Returns `true` when at least one reviewer was requested. With an
/// empty reviewer list this is a no-op returning `false`, with no
/// network call issued.
pub async fn escalate(
    platform: &dyn PlatformClient,
    pr: &PullRequest,
    reason: &str,
    reviewers: &[ReviewerSpec],
) -> Result<bool> {
    if reviewers.is_empty() {
        warn!(
            number = pr.number,
            reason, "no reviewers configured; escalation not delivered"
        );
        return Ok(false);
    }

    let mut usernames = Vec::new();
    for spec in reviewers {
        match spec {
            ReviewerSpec::Username(login) => usernames.push(login.clone()),
            ReviewerSpec::Email(email) => match platform.resolve_username(email).await {
                Ok(Some(login)) => usernames.push(login),
                Ok(None) => {
                    warn!(email, "no platform account matched email; skipping reviewer");
                }
                Err(Error::Rejected { status, message }) => {
                    warn!(email, status, message, "reviewer lookup rejected; skipping");
                }
                Err(e) => return Err(e),
            },
        }
    }

    if usernames.is_empty() {
        warn!(
            number = pr.number,
            reason, "no reviewers resolved; escalation not delivered"
        );
        return Ok(false);
    }

    match platform.request_reviewers(pr.number, &usernames).await {
        Ok(()) => {
            info!(number = pr.number, reviewers = ?usernames, reason, "requested review");
            Ok(true)
        }
        Err(Error::Rejected { status, message }) => {
            warn!(number = pr.number, status, message, "review request rejected");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
