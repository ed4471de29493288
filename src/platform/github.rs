//! GitHub platform client implementation

use crate::error::{Error, Result};
use crate::platform::PlatformClient;
use crate::types::{
    CheckConclusion, CheckRun, CheckStatus, MergeMethod, MergeOutcome, MergeableState,
    PullRequest,
};
use async_trait::async_trait;
use octocrab::Octocrab;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

const ACCEPT_HEADER: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "2022-11-28";

// Wire types for the raw REST endpoints octocrab does not model well.

#[derive(Deserialize)]
struct WirePullRequest {
    number: u64,
    title: Option<String>,
    head: WireRef,
    base: WireRef,
    mergeable: Option<bool>,
    mergeable_state: Option<String>,
    node_id: Option<String>,
    html_url: Option<String>,
}

#[derive(Deserialize)]
struct WireRef {
    sha: String,
    #[serde(rename = "ref")]
    ref_name: String,
}

impl From<WirePullRequest> for PullRequest {
    fn from(pr: WirePullRequest) -> Self {
        Self {
            number: pr.number,
            title: pr.title.unwrap_or_default(),
            head_sha: pr.head.sha,
            head_ref: pr.head.ref_name,
            base_ref: pr.base.ref_name,
            mergeable: pr.mergeable,
            mergeable_state: pr
                .mergeable_state
                .as_deref()
                .map_or(MergeableState::Unknown, MergeableState::parse),
            node_id: pr.node_id,
            html_url: pr.html_url.unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
struct CheckRunsResponse {
    check_runs: Vec<WireCheckRun>,
}

#[derive(Deserialize)]
struct WireCheckRun {
    name: String,
    status: String,
    conclusion: Option<String>,
    output: Option<WireCheckOutput>,
}

#[derive(Deserialize)]
struct WireCheckOutput {
    summary: Option<String>,
}

impl From<WireCheckRun> for CheckRun {
    fn from(run: WireCheckRun) -> Self {
        Self {
            name: run.name,
            status: CheckStatus::parse(&run.status),
            conclusion: run.conclusion.as_deref().map(CheckConclusion::parse),
            summary: run.output.and_then(|o| o.summary),
        }
    }
}

#[derive(Deserialize)]
struct UserSearchResponse {
    items: Vec<UserSearchItem>,
}

#[derive(Deserialize)]
struct UserSearchItem {
    login: String,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

/// GitHub client using octocrab plus raw HTTP for the endpoints octocrab
/// does not cover (PR mergeability detail, check runs, user search,
/// requested reviewers)
pub struct GitHubClient {
    client: Octocrab,
    /// HTTP client for raw requests
    http: Client,
    /// Token for raw HTTP requests
    token: String,
    /// API host for raw requests
    api_host: String,
    owner: String,
    repo: String,
}

impl GitHubClient {
    /// Create a new GitHub client
    pub fn new(token: &str, owner: String, repo: String, host: Option<String>) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.to_string());

        let api_host = if let Some(ref h) = host {
            let base_url = format!("https://{h}/api/v3");
            builder = builder
                .base_uri(&base_url)
                .map_err(|e| Error::Transport(e.to_string()))?;
            format!("{h}/api/v3")
        } else {
            "api.github.com".to_string()
        };

        let client = builder
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;

        let http = Client::builder()
            .user_agent("pr-automerge")
            .build()
            .map_err(|e| Error::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            http,
            token: token.to_string(),
            api_host,
            owner,
            repo,
        })
    }

    fn repo_url(&self, tail: &str) -> String {
        format!(
            "https://{}/repos/{}/{}/{tail}",
            self.api_host, self.owner, self.repo
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .http
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", ACCEPT_HEADER)
            .header("X-GitHub-Api-Version", API_VERSION_HEADER)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<T> {
        let response = self
            .http
            .post(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", ACCEPT_HEADER)
            .header("X-GitHub-Api-Version", API_VERSION_HEADER)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Split a response into success, rejection (4xx with body), and
    /// transport failure (everything else)
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| Error::Transport(format!("failed to decode response: {e}")));
        }
        let body = response.text().await.unwrap_or_default();
        if status.is_client_error() {
            Err(Error::Rejected {
                status: status.as_u16(),
                message: body,
            })
        } else {
            Err(Error::Transport(format!("server returned {status}: {body}")))
        }
    }
}

/// Convert an octocrab listing entry to our `PullRequest` type
///
/// List responses omit mergeability, so those fields stay unknown until a
/// detail fetch.
fn pr_from_octocrab(pr: &octocrab::models::pulls::PullRequest) -> PullRequest {
    PullRequest {
        number: pr.number,
        title: pr.title.as_deref().unwrap_or_default().to_string(),
        head_sha: pr.head.sha.clone(),
        head_ref: pr.head.ref_field.clone(),
        base_ref: pr.base.ref_field.clone(),
        mergeable: pr.mergeable,
        mergeable_state: MergeableState::Unknown,
        node_id: pr.node_id.clone(),
        html_url: pr
            .html_url
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
    }
}

#[async_trait]
impl PlatformClient for GitHubClient {
    async fn list_open_pull_requests(&self) -> Result<Vec<PullRequest>> {
        debug!("listing open pull requests");
        let page = self
            .client
            .pulls(&self.owner, &self.repo)
            .list()
            .state(octocrab::params::State::Open)
            .per_page(100)
            .send()
            .await?;
        let items = self.client.all_pages(page).await?;

        let mut prs: Vec<PullRequest> = items.iter().map(pr_from_octocrab).collect();
        prs.sort_by_key(|pr| pr.number);
        debug!(count = prs.len(), "listed open pull requests");
        Ok(prs)
    }

    async fn get_pull_request(&self, number: u64) -> Result<PullRequest> {
        debug!(number, "fetching pull request detail");
        let url = self.repo_url(&format!("pulls/{number}"));
        let wire: WirePullRequest = self.get_json(&url).await?;
        let pr = PullRequest::from(wire);
        debug!(number, mergeable = ?pr.mergeable, state = %pr.mergeable_state, "fetched pull request");
        Ok(pr)
    }

    async fn get_check_runs(&self, head_sha: &str) -> Result<Vec<CheckRun>> {
        debug!(head_sha, "fetching check runs");
        let url = self.repo_url(&format!("commits/{head_sha}/check-runs?per_page=100"));
        let response: CheckRunsResponse = self.get_json(&url).await?;
        let runs: Vec<CheckRun> = response.check_runs.into_iter().map(CheckRun::from).collect();
        debug!(head_sha, count = runs.len(), "fetched check runs");
        Ok(runs)
    }

    async fn request_merge(
        &self,
        number: u64,
        method: MergeMethod,
        commit_title: &str,
    ) -> Result<MergeOutcome> {
        debug!(number, %method, "requesting merge");
        let octocrab_method = match method {
            MergeMethod::Squash => octocrab::params::pulls::MergeMethod::Squash,
            MergeMethod::Merge => octocrab::params::pulls::MergeMethod::Merge,
            MergeMethod::Rebase => octocrab::params::pulls::MergeMethod::Rebase,
        };

        let pulls = self.client.pulls(&self.owner, &self.repo);
        let mut builder = pulls.merge(number).method(octocrab_method);
        // commit_title applies to squash and merge commits only
        if method != MergeMethod::Rebase {
            builder = builder.title(commit_title);
        }
        let result = builder.send().await?;

        let outcome = MergeOutcome {
            merged: result.merged,
            sha: result.sha,
            message: result.message,
        };
        debug!(number, merged = outcome.merged, sha = ?outcome.sha, "merge call returned");
        Ok(outcome)
    }

    async fn enable_auto_merge(&self, pr: &PullRequest, method: MergeMethod) -> Result<()> {
        debug!(number = pr.number, %method, "enabling auto-merge");
        let node_id = pr.node_id.as_ref().ok_or_else(|| {
            Error::Internal(format!(
                "PR #{} is missing the node id required for auto-merge",
                pr.number
            ))
        })?;

        let response: GraphQlResponse = self
            .client
            .graphql(&serde_json::json!({
                "query": r"
                    mutation EnableAutoMerge($pullRequestId: ID!, $method: PullRequestMergeMethod!) {
                        enablePullRequestAutoMerge(input: {
                            pullRequestId: $pullRequestId,
                            mergeMethod: $method
                        }) {
                            pullRequest {
                                autoMergeRequest {
                                    enabledAt
                                }
                            }
                        }
                    }
                ",
                "variables": {
                    "pullRequestId": node_id,
                    "method": method.as_graphql(),
                }
            }))
            .await
            .map_err(Error::from)?;

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            let messages: Vec<_> = errors.into_iter().map(|e| e.message).collect();
            // GraphQL errors arrive with HTTP 200; they are business
            // rejections, not transport failures
            return Err(Error::Rejected {
                status: 422,
                message: messages.join(", "),
            });
        }

        debug!(number = pr.number, "auto-merge enabled");
        Ok(())
    }

    async fn request_reviewers(&self, number: u64, usernames: &[String]) -> Result<()> {
        debug!(number, reviewers = ?usernames, "requesting reviewers");
        let url = self.repo_url(&format!("pulls/{number}/requested_reviewers"));
        let _: serde_json::Value = self
            .post_json(&url, &serde_json::json!({ "reviewers": usernames }))
            .await?;
        debug!(number, "requested reviewers");
        Ok(())
    }

    async fn resolve_username(&self, email: &str) -> Result<Option<String>> {
        debug!(email, "resolving username from email");
        let query = urlencoding::encode(&format!("{email} in:email")).into_owned();
        let url = format!("https://{}/search/users?q={query}", self.api_host);
        let response: UserSearchResponse = self.get_json(&url).await?;
        let login = response.items.into_iter().next().map(|item| item.login);
        debug!(email, login = ?login, "resolved username");
        Ok(login)
    }
}
