//! CLI entry point for pr-automerge

mod report;

use clap::Parser;
use pr_automerge::config::{Config, compile_title_pattern};
use pr_automerge::orchestrator::Orchestrator;
use pr_automerge::platform::GitHubClient;
use pr_automerge::types::{MergeMethod, MergePolicy, ReviewerSpec};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "pr-automerge",
    version,
    about = "Automated merge orchestrator for cherry-pick pull requests"
)]
struct Cli {
    /// Repository to operate on, as owner/name
    #[arg(long, env = "PR_AUTOMERGE_REPO")]
    repo: String,

    /// API token used for all platform calls
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// Base branch eligible PRs must target
    #[arg(long, default_value = "main")]
    base_branch: String,

    /// Case-insensitive pattern the PR title must match
    #[arg(long)]
    title_pattern: Option<String>,

    /// Reviewer to request on escalation (email or username, repeatable)
    #[arg(
        long = "reviewer",
        env = "PR_AUTOMERGE_REVIEWERS",
        value_delimiter = ','
    )]
    reviewers: Vec<String>,

    /// Merge method: squash, merge, or rebase
    #[arg(long, default_value = "squash")]
    merge_method: String,

    /// Register PRs for platform auto-merge instead of merging now
    #[arg(long)]
    auto_merge: bool,

    /// Seconds to wait for check runs to settle
    #[arg(long, default_value_t = 1800)]
    check_timeout_secs: u64,

    /// Seconds between check-run polls
    #[arg(long, default_value_t = 30)]
    poll_interval_secs: u64,

    /// GitHub Enterprise host (defaults to github.com)
    #[arg(long)]
    host: Option<String>,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<Config> {
        let (owner, repo) = Config::parse_repo_slug(&self.repo)?;
        let mut config = Config::new(owner, repo, self.token)?;

        config.base_branch = self.base_branch;
        if let Some(ref pattern) = self.title_pattern {
            config.title_pattern = compile_title_pattern(pattern)?;
        }
        config.reviewers = self
            .reviewers
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| ReviewerSpec::parse(s))
            .collect();
        config.merge_method = self.merge_method.parse::<MergeMethod>()?;
        config.merge_policy = if self.auto_merge {
            MergePolicy::RegisterAutoMerge
        } else {
            MergePolicy::ForceNow
        };
        config.check_timeout = Duration::from_secs(self.check_timeout_secs);
        config.poll_interval = Duration::from_secs(self.poll_interval_secs);
        config.host = self.host;

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = cli.into_config()?;

    tracing::info!(
        repo = format!("{}/{}", config.owner, config.repo),
        base_branch = %config.base_branch,
        method = %config.merge_method,
        "starting merge orchestrator"
    );

    let platform = GitHubClient::new(
        &config.token,
        config.owner.clone(),
        config.repo.clone(),
        config.host.clone(),
    )?;

    let orchestrator = Orchestrator::new(Arc::new(platform), config);
    let summary = orchestrator.run().await?;

    report::print_summary(&summary);

    // Escalations do not fail the process; only an unrecovered transport
    // error (the Err path above) produces a non-zero exit
    Ok(())
}
