//! pr-automerge - automated merge orchestrator for cherry-pick PRs
//!
//! Given the open pull requests of one GitHub repository, decide which
//! are eligible for automatic merging, wait for their CI check runs to
//! settle, perform the merge with a bounded conflict retry, and request
//! human review whenever automation cannot proceed.
//!
//! The crate separates the pure decision logic ([`filter`]) from the
//! effectful pieces ([`monitor`], [`executor`], [`escalate`]) behind the
//! [`platform::PlatformClient`] I/O boundary, with [`orchestrator`]
//! driving each PR to a terminal disposition.

pub mod config;
pub mod error;
pub mod escalate;
pub mod executor;
pub mod filter;
pub mod monitor;
pub mod orchestrator;
pub mod platform;
pub mod types;
