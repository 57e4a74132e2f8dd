//! Collaborator seams
//!
//! The discovery core talks to two external systems: the proposal repository
//! and the quality oracle. Both are shared across concurrent requests, so
//! implementations must be `Send + Sync`.

use async_trait::async_trait;
use std::sync::Arc;

use crate::filter::Filter;
use crate::models::{ConnectMetric, Proposal};

/// Source of proposals matching a filter.
///
/// Errors are opaque to the caller; the endpoint reports them as an
/// internal failure and never returns partial results.
#[async_trait]
pub trait ProposalRepository: Send + Sync {
    async fn proposals(&self, filter: &Filter) -> anyhow::Result<Vec<Proposal>>;
}

/// Source of connection-quality metrics for all known proposals.
///
/// Infallible by contract: implementations log their own failures and
/// return an empty list.
#[async_trait]
pub trait QualityFinder: Send + Sync {
    async fn proposals_metrics(&self) -> Vec<ConnectMetric>;
}

pub type SharedProposalRepository = Arc<dyn ProposalRepository>;
pub type SharedQualityFinder = Arc<dyn QualityFinder>;
