//! In-memory collaborators
//!
//! Serve a fixed snapshot of proposals and metrics. Used by the `memory`
//! backend (loaded from a seed file) and as deterministic fakes in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;
use crate::filter::{sort_proposals, Filter, SupportedServiceTypes};
use crate::models::{ConnectMetric, Proposal};
use crate::traits::{ProposalRepository, QualityFinder};

/// Seed file contents: `{ "proposals": [...], "metrics": [...] }`
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub proposals: Vec<Proposal>,
    #[serde(default)]
    pub metrics: Vec<ConnectMetric>,
}

impl SeedData {
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read(path).await?;
        Ok(serde_json::from_slice(&raw)?)
    }
}

pub struct InMemoryProposalRepository {
    proposals: Vec<Proposal>,
    supported: SupportedServiceTypes,
}

impl InMemoryProposalRepository {
    pub fn new(mut proposals: Vec<Proposal>, supported: SupportedServiceTypes) -> Self {
        sort_proposals(&mut proposals);
        Self {
            proposals,
            supported,
        }
    }
}

#[async_trait]
impl ProposalRepository for InMemoryProposalRepository {
    async fn proposals(&self, filter: &Filter) -> anyhow::Result<Vec<Proposal>> {
        Ok(self
            .proposals
            .iter()
            .filter(|p| filter.matches(p, &self.supported))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct StaticQualityFinder {
    metrics: Vec<ConnectMetric>,
}

impl StaticQualityFinder {
    pub fn new(metrics: Vec<ConnectMetric>) -> Self {
        Self { metrics }
    }
}

#[async_trait]
impl QualityFinder for StaticQualityFinder {
    async fn proposals_metrics(&self) -> Vec<ConnectMetric> {
        self.metrics.clone()
    }
}
