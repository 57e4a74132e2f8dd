//! Application state management
//!
//! This module defines the application state shared by all handlers. It holds
//! the two discovery collaborators and nothing mutable: every request works on
//! its own filter, DTO list and metrics index.

use chrono::{DateTime, Utc};
use redis::aio::ConnectionManager;
use std::sync::Arc;

use crate::config::{Config, RepositoryBackend};
use crate::error::{AppError, Result};
use crate::infrastructure::memory::{InMemoryProposalRepository, SeedData, StaticQualityFinder};
use crate::infrastructure::quality_oracle::OracleQualityFinder;
use crate::infrastructure::redis_client::{RedisProposalRepository, RedisQualityFinder};
use crate::traits::{SharedProposalRepository, SharedQualityFinder};

/// Global application state
///
/// Cheaply cloneable: collaborators sit behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Source of proposals
    pub proposal_repository: SharedProposalRepository,

    /// Source of connection-quality metrics
    pub quality_finder: SharedQualityFinder,

    /// Process start, reported by the healthcheck
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        proposal_repository: SharedProposalRepository,
        quality_finder: SharedQualityFinder,
    ) -> Self {
        Self {
            proposal_repository,
            quality_finder,
            started_at: Utc::now(),
        }
    }

    /// Wire the collaborators selected by the configuration
    pub async fn from_config(config: &Config) -> Result<Self> {
        let (repository, backend_finder): (SharedProposalRepository, SharedQualityFinder) =
            match config.repository_backend {
                RepositoryBackend::Redis => {
                    let client = redis::Client::open(config.redis_url.as_str())?;
                    let conn = ConnectionManager::new(client).await?;
                    tracing::info!(redis_url = %config.redis_url, "Connected to Redis");
                    let repository: SharedProposalRepository =
                        Arc::new(RedisProposalRepository::new(
                            conn.clone(),
                            config.proposals_key.clone(),
                            config.supported_service_types.clone(),
                        ));
                    let finder: SharedQualityFinder =
                        Arc::new(RedisQualityFinder::new(conn, config.metrics_key.clone()));
                    (repository, finder)
                }
                RepositoryBackend::Memory => {
                    let path = config
                        .seed_file
                        .as_ref()
                        .ok_or_else(|| AppError::Config("SEED_FILE not set".into()))?;
                    let seed = SeedData::load(path).await?;
                    tracing::info!(
                        seed_file = %path.display(),
                        proposals = seed.proposals.len(),
                        metrics = seed.metrics.len(),
                        "Loaded seed data"
                    );
                    let repository: SharedProposalRepository =
                        Arc::new(InMemoryProposalRepository::new(
                            seed.proposals,
                            config.supported_service_types.clone(),
                        ));
                    let finder: SharedQualityFinder =
                        Arc::new(StaticQualityFinder::new(seed.metrics));
                    (repository, finder)
                }
            };

        let quality_finder: SharedQualityFinder = match &config.quality_oracle_url {
            Some(url) => {
                tracing::info!(quality_oracle_url = %url, "Using remote quality oracle");
                Arc::new(OracleQualityFinder::new(url.clone())) as SharedQualityFinder
            }
            None => backend_finder,
        };

        Ok(Self::new(repository, quality_finder))
    }
}
