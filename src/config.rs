//! Application configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{AppError, Result};
use crate::filter::SupportedServiceTypes;

/// Where proposals (and, by default, their metrics) are read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryBackend {
    Redis,
    Memory,
}

impl FromStr for RepositoryBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(RepositoryBackend::Redis),
            "memory" => Ok(RepositoryBackend::Memory),
            other => Err(AppError::Config(format!(
                "unknown REPOSITORY_BACKEND '{}', expected 'redis' or 'memory'",
                other
            ))),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (host:port)
    pub bind_address: SocketAddr,

    /// Proposal source
    pub repository_backend: RepositoryBackend,

    /// Redis connection URL (redis backend)
    pub redis_url: String,

    /// Redis hash holding one proposal JSON document per field
    pub proposals_key: String,

    /// Redis string holding the JSON array of quality metrics
    pub metrics_key: String,

    /// Seed file with proposals and metrics (memory backend)
    pub seed_file: Option<PathBuf>,

    /// Remote quality oracle; overrides the backend's own metrics source
    pub quality_oracle_url: Option<String>,

    /// Service types this node can consume
    pub supported_service_types: SupportedServiceTypes,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:4050".into());
        let bind_address = bind_address
            .parse::<SocketAddr>()
            .map_err(|e| {
                AppError::Config(format!("invalid BIND_ADDRESS '{}': {}", bind_address, e))
            })?;

        let repository_backend = env::var("REPOSITORY_BACKEND")
            .unwrap_or_else(|_| "redis".into())
            .parse::<RepositoryBackend>()?;

        let seed_file = env::var("SEED_FILE").ok().map(PathBuf::from);
        if repository_backend == RepositoryBackend::Memory && seed_file.is_none() {
            return Err(AppError::Config(
                "SEED_FILE must be set when REPOSITORY_BACKEND=memory".into(),
            ));
        }

        let supported_service_types = match env::var("SUPPORTED_SERVICE_TYPES") {
            Ok(list) => SupportedServiceTypes::parse(&list),
            Err(_) => SupportedServiceTypes::default(),
        };

        Ok(Self {
            bind_address,
            repository_backend,
            redis_url: env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into()),
            proposals_key: env::var("PROPOSALS_KEY")
                .unwrap_or_else(|_| "discovery:proposals".into()),
            metrics_key: env::var("METRICS_KEY")
                .unwrap_or_else(|_| "discovery:quality:metrics".into()),
            seed_file,
            quality_oracle_url: env::var("QUALITY_ORACLE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            supported_service_types,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_backend_parse() {
        assert_eq!("redis".parse::<RepositoryBackend>().unwrap(), RepositoryBackend::Redis);
        assert_eq!(" Memory ".parse::<RepositoryBackend>().unwrap(), RepositoryBackend::Memory);
        assert!(matches!(
            "postgres".parse::<RepositoryBackend>(),
            Err(AppError::Config(_))
        ));
    }
}
