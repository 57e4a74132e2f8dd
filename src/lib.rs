//! Proposal Discovery Library
//!
//! This library provides the proposal discovery endpoint: query translation,
//! repository lookup, DTO projection and quality-metrics correlation. It can
//! be used independently of the main binary for testing or integration into
//! other applications.

pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod infrastructure;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod traits;

// Re-export commonly used types for convenience
pub use config::Config;
pub use error::{AppError, Result};
pub use filter::Filter;
pub use models::*;
pub use routes::create_router;
pub use state::AppState;
pub use traits::{ProposalRepository, QualityFinder};
