//! Infrastructure layer
//!
//! This module contains all external dependencies and infrastructure concerns.
//! It provides the concrete proposal repositories and quality finders backed
//! by Redis, a remote quality oracle, or an in-memory snapshot.

pub mod http_client;
pub mod memory;
pub mod quality_oracle;
pub mod redis_client;
