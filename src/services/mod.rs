//! Business logic services
//!
//! This module contains all the business logic of the application.
//! Services orchestrate domain operations and coordinate with the
//! collaborators held in `AppState`.

pub mod proposal_service;
pub mod quality_service;
