//! HTTP request handlers
//!
//! This module contains all the HTTP endpoint handlers. Each handler is responsible
//! for extracting data from HTTP requests, calling the appropriate services, and
//! returning HTTP responses.

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;

use crate::error::Result;
use crate::models::*;
use crate::services::proposal_service;
use crate::state::AppState;

/// Liveness check with build version and uptime
pub async fn healthcheck(State(state): State<AppState>) -> Json<HealthcheckResponse> {
    let uptime = (Utc::now() - state.started_at).num_seconds().max(0);
    Json(HealthcheckResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: format!("{}s", uptime),
    })
}

/// List proposals matching the query
///
/// Query parameters (all optional):
/// - `provider_id`, `service_type`, `access_policy_id`, `access_policy_source`: exact match
/// - `upper_time_price_bound`, `lower_time_price_bound`: inclusive bounds on the hourly price
/// - `upper_gb_price_bound`, `lower_gb_price_bound`: inclusive bounds on the per-GiB price
/// - `fetch_connect_counts`: `true` attaches connection counts from the quality oracle
///
/// A repeated key is read from its first occurrence. Malformed bounds are
/// rejected with 400 before the repository is consulted; repository failures
/// surface as 500.
pub async fn list_proposals(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<ProposalsResponse>> {
    let params = proposal_service::first_values(pairs);
    let query = proposal_service::parse_proposal_query(&params)?;
    tracing::debug!(
        filter = ?query.filter,
        fetch_connect_counts = query.fetch_connect_counts,
        "Listing proposals"
    );

    let response = proposal_service::list_proposals(&state, &query).await?;
    Ok(Json(response))
}
