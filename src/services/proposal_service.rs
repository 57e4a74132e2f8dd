//! Proposal discovery
//!
//! Turns query parameters into a `Filter`, asks the repository for matching
//! proposals, projects them to DTOs and optionally enriches them with
//! quality metrics.

use std::collections::HashMap;

use crate::error::{AppError, Result};
use crate::filter::Filter;
use crate::models::{ProposalDto, ProposalsResponse};
use crate::services::quality_service;
use crate::state::AppState;

pub const PROVIDER_ID: &str = "provider_id";
pub const SERVICE_TYPE: &str = "service_type";
pub const ACCESS_POLICY_ID: &str = "access_policy_id";
pub const ACCESS_POLICY_SOURCE: &str = "access_policy_source";
pub const UPPER_TIME_PRICE_BOUND: &str = "upper_time_price_bound";
pub const LOWER_TIME_PRICE_BOUND: &str = "lower_time_price_bound";
pub const UPPER_GB_PRICE_BOUND: &str = "upper_gb_price_bound";
pub const LOWER_GB_PRICE_BOUND: &str = "lower_gb_price_bound";
pub const FETCH_CONNECT_COUNTS: &str = "fetch_connect_counts";

/// A parsed `GET /proposals` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalQuery {
    pub filter: Filter,
    /// Enrich the result with connection counts
    pub fetch_connect_counts: bool,
}

/// Collapse raw query pairs to one value per key; the first occurrence wins.
pub fn first_values(pairs: Vec<(String, String)>) -> HashMap<String, String> {
    let mut params = HashMap::with_capacity(pairs.len());
    for (key, value) in pairs {
        params.entry(key).or_insert(value);
    }
    params
}

/// Build a query from raw request parameters.
///
/// Fails on the first malformed price bound; no partial filter is produced.
pub fn parse_proposal_query(params: &HashMap<String, String>) -> Result<ProposalQuery> {
    let upper_time_price_bound = parse_price_bound(params, UPPER_TIME_PRICE_BOUND)?;
    let lower_time_price_bound = parse_price_bound(params, LOWER_TIME_PRICE_BOUND)?;
    let upper_gb_price_bound = parse_price_bound(params, UPPER_GB_PRICE_BOUND)?;
    let lower_gb_price_bound = parse_price_bound(params, LOWER_GB_PRICE_BOUND)?;

    let filter = Filter {
        provider_id: param(params, PROVIDER_ID),
        service_type: param(params, SERVICE_TYPE),
        access_policy_id: param(params, ACCESS_POLICY_ID),
        access_policy_source: param(params, ACCESS_POLICY_SOURCE),
        lower_time_price_bound,
        upper_time_price_bound,
        lower_gb_price_bound,
        upper_gb_price_bound,
        // Consumers never see service types they cannot connect to.
        exclude_unsupported: true,
    };

    Ok(ProposalQuery {
        filter,
        fetch_connect_counts: params
            .get(FETCH_CONNECT_COUNTS)
            .is_some_and(|v| v == "true"),
    })
}

fn param(params: &HashMap<String, String>, key: &str) -> String {
    params.get(key).cloned().unwrap_or_default()
}

/// Parse an optional base-10 `u64` bound; empty or missing means unbounded
pub fn parse_price_bound(params: &HashMap<String, String>, key: &str) -> Result<Option<u64>> {
    let bound = match params.get(key) {
        Some(bound) if !bound.is_empty() => bound,
        _ => return Ok(None),
    };

    // `u64::from_str` tolerates a leading '+', plain digits only here.
    if !bound.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::invalid_argument(
            key,
            format!("'{}' is not an unsigned integer", bound),
        ));
    }

    bound
        .parse::<u64>()
        .map(Some)
        .map_err(|e| AppError::invalid_argument(key, e))
}

/// Run a discovery query against the state's collaborators.
///
/// Exactly one repository call is made; the quality finder is consulted
/// afterwards, and only when connect counts were requested.
pub async fn list_proposals(
    app_state: &AppState,
    query: &ProposalQuery,
) -> Result<ProposalsResponse> {
    let proposals = app_state
        .proposal_repository
        .proposals(&query.filter)
        .await
        .map_err(|e| AppError::Upstream(format!("{:#}", e)))?;

    let mut proposals: Vec<ProposalDto> = proposals.iter().map(ProposalDto::from).collect();

    if query.fetch_connect_counts {
        let metrics = app_state.quality_finder.proposals_metrics().await;
        tracing::debug!(
            proposals = proposals.len(),
            metrics = metrics.len(),
            "Correlating quality metrics"
        );
        quality_service::add_proposal_metrics(&mut proposals, &metrics);
    }

    Ok(ProposalsResponse { proposals })
}
