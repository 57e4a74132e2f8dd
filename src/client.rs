//! Consumer-side client for the discovery endpoint

use serde::Serialize;
use thiserror::Error;

use crate::infrastructure::http_client;
use crate::models::{ErrorMessage, ProposalDto, ProposalsResponse};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx answer, carrying the server's error body when it had one
    #[error("discovery returned {status}: {message}")]
    Status { status: u16, code: String, message: String },
}

/// Query parameters of `GET /proposals`; unset fields are not sent
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListProposalsParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_policy_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_policy_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_time_price_bound: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_time_price_bound: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_gb_price_bound: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_gb_price_bound: Option<u64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub fetch_connect_counts: bool,
}

pub struct DiscoveryClient {
    base_url: String,
}

impl DiscoveryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn proposals(
        &self,
        params: &ListProposalsParams,
    ) -> Result<Vec<ProposalDto>, ClientError> {
        let url = format!("{}/proposals", self.base_url);
        let response = http_client::get_with_query(&url, params).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.json::<ErrorMessage>().await.ok();
            let (code, message) = match body {
                Some(body) => (body.code, body.message),
                None => (String::new(), status.to_string()),
            };
            return Err(ClientError::Status {
                status: status.as_u16(),
                code,
                message,
            });
        }

        Ok(response.json::<ProposalsResponse>().await?.proposals)
    }

    pub async fn proposals_by_type(
        &self,
        service_type: &str,
    ) -> Result<Vec<ProposalDto>, ClientError> {
        self.proposals(&ListProposalsParams {
            service_type: Some(service_type.to_string()),
            ..Default::default()
        })
        .await
    }
}
