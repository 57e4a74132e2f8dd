//! Redis-backed collaborators
//!
//! Proposals live in a hash, one JSON document per field; quality metrics
//! live in a single string key holding a JSON array. Both are snapshots
//! written by other systems and only read here.

use anyhow::Context;
use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands};

use crate::filter::{sort_proposals, Filter, SupportedServiceTypes};
use crate::models::{ConnectMetric, Proposal};
use crate::traits::{ProposalRepository, QualityFinder};

pub struct RedisProposalRepository {
    conn: ConnectionManager,
    key: String,
    supported: SupportedServiceTypes,
}

impl RedisProposalRepository {
    pub fn new(conn: ConnectionManager, key: String, supported: SupportedServiceTypes) -> Self {
        Self {
            conn,
            key,
            supported,
        }
    }
}

#[async_trait]
impl ProposalRepository for RedisProposalRepository {
    async fn proposals(&self, filter: &Filter) -> anyhow::Result<Vec<Proposal>> {
        let mut con = self.conn.clone();
        let documents: Vec<String> = con
            .hvals(&self.key)
            .await
            .with_context(|| format!("reading proposals from {}", self.key))?;

        decode_proposals(&self.key, &documents, filter, &self.supported)
    }
}

pub struct RedisQualityFinder {
    conn: ConnectionManager,
    key: String,
}

impl RedisQualityFinder {
    pub fn new(conn: ConnectionManager, key: String) -> Self {
        Self { conn, key }
    }
}

#[async_trait]
impl QualityFinder for RedisQualityFinder {
    async fn proposals_metrics(&self) -> Vec<ConnectMetric> {
        let mut con = self.conn.clone();
        let raw: Result<Option<String>, redis::RedisError> = con.get(&self.key).await;

        match raw {
            Ok(raw) => decode_metrics(&self.key, raw.as_deref()),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to read quality metrics");
                Vec::new()
            }
        }
    }
}

/// Decode and filter a proposal snapshot. One corrupt document fails the
/// whole read: callers never see a partial result.
pub fn decode_proposals(
    key: &str,
    documents: &[String],
    filter: &Filter,
    supported: &SupportedServiceTypes,
) -> anyhow::Result<Vec<Proposal>> {
    let mut proposals = Vec::with_capacity(documents.len());
    for (index, document) in documents.iter().enumerate() {
        let proposal = serde_json::from_str::<Proposal>(document)
            .with_context(|| format!("decoding proposal #{} from {}", index, key))?;
        if filter.matches(&proposal, supported) {
            proposals.push(proposal);
        }
    }

    sort_proposals(&mut proposals);
    Ok(proposals)
}

/// Decode the metrics snapshot; a missing or corrupt value yields no metrics.
pub fn decode_metrics(key: &str, raw: Option<&str>) -> Vec<ConnectMetric> {
    let Some(json) = raw else {
        return Vec::new();
    };
    serde_json::from_str(json).unwrap_or_else(|e| {
        tracing::warn!(key = %key, error = %e, "Undecodable quality metrics");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "discovery:proposals";

    fn document(provider: &str, service_type: &str) -> String {
        serde_json::json!({
            "id": 1,
            "provider_id": provider,
            "service_type": service_type,
            "payment_method": {
                "type": "PER_TIME",
                "price": { "amount": 10, "currency": "MYST" },
                "rate": { "per_time": 3_600_000_000_000u64, "per_byte": 0 }
            }
        })
        .to_string()
    }

    #[test]
    fn test_decode_proposals_filters_and_sorts() {
        let documents = vec![
            document("0xP2", "openvpn"),
            document("0xP1", "wireguard"),
            document("0xP1", "openvpn"),
        ];
        let filter = Filter {
            service_type: "openvpn".to_string(),
            ..Default::default()
        };

        let proposals =
            decode_proposals(KEY, &documents, &filter, &SupportedServiceTypes::default()).unwrap();

        let providers: Vec<_> = proposals.iter().map(|p| p.provider_id.as_str()).collect();
        assert_eq!(providers, vec!["0xP1", "0xP2"]);
    }

    #[test]
    fn test_corrupt_document_fails_whole_read() {
        let documents = vec!["{bad".to_string(), document("0xP1", "openvpn")];

        let err = decode_proposals(
            KEY,
            &documents,
            &Filter::default(),
            &SupportedServiceTypes::default(),
        )
        .unwrap_err();

        assert!(format!("{:#}", err).contains(KEY));
    }

    #[test]
    fn test_corrupt_document_fails_even_when_filtered_out() {
        let documents = vec![document("0xP1", "openvpn"), "null".to_string()];
        let filter = Filter {
            provider_id: "0xNobody".to_string(),
            ..Default::default()
        };

        let result =
            decode_proposals(KEY, &documents, &filter, &SupportedServiceTypes::default());

        assert!(result.is_err());
    }

    #[test]
    fn test_decode_metrics() {
        let raw = r#"[{
            "proposal_id": { "provider_id": "0xP1", "service_type": "openvpn" },
            "connect_count": { "success": 5, "fail": 1, "timeout": 0 }
        }]"#;

        let metrics = decode_metrics(KEY, Some(raw));
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].connect_count.success, 5);
    }

    #[test]
    fn test_missing_or_corrupt_metrics_are_empty() {
        assert!(decode_metrics(KEY, None).is_empty());
        assert!(decode_metrics(KEY, Some("{not json")).is_empty());
    }
}
