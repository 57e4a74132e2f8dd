//! Common test utilities for discovery integration tests
//!
//! - Proposal and metric builders
//! - Counting and failing repository fakes
//! - Router helpers driving requests with `tower::ServiceExt::oneshot`

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use serde_json::Value;
use tower::ServiceExt;

use proposal_discovery::filter::SupportedServiceTypes;
use proposal_discovery::infrastructure::memory::{InMemoryProposalRepository, StaticQualityFinder};
use proposal_discovery::{
    create_router, AppState, ConnectCount, ConnectMetric, Filter, Location, Money, PaymentMethod,
    PaymentRate, Proposal, ProposalId, ProposalRepository, ServiceDefinition,
};

pub fn proposal(provider: &str, service_type: &str) -> Proposal {
    Proposal {
        id: 1,
        provider_id: provider.to_string(),
        service_type: service_type.to_string(),
        service_definition: ServiceDefinition {
            location: Location {
                country: Some("e2e-land".to_string()),
                ..Default::default()
            },
        },
        payment_method: PaymentMethod {
            payment_type: "BYTES_TRANSFERRED_WITH_TIME".to_string(),
            price: Money {
                amount: Decimal::from(60u64),
                currency: "MYST".to_string(),
            },
            rate: PaymentRate {
                per_time: Duration::from_secs(3600),
                per_byte: 0,
            },
        },
        access_policies: None,
    }
}

pub fn metric(provider: &str, service_type: &str, success: u64) -> ConnectMetric {
    ConnectMetric {
        proposal_id: ProposalId {
            provider_id: provider.to_string(),
            service_type: service_type.to_string(),
        },
        connect_count: ConnectCount {
            success,
            fail: 0,
            timeout: 0,
        },
    }
}

/// Wraps a repository and counts how often it is consulted
pub struct CountingRepository {
    inner: InMemoryProposalRepository,
    pub calls: AtomicUsize,
}

impl CountingRepository {
    pub fn new(proposals: Vec<Proposal>) -> Self {
        Self {
            inner: InMemoryProposalRepository::new(proposals, SupportedServiceTypes::default()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProposalRepository for CountingRepository {
    async fn proposals(&self, filter: &Filter) -> anyhow::Result<Vec<Proposal>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.proposals(filter).await
    }
}

pub struct FailingRepository;

#[async_trait]
impl ProposalRepository for FailingRepository {
    async fn proposals(&self, _filter: &Filter) -> anyhow::Result<Vec<Proposal>> {
        Err(anyhow::anyhow!("connection to proposal store at 10.0.0.7 refused"))
    }
}

pub fn app_with(repository: Arc<dyn ProposalRepository>, metrics: Vec<ConnectMetric>) -> Router {
    create_router(AppState::new(
        repository,
        Arc::new(StaticQualityFinder::new(metrics)),
    ))
}

pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}
