//! Domain models and data structures
//!
//! This module contains the proposal and quality types read from the
//! collaborators, plus the wire DTOs served by the discovery endpoint.
//! These are "pure" data structures; the only logic here is the
//! proposal-to-DTO projection.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Geographic and network origin of a provider's service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Autonomous System Number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asn: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isp: Option<String>,
    /// Node classification, e.g. "residential" or "hosting"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
}

/// Qualitative service definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceDefinition {
    #[serde(default)]
    pub location: Location,
}

/// Amount in the smallest currency unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Money {
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    pub currency: String,
}

/// How often the price is charged: once per `per_time` of service and/or
/// once per `per_byte` of traffic. Zero means that dimension is not charged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentRate {
    #[serde(with = "duration_nanos", default)]
    pub per_time: Duration,
    #[serde(default)]
    pub per_byte: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    #[serde(rename = "type")]
    pub payment_type: String,
    pub price: Money,
    #[serde(default)]
    pub rate: PaymentRate,
}

/// Restriction on which consumers may use a proposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    pub id: String,
    pub source: String,
}

/// A provider's published service offer, as held by the repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    /// Per provider unique serial number
    pub id: i64,
    pub provider_id: String,
    /// Open set: "openvpn", "wireguard", "noop", ...
    pub service_type: String,
    #[serde(default)]
    pub service_definition: ServiceDefinition,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_policies: Option<Vec<AccessPolicy>>,
}

/// Join key shared by proposals and quality metrics
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProposalId {
    pub provider_id: String,
    pub service_type: String,
}

/// Connection attempt outcomes observed for a proposal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectCount {
    #[serde(default)]
    pub success: u64,
    #[serde(default)]
    pub fail: u64,
    #[serde(default)]
    pub timeout: u64,
}

/// Quality record for one proposal, sourced from the quality oracle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectMetric {
    pub proposal_id: ProposalId,
    pub connect_count: ConnectCount,
}

/// Wire location; strings are dropped when empty, `asn` is always sent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationDto {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub continent: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub country: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub city: String,
    #[serde(default)]
    pub asn: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub isp: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub node_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceDefinitionDto {
    pub location_originate: LocationDto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsDto {
    pub connect_count: ConnectCount,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRateDto {
    pub per_seconds: u64,
    pub per_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodDto {
    #[serde(rename = "type")]
    pub payment_type: String,
    pub price: Money,
    pub rate: PaymentRateDto,
}

/// Proposal as served by `GET /proposals`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposalDto {
    pub id: i64,
    pub provider_id: String,
    pub service_type: String,
    pub service_definition: ServiceDefinitionDto,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<MetricsDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_policies: Option<Vec<AccessPolicy>>,
    pub payment_method: PaymentMethodDto,
}

/// Response envelope; `proposals` is always an array
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProposalsResponse {
    pub proposals: Vec<ProposalDto>,
}

/// Liveness payload for `GET /healthcheck`
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthcheckResponse {
    pub status: String,
    pub version: String,
    pub uptime: String,
}

/// Error body written by `AppError`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
}

impl Proposal {
    pub fn proposal_id(&self) -> ProposalId {
        ProposalId {
            provider_id: self.provider_id.clone(),
            service_type: self.service_type.clone(),
        }
    }
}

impl From<&Proposal> for ProposalDto {
    fn from(p: &Proposal) -> Self {
        let location = &p.service_definition.location;
        let rate = &p.payment_method.rate;

        ProposalDto {
            id: p.id,
            provider_id: p.provider_id.clone(),
            service_type: p.service_type.clone(),
            service_definition: ServiceDefinitionDto {
                location_originate: LocationDto {
                    continent: location.continent.clone().unwrap_or_default(),
                    country: location.country.clone().unwrap_or_default(),
                    city: location.city.clone().unwrap_or_default(),
                    asn: location.asn.unwrap_or_default(),
                    isp: location.isp.clone().unwrap_or_default(),
                    node_type: location.node_type.clone().unwrap_or_default(),
                },
            },
            metrics: None,
            access_policies: p.access_policies.clone(),
            payment_method: PaymentMethodDto {
                payment_type: p.payment_method.payment_type.clone(),
                price: p.payment_method.price.clone(),
                rate: PaymentRateDto {
                    per_seconds: rate.per_time.as_secs(),
                    per_bytes: rate.per_byte,
                },
            },
        }
    }
}

/// Serde adapter storing a `Duration` as integer nanoseconds
mod duration_nanos {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let nanos = u64::try_from(value.as_nanos()).map_err(serde::ser::Error::custom)?;
        serializer.serialize_u64(nanos)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let nanos = u64::deserialize(deserializer)?;
        Ok(Duration::from_nanos(nanos))
    }
}
