//! Proposal filter model
//!
//! A `Filter` is built once per request by the query translator and handed
//! to the proposal repository. `Filter::matches` is the matching routine the
//! bundled repositories share.

use rust_decimal::Decimal;
use std::collections::BTreeSet;

use crate::models::Proposal;

const NANOS_PER_HOUR: u64 = 3_600 * 1_000_000_000;
const BYTES_PER_GIB: u64 = 1 << 30;

/// Constraints a consumer puts on the proposals it wants to see.
///
/// Empty strings mean "unconstrained"; an absent bound means "unbounded on
/// that side". Price bounds are inclusive and expressed in the smallest
/// currency unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub provider_id: String,
    pub service_type: String,
    pub access_policy_id: String,
    pub access_policy_source: String,
    pub lower_time_price_bound: Option<u64>,
    pub upper_time_price_bound: Option<u64>,
    pub lower_gb_price_bound: Option<u64>,
    pub upper_gb_price_bound: Option<u64>,
    /// Drop proposals for service types this node cannot use
    pub exclude_unsupported: bool,
}

/// Service types the local node is able to consume
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedServiceTypes(BTreeSet<String>);

impl SupportedServiceTypes {
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(types.into_iter().map(Into::into).collect())
    }

    /// Parse a comma separated list, ignoring blanks
    pub fn parse(list: &str) -> Self {
        Self::new(
            list.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty()),
        )
    }

    pub fn contains(&self, service_type: &str) -> bool {
        self.0.contains(service_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for SupportedServiceTypes {
    fn default() -> Self {
        Self::new(["openvpn", "wireguard", "noop"])
    }
}

impl Filter {
    pub fn matches(&self, proposal: &Proposal, supported: &SupportedServiceTypes) -> bool {
        if !self.provider_id.is_empty() && proposal.provider_id != self.provider_id {
            return false;
        }
        if !self.service_type.is_empty() && proposal.service_type != self.service_type {
            return false;
        }
        if self.exclude_unsupported && !supported.contains(&proposal.service_type) {
            return false;
        }
        if !self.matches_access_policy(proposal) {
            return false;
        }

        within_bounds(
            time_price(proposal),
            self.lower_time_price_bound,
            self.upper_time_price_bound,
        ) && within_bounds(
            gb_price(proposal),
            self.lower_gb_price_bound,
            self.upper_gb_price_bound,
        )
    }

    fn matches_access_policy(&self, proposal: &Proposal) -> bool {
        if self.access_policy_id.is_empty() && self.access_policy_source.is_empty() {
            return true;
        }

        let Some(policies) = &proposal.access_policies else {
            return false;
        };
        policies.iter().any(|policy| {
            (self.access_policy_id.is_empty() || policy.id == self.access_policy_id)
                && (self.access_policy_source.is_empty()
                    || policy.source == self.access_policy_source)
        })
    }
}

/// Order proposals by provider, service type and serial number
pub fn sort_proposals(proposals: &mut [Proposal]) {
    proposals.sort_by(|a, b| {
        (&a.provider_id, &a.service_type, a.id).cmp(&(&b.provider_id, &b.service_type, b.id))
    });
}

fn within_bounds(price: Decimal, lower: Option<u64>, upper: Option<u64>) -> bool {
    if let Some(lower) = lower {
        if price < Decimal::from(lower) {
            return false;
        }
    }
    if let Some(upper) = upper {
        if price > Decimal::from(upper) {
            return false;
        }
    }
    true
}

/// Price of one hour of service; zero when time is not charged
pub fn time_price(proposal: &Proposal) -> Decimal {
    let nanos = proposal.payment_method.rate.per_time.as_nanos();
    if nanos == 0 {
        return Decimal::ZERO;
    }
    normalize(
        proposal.payment_method.price.amount,
        Decimal::from(u64::try_from(nanos).unwrap_or(u64::MAX)),
        NANOS_PER_HOUR,
    )
}

/// Price of one GiB of traffic; zero when traffic is not charged
pub fn gb_price(proposal: &Proposal) -> Decimal {
    let per_byte = proposal.payment_method.rate.per_byte;
    if per_byte == 0 {
        return Decimal::ZERO;
    }
    normalize(
        proposal.payment_method.price.amount,
        Decimal::from(per_byte),
        BYTES_PER_GIB,
    )
}

// Multiplying first keeps the result exact; dividing first is the fallback
// for amounts that would overflow the 96-bit mantissa.
fn normalize(amount: Decimal, per: Decimal, unit: u64) -> Decimal {
    let unit = Decimal::from(unit);
    amount
        .checked_mul(unit)
        .and_then(|v| v.checked_div(per))
        .or_else(|| amount.checked_div(per).and_then(|v| v.checked_mul(unit)))
        .unwrap_or(Decimal::MAX)
}
