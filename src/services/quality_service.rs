//! Quality metrics correlation
//!
//! Attaches connection-quality counters to projected proposals by joining on
//! the `(provider_id, service_type)` pair.

use std::collections::HashMap;

use crate::models::{ConnectCount, ConnectMetric, MetricsDto, ProposalDto};

/// Attach metrics to every proposal that has a matching record.
///
/// Proposals without a record keep `metrics` unset: no data is not the same
/// as zero connections. Records for proposals outside the list are ignored.
/// When the same key appears twice, the later record wins.
pub fn add_proposal_metrics(proposals: &mut [ProposalDto], metrics: &[ConnectMetric]) {
    if metrics.is_empty() {
        return;
    }

    // Tuple keys keep ("ab", "c") and ("a", "bc") apart.
    let index: HashMap<(&str, &str), &ConnectCount> = metrics
        .iter()
        .map(|m| {
            (
                (
                    m.proposal_id.provider_id.as_str(),
                    m.proposal_id.service_type.as_str(),
                ),
                &m.connect_count,
            )
        })
        .collect();

    for proposal in proposals.iter_mut() {
        let key = (proposal.provider_id.as_str(), proposal.service_type.as_str());
        if let Some(count) = index.get(&key) {
            proposal.metrics = Some(MetricsDto {
                connect_count: **count,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Money, PaymentMethodDto, PaymentRateDto, ProposalId, ServiceDefinitionDto,
    };
    use rust_decimal::Decimal;

    fn dto(provider: &str, service_type: &str) -> ProposalDto {
        ProposalDto {
            id: 1,
            provider_id: provider.to_string(),
            service_type: service_type.to_string(),
            service_definition: ServiceDefinitionDto::default(),
            metrics: None,
            access_policies: None,
            payment_method: PaymentMethodDto {
                payment_type: "PER_TIME".to_string(),
                price: Money {
                    amount: Decimal::ZERO,
                    currency: "MYST".to_string(),
                },
                rate: PaymentRateDto::default(),
            },
        }
    }

    fn metric(provider: &str, service_type: &str, success: u64) -> ConnectMetric {
        ConnectMetric {
            proposal_id: ProposalId {
                provider_id: provider.to_string(),
                service_type: service_type.to_string(),
            },
            connect_count: ConnectCount {
                success,
                fail: 1,
                timeout: 2,
            },
        }
    }

    #[test]
    fn test_attaches_matching_metrics() {
        let mut proposals = vec![dto("0xP1", "openvpn"), dto("0xP1", "wireguard")];
        add_proposal_metrics(&mut proposals, &[metric("0xP1", "openvpn", 5)]);

        let attached = proposals[0].metrics.as_ref().unwrap();
        assert_eq!(attached.connect_count.success, 5);
        assert_eq!(attached.connect_count.fail, 1);
        assert_eq!(attached.connect_count.timeout, 2);
        assert!(proposals[1].metrics.is_none());
    }

    #[test]
    fn test_concatenation_collision_does_not_alias() {
        let mut proposals = vec![dto("a", "bc")];
        add_proposal_metrics(&mut proposals, &[metric("ab", "c", 9)]);
        assert!(proposals[0].metrics.is_none());
    }

    #[test]
    fn test_empty_metrics_leave_proposals_untouched() {
        let mut proposals = vec![dto("0xP1", "openvpn")];
        let before = proposals.clone();
        add_proposal_metrics(&mut proposals, &[]);
        assert_eq!(proposals, before);
    }

    #[test]
    fn test_unrelated_metrics_are_ignored() {
        let mut proposals = vec![dto("0xP1", "openvpn")];
        add_proposal_metrics(
            &mut proposals,
            &[metric("0xP9", "openvpn", 3), metric("0xP1", "noop", 4)],
        );
        assert!(proposals[0].metrics.is_none());
    }

    #[test]
    fn test_later_duplicate_wins() {
        let mut proposals = vec![dto("0xP1", "openvpn")];
        add_proposal_metrics(
            &mut proposals,
            &[metric("0xP1", "openvpn", 1), metric("0xP1", "openvpn", 8)],
        );
        assert_eq!(proposals[0].metrics.as_ref().unwrap().connect_count.success, 8);
    }
}
