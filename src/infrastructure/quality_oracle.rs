//! Remote quality oracle client
//!
//! Fetches connection metrics for all proposals from an HTTP endpoint that
//! answers with a JSON array of metric records.

use async_trait::async_trait;

use crate::infrastructure::http_client;
use crate::models::ConnectMetric;
use crate::traits::QualityFinder;

pub struct OracleQualityFinder {
    url: String,
}

impl OracleQualityFinder {
    pub fn new(url: String) -> Self {
        Self { url }
    }

    async fn fetch(&self) -> Result<Vec<ConnectMetric>, String> {
        let response = http_client::get(&self.url)
            .await
            .map_err(|e| format!("HTTP request failed: {}", e))?;
        let response = response
            .error_for_status()
            .map_err(|e| format!("Oracle responded with error: {}", e))?;
        response
            .json::<Vec<ConnectMetric>>()
            .await
            .map_err(|e| format!("JSON parsing failed: {}", e))
    }
}

#[async_trait]
impl QualityFinder for OracleQualityFinder {
    async fn proposals_metrics(&self) -> Vec<ConnectMetric> {
        match self.fetch().await {
            Ok(metrics) => metrics,
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "Quality oracle unavailable");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_oracle_yields_no_metrics() {
        // Port 9 (discard) on loopback is not expected to serve HTTP.
        let finder = OracleQualityFinder::new("http://127.0.0.1:9/metrics".to_string());
        assert!(finder.proposals_metrics().await.is_empty());
    }
}
