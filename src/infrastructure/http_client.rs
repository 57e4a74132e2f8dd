use std::time::Duration;

use once_cell::sync::Lazy;
use serde::Serialize;

static CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    build_client().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Falling back to a default HTTP client without timeouts");
        reqwest::Client::new()
    })
});

fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .pool_max_idle_per_host(16)
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(30))
        .build()
}

pub async fn get(url: &str) -> Result<reqwest::Response, reqwest::Error> {
    CLIENT.get(url).send().await
}

pub async fn get_with_query<Q: Serialize + ?Sized>(
    url: &str,
    query: &Q,
) -> Result<reqwest::Response, reqwest::Error> {
    CLIENT.get(url).query(query).send().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_client_builds() {
        assert!(build_client().is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_an_error() {
        // Port 9 on loopback is the discard service and normally closed.
        let result = get("http://127.0.0.1:9/proposals").await;
        assert!(result.is_err());
    }
}
