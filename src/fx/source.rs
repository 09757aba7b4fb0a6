//! Exchange rate sources
//!
//! The HTTP source queries the open.er-api.com "latest" endpoint with EUR as the
//! base currency. Failures never propagate out of [`RateSource`]: a failed fetch
//! yields an empty table and a failed lookup yields `None`, with the cause logged.

use super::table::ExchangeRateTable;
use crate::error::{FxError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

/// Default exchange rate service
pub const DEFAULT_RATES_BASE_URL: &str = "https://open.er-api.com";

/// Base currency all rates are expressed against
pub const DEFAULT_BASE_CURRENCY: &str = "EUR";

/// Default HTTP request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Trait for exchange rate sources
pub trait RateSource: Send + Sync {
    /// Fetch every known rate. Returns an empty table on failure.
    fn fetch_rates(&self) -> impl Future<Output = ExchangeRateTable> + Send;

    /// Fetch the rate for one currency code. Returns `None` when the code is
    /// missing from the response or the request fails.
    fn get_rate(&self, code: &str) -> impl Future<Output = Option<f64>> + Send;

    /// Get the source name
    fn name(&self) -> &str;
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(rename = "error-type", default)]
    error_type: Option<String>,
    #[serde(default)]
    rates: HashMap<String, f64>,
}

/// open.er-api.com rate source (no API key required)
#[derive(Debug, Clone)]
pub struct ErApiRateSource {
    client: Client,
    base_url: String,
    base_currency: String,
}

impl ErApiRateSource {
    /// Create a source for the public endpoint with EUR as base
    pub fn new() -> Result<Self> {
        Self::with_config(
            DEFAULT_RATES_BASE_URL,
            DEFAULT_BASE_CURRENCY,
            Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        )
    }

    /// Create with a custom base URL, base currency and optional timeout
    pub fn with_config(
        base_url: &str,
        base_currency: &str,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FxError::RateFetchError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            base_currency: base_currency.to_uppercase(),
        })
    }

    /// Full URL of the latest-rates endpoint
    pub fn endpoint(&self) -> String {
        format!("{}/v6/latest/{}", self.base_url, self.base_currency)
    }

    async fn request_rates(&self) -> Result<HashMap<String, f64>> {
        let url = self.endpoint();
        log::debug!("Requesting exchange rates from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FxError::RateFetchError(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(FxError::RateFetchError(format!(
                "Rate service returned status {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FxError::RateFetchError(format!("Failed to read response body: {}", e)))?;
        let parsed: LatestRatesResponse = serde_json::from_str(&body)?;

        if parsed.result.as_deref() == Some("error") {
            return Err(FxError::RateServiceError(
                parsed.error_type.unwrap_or_else(|| "unknown".to_string()),
            ));
        }

        Ok(parsed.rates)
    }
}

impl RateSource for ErApiRateSource {
    async fn fetch_rates(&self) -> ExchangeRateTable {
        match self.request_rates().await {
            Ok(rates) => {
                let table = ExchangeRateTable::from_rates(rates);
                log::info!(
                    "Fetched {} exchange rates relative to {}",
                    table.len(),
                    self.base_currency
                );
                table
            }
            Err(e) => {
                log::error!("Error fetching exchange rates: {}", e);
                ExchangeRateTable::empty()
            }
        }
    }

    async fn get_rate(&self, code: &str) -> Option<f64> {
        let code = code.to_uppercase();
        match self.request_rates().await {
            Ok(rates) => {
                // Same positive-rate rule as the full table
                let rate = ExchangeRateTable::from_rates(rates).get(&code);
                match rate {
                    Some(rate) => log::info!("Exchange rate for {}: {}", code, rate),
                    None => log::warn!("No exchange rate found for {}", code),
                }
                rate
            }
            Err(e) => {
                log::error!("Error fetching exchange rate for {}: {}", code, e);
                None
            }
        }
    }

    fn name(&self) -> &str {
        "open.er-api.com"
    }
}

/// Fixed in-memory rate source
#[derive(Debug, Clone, Default)]
pub struct StaticRateSource {
    table: ExchangeRateTable,
}

impl StaticRateSource {
    pub fn new(table: ExchangeRateTable) -> Self {
        Self { table }
    }
}

impl RateSource for StaticRateSource {
    async fn fetch_rates(&self) -> ExchangeRateTable {
        self.table.clone()
    }

    async fn get_rate(&self, code: &str) -> Option<f64> {
        let rate = self.table.get(&code.to_uppercase());
        if rate.is_none() {
            log::warn!("No exchange rate found for {}", code);
        }
        rate
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_er_api_source_creation() {
        let source = ErApiRateSource::new();
        assert!(source.is_ok());
        assert_eq!(
            source.unwrap().endpoint(),
            "https://open.er-api.com/v6/latest/EUR"
        );
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let source = ErApiRateSource::with_config("http://localhost:8080/", "eur", None).unwrap();
        assert_eq!(source.endpoint(), "http://localhost:8080/v6/latest/EUR");
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{"result":"success","base_code":"EUR","rates":{"EUR":1,"USD":1.12}}"#;
        let parsed: LatestRatesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.result.as_deref(), Some("success"));
        assert_eq!(parsed.rates.get("USD"), Some(&1.12));
        assert_eq!(parsed.rates.get("EUR"), Some(&1.0));
    }

    #[test]
    fn test_error_response_parsing() {
        let body = r#"{"result":"error","error-type":"unsupported-code"}"#;
        let parsed: LatestRatesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error_type.as_deref(), Some("unsupported-code"));
        assert!(parsed.rates.is_empty());
    }

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticRateSource::new(ExchangeRateTable::from_pairs([("USD", 1.1)]));
        assert_eq!(source.get_rate("usd").await, Some(1.1));
        assert_eq!(source.get_rate("ZZZ").await, None);
        assert_eq!(source.fetch_rates().await.len(), 1);
    }
}
