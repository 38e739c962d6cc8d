use async_trait::async_trait;
use chrono::Utc;
use reqwest::Url;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::core::config::ProviderConfig;
use crate::core::error::{ConverterError, Result};
use crate::core::rates::{RateProvider, RateTable};
use crate::providers::util::with_retry;

/// Fetches whole rate tables from an exchangerate-api style endpoint, i.e.
/// `GET {base_url}/{BASE}` or `GET {base_url}?{base_param}={BASE}` returning
/// `{"rates": {...}}`.
pub struct ExchangeRateApiProvider {
    base_url: String,
    base_param: Option<String>,
    access_key: Option<(String, String)>,
    retries: usize,
    retry_delay_ms: u64,
    timeout: Option<Duration>,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            base_param: None,
            access_key: None,
            retries: 0,
            retry_delay_ms: 0,
            timeout: None,
        }
    }

    /// Builds a provider from configuration. Fails before any request is made
    /// when a configured access key cannot be resolved.
    pub fn from_config(config: &ProviderConfig) -> Result<Self> {
        let access_key = config.resolve_access_key()?;
        Ok(ExchangeRateApiProvider {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            base_param: config.base_param.clone(),
            access_key,
            retries: config.retries,
            retry_delay_ms: config.retry_delay_ms,
            timeout: config.timeout_secs.map(Duration::from_secs),
        })
    }

    pub fn with_base_param(mut self, param: &str) -> Self {
        self.base_param = Some(param.to_string());
        self
    }

    pub fn with_access_key(mut self, param: &str, key: &str) -> Self {
        self.access_key = Some((param.to_string(), key.to_string()));
        self
    }

    pub fn with_retries(mut self, retries: usize, delay_ms: u64) -> Self {
        self.retries = retries;
        self.retry_delay_ms = delay_ms;
        self
    }

    /// Endpoint for `base`, without the access key so it is safe to log.
    fn endpoint(&self, base: &str) -> String {
        match &self.base_param {
            Some(_) => self.base_url.clone(),
            None => format!("{}/{}", self.base_url, base),
        }
    }

    fn request_url(&self, base: &str) -> std::result::Result<Url, String> {
        let endpoint = self.endpoint(base);
        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(param) = &self.base_param {
            params.push((param.as_str(), base));
        }
        if let Some((param, key)) = &self.access_key {
            params.push((param.as_str(), key.as_str()));
        }

        let url = if params.is_empty() {
            Url::parse(&endpoint)
        } else {
            Url::parse_with_params(&endpoint, &params)
        };
        url.map_err(|e| format!("Invalid endpoint {endpoint}: {e}"))
    }
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    #[serde(default, alias = "base_code")]
    base: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    rates: Option<HashMap<String, f64>>,
    #[serde(default, alias = "error-type")]
    error: Option<serde_json::Value>,
}

fn fetch_error(base: &str, e: &reqwest::Error) -> ConverterError {
    let reason = match e.status() {
        Some(status) => format!("HTTP error: {status}"),
        None => format!("Request error: {e}"),
    };
    ConverterError::Fetch {
        base: base.to_string(),
        reason,
    }
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    #[instrument(name = "RateFetch", skip(self), fields(base = %base))]
    async fn fetch_rates(&self, base: &str) -> Result<RateTable> {
        let url = self.request_url(base).map_err(|reason| ConverterError::Fetch {
            base: base.to_string(),
            reason,
        })?;
        debug!("Requesting rates from {}", self.endpoint(base));

        let mut builder = reqwest::Client::builder().user_agent("fxtable/1.0");
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| fetch_error(base, &e))?;

        let client = &client;
        let url = &url;
        let response = with_retry(
            || async move { client.get(url.clone()).send().await?.error_for_status() },
            self.retries,
            self.retry_delay_ms,
        )
        .await
        .map_err(|e| fetch_error(base, &e))?;

        debug!(status = %response.status(), "Received rate response");

        let text = response.text().await.map_err(|e| fetch_error(base, &e))?;

        let data: RatesResponse =
            serde_json::from_str(&text).map_err(|e| ConverterError::MalformedResponse {
                base: base.to_string(),
                reason: format!("Failed to parse JSON response: {e}"),
            })?;

        let Some(rates) = data.rates else {
            let reason = match data.error {
                Some(error) => format!("missing `rates` field (upstream error: {error})"),
                None => "missing `rates` field".to_string(),
            };
            return Err(ConverterError::MalformedResponse {
                base: base.to_string(),
                reason,
            });
        };

        let reference = match data.base {
            Some(reported)
                if !reported.trim().is_empty() && !reported.eq_ignore_ascii_case(base) =>
            {
                warn!(
                    requested = base,
                    reported = %reported,
                    "Upstream quoted rates against a different base"
                );
                reported
            }
            _ => base.to_string(),
        };

        debug!(currencies = rates.len(), "Parsed rate table");
        Ok(RateTable::new(&reference, rates)
            .with_date(data.date)
            .with_fetched_at(Utc::now()))
    }
}
