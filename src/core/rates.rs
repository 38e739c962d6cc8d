//! Rate table type and the provider abstraction that fills it.

use crate::core::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Rates keyed by currency code, all relative to a single reference currency.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    reference: String,
    rates: HashMap<String, f64>,
    date: Option<String>,
    fetched_at: Option<DateTime<Utc>>,
}

impl RateTable {
    /// An empty table, as held before the first successful fetch.
    pub fn empty(reference: &str) -> Self {
        RateTable {
            reference: reference.to_uppercase(),
            rates: HashMap::new(),
            date: None,
            fetched_at: None,
        }
    }

    pub fn new(reference: &str, rates: HashMap<String, f64>) -> Self {
        let rates = rates
            .into_iter()
            .map(|(code, rate)| (code.to_uppercase(), rate))
            .collect();
        RateTable {
            reference: reference.to_uppercase(),
            rates,
            date: None,
            fetched_at: None,
        }
    }

    pub fn with_date(mut self, date: Option<String>) -> Self {
        self.date = date;
        self
    }

    pub fn with_fetched_at(mut self, fetched_at: DateTime<Utc>) -> Self {
        self.fetched_at = Some(fetched_at);
        self
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Date reported by the upstream service, if any.
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Rate of `code` relative to the reference currency. Once the table is
    /// populated the reference currency always resolves to 1.0.
    pub fn rate(&self, code: &str) -> Option<f64> {
        match self.rates.get(code) {
            Some(rate) => Some(*rate),
            None if code == self.reference && !self.rates.is_empty() => Some(1.0),
            None => None,
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.rate(code).is_some()
    }

    /// Currency codes in the table, including the reference currency.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        let reference = (!self.rates.is_empty() && !self.rates.contains_key(&self.reference))
            .then_some(self.reference());
        self.rates.keys().map(String::as_str).chain(reference)
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches a complete table of rates relative to `base`.
    async fn fetch_rates(&self, base: &str) -> Result<RateTable>;
}
