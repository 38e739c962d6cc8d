//! Application state and the controller that mutates it in response to user
//! events.

use crate::core::config::AppConfig;
use crate::core::convert::{self, ConversionMode};
use crate::core::error::{ConverterError, Result};
use crate::core::options::populate_currency_options;
use crate::core::rates::{RateProvider, RateTable};
use crate::core::render::{RowRecord, TableScope, render_rows};
use crate::core::selection::SelectedCurrencies;
use tracing::{debug, error, info, instrument};

/// Everything the table is derived from.
#[derive(Debug, Clone)]
pub struct AppState {
    pub rates: RateTable,
    /// Ordered currency options derived from `rates`.
    pub options: Vec<String>,
    pub selected: SelectedCurrencies,
    pub base: String,
    pub amount: f64,
    pub mode: ConversionMode,
    pub scope: TableScope,
}

impl AppState {
    pub fn new(base: &str, mode: ConversionMode, scope: TableScope) -> Self {
        let base = base.trim().to_uppercase();
        AppState {
            rates: RateTable::empty(&base),
            options: Vec::new(),
            selected: SelectedCurrencies::new(),
            base,
            amount: 0.0,
            mode,
            scope,
        }
    }

    /// Swaps in a freshly fetched table together with its derived options.
    pub fn replace_rates(&mut self, rates: RateTable, preferred: &[String]) {
        let options = populate_currency_options(&rates, preferred);
        self.rates = rates;
        self.options = options;
    }
}

/// Settings a controller is created with.
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub base_currency: String,
    pub reference_currency: String,
    pub mode: ConversionMode,
    pub scope: TableScope,
    pub preferred_currencies: Vec<String>,
    pub currencies: Vec<String>,
    pub amount: f64,
}

impl From<&AppConfig> for ControllerSettings {
    fn from(config: &AppConfig) -> Self {
        ControllerSettings {
            base_currency: config.base_currency.clone(),
            reference_currency: config.reference_currency.clone(),
            mode: config.mode,
            scope: config.scope,
            preferred_currencies: config.preferred_currencies.clone(),
            currencies: config.currencies.clone(),
            amount: config.amount,
        }
    }
}

/// Identifies one fetch. Tickets are handed out in increasing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    base: String,
}

impl FetchTicket {
    pub fn base(&self) -> &str {
        &self.base
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The fetched table replaced the current one.
    Applied,
    /// A newer fetch was already applied, so this result was dropped.
    Stale,
}

pub struct Controller<P: RateProvider> {
    provider: P,
    state: AppState,
    rows: Vec<RowRecord>,
    preferred: Vec<String>,
    reference: String,
    next_seq: u64,
    last_applied: u64,
    renders: u64,
}

impl<P: RateProvider> Controller<P> {
    pub fn new(provider: P, settings: ControllerSettings) -> Self {
        let mut state = AppState::new(&settings.base_currency, settings.mode, settings.scope);
        state.amount = convert::sanitize_amount(settings.amount);
        state.selected = settings.currencies.iter().collect();

        let mut controller = Controller {
            provider,
            state,
            rows: Vec::new(),
            preferred: settings.preferred_currencies,
            reference: settings.reference_currency.trim().to_uppercase(),
            next_seq: 1,
            last_applied: 0,
            renders: 0,
        };
        controller.render_table();
        controller
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn rows(&self) -> &[RowRecord] {
        &self.rows
    }

    /// Currency options for the base and add-currency pickers.
    pub fn options(&self) -> &[String] {
        &self.state.options
    }

    /// Number of times the table has been rebuilt.
    pub fn render_count(&self) -> u64 {
        self.renders
    }

    /// Currency the next refresh is quoted against.
    pub fn fetch_base(&self) -> &str {
        match self.state.mode {
            ConversionMode::Direct => &self.state.base,
            ConversionMode::CrossRate => &self.reference,
        }
    }

    /// Reserves a ticket for a fetch against `base`, or the reference
    /// currency when none is given.
    pub fn begin_fetch(&mut self, base: Option<&str>) -> Result<FetchTicket> {
        let base = base
            .unwrap_or(&self.reference)
            .trim()
            .to_uppercase();
        if base.is_empty() {
            return Err(ConverterError::Fetch {
                base,
                reason: "currency code must not be empty".to_string(),
            });
        }

        let ticket = FetchTicket {
            seq: self.next_seq,
            base,
        };
        self.next_seq += 1;
        Ok(ticket)
    }

    /// Applies the result of the fetch identified by `ticket`.
    ///
    /// Failures leave the current table and rows untouched. Results older
    /// than the last applied fetch are dropped.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<RateTable>,
    ) -> Result<FetchOutcome> {
        if ticket.seq <= self.last_applied {
            debug!(
                seq = ticket.seq,
                last_applied = self.last_applied,
                base = %ticket.base,
                "Discarding stale rate response"
            );
            return Ok(FetchOutcome::Stale);
        }

        let rates = result.inspect_err(|e| {
            error!(base = %ticket.base, error = %e, "Rate fetch failed");
        })?;

        info!(
            base = %ticket.base,
            currencies = rates.len(),
            "Applying fetched rates"
        );
        self.last_applied = ticket.seq;
        if self.state.mode == ConversionMode::Direct {
            self.state.base = rates.reference().to_string();
        }
        self.state.replace_rates(rates, &self.preferred);
        self.render_table();
        Ok(FetchOutcome::Applied)
    }

    /// Fetches rates for `base` (or the reference currency) and applies them.
    #[instrument(name = "FetchRates", skip(self))]
    pub async fn fetch_rates(&mut self, base: Option<&str>) -> Result<FetchOutcome> {
        let ticket = self.begin_fetch(base)?;
        let result = self.provider.fetch_rates(ticket.base()).await;
        self.complete_fetch(ticket, result)
    }

    /// Re-fetches rates for the current base in direct mode, or the reference
    /// currency in cross-rate mode.
    pub async fn refresh(&mut self) -> Result<FetchOutcome> {
        let base = self.fetch_base().to_string();
        self.fetch_rates(Some(&base)).await
    }

    /// Changes the base currency. Direct mode needs rates quoted against the
    /// new base, so it re-fetches and only switches once the fetch succeeds.
    pub async fn set_base(&mut self, code: &str) -> Result<()> {
        let code = code.trim().to_uppercase();
        match self.state.mode {
            ConversionMode::Direct => {
                self.fetch_rates(Some(&code)).await?;
            }
            ConversionMode::CrossRate => {
                if code.is_empty() {
                    return Err(ConverterError::MissingRate(code));
                }
                self.state.base = code;
                self.render_table();
            }
        }
        Ok(())
    }

    pub fn set_amount(&mut self, amount: f64) {
        self.state.amount = convert::sanitize_amount(amount);
        self.render_table();
    }

    /// Takes raw user input; anything unparseable counts as zero.
    pub fn set_amount_input(&mut self, input: &str) {
        self.set_amount(convert::parse_amount(input));
    }

    pub fn add_currency(&mut self, code: &str) -> bool {
        let added = self.state.selected.add(code);
        if added {
            self.render_table();
        }
        added
    }

    pub fn remove_currency(&mut self, code: &str) -> bool {
        let removed = self.state.selected.remove(code);
        if removed {
            self.render_table();
        }
        removed
    }

    pub fn render_table(&mut self) -> &[RowRecord] {
        self.rows = render_rows(&self.state);
        self.renders += 1;
        &self.rows
    }
}
