//! Derives the rows of the conversion table from application state.

use crate::core::controller::AppState;
use crate::core::convert::{self, ConversionMode};
use crate::core::error::ConverterError;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Which currencies appear as rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableScope {
    /// Only the currencies the user selected.
    #[default]
    Selected,
    /// Every currency in the rate table.
    All,
}

/// A single rendered row. Rows whose rate could not be resolved carry zeros
/// and `missing = true`.
#[derive(Debug, Clone, PartialEq)]
pub struct RowRecord {
    pub currency: String,
    pub rate: f64,
    pub converted: f64,
    pub missing: bool,
}

impl RowRecord {
    pub fn display_rate(&self) -> String {
        convert::format_rate(self.rate)
    }

    pub fn display_converted(&self) -> String {
        convert::format_amount(self.converted)
    }
}

/// Rebuilds every row from scratch. Calling this twice on unchanged state
/// yields identical rows.
pub fn render_rows(state: &AppState) -> Vec<RowRecord> {
    let currencies: Vec<&str> = match state.scope {
        TableScope::Selected => state.selected.iter().collect(),
        TableScope::All => state.options.iter().map(String::as_str).collect(),
    };

    let base = match state.mode {
        ConversionMode::Direct => state.rates.reference(),
        ConversionMode::CrossRate => state.base.as_str(),
    };

    currencies
        .into_iter()
        .map(|currency| {
            let converted = convert::effective_rate(base, currency, &state.rates, state.mode)
                .and_then(|rate| {
                    let converted = state.amount * rate;
                    if rate.is_finite() && converted.is_finite() {
                        Ok((rate, converted))
                    } else {
                        Err(ConverterError::NonFinite(currency.to_string()))
                    }
                });
            match converted {
                Ok((rate, converted)) => RowRecord {
                    currency: currency.to_string(),
                    rate,
                    converted,
                    missing: false,
                },
                Err(e) => {
                    warn!(currency, base, error = %e, "Rendering placeholder row");
                    RowRecord {
                        currency: currency.to_string(),
                        rate: 0.0,
                        converted: 0.0,
                        missing: true,
                    }
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rates::RateTable;
    use crate::core::selection::SelectedCurrencies;
    use std::collections::HashMap;

    fn state(mode: ConversionMode, scope: TableScope) -> AppState {
        let rates = RateTable::new(
            "EUR",
            HashMap::from([
                ("EUR".to_string(), 1.0),
                ("USD".to_string(), 1.1),
                ("INR".to_string(), 90.0),
            ]),
        );
        let mut state = AppState::new("INR", mode, scope);
        state.amount = 100.0;
        state.selected = ["USD", "GBP", "INR"].into_iter().collect::<SelectedCurrencies>();
        state.replace_rates(rates, &["EUR".to_string()]);
        state
    }

    #[test]
    fn test_cross_rate_rows() {
        let rows = render_rows(&state(ConversionMode::CrossRate, TableScope::Selected));
        assert_eq!(rows.len(), 3);

        assert_eq!(rows[0].currency, "USD");
        assert_eq!(rows[0].display_converted(), "1.22");
        assert_eq!(rows[0].display_rate(), "0.0122");

        // GBP is absent from the table: placeholder row, rest of table intact.
        assert_eq!(rows[1].currency, "GBP");
        assert!(rows[1].missing);
        assert_eq!(rows[1].display_converted(), "0.00");

        assert_eq!(rows[2].currency, "INR");
        assert_eq!(rows[2].converted, 100.0);
    }

    #[test]
    fn test_direct_rows_use_table_rates() {
        let rows = render_rows(&state(ConversionMode::Direct, TableScope::Selected));
        assert_eq!(rows[0].converted, 100.0 * 1.1);
        assert_eq!(rows[2].converted, 9000.0);
    }

    #[test]
    fn test_all_scope_follows_options() {
        let rows = render_rows(&state(ConversionMode::CrossRate, TableScope::All));
        let currencies: Vec<&str> = rows.iter().map(|r| r.currency.as_str()).collect();
        assert_eq!(currencies, vec!["EUR", "INR", "USD"]);
        assert!(rows.iter().all(|r| !r.missing));
    }

    #[test]
    fn test_render_is_idempotent() {
        let state = state(ConversionMode::CrossRate, TableScope::Selected);
        assert_eq!(render_rows(&state), render_rows(&state));
    }

    #[test]
    fn test_overflowing_conversion_renders_placeholder() {
        let mut state = state(ConversionMode::CrossRate, TableScope::Selected);
        state.amount = convert::parse_amount("1e307");
        state.base = "USD".to_string();
        let rows = render_rows(&state);

        // 1e307 * (90 / 1.1) overflows f64.
        assert_eq!(rows[2].currency, "INR");
        assert!(rows[2].missing);
        assert_eq!(rows[2].display_converted(), "0.00");
        assert!(rows.iter().all(|r| r.converted.is_finite() && r.rate.is_finite()));
        assert!(!rows[0].missing);
    }

    #[test]
    fn test_empty_table_renders_placeholders() {
        let mut state = AppState::new("USD", ConversionMode::CrossRate, TableScope::Selected);
        state.selected.add("EUR");
        let rows = render_rows(&state);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].missing);
    }
}
