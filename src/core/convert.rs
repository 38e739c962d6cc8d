//! Conversion arithmetic and display rounding.

use crate::core::error::{ConverterError, Result};
use crate::core::rates::RateTable;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Decimal places used when displaying a rate.
pub const RATE_DECIMALS: usize = 4;
/// Decimal places used when displaying a converted amount.
pub const AMOUNT_DECIMALS: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionMode {
    /// Rates are fetched relative to the selected base currency.
    #[default]
    Direct,
    /// Rates stay relative to a fixed reference currency and are triangulated.
    CrossRate,
}

impl Display for ConversionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ConversionMode::Direct => "direct",
                ConversionMode::CrossRate => "cross-rate",
            }
        )
    }
}

impl FromStr for ConversionMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "direct" => Ok(ConversionMode::Direct),
            "cross-rate" | "cross" => Ok(ConversionMode::CrossRate),
            _ => Err(anyhow::anyhow!("Invalid conversion mode: {}", s)),
        }
    }
}

/// Parses user input into an amount. Empty, malformed, negative and
/// non-finite input all count as zero.
pub fn parse_amount(input: &str) -> f64 {
    match input.trim().parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => amount,
        _ => 0.0,
    }
}

/// Normalises an amount already held as a number with the same rules as
/// [`parse_amount`].
pub fn sanitize_amount(amount: f64) -> f64 {
    if amount.is_finite() && amount >= 0.0 {
        amount
    } else {
        0.0
    }
}

/// Effective rate for converting one unit of `base` into `target`.
pub fn effective_rate(
    base: &str,
    target: &str,
    table: &RateTable,
    mode: ConversionMode,
) -> Result<f64> {
    let target_rate = table
        .rate(target)
        .ok_or_else(|| ConverterError::MissingRate(target.to_string()))?;

    match mode {
        ConversionMode::Direct => Ok(target_rate),
        ConversionMode::CrossRate => {
            let base_rate = table
                .rate(base)
                .filter(|rate| *rate != 0.0)
                .ok_or_else(|| ConverterError::MissingRate(base.to_string()))?;
            Ok(target_rate / base_rate)
        }
    }
}

/// Converts `amount` of `base` into `target` using `table`.
///
/// In direct mode the table is expected to be quoted against `base`. In
/// cross-rate mode the amount is triangulated through the table's reference
/// currency, which fails when the base rate is missing or zero.
pub fn compute_conversion(
    amount: f64,
    base: &str,
    target: &str,
    table: &RateTable,
    mode: ConversionMode,
) -> Result<f64> {
    let rate = effective_rate(base, target, table, mode)?;
    Ok(amount * rate)
}

pub fn format_rate(rate: f64) -> String {
    format!("{:.*}", RATE_DECIMALS, rate)
}

pub fn format_amount(amount: f64) -> String {
    format!("{:.*}", AMOUNT_DECIMALS, amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn eur_table() -> RateTable {
        RateTable::new(
            "EUR",
            HashMap::from([
                ("EUR".to_string(), 1.0),
                ("USD".to_string(), 1.1),
                ("INR".to_string(), 90.0),
                ("XXX".to_string(), 0.0),
            ]),
        )
    }

    #[test]
    fn test_cross_rate_scenario() {
        let converted =
            compute_conversion(100.0, "INR", "USD", &eur_table(), ConversionMode::CrossRate)
                .unwrap();
        assert!((converted - 100.0 * (1.1 / 90.0)).abs() < 1e-12);
        assert_eq!(format_amount(converted), "1.22");
    }

    #[test]
    fn test_direct_mode_uses_target_rate() {
        let converted =
            compute_conversion(10.0, "EUR", "INR", &eur_table(), ConversionMode::Direct).unwrap();
        assert_eq!(converted, 900.0);
    }

    #[test]
    fn test_missing_target_rate() {
        for mode in [ConversionMode::Direct, ConversionMode::CrossRate] {
            let result = compute_conversion(1.0, "EUR", "GBP", &eur_table(), mode);
            assert_eq!(result, Err(ConverterError::MissingRate("GBP".to_string())));
        }
    }

    #[test]
    fn test_zero_or_missing_base_rate_in_cross_mode() {
        let table = eur_table();
        assert_eq!(
            compute_conversion(1.0, "XXX", "USD", &table, ConversionMode::CrossRate),
            Err(ConverterError::MissingRate("XXX".to_string()))
        );
        assert_eq!(
            compute_conversion(1.0, "GBP", "USD", &table, ConversionMode::CrossRate),
            Err(ConverterError::MissingRate("GBP".to_string()))
        );
        // Direct mode never divides by the base rate.
        assert!(compute_conversion(1.0, "XXX", "USD", &table, ConversionMode::Direct).is_ok());
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("12.5"), 12.5);
        assert_eq!(parse_amount("  3 "), 3.0);
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount("-4"), 0.0);
        assert_eq!(parse_amount("NaN"), 0.0);
        assert_eq!(parse_amount("inf"), 0.0);
    }

    #[test]
    fn test_display_rounding() {
        assert_eq!(format_rate(1.0 / 3.0), "0.3333");
        assert_eq!(format_amount(2.0 / 3.0), "0.67");
        assert_eq!(format_amount(0.0), "0.00");
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!(
            "cross_rate".parse::<ConversionMode>().unwrap(),
            ConversionMode::CrossRate
        );
        assert_eq!(
            "Direct".parse::<ConversionMode>().unwrap(),
            ConversionMode::Direct
        );
        assert!("sideways".parse::<ConversionMode>().is_err());
    }

    fn currency_code_strategy() -> impl Strategy<Value = String> {
        prop::sample::select(vec![
            "EUR".to_string(),
            "USD".to_string(),
            "INR".to_string(),
        ])
    }

    fn rate_strategy() -> impl Strategy<Value = f64> {
        prop_oneof![1 => Just(0.0), 9 => 1.0e-6f64..1.0e6]
    }

    fn table_strategy() -> impl Strategy<Value = RateTable> {
        (rate_strategy(), rate_strategy(), rate_strategy()).prop_map(|(eur, usd, inr)| {
            RateTable::new(
                "EUR",
                HashMap::from([
                    ("EUR".to_string(), eur),
                    ("USD".to_string(), usd),
                    ("INR".to_string(), inr),
                ]),
            )
        })
    }

    fn mode_strategy() -> impl Strategy<Value = ConversionMode> {
        prop::sample::select(vec![ConversionMode::Direct, ConversionMode::CrossRate])
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_conversion_is_linear_in_amount(
            amount in 0.0f64..1.0e9,
            base in currency_code_strategy(),
            target in currency_code_strategy(),
            mode in mode_strategy(),
            table in table_strategy(),
        ) {
            let single = compute_conversion(amount, &base, &target, &table, mode);
            let double = compute_conversion(2.0 * amount, &base, &target, &table, mode);
            match (single, double) {
                (Ok(single), Ok(double)) => prop_assert_eq!(double, 2.0 * single),
                // A zero base rate in cross-rate mode fails for every amount.
                (single, double) => prop_assert_eq!(single, double),
            }
        }

        #[test]
        fn prop_cross_rate_identity(
            amount in 0.0f64..1.0e9,
            base in currency_code_strategy(),
            table in table_strategy(),
        ) {
            let converted =
                compute_conversion(amount, &base, &base, &table, ConversionMode::CrossRate);
            match table.rate(&base) {
                Some(rate) if rate != 0.0 => prop_assert_eq!(converted, Ok(amount)),
                _ => prop_assert!(converted.is_err()),
            }
        }
    }
}
