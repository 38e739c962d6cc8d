//! Conversion logic, independent of any terminal or network code

pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod log;
pub mod options;
pub mod rates;
pub mod render;
pub mod selection;

// Re-export main types for cleaner imports
pub use controller::{AppState, Controller, ControllerSettings, FetchOutcome, FetchTicket};
pub use convert::{ConversionMode, compute_conversion};
pub use error::ConverterError;
pub use rates::{RateProvider, RateTable};
pub use render::{RowRecord, TableScope, render_rows};
pub use selection::SelectedCurrencies;
