pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::{ConversionMode, Controller, ControllerSettings, TableScope};
use crate::providers::ExchangeRateApiProvider;
use anyhow::Result;
use tracing::{debug, info};

/// Command line overrides applied on top of the loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base: Option<String>,
    pub amount: Option<f64>,
    pub mode: Option<ConversionMode>,
    pub currencies: Vec<String>,
    pub all: bool,
}

impl Overrides {
    pub fn apply(&self, settings: &mut ControllerSettings) {
        if let Some(base) = &self.base {
            settings.base_currency = base.clone();
        }
        if let Some(amount) = self.amount {
            settings.amount = amount;
        }
        if let Some(mode) = self.mode {
            settings.mode = mode;
        }
        if !self.currencies.is_empty() {
            settings.currencies = self.currencies.clone();
        }
        if self.all {
            settings.scope = TableScope::All;
        }
    }
}

#[derive(Debug, Clone)]
pub enum AppCommand {
    Table,
    Currencies,
    Interactive,
}

pub async fn run_command(
    command: AppCommand,
    config_path: Option<&str>,
    overrides: &Overrides,
) -> Result<()> {
    info!("fxtable starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = ExchangeRateApiProvider::from_config(&config.provider)?;

    let mut settings = ControllerSettings::from(&config);
    overrides.apply(&mut settings);
    let mut controller = Controller::new(provider, settings);

    match command {
        AppCommand::Table => cli::table::run(&mut controller).await,
        AppCommand::Currencies => cli::currencies::run(&mut controller).await,
        AppCommand::Interactive => cli::interactive::run(&mut controller).await,
    }
}
