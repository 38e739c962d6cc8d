use super::ui;
use crate::core::{Controller, RateProvider};
use anyhow::Result;

/// Fetches rates once and prints the conversion table.
pub async fn run<P: RateProvider>(controller: &mut Controller<P>) -> Result<()> {
    ui::with_spinner("Fetching rates...", controller.refresh()).await?;
    println!("{}", ui::rates_table(controller.state(), controller.rows()));
    Ok(())
}
