use super::ui;
use crate::core::{Controller, RateProvider};
use anyhow::Result;

/// Fetches rates once and prints the currencies that can be selected, in
/// picker order.
pub async fn run<P: RateProvider>(controller: &mut Controller<P>) -> Result<()> {
    ui::with_spinner("Fetching rates...", controller.refresh()).await?;
    println!(
        "{}\n{}",
        ui::style_text(
            &format!("{} currencies", controller.options().len()),
            ui::StyleType::Title
        ),
        ui::options_list(controller.options(), 10)
    );
    Ok(())
}
