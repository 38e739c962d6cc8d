use crate::core::convert;
use crate::core::{AppState, RowRecord};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Label,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Label => style(text).bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Right aligned numeric cell. Placeholder values for missing rates are
/// greyed out.
pub fn value_cell(text: String, missing: bool) -> Cell {
    let cell = Cell::new(text).set_alignment(CellAlignment::Right);
    if missing { cell.fg(Color::DarkGrey) } else { cell }
}

/// Formats the user visible notification for a failed operation.
pub fn alert(message: &str) -> String {
    format!("{} {}", style_text("Error:", StyleType::Error), message)
}

/// Materialises rendered rows into the conversion table, preceded by a
/// summary line of the inputs it was derived from.
pub fn rates_table(state: &AppState, rows: &[RowRecord]) -> String {
    let base = &state.base;
    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("Currency"),
        header_cell(&format!("Rate (1 {base})")),
        header_cell(&format!("Value of {}", convert::format_amount(state.amount))),
    ]);

    for row in rows {
        table.add_row(vec![
            Cell::new(&row.currency),
            value_cell(row.display_rate(), row.missing),
            value_cell(row.display_converted(), row.missing),
        ]);
    }

    let as_of = match (state.rates.date(), state.rates.fetched_at()) {
        (Some(date), _) => date.to_string(),
        (None, Some(fetched_at)) => fetched_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        (None, None) => "not loaded".to_string(),
    };

    let mut output = format!(
        "{} {}  {} {}  {} {}\n",
        style_text("Base:", StyleType::Label),
        style_text(base, StyleType::Title),
        style_text("Mode:", StyleType::Label),
        state.mode,
        style_text("Rates as of:", StyleType::Label),
        style_text(&as_of, StyleType::Subtle),
    );
    output.push_str(&table.to_string());
    output
}

/// Formats currency options as comma separated lines of at most `per_line`
/// codes.
pub fn options_list(options: &[String], per_line: usize) -> String {
    if options.is_empty() {
        return style_text("No currencies loaded", StyleType::Subtle);
    }
    options
        .chunks(per_line.max(1))
        .map(|chunk| chunk.join(", "))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Creates a new `indicatif::ProgressBar` spinner with standard styling.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
    {
        pb.set_style(spinner_style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Drives `future` to completion while a spinner with `message` is shown.
pub async fn with_spinner<F: Future>(message: &str, future: F) -> F::Output {
    let pb = new_spinner(message);
    let output = future.await;
    pb.finish_and_clear();
    output
}
