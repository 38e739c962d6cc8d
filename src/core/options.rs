use crate::core::rates::RateTable;

/// Currencies listed ahead of the rest when no preference is configured.
pub const DEFAULT_PREFERRED_CURRENCIES: &[&str] = &["USD", "EUR", "GBP", "INR", "JPY"];

/// Orders the currencies of `table` for the base and add-currency pickers.
///
/// Preferred codes present in the table come first in their configured order,
/// followed by every other code sorted lexicographically.
pub fn populate_currency_options(table: &RateTable, preferred: &[String]) -> Vec<String> {
    let mut options: Vec<String> = Vec::new();
    for code in preferred {
        let code = code.to_uppercase();
        if table.contains(&code) && !options.contains(&code) {
            options.push(code);
        }
    }

    let mut rest: Vec<String> = table
        .codes()
        .filter(|code| !options.iter().any(|o| o.as_str() == *code))
        .map(str::to_string)
        .collect();
    rest.sort();

    options.extend(rest);
    options
}
