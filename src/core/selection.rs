use std::collections::HashSet;

/// The set of currencies shown in the table.
///
/// Membership checks are O(1); iteration follows insertion order so rows
/// keep a stable position between renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectedCurrencies {
    order: Vec<String>,
    members: HashSet<String>,
}

impl SelectedCurrencies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `code`, returning `false` when it was already selected.
    pub fn add(&mut self, code: &str) -> bool {
        let code = code.trim().to_uppercase();
        if code.is_empty() || !self.members.insert(code.clone()) {
            return false;
        }
        self.order.push(code);
        true
    }

    /// Removes `code`, returning `false` when it was not selected.
    pub fn remove(&mut self, code: &str) -> bool {
        let code = code.trim().to_uppercase();
        if !self.members.remove(&code) {
            return false;
        }
        self.order.retain(|c| *c != code);
        true
    }

    pub fn contains(&self, code: &str) -> bool {
        self.members.contains(&code.trim().to_uppercase())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for SelectedCurrencies {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut selected = SelectedCurrencies::new();
        for code in iter {
            selected.add(code.as_ref());
        }
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent() {
        let mut once = SelectedCurrencies::new();
        once.add("USD");

        let mut twice = SelectedCurrencies::new();
        assert!(twice.add("USD"));
        assert!(!twice.add("usd"));

        assert_eq!(once, twice);
        assert_eq!(twice.len(), 1);
    }

    #[test]
    fn test_remove_then_add_restores() {
        let mut selected: SelectedCurrencies = ["USD", "EUR"].into_iter().collect();
        assert!(selected.remove("USD"));
        assert!(!selected.contains("USD"));
        assert!(selected.add("USD"));
        assert!(selected.contains("USD"));
        assert_eq!(selected.iter().collect::<Vec<_>>(), vec!["EUR", "USD"]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut selected: SelectedCurrencies = ["USD"].into_iter().collect();
        let before = selected.clone();
        assert!(!selected.remove("GBP"));
        assert_eq!(selected, before);
    }

    #[test]
    fn test_blank_codes_are_ignored() {
        let mut selected = SelectedCurrencies::new();
        assert!(!selected.add("   "));
        assert!(selected.is_empty());
    }
}
