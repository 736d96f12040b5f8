// src/pipeline/ledger.rs

//! Running totals of claimed amounts per reward token.

use std::collections::HashMap;

/// Per-token claim totals for the lifetime of a session.
#[derive(Debug, Default, Clone)]
pub struct ClaimLedger {
    totals: HashMap<String, f64>,
}

impl ClaimLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an amount as sent by the claim endpoint.
    ///
    /// Unparseable or non-finite text counts as zero.
    pub fn parse_amount(amount_text: &str) -> f64 {
        match amount_text.trim().parse::<f64>() {
            Ok(amount) if amount.is_finite() => amount,
            _ => {
                log::warn!("Unreadable claim amount {amount_text:?}, counting it as 0");
                0.0
            }
        }
    }

    /// Add `amount_text` to the total for `token` and return the new total.
    pub fn record(&mut self, token: &str, amount_text: &str) -> f64 {
        self.add(token, Self::parse_amount(amount_text))
    }

    /// Add an already parsed amount to the total for `token`.
    pub fn add(&mut self, token: &str, amount: f64) -> f64 {
        let total = self.totals.entry(token.to_string()).or_insert(0.0);
        *total += amount;
        *total
    }

    pub fn total(&self, token: &str) -> Option<f64> {
        self.totals.get(token).copied()
    }

    /// Snapshot of all totals, sorted by token.
    pub fn totals(&self) -> Vec<(String, f64)> {
        let mut totals: Vec<_> = self
            .totals
            .iter()
            .map(|(token, total)| (token.clone(), *total))
            .collect();
        totals.sort_by(|a, b| a.0.cmp(&b.0));
        totals
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_per_token() {
        let mut ledger = ClaimLedger::new();
        assert_eq!(ledger.record("BTTC", "12.5"), 12.5);
        assert_eq!(ledger.record("BTTC", "7.5"), 20.0);
        assert_eq!(ledger.total("BTTC"), Some(20.0));
    }

    #[test]
    fn tokens_are_independent() {
        let mut ledger = ClaimLedger::new();
        ledger.record("BTTC", "3");
        ledger.record("USDT", "1");
        assert_eq!(ledger.record("BTTC", "1"), 4.0);
        assert_eq!(ledger.total("USDT"), Some(1.0));
    }

    #[test]
    fn invalid_amount_counts_as_zero() {
        let mut ledger = ClaimLedger::new();
        assert_eq!(ledger.record("USDT", "abc"), 0.0);
        assert_eq!(ledger.record("USDT", " 0.25 "), 0.25);
        assert_eq!(ledger.record("USDT", "NaN"), 0.25);
    }

    #[test]
    fn totals_are_sorted() {
        let mut ledger = ClaimLedger::new();
        ledger.record("USDT", "1");
        ledger.record("BNB", "2");
        assert_eq!(
            ledger.totals(),
            vec![("BNB".to_string(), 2.0), ("USDT".to_string(), 1.0)]
        );
    }
}
