//! Currency codes, pairs, rates and conversion results

use std::fmt::{self, Display};

/// Value shown by the currency picker before anything has been chosen.
pub const PLACEHOLDER: &str = "Choose a currency";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Returns `None` for the placeholder or anything that is not three
    /// ASCII letters. Codes are uppercased, so `usd` selects `USD`.
    pub fn selected(code: &str) -> Option<Self> {
        let code = code.trim();
        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_alphabetic()) {
            return None;
        }
        Some(CurrencyCode(code.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CurrencyPair {
    pub source: CurrencyCode,
    pub target: CurrencyCode,
}

impl CurrencyPair {
    pub fn new(source: CurrencyCode, target: CurrencyCode) -> Self {
        CurrencyPair { source, target }
    }

    /// Key under which the quote endpoint reports this pair, e.g. `USDEUR`.
    pub fn quote_key(&self) -> String {
        format!("{}{}", self.source, self.target)
    }

    pub fn is_identity(&self) -> bool {
        self.source == self.target
    }
}

impl Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.source, self.target)
    }
}

/// A positive, finite multiplier from one currency to another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionRate(f64);

impl ConversionRate {
    pub const IDENTITY: ConversionRate = ConversionRate(1.0);

    pub fn new(value: f64) -> Option<Self> {
        (value.is_finite() && value > 0.0).then_some(ConversionRate(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn apply(&self, amount: f64) -> ConversionResult {
        ConversionResult(amount * self.0)
    }
}

impl Default for ConversionRate {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Parses user-entered amount text. Anything that is not a finite decimal
/// number yields `None`.
pub fn parse_amount(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionResult(f64);

impl ConversionResult {
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Display for ConversionResult {
    // Always carries a fractional part: 92.0, not 92.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(c: &str) -> CurrencyCode {
        CurrencyCode::selected(c).unwrap()
    }

    #[test]
    fn test_unselected_codes() {
        assert!(CurrencyCode::selected("").is_none());
        assert!(CurrencyCode::selected("   ").is_none());
        assert!(CurrencyCode::selected(PLACEHOLDER).is_none());
        assert_eq!(code(" USD ").as_str(), "USD");
    }

    #[test]
    fn test_codes_are_three_letters_uppercased() {
        assert_eq!(code("usd").as_str(), "USD");
        assert_eq!(code("eUr").as_str(), "EUR");
        assert!(CurrencyCode::selected("DOLLARS").is_none());
        assert!(CurrencyCode::selected("US").is_none());
        assert!(CurrencyCode::selected("US&x=1").is_none());
        assert!(CurrencyCode::selected("US&source=EUR").is_none());
        assert!(CurrencyCode::selected("U$D").is_none());
        assert!(CurrencyCode::selected("ÜSD").is_none());
    }

    #[test]
    fn test_pair_quote_key_and_equality() {
        let pair = CurrencyPair::new(code("USD"), code("EUR"));
        assert_eq!(pair.quote_key(), "USDEUR");
        assert_eq!(pair, CurrencyPair::new(code("USD"), code("EUR")));
        assert_ne!(pair, CurrencyPair::new(code("EUR"), code("USD")));
        assert!(!pair.is_identity());
        assert!(CurrencyPair::new(code("USD"), code("USD")).is_identity());
    }

    #[test]
    fn test_rate_must_be_positive_and_finite() {
        assert!(ConversionRate::new(0.92).is_some());
        assert!(ConversionRate::new(0.0).is_none());
        assert!(ConversionRate::new(-1.5).is_none());
        assert!(ConversionRate::new(f64::NAN).is_none());
        assert!(ConversionRate::new(f64::INFINITY).is_none());
        assert_eq!(ConversionRate::default(), ConversionRate::IDENTITY);
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("100"), Some(100.0));
        assert_eq!(parse_amount(" 12.5 "), Some(12.5));
        assert_eq!(parse_amount("-3"), Some(-3.0));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount("inf"), None);
    }

    #[test]
    fn test_result_display_keeps_fraction() {
        let rate = ConversionRate::new(2.0).unwrap();
        assert_eq!(rate.apply(46.0).to_string(), "92.0");
        assert_eq!(rate.apply(1.25).to_string(), "2.5");
    }
}
