use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Calendar year
pub type Year = i32;

/// ISO 4217 currency code, normalised to upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl AsRef<str>) -> Self {
        CurrencyCode(code.as_ref().trim().to_ascii_uppercase())
    }

    /// The currency every cross-currency comparison is routed through.
    pub fn reference() -> Self {
        CurrencyCode(REFERENCE_CURRENCY.to_string())
    }

    pub fn is_reference(&self) -> bool {
        self.0 == REFERENCE_CURRENCY
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        CurrencyCode::reference()
    }
}

impl From<String> for CurrencyCode {
    fn from(s: String) -> Self {
        CurrencyCode::new(s)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        CurrencyCode::new(s)
    }
}

impl From<CurrencyCode> for String {
    fn from(c: CurrencyCode) -> Self {
        c.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference currency code (the equity index is denominated in it)
pub const REFERENCE_CURRENCY: &str = "USD";

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_code_normalised() {
        assert_eq!(CurrencyCode::new(" lkr "), CurrencyCode::from("LKR"));
        assert!(CurrencyCode::from("usd").is_reference());
    }

    #[test]
    fn test_currency_code_serde_is_plain_string() {
        let code: CurrencyCode = serde_json::from_str("\"eur\"").unwrap();
        assert_eq!(code.as_str(), "EUR");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"EUR\"");
    }
}
