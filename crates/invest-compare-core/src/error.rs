use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvestError {
    #[error(
        "Invalid period: sell year {sell_year} must be after buy year {buy_year}, by at most {max} years",
        max = crate::time_value::MAX_HOLDING_YEARS
    )]
    InvalidPeriod { buy_year: i32, sell_year: i32 },

    #[error("Invalid fraction: {field} = {value} — must lie in [0, 1)")]
    InvalidFraction { field: String, value: Decimal },

    #[error("Missing year data: no {source_name} entry for {year}")]
    MissingYearData { source_name: String, year: i32 },

    #[error("Exchange rate unavailable for {currency} in {year}")]
    RateUnavailable { currency: String, year: i32 },

    #[error("Degenerate base: {context}")]
    DegenerateBase { context: String },

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid equity index table: {0}")]
    InvalidTable(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl InvestError {
    /// True when the caller can retry with a different year or currency.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            InvestError::MissingYearData { .. } | InvestError::RateUnavailable { .. }
        )
    }
}

impl From<serde_json::Error> for InvestError {
    fn from(e: serde_json::Error) -> Self {
        InvestError::SerializationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_kinds() {
        let miss = InvestError::RateUnavailable {
            currency: "LKR".into(),
            year: 1881,
        };
        assert!(miss.is_recoverable());

        let period = InvestError::InvalidPeriod {
            buy_year: 2001,
            sell_year: 2001,
        };
        assert!(!period.is_recoverable());
    }

    #[test]
    fn test_error_messages_name_the_input() {
        let err = InvestError::MissingYearData {
            source_name: "CPI".into(),
            year: 1850,
        };
        assert_eq!(err.to_string(), "Missing year data: no CPI entry for 1850");
    }
}
