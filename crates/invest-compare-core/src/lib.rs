pub mod error;
pub mod time_value;
pub mod types;

pub mod comparison;
pub mod equity;
pub mod fx;
pub mod market;
pub mod property;

pub use comparison::compare::{compare, ComparisonRequest, ComparisonResult};
pub use error::InvestError;
pub use fx::gateway::{ExchangeRateGateway, ExchangeRateTable};
pub use market::index_table::{EquityIndexTable, YearRecord};
pub use types::*;

/// Standard result type for all invest-compare operations
pub type InvestResult<T> = Result<T, InvestError>;
