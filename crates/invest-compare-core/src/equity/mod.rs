//! Equity-index investment valuation, in the reference currency and
//! round-tripped through a local currency.

pub mod cross_currency;
pub mod valuation;
