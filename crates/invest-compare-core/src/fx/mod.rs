//! Historical exchange-rate lookups.

pub mod gateway;
