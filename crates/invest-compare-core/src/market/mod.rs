//! Yearly equity-index data and the series derived from it.

pub mod index_table;
pub mod inflation;
pub mod total_return;
