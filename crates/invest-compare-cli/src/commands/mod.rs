pub mod compare;
pub mod equity;
pub mod property;
pub mod rates;

use clap::Args;

use invest_compare_core::{EquityIndexTable, ExchangeRateTable};

use crate::input;

/// Location of the yearly equity-index table
#[derive(Args, Debug, Clone)]
pub struct IndexTableArgs {
    /// CSV with Year,Value,DividendYield_percent,CPI columns
    #[arg(long, env = "INVEST_COMPARE_INDEX_TABLE")]
    pub index_table: String,
}

/// Location of the historical exchange rates
#[derive(Args, Debug, Clone)]
pub struct RatesArgs {
    /// CSV with curr,year,rate columns (local units per USD)
    #[arg(long, env = "INVEST_COMPARE_RATES")]
    pub rates: String,
}

impl IndexTableArgs {
    pub fn load(&self) -> Result<EquityIndexTable, Box<dyn std::error::Error>> {
        input::file::read_index_table(&self.index_table)
    }
}

impl RatesArgs {
    pub fn load(&self) -> Result<ExchangeRateTable, Box<dyn std::error::Error>> {
        input::file::read_rates(&self.rates)
    }
}
