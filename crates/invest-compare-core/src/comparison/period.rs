use serde::{Deserialize, Serialize};

use crate::error::InvestError;
use crate::fx::gateway::ExchangeRateTable;
use crate::market::index_table::EquityIndexTable;
use crate::time_value::ensure_period;
use crate::types::{CurrencyCode, Year};
use crate::InvestResult;

/// Earliest buy year offered by default
pub const DEFAULT_BUY_YEAR: Year = 2001;

/// Years a comparison can run over for one currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingPeriod {
    pub currency: CurrencyCode,
    /// Years covered by both the rate store and the equity table
    pub available_years: Vec<Year>,
    pub buy_year: Year,
    pub sell_year: Year,
}

/// Default holding period for `currency`: buy in the first covered year on
/// or after [`DEFAULT_BUY_YEAR`], sell in the last covered year.
pub fn default_period(
    table: &EquityIndexTable,
    rates: &ExchangeRateTable,
    currency: &CurrencyCode,
) -> InvestResult<HoldingPeriod> {
    let available_years: Vec<Year> = if currency.is_reference() {
        table.records().iter().map(|r| r.year).collect()
    } else {
        rates
            .years_for(currency)
            .into_iter()
            .filter(|year| table.contains(*year))
            .collect()
    };

    let (first, last) = match (available_years.first(), available_years.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => {
            return Err(InvestError::InvalidInput {
                field: "currency".into(),
                reason: format!("no {currency} exchange-rate years overlap the equity index table"),
            })
        }
    };

    let buy_year = available_years
        .iter()
        .copied()
        .find(|year| *year >= DEFAULT_BUY_YEAR && *year < last)
        .unwrap_or(first);
    ensure_period(buy_year, last)?;

    Ok(HoldingPeriod {
        currency: currency.clone(),
        available_years,
        buy_year,
        sell_year: last,
    })
}
