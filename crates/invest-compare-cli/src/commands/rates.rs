use clap::Args;
use serde_json::Value;

use invest_compare_core::comparison::period::default_period;
use invest_compare_core::CurrencyCode;

use super::{IndexTableArgs, RatesArgs};

/// Arguments for listing the years a currency can be compared over
#[derive(Args)]
pub struct RateYearsArgs {
    /// Currency code (e.g. LKR); omit to list every known currency
    #[arg(long)]
    pub currency: Option<String>,

    #[command(flatten)]
    pub data: IndexTableArgs,

    #[command(flatten)]
    pub fx: RatesArgs,
}

pub fn run_rate_years(args: RateYearsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let table = args.data.load()?;
    let rates = args.fx.load()?;

    match args.currency {
        Some(code) => {
            let period = default_period(&table, &rates, &CurrencyCode::new(code))?;
            Ok(serde_json::to_value(period)?)
        }
        None => {
            let results: Vec<Value> = rates
                .currencies()
                .into_iter()
                .map(|currency| {
                    let years = rates.years_for(&currency);
                    serde_json::json!({
                        "currency": currency,
                        "first_year": years.first(),
                        "last_year": years.last(),
                        "quotes": years.len(),
                    })
                })
                .collect();
            Ok(serde_json::json!({ "results": results }))
        }
    }
}
