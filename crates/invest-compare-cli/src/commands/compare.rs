use clap::Args;
use log::info;
use rust_decimal::Decimal;
use serde_json::Value;

use invest_compare_core::comparison::compare::{self, ComparisonRequest};
use invest_compare_core::comparison::narrative;
use invest_compare_core::comparison::period::default_period;
use invest_compare_core::CurrencyCode;

use super::{IndexTableArgs, RatesArgs};
use crate::input;

/// Arguments for the property versus index comparison
#[derive(Args)]
pub struct CompareArgs {
    /// Local currency of the property market (e.g. LKR)
    #[arg(long)]
    pub currency: Option<String>,

    /// Purchase price, in local currency
    #[arg(long)]
    pub buy_price: Option<Decimal>,

    /// Sale price, in local currency
    #[arg(long)]
    pub sell_price: Option<Decimal>,

    /// Year bought (defaults to the first covered year from 2001)
    #[arg(long)]
    pub buy_year: Option<i32>,

    /// Year sold (defaults to the last covered year)
    #[arg(long)]
    pub sell_year: Option<i32>,

    /// Selling costs as a fraction of the sale price
    #[arg(long, default_value = "0.05")]
    pub selling_cost: Decimal,

    /// Gross annual rent as a fraction of value
    #[arg(long, default_value = "0.03")]
    pub rental_income: Decimal,

    /// Share of rent lost to costs
    #[arg(long, default_value = "0.25")]
    pub rental_cost: Decimal,

    /// Index fund expense ratio
    #[arg(long, default_value = "0.0015")]
    pub annual_stock_cost: Decimal,

    /// Withholding tax on index dividends
    #[arg(long, default_value = "0.15")]
    pub dividend_tax: Decimal,

    /// Forex mark-up on each conversion
    #[arg(long, default_value = "0.02")]
    pub conversion_cost: Decimal,

    /// Report nominal figures (no inflation or currency adjustment)
    #[arg(long)]
    pub nominal: bool,

    /// Attach a markdown narrative to the output
    #[arg(long)]
    pub narrative: bool,

    #[command(flatten)]
    pub data: IndexTableArgs,

    #[command(flatten)]
    pub fx: RatesArgs,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let table = args.data.load()?;
    let rates = args.fx.load()?;

    let request: ComparisonRequest = input::resolve(args.input.as_deref(), || {
        let currency = CurrencyCode::new(
            args.currency
                .as_deref()
                .ok_or("--currency is required (or provide --input)")?,
        );
        let (buy_year, sell_year) = match (args.buy_year, args.sell_year) {
            (Some(buy), Some(sell)) => (buy, sell),
            (buy, sell) => {
                let period = default_period(&table, &rates, &currency)?;
                info!(
                    "defaulting {currency} period to {}-{}",
                    period.buy_year, period.sell_year
                );
                (buy.unwrap_or(period.buy_year), sell.unwrap_or(period.sell_year))
            }
        };

        Ok(ComparisonRequest {
            currency,
            buy_price: args
                .buy_price
                .ok_or("--buy-price is required (or provide --input)")?,
            sell_price: args
                .sell_price
                .ok_or("--sell-price is required (or provide --input)")?,
            buy_year,
            sell_year,
            rental_income_fraction: args.rental_income,
            rental_cost_fraction: args.rental_cost,
            selling_cost_fraction: args.selling_cost,
            conversion_cost_fraction: args.conversion_cost,
            annual_stock_cost_fraction: args.annual_stock_cost,
            dividend_tax_fraction: args.dividend_tax,
            adjust_inflation: !args.nominal,
        })
    })?;

    let report = compare::comparison_report(&request, &table, &rates)?;
    let mut value = serde_json::to_value(&report)?;
    if args.narrative {
        if let Value::Object(ref mut map) = value {
            map.insert(
                "narrative".into(),
                Value::String(narrative::render(&request, &report.result)),
            );
        }
    }
    Ok(value)
}
