use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use invest_compare_core::property::returns::{self, PropertyScenario};

use crate::input;

/// Arguments for property return analysis
#[derive(Args)]
pub struct PropertyArgs {
    /// Purchase price
    #[arg(long)]
    pub buy_price: Option<Decimal>,

    /// Sale price
    #[arg(long)]
    pub sell_price: Option<Decimal>,

    /// Year the property is bought
    #[arg(long)]
    pub buy_year: Option<i32>,

    /// Year the property is sold
    #[arg(long)]
    pub sell_year: Option<i32>,

    /// Gross annual rent as a fraction of value
    #[arg(long, default_value = "0.03")]
    pub rental_income: Decimal,

    /// Share of rent lost to costs
    #[arg(long, default_value = "0.25")]
    pub rental_cost: Decimal,

    /// Selling costs as a fraction of the sale price
    #[arg(long, default_value = "0")]
    pub selling_cost: Decimal,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_property(args: PropertyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenario: PropertyScenario = input::resolve(args.input.as_deref(), || {
        Ok(PropertyScenario {
            buy_price: args
                .buy_price
                .ok_or("--buy-price is required (or provide --input)")?,
            sell_price: args
                .sell_price
                .ok_or("--sell-price is required (or provide --input)")?,
            buy_year: args
                .buy_year
                .ok_or("--buy-year is required (or provide --input)")?,
            sell_year: args
                .sell_year
                .ok_or("--sell-year is required (or provide --input)")?,
            rental_income_fraction: args.rental_income,
            rental_cost_fraction: args.rental_cost,
            selling_cost_fraction: args.selling_cost,
        })
    })?;

    let result = returns::property_returns_report(&scenario)?;
    Ok(serde_json::to_value(result)?)
}
