use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use invest_compare_core::equity::cross_currency::{self, LocalInvestmentInput};
use invest_compare_core::equity::valuation::{self, EquityValuationInput};
use invest_compare_core::market::total_return::CostConfig;
use invest_compare_core::CurrencyCode;

use super::{IndexTableArgs, RatesArgs};
use crate::input;

/// Arguments for valuing an index holding in USD
#[derive(Args)]
pub struct EquityArgs {
    /// Amount invested (USD)
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Year the holding is bought
    #[arg(long)]
    pub buy_year: Option<i32>,

    /// Year the holding is sold
    #[arg(long)]
    pub sell_year: Option<i32>,

    /// Annual fund expense ratio (e.g. 0.0015 for 0.15%)
    #[arg(long, default_value = "0")]
    pub annual_cost: Decimal,

    /// Withholding tax on dividends (e.g. 0.15 for 15%)
    #[arg(long, default_value = "0")]
    pub dividend_tax: Decimal,

    /// Restate the return in buy-year purchasing power
    #[arg(long)]
    pub adjust_inflation: bool,

    #[command(flatten)]
    pub data: IndexTableArgs,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for investing local currency in the USD index
#[derive(Args)]
pub struct LocalArgs {
    /// Amount invested, in local currency
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Local currency code (e.g. LKR)
    #[arg(long)]
    pub currency: Option<String>,

    /// Year the holding is bought
    #[arg(long)]
    pub buy_year: Option<i32>,

    /// Year the holding is sold
    #[arg(long)]
    pub sell_year: Option<i32>,

    /// Annual fund expense ratio
    #[arg(long, default_value = "0.0015")]
    pub annual_cost: Decimal,

    /// Withholding tax on dividends
    #[arg(long, default_value = "0.15")]
    pub dividend_tax: Decimal,

    /// Spread lost on each currency conversion
    #[arg(long, default_value = "0.02")]
    pub conversion_cost: Decimal,

    /// Restate the result in buy-year local purchasing power
    #[arg(long)]
    pub adjust_inflation: bool,

    #[command(flatten)]
    pub data: IndexTableArgs,

    #[command(flatten)]
    pub fx: RatesArgs,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_equity(args: EquityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let equity_input: EquityValuationInput = input::resolve(args.input.as_deref(), || {
        Ok(EquityValuationInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            buy_year: args
                .buy_year
                .ok_or("--buy-year is required (or provide --input)")?,
            sell_year: args
                .sell_year
                .ok_or("--sell-year is required (or provide --input)")?,
            costs: CostConfig::new(args.annual_cost, args.dividend_tax),
            adjust_inflation: args.adjust_inflation,
        })
    })?;

    let table = args.data.load()?;
    let result = valuation::equity_valuation_report(&table, &equity_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_local(args: LocalArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let local_input: LocalInvestmentInput = input::resolve(args.input.as_deref(), || {
        Ok(LocalInvestmentInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            currency: CurrencyCode::new(
                args.currency
                    .as_deref()
                    .ok_or("--currency is required (or provide --input)")?,
            ),
            buy_year: args
                .buy_year
                .ok_or("--buy-year is required (or provide --input)")?,
            sell_year: args
                .sell_year
                .ok_or("--sell-year is required (or provide --input)")?,
            costs: CostConfig::new(args.annual_cost, args.dividend_tax),
            adjust_inflation: args.adjust_inflation,
            conversion_cost_fraction: args.conversion_cost,
        })
    })?;

    let table = args.data.load()?;
    let rates = args.fx.load()?;
    let result = cross_currency::local_investment_report(&table, &rates, &local_input)?;
    Ok(serde_json::to_value(result)?)
}
