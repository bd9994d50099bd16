use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::equity::cross_currency::{value_in_local_currency, LocalInvestmentInput};
use crate::fx::gateway::ExchangeRateGateway;
use crate::market::index_table::EquityIndexTable;
use crate::market::total_return::CostConfig;
use crate::property::returns::{property_returns, PropertyScenario};
use crate::time_value::{annualize, holding_years, overflow};
use crate::types::{with_metadata, ComputationOutput, CurrencyCode, Money, Rate, Year};
use crate::InvestResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A property deal and the index alternative funded with the same capital.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonRequest {
    /// Local currency of the property market
    pub currency: CurrencyCode,
    pub buy_price: Money,
    pub sell_price: Money,
    pub buy_year: Year,
    pub sell_year: Year,
    pub rental_income_fraction: Rate,
    pub rental_cost_fraction: Rate,
    #[serde(default)]
    pub selling_cost_fraction: Rate,
    /// Spread paid on each local ↔ reference conversion
    #[serde(default)]
    pub conversion_cost_fraction: Rate,
    /// Index fund expense ratio
    #[serde(default)]
    pub annual_stock_cost_fraction: Rate,
    /// Withholding tax on index dividends
    #[serde(default)]
    pub dividend_tax_fraction: Rate,
    #[serde(default = "default_adjust_inflation")]
    pub adjust_inflation: bool,
}

fn default_adjust_inflation() -> bool {
    true
}

/// Property and index outcomes over the same period, in local currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// Annualised price appreciation after selling costs
    pub property_appreciation_rate: Rate,
    /// Annualised appreciation plus reinvested rent
    pub property_total_return_rate: Rate,
    pub reinvested_rental_value: Money,
    /// Net sale proceeds plus reinvested rent
    pub gross_property_end_value: Money,
    /// Gross end value in buy-year local purchasing power
    pub real_property_end_value: Money,
    pub real_property_annual_return: Rate,
    pub equity_local_end_value: Money,
    pub equity_local_annual_return: Rate,
    pub equity_reference_end_value: Money,
    /// Share of local purchasing power kept over the period
    pub real_value_ratio_local: Decimal,
    /// Share of reference-currency purchasing power kept over the period
    pub real_value_ratio_reference: Decimal,
    pub buy_rate: Rate,
    pub sell_rate: Rate,
}

impl ComparisonRequest {
    pub fn property_scenario(&self) -> PropertyScenario {
        PropertyScenario {
            buy_price: self.buy_price,
            sell_price: self.sell_price,
            buy_year: self.buy_year,
            sell_year: self.sell_year,
            rental_income_fraction: self.rental_income_fraction,
            rental_cost_fraction: self.rental_cost_fraction,
            selling_cost_fraction: self.selling_cost_fraction,
        }
    }

    /// The index alternative: the property's buy price invested instead.
    pub fn local_investment(&self) -> LocalInvestmentInput {
        LocalInvestmentInput {
            principal: self.buy_price,
            currency: self.currency.clone(),
            buy_year: self.buy_year,
            sell_year: self.sell_year,
            costs: CostConfig::new(self.annual_stock_cost_fraction, self.dividend_tax_fraction),
            adjust_inflation: self.adjust_inflation,
            conversion_cost_fraction: self.conversion_cost_fraction,
        }
    }
}

impl ComparisonResult {
    /// Real-terms annual return advantage of the property over the index.
    pub fn property_advantage(&self) -> Rate {
        self.real_property_annual_return - self.equity_local_annual_return
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the property and index branches and merge them.
///
/// The branches share only the request; either failing fails the call.
pub fn compare<G: ExchangeRateGateway + ?Sized>(
    request: &ComparisonRequest,
    table: &EquityIndexTable,
    rates: &G,
) -> InvestResult<ComparisonResult> {
    let scenario = request.property_scenario();
    let property = property_returns(&scenario)?;
    let equity = value_in_local_currency(table, rates, &request.local_investment())?;

    let gross_property_end_value = property
        .reinvested_rental_value
        .checked_add(scenario.net_sell_price())
        .ok_or_else(|| overflow("gross property end value"))?;
    let ratio = equity.real_value_ratio_local;
    let real_property_end_value = gross_property_end_value
        .checked_mul(ratio)
        .ok_or_else(|| overflow("real property end value"))?;

    // (nominal total + 1) * ratio is the real growth factor
    let real_growth = real_property_end_value
        .checked_div(request.buy_price)
        .ok_or_else(|| overflow("real property growth"))?;
    let real_property_annual_return = annualize(
        real_growth,
        holding_years(request.buy_year, request.sell_year)?,
    )?;

    Ok(ComparisonResult {
        property_appreciation_rate: property.net_appreciation_rate,
        property_total_return_rate: property.total_return_rate,
        reinvested_rental_value: property.reinvested_rental_value,
        gross_property_end_value,
        real_property_end_value,
        real_property_annual_return,
        equity_local_end_value: equity.local_end_value,
        equity_local_annual_return: equity.annualized_local_return,
        equity_reference_end_value: equity.reference_end_value,
        real_value_ratio_local: ratio,
        real_value_ratio_reference: equity.real_value_ratio_reference,
        buy_rate: equity.buy_rate,
        sell_rate: equity.sell_rate,
    })
}

/// [`compare`] wrapped in the standard computation envelope.
pub fn comparison_report<G: ExchangeRateGateway + ?Sized>(
    request: &ComparisonRequest,
    table: &EquityIndexTable,
    rates: &G,
) -> InvestResult<ComputationOutput<ComparisonResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = compare(request, table, rates)?;
    if !request.adjust_inflation {
        warnings.push("Figures are nominal: no inflation or currency adjustment applied".into());
    }
    if request.rental_income_fraction.is_zero() {
        warnings.push("No rental income assumed for the property".into());
    }

    Ok(with_metadata(
        "Property (appreciation + reinvested rent) vs reference-currency total-return index",
        request,
        warnings,
        start.elapsed().as_micros() as u64,
        result,
    ))
}
