use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::equity::valuation::{value_equity, EquityValuationInput};
use crate::fx::gateway::ExchangeRateGateway;
use crate::market::index_table::EquityIndexTable;
use crate::market::total_return::CostConfig;
use crate::time_value::{
    calc_interest, ensure_fraction, ensure_period, ensure_positive, overflow,
};
use crate::types::{with_metadata, ComputationOutput, CurrencyCode, Money, Rate, Year};
use crate::InvestResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for investing local currency in the reference-currency index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalInvestmentInput {
    /// Amount in local currency at the start of `buy_year`
    pub principal: Money,
    pub currency: CurrencyCode,
    pub buy_year: Year,
    pub sell_year: Year,
    #[serde(default)]
    pub costs: CostConfig,
    #[serde(default)]
    pub adjust_inflation: bool,
    /// Spread lost on each currency conversion (0.02 = 2%)
    #[serde(default)]
    pub conversion_cost_fraction: Rate,
}

/// Outcome of the local → reference → local round trip.
///
/// All fields share the two exchange-rate quotes and are only valid together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalInvestmentValuation {
    /// End value back in local currency, net of both conversions
    pub local_end_value: Money,
    /// Annualised return in local currency
    pub annualized_local_return: Rate,
    /// Nominal end value in the reference currency
    pub reference_end_value: Money,
    /// Local-currency real-value ratio (reference CPI ratio × rate1 / rate2)
    pub real_value_ratio_local: Decimal,
    /// Reference-currency CPI ratio (1 without inflation adjustment)
    pub real_value_ratio_reference: Decimal,
    /// Local units per reference unit in `buy_year`
    pub buy_rate: Rate,
    /// Local units per reference unit in `sell_year`
    pub sell_rate: Rate,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Convert local currency into the reference currency, hold the index, and
/// convert back.
///
/// A missing quote for either year fails the whole computation with
/// `RateUnavailable`. When inflation adjustment is on, the exit value is
/// restated with the local real-value ratio, which folds currency
/// depreciation into the local purchasing-power loss. Without it the result
/// is a plain nominal round trip.
pub fn value_in_local_currency<G: ExchangeRateGateway + ?Sized>(
    table: &EquityIndexTable,
    rates: &G,
    input: &LocalInvestmentInput,
) -> InvestResult<LocalInvestmentValuation> {
    ensure_period(input.buy_year, input.sell_year)?;
    ensure_positive("principal", input.principal)?;
    ensure_fraction("conversion_cost_fraction", input.conversion_cost_fraction)?;
    input.costs.validate()?;

    let conversion_drag = Decimal::ONE - input.conversion_cost_fraction;

    let buy_rate = rates.quote(&input.currency, input.buy_year)?;
    ensure_positive("buy_rate", buy_rate)?;
    let reference_principal = input
        .principal
        .checked_div(buy_rate)
        .ok_or_else(|| overflow("reference principal"))?
        * conversion_drag;

    let equity = value_equity(
        table,
        &EquityValuationInput {
            principal: reference_principal,
            buy_year: input.buy_year,
            sell_year: input.sell_year,
            costs: input.costs,
            adjust_inflation: input.adjust_inflation,
        },
    )?;

    let sell_rate = rates.quote(&input.currency, input.sell_year)?;
    ensure_positive("sell_rate", sell_rate)?;

    let real_value_ratio_local = if input.adjust_inflation {
        equity.real_value_ratio * buy_rate / sell_rate
    } else {
        Decimal::ONE
    };

    let local_end_value = equity
        .end_value
        .checked_mul(sell_rate)
        .and_then(|local| local.checked_mul(conversion_drag * real_value_ratio_local))
        .ok_or_else(|| overflow("local end value"))?;
    let annualized_local_return = calc_interest(
        input.principal,
        local_end_value,
        input.buy_year,
        input.sell_year,
    )?;

    Ok(LocalInvestmentValuation {
        local_end_value,
        annualized_local_return,
        reference_end_value: equity.end_value,
        real_value_ratio_local,
        real_value_ratio_reference: equity.real_value_ratio,
        buy_rate,
        sell_rate,
    })
}

/// [`value_in_local_currency`] wrapped in the standard computation envelope.
pub fn local_investment_report<G: ExchangeRateGateway + ?Sized>(
    table: &EquityIndexTable,
    rates: &G,
    input: &LocalInvestmentInput,
) -> InvestResult<ComputationOutput<LocalInvestmentValuation>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = value_in_local_currency(table, rates, input)?;
    if input.currency.is_reference() && !input.conversion_cost_fraction.is_zero() {
        warnings.push(format!(
            "Conversion cost applied although {} is the reference currency",
            input.currency
        ));
    }
    if result.sell_rate > result.buy_rate {
        warnings.push(format!(
            "{} depreciated from {} to {} per reference unit",
            input.currency, result.buy_rate, result.sell_rate
        ));
    }

    Ok(with_metadata(
        "Local currency round trip through the reference-currency total-return index",
        input,
        warnings,
        start.elapsed().as_micros() as u64,
        result,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvestError;
    use crate::fx::gateway::tests::sample_rates;
    use crate::market::index_table::tests::sample_table;
    use rust_decimal_macros::dec;

    fn input(adjust: bool) -> LocalInvestmentInput {
        LocalInvestmentInput {
            principal: dec!(100000),
            currency: CurrencyCode::new("LKR"),
            buy_year: 2000,
            sell_year: 2004,
            costs: CostConfig::new(dec!(0.0015), dec!(0.15)),
            adjust_inflation: adjust,
            conversion_cost_fraction: dec!(0.02),
        }
    }

    #[test]
    fn test_nominal_round_trip() {
        let result = value_in_local_currency(&sample_table(), &sample_rates(), &input(false)).unwrap();
        assert_eq!(result.buy_rate, dec!(50));
        assert_eq!(result.sell_rate, dec!(80));
        assert_eq!(result.real_value_ratio_local, Decimal::ONE);
        assert!((result.reference_end_value - dec!(2785.684447)).abs() < dec!(0.000001));
        assert!((result.local_end_value - dec!(218397.660659)).abs() < dec!(0.000001));
        assert!((result.annualized_local_return - dec!(0.2156596322)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_real_round_trip_composes_fx_and_cpi() {
        let result = value_in_local_currency(&sample_table(), &sample_rates(), &input(true)).unwrap();
        // (100 / 110) * 50 / 80
        assert!((result.real_value_ratio_local - dec!(0.5681818182)).abs() < dec!(0.0000000001));
        assert!((result.local_end_value - dec!(124089.579920)).abs() < dec!(0.000001));
        assert!((result.annualized_local_return - dec!(0.0554406784)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_missing_rate_short_circuits() {
        let mut req = input(false);
        req.sell_year = 2003;
        let err = value_in_local_currency(&sample_table(), &sample_rates(), &req).unwrap_err();
        assert!(matches!(err, InvestError::RateUnavailable { year: 2003, .. }));
    }

    #[test]
    fn test_far_out_of_range_year_is_unavailable() {
        let mut req = input(false);
        req.buy_year = 1881;
        let err = value_in_local_currency(&sample_table(), &sample_rates(), &req).unwrap_err();
        assert!(matches!(err, InvestError::RateUnavailable { year: 1881, .. }));
    }

    #[test]
    fn test_invalid_costs_reported_before_missing_rate() {
        let mut req = input(false);
        req.sell_year = 2003;
        req.costs = CostConfig::new(dec!(1.5), dec!(0.15));
        let err = value_in_local_currency(&sample_table(), &sample_rates(), &req).unwrap_err();
        assert!(matches!(err, InvestError::InvalidFraction { .. }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_rejects_full_conversion_cost() {
        let mut req = input(false);
        req.conversion_cost_fraction = dec!(1);
        let err = value_in_local_currency(&sample_table(), &sample_rates(), &req).unwrap_err();
        assert!(matches!(err, InvestError::InvalidFraction { .. }));
    }

    #[test]
    fn test_report_flags_depreciation() {
        let report = local_investment_report(&sample_table(), &sample_rates(), &input(false)).unwrap();
        assert!(report.warnings.iter().any(|w| w.contains("depreciated")));
    }
}
