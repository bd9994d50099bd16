use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::market::index_table::EquityIndexTable;
use crate::market::inflation::real_value_ratio;
use crate::market::total_return::{build_total_return_index, CostConfig};
use crate::time_value::{compose_real_return, ensure_period, ensure_positive, overflow};
use crate::types::{with_metadata, ComputationOutput, Money, Rate, Year};
use crate::InvestResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Input for valuing an index holding in the reference currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquityValuationInput {
    /// Amount invested at the start of `buy_year`
    pub principal: Money,
    pub buy_year: Year,
    pub sell_year: Year,
    #[serde(default)]
    pub costs: CostConfig,
    /// Restate the return in buy-year purchasing power
    #[serde(default)]
    pub adjust_inflation: bool,
}

/// Result of an index holding valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityValuation {
    /// Nominal end value, dividends reinvested net of tax and costs
    pub end_value: Money,
    /// Total return over the period; real when inflation adjustment is on
    pub return_fraction: Rate,
    /// CPI ratio buy/sell, or 1 without inflation adjustment
    pub real_value_ratio: Decimal,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Value `principal` held in the index from `buy_year` to `sell_year`.
///
/// `end_value = principal * (f[sell] * level[sell]) / (f[buy] * level[buy])`
/// where `f` is the total-return series for the configured costs.
pub fn value_equity(
    table: &EquityIndexTable,
    input: &EquityValuationInput,
) -> InvestResult<EquityValuation> {
    ensure_period(input.buy_year, input.sell_year)?;
    ensure_positive("principal", input.principal)?;

    let series = build_total_return_index(table, &input.costs)?;
    let buy = table.position(input.buy_year, "equity index")?;
    let sell = table.position(input.sell_year, "equity index")?;
    let records = table.records();

    let start_growth = series.factors[buy] * records[buy].index_level;
    let end_growth = series.factors[sell] * records[sell].index_level;
    let end_value = input
        .principal
        .checked_mul(end_growth)
        .and_then(|grown| grown.checked_div(start_growth))
        .ok_or_else(|| overflow("equity end value"))?;

    let mut return_fraction = end_value / input.principal - Decimal::ONE;
    let mut ratio = Decimal::ONE;
    if input.adjust_inflation {
        ratio = real_value_ratio(table, input.buy_year, input.sell_year)?;
        return_fraction = compose_real_return(return_fraction, ratio);
    }

    Ok(EquityValuation {
        end_value,
        return_fraction,
        real_value_ratio: ratio,
    })
}

/// [`value_equity`] wrapped in the standard computation envelope.
pub fn equity_valuation_report(
    table: &EquityIndexTable,
    input: &EquityValuationInput,
) -> InvestResult<ComputationOutput<EquityValuation>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = value_equity(table, input)?;
    if result.return_fraction < Decimal::ZERO {
        warnings.push(format!(
            "Holding lost value over {}-{}",
            input.buy_year, input.sell_year
        ));
    }

    let methodology = if input.adjust_inflation {
        "Total-return index valuation (dividends reinvested, CPI-adjusted return)"
    } else {
        "Total-return index valuation (dividends reinvested, nominal return)"
    };

    Ok(with_metadata(
        methodology,
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
    use crate::market::index_table::tests::sample_table;
    use rust_decimal_macros::dec;

    fn input(buy: Year, sell: Year, costs: CostConfig, adjust: bool) -> EquityValuationInput {
        EquityValuationInput {
            principal: dec!(1000),
            buy_year: buy,
            sell_year: sell,
            costs,
            adjust_inflation: adjust,
        }
    }

    #[test]
    fn test_single_year_is_price_ratio_times_dividend() {
        let table = sample_table();
        let result = value_equity(&table, &input(2001, 2002, CostConfig::default(), false)).unwrap();
        // 1000 * 99/110 * 1.03
        assert_eq!(result.end_value, dec!(927));
        assert_eq!(result.return_fraction, dec!(-0.073));
        assert_eq!(result.real_value_ratio, Decimal::ONE);
    }

    #[test]
    fn test_full_table_nominal() {
        let table = sample_table();
        let result = value_equity(&table, &input(2000, 2004, CostConfig::default(), false)).unwrap();
        // 1000 * 1.32 * 1.02 * 1.03 * 1.025 * 1.02
        assert!((result.end_value - dec!(1449.891036)).abs() < dec!(0.000001));
        assert!((result.return_fraction - dec!(0.449891036)).abs() < dec!(0.000000001));
    }

    #[test]
    fn test_costs_and_inflation() {
        let table = sample_table();
        let costs = CostConfig::new(dec!(0.01), dec!(0.15));
        let result = value_equity(&table, &input(2000, 2004, costs, true)).unwrap();
        assert!((result.end_value - dec!(1373.4863564)).abs() < dec!(0.0000001));
        assert_eq!(result.real_value_ratio, dec!(100) / dec!(110));
        assert!((result.return_fraction - dec!(0.2486239604)).abs() < dec!(0.0000000001));
    }

    #[test]
    fn test_principal_not_mutated_and_scales_linearly() {
        let table = sample_table();
        let mut doubled = input(2000, 2004, CostConfig::default(), false);
        doubled.principal = dec!(2000);
        let base = value_equity(&table, &input(2000, 2004, CostConfig::default(), false)).unwrap();
        let twice = value_equity(&table, &doubled).unwrap();
        assert_eq!(doubled.principal, dec!(2000));
        assert_eq!(twice.end_value, base.end_value * dec!(2));
    }

    #[test]
    fn test_rejects_zero_length_period() {
        let table = sample_table();
        let err = value_equity(&table, &input(2002, 2002, CostConfig::default(), false)).unwrap_err();
        assert!(matches!(err, InvestError::InvalidPeriod { .. }));
    }

    #[test]
    fn test_year_outside_table() {
        let table = sample_table();
        let err = value_equity(&table, &input(1995, 2002, CostConfig::default(), false)).unwrap_err();
        assert!(matches!(err, InvestError::MissingYearData { year: 1995, .. }));
    }

    #[test]
    fn test_report_warns_on_loss() {
        let table = sample_table();
        let report =
            equity_valuation_report(&table, &input(2001, 2002, CostConfig::default(), false)).unwrap();
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.result.end_value, dec!(927));
    }
}
