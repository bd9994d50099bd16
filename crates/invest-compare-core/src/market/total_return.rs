use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::market::index_table::EquityIndexTable;
use crate::time_value::ensure_fraction;
use crate::types::{Rate, Year};
use crate::InvestResult;

/// Annual drag applied while accumulating the total-return index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostConfig {
    /// Annual expense ratio charged on the holding (0.0015 = 0.15%)
    pub annual_cost_fraction: Rate,
    /// Withholding tax on dividends before reinvestment
    pub dividend_tax_fraction: Rate,
}

impl CostConfig {
    pub fn new(annual_cost_fraction: Rate, dividend_tax_fraction: Rate) -> Self {
        CostConfig {
            annual_cost_fraction,
            dividend_tax_fraction,
        }
    }

    pub fn validate(&self) -> InvestResult<()> {
        ensure_fraction("annual_cost_fraction", self.annual_cost_fraction)?;
        ensure_fraction("dividend_tax_fraction", self.dividend_tax_fraction)
    }
}

/// Cumulative total-return factors, one per table year.
///
/// The first factor is `1 / index_level`, so `factor * index_level` reads as
/// growth of one unit invested in the first table year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalReturnIndexSeries {
    pub first_year: Year,
    pub factors: Vec<Decimal>,
}

impl TotalReturnIndexSeries {
    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    pub fn factor(&self, year: Year) -> Option<Decimal> {
        let offset = year.checked_sub(self.first_year)?;
        if offset < 0 {
            return None;
        }
        self.factors.get(offset as usize).copied()
    }
}

/// Build the total-return series for one cost configuration.
///
/// `f[i] = f[i-1] * (1 + dividend_yield[i] * (1 - dividend_tax)) * (1 - cost)`.
/// The net dividend is reinvested before the cost drag is taken. Years with
/// a negative total return are kept as they are.
pub fn build_total_return_index(
    table: &EquityIndexTable,
    costs: &CostConfig,
) -> InvestResult<TotalReturnIndexSeries> {
    costs.validate()?;

    let records = table.records();
    let mut factors = Vec::with_capacity(records.len());
    let mut factor = Decimal::ONE / records[0].index_level;
    factors.push(factor);

    let net_dividend = Decimal::ONE - costs.dividend_tax_fraction;
    let cost_drag = Decimal::ONE - costs.annual_cost_fraction;

    for record in &records[1..] {
        factor = factor * (Decimal::ONE + record.dividend_yield * net_dividend) * cost_drag;
        factors.push(factor);
    }

    Ok(TotalReturnIndexSeries {
        first_year: table.first_year(),
        factors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvestError;
    use crate::market::index_table::tests::sample_table;
    use rust_decimal_macros::dec;

    #[test]
    fn test_series_matches_table_length_and_seed() {
        let table = sample_table();
        let series = build_total_return_index(&table, &CostConfig::default()).unwrap();
        assert_eq!(series.len(), table.len());
        assert_eq!(series.factors[0] * table.records()[0].index_level, Decimal::ONE);
    }

    #[test]
    fn test_series_without_costs() {
        let table = sample_table();
        let series = build_total_return_index(&table, &CostConfig::default()).unwrap();
        // 0.01 * 1.02 * 1.02 * 1.03 * 1.025 * 1.02
        assert_eq!(series.factor(2001), Some(dec!(0.0102)));
        assert_eq!(series.factor(2002), Some(dec!(0.010506)));
        assert!((series.factor(2004).unwrap() - dec!(0.010984023)).abs() < dec!(0.000000001));
    }

    #[test]
    fn test_dividend_reinvested_before_cost_drag() {
        let table = sample_table();
        let costs = CostConfig::new(dec!(0.01), dec!(0.15));
        let series = build_total_return_index(&table, &costs).unwrap();
        // 0.01 * (1 + 0.02 * 0.85) * 0.99
        assert_eq!(series.factor(2001), Some(dec!(0.0100683)));
        assert!((series.factor(2004).unwrap() - dec!(0.0104051997)).abs() < dec!(0.0000000001));
    }

    #[test]
    fn test_factor_outside_series() {
        let table = sample_table();
        let series = build_total_return_index(&table, &CostConfig::default()).unwrap();
        assert_eq!(series.factor(1999), None);
        assert_eq!(series.factor(2005), None);
    }

    #[test]
    fn test_full_cost_rejected() {
        let table = sample_table();
        let err = build_total_return_index(&table, &CostConfig::new(dec!(1), dec!(0))).unwrap_err();
        assert!(matches!(err, InvestError::InvalidFraction { .. }));
    }
}
