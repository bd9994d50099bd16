use rust_decimal::Decimal;

use crate::market::index_table::EquityIndexTable;
use crate::types::Year;
use crate::InvestResult;

/// Real-value ratio `cpi[start_year] / cpi[end_year]`.
///
/// Multiplying an `end_year` nominal amount by the ratio restates it in
/// `start_year` purchasing power.
pub fn real_value_ratio(
    table: &EquityIndexTable,
    start_year: Year,
    end_year: Year,
) -> InvestResult<Decimal> {
    let start = table.position(start_year, "CPI")?;
    let end = table.position(end_year, "CPI")?;
    let records = table.records();
    Ok(records[start].cpi / records[end].cpi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvestError;
    use crate::market::index_table::tests::sample_table;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ratio_is_start_over_end() {
        let table = sample_table();
        let ratio = real_value_ratio(&table, 2000, 2004).unwrap();
        assert_eq!(ratio, dec!(100) / dec!(110));
    }

    #[test]
    fn test_same_year_is_one() {
        let table = sample_table();
        assert_eq!(real_value_ratio(&table, 2002, 2002).unwrap(), Decimal::ONE);
    }

    #[test]
    fn test_missing_cpi_year() {
        let table = sample_table();
        let err = real_value_ratio(&table, 2000, 2010).unwrap_err();
        assert!(matches!(err, InvestError::MissingYearData { year: 2010, .. }));
    }
}
