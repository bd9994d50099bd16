use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::InvestError;
use crate::types::{Money, Rate, Year};
use crate::InvestResult;

/// Longest holding period accepted, in years
pub const MAX_HOLDING_YEARS: i64 = 500;

/// Reject holding periods that are empty, run backwards, or exceed
/// [`MAX_HOLDING_YEARS`].
pub fn ensure_period(buy_year: Year, sell_year: Year) -> InvestResult<()> {
    holding_years(buy_year, sell_year).map(|_| ())
}

/// Number of years between `buy_year` and `sell_year`, validated.
pub fn holding_years(buy_year: Year, sell_year: Year) -> InvestResult<i64> {
    let years = i64::from(sell_year) - i64::from(buy_year);
    if years <= 0 || years > MAX_HOLDING_YEARS {
        return Err(InvestError::InvalidPeriod {
            buy_year,
            sell_year,
        });
    }
    Ok(years)
}

/// Error for a Decimal operation that left the representable range.
pub fn overflow(context: &str) -> InvestError {
    InvestError::DegenerateBase {
        context: format!("{context} overflows the decimal range"),
    }
}

/// Cost, tax and rental fractions must lie in [0, 1). A fraction of exactly
/// one wipes the position out and is rejected.
pub fn ensure_fraction(field: &str, value: Rate) -> InvestResult<()> {
    if value < Decimal::ZERO || value >= Decimal::ONE {
        return Err(InvestError::InvalidFraction {
            field: field.into(),
            value,
        });
    }
    Ok(())
}

pub fn ensure_positive(field: &str, value: Money) -> InvestResult<()> {
    if value <= Decimal::ZERO {
        return Err(InvestError::InvalidInput {
            field: field.into(),
            reason: format!("must be positive, got {value}"),
        });
    }
    Ok(())
}

/// Constant yearly rate that compounds to `growth_factor` over `years`.
///
/// `growth_factor` is end value over start value. A zero factor (total loss)
/// annualises to -100%; a negative factor has no real root and is rejected.
pub fn annualize(growth_factor: Decimal, years: i64) -> InvestResult<Rate> {
    if years <= 0 {
        return Err(InvestError::DegenerateBase {
            context: format!("cannot annualise over {years} years"),
        });
    }
    if growth_factor < Decimal::ZERO {
        return Err(InvestError::DegenerateBase {
            context: format!("negative growth factor {growth_factor} has no real root"),
        });
    }
    if growth_factor.is_zero() {
        return Ok(-Decimal::ONE);
    }
    if years == 1 {
        return Ok(growth_factor - Decimal::ONE);
    }

    let exponent = Decimal::ONE / Decimal::from(years);
    let root = growth_factor
        .checked_powd(exponent)
        .ok_or_else(|| InvestError::DegenerateBase {
            context: format!("{growth_factor}^(1/{years}) is out of range"),
        })?;
    Ok(root - Decimal::ONE)
}

/// Annualised geometric return between a buy and a sell price.
///
/// `(1 + (sell - buy) / buy) ^ (1 / (sell_year - buy_year)) - 1`
pub fn calc_interest(
    buy_price: Money,
    sell_price: Money,
    buy_year: Year,
    sell_year: Year,
) -> InvestResult<Rate> {
    let years = holding_years(buy_year, sell_year)?;
    if buy_price <= Decimal::ZERO {
        return Err(InvestError::DegenerateBase {
            context: format!("buy value must be positive, got {buy_price}"),
        });
    }

    let growth = sell_price
        .checked_sub(buy_price)
        .and_then(|gain| gain.checked_div(buy_price))
        .and_then(|ratio| ratio.checked_add(Decimal::ONE))
        .ok_or_else(|| overflow("price growth"))?;
    annualize(growth, years)
}

/// Restate a nominal total return in start-year purchasing power.
///
/// `ratio` is the real-value ratio (start-year prices over end-year prices).
pub fn compose_real_return(nominal_return: Rate, ratio: Decimal) -> Rate {
    (nominal_return + Decimal::ONE) * ratio - Decimal::ONE
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_calc_interest_doubling_over_ten_years() {
        let rate = calc_interest(dec!(1000), dec!(2000), 2001, 2011).unwrap();
        // 2^(1/10) - 1 = 0.0717734625...
        assert!((rate - dec!(0.0717734625)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_calc_interest_flat_price_is_zero() {
        let rate = calc_interest(dec!(100), dec!(100), 1990, 2020).unwrap();
        assert!(rate.abs() < dec!(0.0000000001));
    }

    #[test]
    fn test_calc_interest_single_year_is_exact() {
        let rate = calc_interest(dec!(200), dec!(230), 2010, 2011).unwrap();
        assert_eq!(rate, dec!(0.15));
    }

    #[test]
    fn test_calc_interest_total_loss() {
        let rate = calc_interest(dec!(500), dec!(0), 2000, 2005).unwrap();
        assert_eq!(rate, dec!(-1));
    }

    #[test]
    fn test_calc_interest_rejects_zero_length_period() {
        let err = calc_interest(dec!(100), dec!(120), 2005, 2005).unwrap_err();
        assert!(matches!(err, InvestError::InvalidPeriod { .. }));
    }

    #[test]
    fn test_calc_interest_rejects_non_positive_buy() {
        let err = calc_interest(dec!(0), dec!(120), 2000, 2005).unwrap_err();
        assert!(matches!(err, InvestError::DegenerateBase { .. }));
        let err = calc_interest(dec!(-10), dec!(120), 2000, 2005).unwrap_err();
        assert!(matches!(err, InvestError::DegenerateBase { .. }));
    }

    #[test]
    fn test_calc_interest_rejects_negative_growth() {
        let err = calc_interest(dec!(100), dec!(-50), 2000, 2004).unwrap_err();
        assert!(matches!(err, InvestError::DegenerateBase { .. }));
    }

    #[test]
    fn test_extreme_years_are_invalid_period() {
        let err = calc_interest(dec!(100), dec!(200), i32::MIN, i32::MAX).unwrap_err();
        assert!(matches!(err, InvestError::InvalidPeriod { .. }));
        assert!(ensure_period(1500, 2001).is_err());
        assert_eq!(holding_years(1501, 2001).unwrap(), MAX_HOLDING_YEARS);
    }

    #[test]
    fn test_calc_interest_overflow_is_error() {
        let err = calc_interest(dec!(0.0000001), Decimal::MAX, 2000, 2010).unwrap_err();
        assert!(matches!(err, InvestError::DegenerateBase { .. }));
    }

    #[test]
    fn test_ensure_fraction_bounds() {
        assert!(ensure_fraction("cost", dec!(0)).is_ok());
        assert!(ensure_fraction("cost", dec!(0.9999)).is_ok());
        assert!(ensure_fraction("cost", dec!(1)).is_err());
        assert!(ensure_fraction("cost", dec!(-0.01)).is_err());
    }

    #[test]
    fn test_compose_real_return() {
        // 100% nominal with half the purchasing power left is flat in real terms
        assert_eq!(compose_real_return(dec!(1), dec!(0.5)), dec!(0));
    }
}
