use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::time_value::{
    calc_interest, ensure_fraction, ensure_period, ensure_positive, holding_years, overflow,
};
use crate::types::{with_metadata, ComputationOutput, Money, Rate, Year};
use crate::InvestResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A property bought and sold in local currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyScenario {
    pub buy_price: Money,
    pub sell_price: Money,
    pub buy_year: Year,
    pub sell_year: Year,
    /// Gross annual rent as a fraction of the property's value
    pub rental_income_fraction: Rate,
    /// Share of rent lost to maintenance, management and vacancy
    pub rental_cost_fraction: Rate,
    /// Agent fees and taxes on sale, as a fraction of the sell price
    #[serde(default)]
    pub selling_cost_fraction: Rate,
}

/// Annualised property returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyReturns {
    /// Price-only appreciation on the gross sell price
    pub appreciation_rate: Rate,
    /// Price-only appreciation after selling costs
    pub net_appreciation_rate: Rate,
    /// Appreciation plus reinvested rent, after selling costs
    pub total_return_rate: Rate,
    /// Accumulated rent, reinvested at the appreciation rate, at `sell_year`
    pub reinvested_rental_value: Money,
}

impl PropertyScenario {
    pub fn validate(&self) -> InvestResult<()> {
        ensure_period(self.buy_year, self.sell_year)?;
        ensure_positive("buy_price", self.buy_price)?;
        ensure_positive("sell_price", self.sell_price)?;
        ensure_fraction("rental_income_fraction", self.rental_income_fraction)?;
        ensure_fraction("rental_cost_fraction", self.rental_cost_fraction)?;
        ensure_fraction("selling_cost_fraction", self.selling_cost_fraction)
    }

    /// Sell price after selling costs
    pub fn net_sell_price(&self) -> Money {
        self.sell_price * (Decimal::ONE - self.selling_cost_fraction)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compound price appreciation and reinvested net rent over the holding
/// period.
///
/// Rent is reinvested at the gross appreciation rate (before selling costs).
/// The first year's rent is recognised at year end without rental costs;
/// later years pay `rental_cost_fraction` of the rent.
pub fn property_returns(scenario: &PropertyScenario) -> InvestResult<PropertyReturns> {
    scenario.validate()?;

    let (buy_year, sell_year) = (scenario.buy_year, scenario.sell_year);
    let years = holding_years(buy_year, sell_year)?;
    let appreciation_rate =
        calc_interest(scenario.buy_price, scenario.sell_price, buy_year, sell_year)?;
    let net_appreciation_rate =
        calc_interest(scenario.buy_price, scenario.net_sell_price(), buy_year, sell_year)?;

    let growth = Decimal::ONE + appreciation_rate;
    let net_rent = scenario.rental_income_fraction * (Decimal::ONE - scenario.rental_cost_fraction);
    let grow = |value: Decimal| value.checked_mul(growth).ok_or_else(|| overflow("property value"));

    let mut current_value = scenario.buy_price;
    let mut accrued = current_value * scenario.rental_income_fraction;
    current_value = grow(current_value)?;

    for _ in 1..years {
        accrued = current_value
            .checked_mul(net_rent)
            .and_then(|rent| accrued.checked_add(rent))
            .ok_or_else(|| overflow("reinvested rent"))?;
        accrued = grow(accrued)?;
        current_value = grow(current_value)?;
    }

    let end_value = scenario
        .net_sell_price()
        .checked_add(accrued)
        .ok_or_else(|| overflow("property end value"))?;
    let total_return_rate = calc_interest(scenario.buy_price, end_value, buy_year, sell_year)?;

    Ok(PropertyReturns {
        appreciation_rate,
        net_appreciation_rate,
        total_return_rate,
        reinvested_rental_value: accrued,
    })
}

/// [`property_returns`] wrapped in the standard computation envelope.
pub fn property_returns_report(
    scenario: &PropertyScenario,
) -> InvestResult<ComputationOutput<PropertyReturns>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let result = property_returns(scenario)?;
    if scenario.sell_price < scenario.buy_price {
        warnings.push("Property sold below its purchase price".into());
    }
    if scenario.rental_income_fraction.is_zero() {
        warnings.push("No rental income: total return is appreciation only".into());
    }

    Ok(with_metadata(
        "Property appreciation with rent reinvested at the appreciation rate",
        scenario,
        warnings,
        start.elapsed().as_micros() as u64,
        result,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvestError;
    use rust_decimal_macros::dec;

    fn scenario(selling_cost: Decimal) -> PropertyScenario {
        PropertyScenario {
            buy_price: dec!(1000),
            sell_price: dec!(2000),
            buy_year: 2001,
            sell_year: 2011,
            rental_income_fraction: dec!(0.03),
            rental_cost_fraction: dec!(0.25),
            selling_cost_fraction: selling_cost,
        }
    }

    #[test]
    fn test_reference_rental_scenario() {
        let result = property_returns(&scenario(dec!(0))).unwrap();
        assert!((result.appreciation_rate - dec!(0.0717734625)).abs() < dec!(0.0000001));
        assert_eq!(result.appreciation_rate, result.net_appreciation_rate);
        assert!((result.total_return_rate - dec!(0.0942356083)).abs() < dec!(0.0000001));
        assert!((result.reinvested_rental_value - dec!(460.981979)).abs() < dec!(0.00001));
    }

    #[test]
    fn test_selling_cost_does_not_touch_reinvestment_rate() {
        let gross = property_returns(&scenario(dec!(0))).unwrap();
        let net = property_returns(&scenario(dec!(0.05))).unwrap();
        assert_eq!(net.appreciation_rate, gross.appreciation_rate);
        assert_eq!(net.reinvested_rental_value, gross.reinvested_rental_value);
        assert!((net.net_appreciation_rate - dec!(0.0662900585)).abs() < dec!(0.0000001));
        assert!((net.total_return_rate - dec!(0.0897058120)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_one_year_hold_keeps_first_year_rent_gross() {
        let s = PropertyScenario {
            buy_price: dec!(1000),
            sell_price: dec!(1500),
            buy_year: 2000,
            sell_year: 2001,
            rental_income_fraction: dec!(0.05),
            rental_cost_fraction: dec!(0.2),
            selling_cost_fraction: dec!(0),
        };
        let result = property_returns(&s).unwrap();
        assert_eq!(result.appreciation_rate, dec!(0.5));
        assert_eq!(result.reinvested_rental_value, dec!(50));
        assert_eq!(result.total_return_rate, dec!(0.55));
    }

    #[test]
    fn test_rejects_same_year() {
        let mut s = scenario(dec!(0));
        s.sell_year = s.buy_year;
        assert!(matches!(
            property_returns(&s).unwrap_err(),
            InvestError::InvalidPeriod { .. }
        ));
    }

    #[test]
    fn test_rejects_span_beyond_limit() {
        let mut s = scenario(dec!(0));
        s.buy_year = 1;
        s.sell_year = i32::MAX;
        assert!(matches!(
            property_returns(&s).unwrap_err(),
            InvestError::InvalidPeriod { .. }
        ));
    }

    #[test]
    fn test_prices_near_decimal_max_report_overflow() {
        let s = PropertyScenario {
            buy_price: dec!(10000000000000000000000000000),
            sell_price: dec!(70000000000000000000000000000),
            buy_year: 2001,
            sell_year: 2011,
            rental_income_fraction: dec!(0.5),
            rental_cost_fraction: dec!(0),
            selling_cost_fraction: dec!(0),
        };
        assert!(matches!(
            property_returns(&s).unwrap_err(),
            InvestError::DegenerateBase { .. }
        ));
    }

    #[test]
    fn test_rejects_full_rental_cost() {
        let mut s = scenario(dec!(0));
        s.rental_cost_fraction = dec!(1);
        assert!(matches!(
            property_returns(&s).unwrap_err(),
            InvestError::InvalidFraction { .. }
        ));
    }

    #[test]
    fn test_report_warns_on_loss() {
        let mut s = scenario(dec!(0));
        s.sell_price = dec!(800);
        let report = property_returns_report(&s).unwrap();
        assert!(report.warnings.iter().any(|w| w.contains("below")));
    }
}
