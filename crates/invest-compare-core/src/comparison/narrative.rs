use rust_decimal::Decimal;
use std::fmt::Write;

use crate::comparison::compare::{ComparisonRequest, ComparisonResult};
use crate::types::REFERENCE_CURRENCY;

fn pct(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).round_dp(2))
}

fn amount(value: Decimal) -> String {
    value.round_dp(0).to_string()
}

/// Markdown summary of a comparison. Every figure comes straight from
/// `result`; nothing is recomputed here apart from rounding for display.
pub fn render(request: &ComparisonRequest, result: &ComparisonResult) -> String {
    let cur = &request.currency;
    let (byr, syr) = (request.buy_year, request.sell_year);
    let mut out = String::new();

    let _ = writeln!(out, "## The Story\n");
    let _ = writeln!(
        out,
        "A property bought in {byr} for {} {cur} and sold in {syr} for {} {cur} \
         appreciated by {} a year after selling costs.",
        amount(request.buy_price),
        amount(request.sell_price),
        pct(result.property_appreciation_rate),
    );
    let _ = writeln!(
        out,
        "Renting it out at {} of its value a year (less {} in costs) and reinvesting \
         the rent at the same pace adds {} {cur}, for a total of {} {cur} \
         ({} a year).\n",
        pct(request.rental_income_fraction),
        pct(request.rental_cost_fraction),
        amount(result.reinvested_rental_value),
        amount(result.gross_property_end_value),
        pct(result.property_total_return_rate),
    );

    let _ = writeln!(
        out,
        "Converting the same {} {cur} to {REFERENCE_CURRENCY} at {} {cur}/{REFERENCE_CURRENCY} \
         and holding the index grows to {} {REFERENCE_CURRENCY}. Converted back at {} \
         {cur}/{REFERENCE_CURRENCY}, that is {} {cur} ({} a year).\n",
        amount(request.buy_price),
        result.buy_rate.round_dp(4),
        amount(result.equity_reference_end_value),
        result.sell_rate.round_dp(4),
        amount(result.equity_local_end_value),
        pct(result.equity_local_annual_return),
    );

    if request.adjust_inflation {
        let _ = writeln!(
            out,
            "In {byr} {cur}, the property is worth {} ({} a year in real terms). \
             Between {byr} and {syr} the {cur} kept {} of its value; the \
             {REFERENCE_CURRENCY} kept {}.\n",
            amount(result.real_property_end_value),
            pct(result.real_property_annual_return),
            pct(result.real_value_ratio_local),
            pct(result.real_value_ratio_reference),
        );
    }

    let verdict = if result.property_advantage() >= Decimal::ZERO {
        "the property"
    } else {
        "the index"
    };
    let _ = writeln!(
        out,
        "Over {byr}–{syr}, **{verdict}** came out ahead by {} a year.\n",
        pct(result.property_advantage().abs()),
    );

    let _ = writeln!(out, "## Small Print\n");
    let _ = writeln!(
        out,
        "\"Inflation\" here converts an amount of {cur} to {REFERENCE_CURRENCY} in {byr}, \
         scales it by the {REFERENCE_CURRENCY} consumer price ratio CPI({byr})/CPI({syr}) \
         and converts it back in {syr}. The loss is one minus the ratio of the final to \
         the initial amount. Annual average market exchange rates are used rather than \
         purchasing-power-parity rates, which assumes relative PPP holds over the period."
    );

    out
}
