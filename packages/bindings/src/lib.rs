use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use invest_compare_core::comparison::compare::{self, ComparisonRequest};
use invest_compare_core::comparison::narrative;
use invest_compare_core::equity::cross_currency::{self, LocalInvestmentInput};
use invest_compare_core::equity::valuation::{self, EquityValuationInput};
use invest_compare_core::fx::gateway::ExchangeRateQuote;
use invest_compare_core::property::returns::{self, PropertyScenario};
use invest_compare_core::{EquityIndexTable, ExchangeRateTable};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// JavaScript callers send the market data alongside each request.
#[derive(Deserialize)]
struct WithMarketData<T> {
    #[serde(flatten)]
    input: T,
    index_table: EquityIndexTable,
    #[serde(default)]
    rates: Vec<ExchangeRateQuote>,
}

impl<T> WithMarketData<T> {
    fn rate_table(&self) -> NapiResult<ExchangeRateTable> {
        ExchangeRateTable::from_quotes(self.rates.iter().cloned()).map_err(to_napi_error)
    }
}

// ---------------------------------------------------------------------------
// Equity
// ---------------------------------------------------------------------------

#[napi]
pub fn equity_end_value(input_json: String) -> NapiResult<String> {
    let binding_input: WithMarketData<EquityValuationInput> =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        valuation::equity_valuation_report(&binding_input.index_table, &binding_input.input)
            .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn local_currency_end_value(input_json: String) -> NapiResult<String> {
    let binding_input: WithMarketData<LocalInvestmentInput> =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let rates = binding_input.rate_table()?;
    let output = cross_currency::local_investment_report(
        &binding_input.index_table,
        &rates,
        &binding_input.input,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Property
// ---------------------------------------------------------------------------

#[napi]
pub fn property_returns(input_json: String) -> NapiResult<String> {
    let input: PropertyScenario = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = returns::property_returns_report(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_investments(input_json: String) -> NapiResult<String> {
    let binding_input: WithMarketData<ComparisonRequest> =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let rates = binding_input.rate_table()?;
    let output =
        compare::comparison_report(&binding_input.input, &binding_input.index_table, &rates)
            .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn comparison_narrative(input_json: String) -> NapiResult<String> {
    let binding_input: WithMarketData<ComparisonRequest> =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let rates = binding_input.rate_table()?;
    let result = compare::compare(&binding_input.input, &binding_input.index_table, &rates)
        .map_err(to_napi_error)?;
    Ok(narrative::render(&binding_input.input, &result))
}
