use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::InvestError;
use crate::types::{CurrencyCode, Rate, Year};
use crate::InvestResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A yearly average exchange rate.
///
/// `rate` is quoted as local-currency units per one unit of the reference
/// currency (e.g. 196.12 LKR per USD).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRateQuote {
    pub currency: CurrencyCode,
    pub year: Year,
    pub rate: Rate,
}

/// Source of historical exchange rates.
///
/// Implementations return [`InvestError::RateUnavailable`] when they hold no
/// quote for the pair; a missing quote is never reported as 0 or 1. Any retry
/// policy belongs to the implementation.
pub trait ExchangeRateGateway {
    /// Local-currency units per one reference-currency unit for `year`.
    fn quote(&self, currency: &CurrencyCode, year: Year) -> InvestResult<Rate>;
}

impl<G: ExchangeRateGateway + ?Sized> ExchangeRateGateway for &G {
    fn quote(&self, currency: &CurrencyCode, year: Year) -> InvestResult<Rate> {
        (**self).quote(currency, year)
    }
}

impl<G: ExchangeRateGateway + ?Sized> ExchangeRateGateway for Box<G> {
    fn quote(&self, currency: &CurrencyCode, year: Year) -> InvestResult<Rate> {
        (**self).quote(currency, year)
    }
}

// ---------------------------------------------------------------------------
// In-memory rate store
// ---------------------------------------------------------------------------

/// Rates held in memory, keyed by currency then year.
///
/// The reference currency always quotes at 1.
#[derive(Debug, Clone, Default)]
pub struct ExchangeRateTable {
    rates: HashMap<CurrencyCode, BTreeMap<Year, Rate>>,
}

impl ExchangeRateTable {
    pub fn new() -> Self {
        ExchangeRateTable::default()
    }

    pub fn from_quotes(quotes: impl IntoIterator<Item = ExchangeRateQuote>) -> InvestResult<Self> {
        let mut table = ExchangeRateTable::new();
        for quote in quotes {
            table.insert(quote)?;
        }
        Ok(table)
    }

    /// Add or replace a quote. Non-positive rates are rejected.
    pub fn insert(&mut self, quote: ExchangeRateQuote) -> InvestResult<()> {
        if quote.rate <= Decimal::ZERO {
            return Err(InvestError::InvalidInput {
                field: format!("rate[{}/{}]", quote.currency, quote.year),
                reason: format!("exchange rate must be positive, got {}", quote.rate),
            });
        }
        self.rates
            .entry(quote.currency)
            .or_default()
            .insert(quote.year, quote.rate);
        Ok(())
    }

    /// Years with a quote for `currency`, ascending.
    pub fn years_for(&self, currency: &CurrencyCode) -> Vec<Year> {
        self.rates
            .get(currency)
            .map(|years| years.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Currencies with at least one quote, sorted by code.
    pub fn currencies(&self) -> Vec<CurrencyCode> {
        let mut codes: Vec<CurrencyCode> = self.rates.keys().cloned().collect();
        codes.sort();
        codes
    }

    pub fn len(&self) -> usize {
        self.rates.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ExchangeRateGateway for ExchangeRateTable {
    fn quote(&self, currency: &CurrencyCode, year: Year) -> InvestResult<Rate> {
        if currency.is_reference() {
            return Ok(Decimal::ONE);
        }
        match self.rates.get(currency).and_then(|years| years.get(&year)) {
            Some(rate) => {
                debug!("fx quote {currency} {year} = {rate}");
                Ok(*rate)
            }
            None => {
                debug!("fx quote {currency} {year} unavailable");
                Err(InvestError::RateUnavailable {
                    currency: currency.to_string(),
                    year,
                })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Convention adapter
// ---------------------------------------------------------------------------

/// Wraps a gateway that quotes reference-currency units per local unit and
/// inverts each quote, so the engine only ever sees local-per-reference.
#[derive(Debug, Clone)]
pub struct InverseQuotes<G> {
    inner: G,
}

impl<G: ExchangeRateGateway> InverseQuotes<G> {
    pub fn new(inner: G) -> Self {
        InverseQuotes { inner }
    }

    pub fn into_inner(self) -> G {
        self.inner
    }
}

impl<G: ExchangeRateGateway> ExchangeRateGateway for InverseQuotes<G> {
    fn quote(&self, currency: &CurrencyCode, year: Year) -> InvestResult<Rate> {
        let rate = self.inner.quote(currency, year)?;
        if rate <= Decimal::ZERO {
            return Err(InvestError::InvalidInput {
                field: format!("rate[{currency}/{year}]"),
                reason: format!("exchange rate must be positive, got {rate}"),
            });
        }
        Ok(Decimal::ONE / rate)
    }
}
