use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::InvestError;
use crate::types::{Rate, Year};
use crate::InvestResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One calendar year of equity-index history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    pub year: Year,
    /// Market price level of the index
    pub index_level: Decimal,
    /// Dividend yield for the year as a fraction (0.018 = 1.8%)
    pub dividend_yield: Rate,
    /// Consumer price index on an arbitrary base
    pub cpi: Decimal,
}

/// Validated, read-only yearly table: contiguous years in ascending order.
///
/// Construct once with [`EquityIndexTable::new`] and share by reference;
/// nothing in the crate mutates it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityIndexTable {
    records: Vec<YearRecord>,
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl EquityIndexTable {
    /// Validate and wrap a set of yearly records.
    ///
    /// Rejects an empty table, non-positive index levels or CPI values, and
    /// any year sequence that is not strictly ascending by one.
    pub fn new(records: Vec<YearRecord>) -> InvestResult<Self> {
        if records.is_empty() {
            return Err(InvestError::InvalidTable("table has no rows".into()));
        }

        for record in &records {
            if record.index_level <= Decimal::ZERO {
                return Err(InvestError::InvalidTable(format!(
                    "index level for {} must be positive, got {}",
                    record.year, record.index_level
                )));
            }
            if record.cpi <= Decimal::ZERO {
                return Err(InvestError::InvalidTable(format!(
                    "CPI for {} must be positive, got {}",
                    record.year, record.cpi
                )));
            }
        }

        for pair in records.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.year <= prev.year {
                return Err(InvestError::InvalidTable(format!(
                    "years must be ascending and unique: {} follows {}",
                    next.year, prev.year
                )));
            }
            if next.year != prev.year + 1 {
                return Err(InvestError::InvalidTable(format!(
                    "gap between {} and {}",
                    prev.year, next.year
                )));
            }
        }

        debug!(
            "loaded equity index table {}..={} ({} rows)",
            records[0].year,
            records[records.len() - 1].year,
            records.len()
        );

        Ok(EquityIndexTable { records })
    }

    /// Like [`EquityIndexTable::new`] but sorts by year first. Duplicates
    /// and gaps are still rejected.
    pub fn from_unsorted(mut records: Vec<YearRecord>) -> InvestResult<Self> {
        records.sort_by_key(|r| r.year);
        EquityIndexTable::new(records)
    }
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

impl EquityIndexTable {
    pub fn records(&self) -> &[YearRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_year(&self) -> Year {
        self.records[0].year
    }

    pub fn last_year(&self) -> Year {
        self.records[self.records.len() - 1].year
    }

    pub fn contains(&self, year: Year) -> bool {
        (self.first_year()..=self.last_year()).contains(&year)
    }

    /// Row position of `year`. Contiguity makes this an offset from the
    /// first year.
    pub fn position(&self, year: Year, source_name: &str) -> InvestResult<usize> {
        if !self.contains(year) {
            return Err(InvestError::MissingYearData {
                source_name: source_name.into(),
                year,
            });
        }
        Ok((year - self.first_year()) as usize)
    }

    pub fn record(&self, year: Year) -> InvestResult<&YearRecord> {
        let idx = self.position(year, "equity index")?;
        Ok(&self.records[idx])
    }
}

impl<'de> Deserialize<'de> for EquityIndexTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            records: Vec<YearRecord>,
        }

        let raw = Raw::deserialize(deserializer)?;
        EquityIndexTable::new(raw.records).map_err(serde::de::Error::custom)
    }
}
