use log::debug;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use invest_compare_core::fx::gateway::ExchangeRateQuote;
use invest_compare_core::{CurrencyCode, EquityIndexTable, ExchangeRateTable, YearRecord};

/// Read a JSON file and deserialise into a typed struct.
pub fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    let value: T = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;
    Ok(value)
}

/// Row of the yearly equity-index CSV (`Year,Value,DividendYield_percent,CPI`).
#[derive(Debug, Deserialize)]
struct IndexRow {
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Value", with = "rust_decimal::serde::str")]
    value: Decimal,
    #[serde(rename = "DividendYield_percent", with = "rust_decimal::serde::str")]
    dividend_yield: Decimal,
    #[serde(rename = "CPI", with = "rust_decimal::serde::str")]
    cpi: Decimal,
}

/// Row of the exchange-rate CSV (`curr,year,rate`), local units per USD.
#[derive(Debug, Deserialize)]
struct RateRow {
    curr: String,
    year: i32,
    #[serde(with = "rust_decimal::serde::str")]
    rate: Decimal,
}

/// Load and validate the equity-index table from a CSV file.
pub fn read_index_table(path: &str) -> Result<EquityIndexTable, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let file = File::open(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    parse_index_table(file)
        .map_err(|e| format!("Invalid index table '{}': {}", canonical.display(), e).into())
}

/// Load exchange-rate quotes from a CSV file.
pub fn read_rates(path: &str) -> Result<ExchangeRateTable, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let file = File::open(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    parse_rates(file)
        .map_err(|e| format!("Invalid rates file '{}': {}", canonical.display(), e).into())
}

pub(crate) fn parse_index_table<R: Read>(
    reader: R,
) -> Result<EquityIndexTable, Box<dyn std::error::Error>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in rdr.deserialize::<IndexRow>() {
        let row = row?;
        records.push(YearRecord {
            year: row.year,
            index_level: row.value,
            dividend_yield: row.dividend_yield,
            cpi: row.cpi,
        });
    }
    debug!("parsed {} index rows", records.len());

    Ok(EquityIndexTable::from_unsorted(records)?)
}

pub(crate) fn parse_rates<R: Read>(reader: R) -> Result<ExchangeRateTable, Box<dyn std::error::Error>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut table = ExchangeRateTable::new();
    for row in rdr.deserialize::<RateRow>() {
        let row = row?;
        table.insert(ExchangeRateQuote {
            currency: CurrencyCode::new(&row.curr),
            year: row.year,
            rate: row.rate,
        })?;
    }
    debug!(
        "parsed {} exchange-rate quotes for {} currencies",
        table.len(),
        table.currencies().len()
    );

    Ok(table)
}

/// Resolve and validate the path, preventing directory traversal.
fn resolve_path(path: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let p = Path::new(path);
    let canonical = if p.is_absolute() {
        p.to_path_buf()
    } else {
        std::env::current_dir()?.join(p)
    };

    if !canonical.exists() {
        return Err(format!("File not found: {}", canonical.display()).into());
    }

    if !canonical.is_file() {
        return Err(format!("Not a file: {}", canonical.display()).into());
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use invest_compare_core::ExchangeRateGateway;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_index_table_sorts_rows() {
        let csv = "Year,Value,DividendYield_percent,CPI\n\
                   2002, 1130.20, 0.0139, 177.1\n\
                   2001, 1335.63, 0.0120, 175.1\n";
        let table = parse_index_table(csv.as_bytes()).unwrap();
        assert_eq!(table.first_year(), 2001);
        assert_eq!(table.record(2002).unwrap().index_level, dec!(1130.20));
    }

    #[test]
    fn test_parse_index_table_rejects_gap() {
        let csv = "Year,Value,DividendYield_percent,CPI\n\
                   2001,1335.63,0.0120,175.1\n\
                   2003,855.70,0.0179,181.7\n";
        assert!(parse_index_table(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_parse_rates() {
        let csv = "curr,year,rate\nLKR,2005,100.44\nlkr,2021,196.1156705\n";
        let rates = parse_rates(csv.as_bytes()).unwrap();
        assert_eq!(rates.years_for(&"LKR".into()), vec![2005, 2021]);
        assert_eq!(rates.quote(&"LKR".into(), 2005).unwrap(), dec!(100.44));
    }

    #[test]
    fn test_missing_file() {
        assert!(read_rates("/definitely/not/here.csv").is_err());
    }
}
