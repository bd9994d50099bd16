use serde_json::{Map, Value};
use std::io;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());
    for record in csv_records(value) {
        let _ = wtr.write_record(&record);
    }
    let _ = wtr.flush();
}

/// Flatten a command result into CSV rows. Enveloped results become
/// `field,value` pairs, lists of objects become a headed table.
fn csv_records(value: &Value) -> Vec<Vec<String>> {
    match value {
        Value::Object(map) => match (map.get("result"), map.get("results")) {
            (Some(Value::Object(result)), _) => field_rows(result),
            (_, Some(Value::Array(rows))) => array_rows(rows),
            _ => field_rows(map),
        },
        Value::Array(rows) => array_rows(rows),
        _ => vec![vec![format_csv_value(value)]],
    }
}

fn field_rows(map: &Map<String, Value>) -> Vec<Vec<String>> {
    std::iter::once(vec!["field".to_string(), "value".to_string()])
        .chain(
            map.iter()
                .map(|(key, val)| vec![key.clone(), format_csv_value(val)]),
        )
        .collect()
}

fn array_rows(rows: &[Value]) -> Vec<Vec<String>> {
    let Some(Value::Object(first)) = rows.first() else {
        return rows.iter().map(|v| vec![format_csv_value(v)]).collect();
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let body = rows.iter().filter_map(Value::as_object).map(|row| {
        headers
            .iter()
            .map(|h| row.get(h).map(format_csv_value).unwrap_or_default())
            .collect()
    });
    std::iter::once(headers.clone()).chain(body).collect()
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        // Year lists stay in one cell.
        Value::Array(items) => items
            .iter()
            .map(format_csv_value)
            .collect::<Vec<_>>()
            .join(";"),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_period_flattens_year_list() {
        let value = json!({
            "currency": "LKR",
            "available_years": [2001, 2005, 2021],
        });
        let records = csv_records(&value);
        assert_eq!(records[0], vec!["field", "value"]);
        assert_eq!(records[1], vec!["available_years", "2001;2005;2021"]);
        assert_eq!(records[2], vec!["currency", "LKR"]);
    }

    #[test]
    fn test_results_list_is_headed() {
        let value = json!({
            "results": [
                { "currency": "LKR", "quotes": 3 },
                { "currency": "THB", "quotes": 2 },
            ]
        });
        let records = csv_records(&value);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], vec!["currency", "quotes"]);
        assert_eq!(records[2], vec!["THB", "2"]);
    }
}
