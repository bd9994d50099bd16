use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => print_report(result, map),
            _ => match map.get("results") {
                Some(Value::Array(rows)) => print_rows(rows),
                _ => println!("{}", field_table(map)),
            },
        },
        Value::Array(rows) => print_rows(rows),
        _ => println!("{}", value),
    }
}

fn print_report(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    println!("{}", field_table(result));

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        let lines: Vec<&str> = warnings.iter().filter_map(Value::as_str).collect();
        if !lines.is_empty() {
            println!("\nWarnings:");
            for line in lines {
                println!("  - {}", line);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }

    if let Some(Value::String(story)) = envelope.get("narrative") {
        println!("\n{}", story);
    }
}

fn field_table(map: &Map<String, Value>) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.replace('_', " "), format_value(val)]);
    }
    builder.build()
}

fn print_rows(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        println!("(empty)");
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.iter().cloned());
    for row in rows.iter().filter_map(Value::as_object) {
        builder.push_record(
            headers
                .iter()
                .map(|h| row.get(h).map(format_value).unwrap_or_default()),
        );
    }
    println!("{}", builder.build());
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(items) => items
            .iter()
            .map(format_value)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
