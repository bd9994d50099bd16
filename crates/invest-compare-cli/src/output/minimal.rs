use serde_json::Value;

/// Headline figures, most telling first. A comparison reports its real
/// equity return, a single-branch run its end value or rate.
const HEADLINE_KEYS: [&str; 7] = [
    "equity_local_annual_return",
    "local_end_value",
    "end_value",
    "total_return_rate",
    "appreciation_rate",
    "sell_year",
    "currency",
];

/// Print just the headline value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", headline(value));
}

fn headline(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let Value::Object(map) = result_obj else {
        return format_minimal(result_obj);
    };

    if let (Some(property), Some(equity)) = (
        map.get("real_property_annual_return"),
        map.get("equity_local_annual_return"),
    ) {
        return format!(
            "property {} vs index {}",
            format_minimal(property),
            format_minimal(equity)
        );
    }

    HEADLINE_KEYS
        .iter()
        .find_map(|key| map.get(*key).filter(|v| !v.is_null()).map(format_minimal))
        .or_else(|| {
            map.iter()
                .next()
                .map(|(key, val)| format!("{}: {}", key, format_minimal(val)))
        })
        .unwrap_or_default()
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
