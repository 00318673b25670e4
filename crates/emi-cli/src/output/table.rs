use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;
use tabled::{builder::Builder, Table};

use super::format_scalar;
use super::number_style::{abbreviate_amount, style_cell};
use crate::NumberStyle;

/// Format output as tables using the tabled crate.
///
/// Scalar result fields go in one Field/Value table; every record array
/// (schedule, yearly rollup, tenure rows) gets a table of its own.
pub fn print_table(value: &Value, style: NumberStyle) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map, style);
            } else {
                print_object(map, style);
            }
        }
        Value::Array(arr) => print_records(arr, style),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>, style: NumberStyle) {
    match result {
        Value::Object(res_map) => print_object(res_map, style),
        other => println!("{}", format_scalar(other)),
    }

    if let NumberStyle::Indian = style {
        let principal = envelope
            .get("assumptions")
            .and_then(|a| a.get("principal"))
            .and_then(decimal_of);
        if let Some(p) = principal {
            println!("\nLoan amount: {}", abbreviate_amount(p));
        }
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_object(map: &Map<String, Value>, style: NumberStyle) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut record_sections: Vec<(&str, &[Value])> = Vec::new();

    for (key, val) in map {
        match val {
            Value::Array(items) if matches!(items.first(), Some(Value::Object(_))) => {
                record_sections.push((key.as_str(), items.as_slice()));
            }
            _ => {
                builder.push_record([key.clone(), style_cell(&format_scalar(val), style)]);
            }
        }
    }
    println!("{}", Table::from(builder));

    for (title, records) in record_sections {
        println!("\n{}", title_case(title));
        print_records(records, style);
    }
}

fn print_records(arr: &[Value], style: NumberStyle) {
    let Some(Value::Object(first)) = arr.first() else {
        if arr.is_empty() {
            println!("(empty)");
        }
        for item in arr {
            println!("{}", style_cell(&format_scalar(item), style));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(|h| title_case(h)));

    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| {
                    map.get(h.as_str())
                        .map(|v| style_cell(&format_scalar(v), style))
                        .unwrap_or_default()
                })
                .collect();
            builder.push_record(row);
        }
    }

    println!("{}", Table::from(builder));
}

fn decimal_of(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}

/// `remaining_balance` -> `Remaining Balance`
fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
