use serde_json::Value;
use std::io;

use super::{first_record_array, format_scalar};

/// Write output as CSV to stdout.
///
/// When the result carries a record array (the monthly schedule, the tenure
/// rows) those records become the CSV body; otherwise a two-column
/// field/value listing is written.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            let body = match map.get("result") {
                Some(Value::Object(result)) => result,
                _ => map,
            };
            if let Some((_, records)) = first_record_array(body) {
                write_records(&mut wtr, records);
            } else {
                write_fields(&mut wtr, body);
            }
        }
        Value::Array(arr) => write_records(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&format_scalar(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_fields<W: io::Write>(wtr: &mut csv::Writer<W>, map: &serde_json::Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &format_scalar(val)]);
    }
}

fn write_records<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([&format_scalar(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_scalar).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(value: &Value) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        if let Value::Object(map) = value {
            match first_record_array(map) {
                Some((_, records)) => write_records(&mut wtr, records),
                None => write_fields(&mut wtr, map),
            }
        }
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_schedule_rows_become_csv_body() {
        let result = json!({
            "installment_amount": "100.00",
            "schedule": [
                { "period": 1, "installment": "100.00", "remaining_balance": "900.00" },
                { "period": 2, "installment": "100.00", "remaining_balance": "800.00" }
            ]
        });
        let csv = render(&result);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "period,installment,remaining_balance");
        assert_eq!(lines[2], "2,100.00,800.00");
    }

    #[test]
    fn test_scalars_only_become_field_value() {
        let csv = render(&json!({ "installment_amount": "8364.40" }));
        assert_eq!(csv, "field,value\ninstallment_amount,8364.40\n");
    }
}
