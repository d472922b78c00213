// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// CSV <-> Table <-> JSON.

use serde_json::{Map, Number, Value};
use tracing::{debug, instrument, warn};

use toolhub_core::error::{Result, ToolhubError};

use super::{ConvertOptions, Table, render_json, utf8};

// -- CSV ----------------------------------------------------------------------

/// Read CSV into a `Table`. The first record is the header row; records may
/// have ragged widths.
#[instrument(skip(input), fields(input_len = input.len(), delimiter = %(delimiter as char)))]
pub fn csv_to_table(input: &[u8], delimiter: u8) -> Result<Table> {
    let text = utf8(input, "CSV")?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|err| ToolhubError::Conversion(format!("failed to read CSV headers: {err}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record.map_err(|err| {
            // Header is line 1, so the first record is line 2.
            ToolhubError::Conversion(format!("CSV record {} is malformed: {err}", idx + 2))
        })?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    debug!(columns = headers.len(), rows = rows.len(), "CSV parsed");
    Ok(Table::new(headers, rows))
}

/// Write a `Table` as CSV text, header row first.
pub fn table_to_csv(table: &Table, delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());

    let csv_err = |err: csv::Error| ToolhubError::Conversion(format!("CSV write failed: {err}"));
    if !table.headers.is_empty() {
        writer.write_record(&table.headers).map_err(csv_err)?;
    }
    for row in &table.rows {
        writer.write_record(row).map_err(csv_err)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ToolhubError::Conversion(format!("CSV flush failed: {err}")))?;
    String::from_utf8(bytes)
        .map_err(|err| ToolhubError::Conversion(format!("CSV output is not UTF-8: {err}")))
}

/// CSV text to a JSON array of objects keyed by header.
pub fn csv_to_json(input: &[u8], options: &ConvertOptions) -> Result<String> {
    let table = csv_to_table(input, options.delimiter)?;
    render_json(&table_to_json(&table, options.infer_types), options.pretty)
}

// -- JSON ---------------------------------------------------------------------

/// Turn each table row into a JSON object keyed by header.
///
/// With `infer_types`, cells that look like integers, decimals, or booleans
/// become JSON scalars and empty cells become `null`. Numbers with leading
/// zeros (postcodes, account numbers) stay strings.
pub fn table_to_json(table: &Table, infer_types: bool) -> Value {
    let records = table
        .rows
        .iter()
        .map(|row| {
            let object: Map<String, Value> = table
                .headers
                .iter()
                .zip(row)
                .map(|(header, cell)| {
                    let value = if infer_types {
                        infer_scalar(cell)
                    } else {
                        Value::String(cell.clone())
                    };
                    (header.clone(), value)
                })
                .collect();
            Value::Object(object)
        })
        .collect();
    Value::Array(records)
}

/// Flatten a JSON document into a `Table`.
///
/// Accepted shapes:
/// * array of objects: columns are the union of keys in first-seen order,
/// * array of arrays: the first inner array is the header row,
/// * array of scalars: a single `value` column,
/// * a single object: one row.
///
/// Nested objects and arrays inside cells are written as compact JSON text.
pub fn json_to_table(value: &Value) -> Result<Table> {
    match value {
        Value::Array(items) if items.is_empty() => Ok(Table::default()),
        Value::Array(items) if items.iter().all(Value::is_object) => {
            let mut headers: Vec<String> = Vec::new();
            for item in items {
                if let Value::Object(object) = item {
                    for key in object.keys() {
                        if !headers.contains(key) {
                            headers.push(key.clone());
                        }
                    }
                }
            }
            let rows = items
                .iter()
                .map(|item| {
                    headers
                        .iter()
                        .map(|key| item.get(key).map(cell_text).unwrap_or_default())
                        .collect()
                })
                .collect();
            Ok(Table::new(headers, rows))
        }
        Value::Array(items) if items.iter().all(Value::is_array) => {
            let mut rows = items.iter().filter_map(Value::as_array).map(|cells| {
                cells.iter().map(cell_text).collect::<Vec<String>>()
            });
            let headers = rows.next().unwrap_or_default();
            Ok(Table::new(headers, rows.collect()))
        }
        Value::Array(items) if items.iter().all(|item| !item.is_object() && !item.is_array()) => {
            let rows = items.iter().map(|item| vec![cell_text(item)]).collect();
            Ok(Table::new(vec!["value".into()], rows))
        }
        Value::Array(_) => Err(ToolhubError::Conversion(
            "JSON array mixes objects, arrays, and plain values; cannot build a table".into(),
        )),
        Value::Object(object) => {
            let headers = object.keys().cloned().collect();
            let row = object.values().map(cell_text).collect();
            Ok(Table::new(headers, vec![row]))
        }
        _ => Err(ToolhubError::Conversion(
            "expected a JSON array or object at the top level".into(),
        )),
    }
}

/// JSON text to CSV text.
#[instrument(skip(input), fields(input_len = input.len()))]
pub fn json_to_csv(input: &[u8], delimiter: u8) -> Result<String> {
    let value = parse_json(input)?;
    let table = json_to_table(&value)?;
    if table.is_empty() {
        warn!("JSON input holds no records");
    }
    table_to_csv(&table, delimiter)
}

pub(crate) fn parse_json(input: &[u8]) -> Result<Value> {
    let text = utf8(input, "JSON")?;
    serde_json::from_str(&text)
        .map_err(|err| ToolhubError::Conversion(format!("invalid JSON: {err}")))
}

/// Text form of a JSON value inside a CSV cell or XML element.
pub(crate) fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested => nested.to_string(),
    }
}

fn infer_scalar(cell: &str) -> Value {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if trimmed.eq_ignore_ascii_case("true") {
        return Value::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return Value::Bool(false);
    }

    let digits = trimmed.trim_start_matches('-');
    let leading_zero = digits.len() > 1 && digits.starts_with('0') && !digits.starts_with("0.");
    if !leading_zero {
        if let Ok(int) = trimmed.parse::<i64>() {
            return Value::Number(int.into());
        }
        if trimmed.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | 'e' | 'E' | '+')) {
            if let Some(number) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
                return Value::Number(number);
            }
        }
    }
    Value::String(cell.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn csv_table_pads_ragged_rows() {
        let table = csv_to_table(b"name,qty\nbolt,4,extra\nnut\n", b',').unwrap();
        assert_eq!(table.headers, vec!["name", "qty", "column_3"]);
        assert_eq!(table.rows[0], vec!["bolt", "4", "extra"]);
        assert_eq!(table.rows[1], vec!["nut", "", ""]);
    }

    #[test]
    fn semicolon_delimited_csv_round_trips() {
        let table = csv_to_table("a;b\n\"x;y\";2\n".as_bytes(), b';').unwrap();
        assert_eq!(table.rows[0], vec!["x;y", "2"]);
        assert_eq!(table_to_csv(&table, b';').unwrap(), "a;b\n\"x;y\";2\n");
    }

    #[test]
    fn csv_to_json_keeps_strings_by_default() {
        let out = csv_to_json(b"id,name\n1,Ada\n", &ConvertOptions::default()).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value, json!([{ "id": "1", "name": "Ada" }]));
    }

    #[test]
    fn type_inference() {
        assert_eq!(infer_scalar("42"), json!(42));
        assert_eq!(infer_scalar("-3.5"), json!(-3.5));
        assert_eq!(infer_scalar("TRUE"), json!(true));
        assert_eq!(infer_scalar(""), Value::Null);
        assert_eq!(infer_scalar("00501"), json!("00501"));
        assert_eq!(infer_scalar("0.25"), json!(0.25));
        assert_eq!(infer_scalar("inf"), json!("inf"));
        assert_eq!(infer_scalar("1-2"), json!("1-2"));
    }

    #[test]
    fn json_objects_union_keys_in_first_seen_order() {
        let input = br#"[{"b": 1, "a": "x"}, {"c": null, "a": "y"}]"#;
        assert_eq!(json_to_csv(input, b',').unwrap(), "b,a,c\n1,x,\n,y,\n");
    }

    #[test]
    fn json_nested_values_become_compact_json() {
        let input = br#"{"id": 7, "tags": ["a", "b"], "meta": {"k": true}}"#;
        assert_eq!(
            json_to_csv(input, b',').unwrap(),
            "id,tags,meta\n7,\"[\"\"a\"\",\"\"b\"\"]\",\"{\"\"k\"\":true}\"\n"
        );
    }

    #[test]
    fn json_array_of_arrays_uses_first_row_as_header() {
        let input = br#"[["x", "y"], [1, 2], [3]]"#;
        assert_eq!(json_to_csv(input, b',').unwrap(), "x,y\n1,2\n3,\n");
    }

    #[test]
    fn json_scalars_and_mixed_shapes() {
        assert_eq!(json_to_csv(b"[1, \"two\"]", b',').unwrap(), "value\n1\ntwo\n");
        assert!(json_to_csv(b"[{\"a\": 1}, [1]]", b',').is_err());
        assert!(json_to_csv(b"42", b',').is_err());
        assert!(matches!(
            json_to_csv(b"{not json", b','),
            Err(ToolhubError::Conversion(_))
        ));
        assert_eq!(json_to_csv(b"[]", b',').unwrap(), "");
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let table = csv_to_table("\u{feff}col\nv\n".as_bytes(), b',').unwrap();
        assert_eq!(table.headers, vec!["col"]);
    }
}
