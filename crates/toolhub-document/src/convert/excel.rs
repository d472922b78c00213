// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Excel (.xlsx) input. Workbooks are read with calamine; writing is not
// supported.

use std::io::Cursor;

use calamine::{DataType, Reader, Xlsx, open_workbook_from_rs};
use tracing::{debug, info, instrument};

use toolhub_core::error::{Result, ToolhubError};

use super::tabular::{table_to_csv, table_to_json};
use super::{ConvertOptions, Table, render_json};

fn open_workbook(input: &[u8]) -> Result<Xlsx<Cursor<&[u8]>>> {
    open_workbook_from_rs(Cursor::new(input))
        .map_err(|err| ToolhubError::Conversion(format!("failed to open Excel workbook: {err}")))
}

/// Worksheet names in workbook order.
pub fn excel_sheet_names(input: &[u8]) -> Result<Vec<String>> {
    let workbook = open_workbook(input)?;
    Ok(workbook.sheet_names().to_vec())
}

/// Read one worksheet into a `Table`; the first sheet when `sheet` is `None`.
/// The first row is the header.
#[instrument(skip(input), fields(input_len = input.len()))]
pub fn excel_to_table(input: &[u8], sheet: Option<&str>) -> Result<Table> {
    let mut workbook = open_workbook(input)?;
    let names = workbook.sheet_names().to_vec();
    debug!(sheets = names.len(), "workbook opened");

    let sheet_name = match sheet {
        Some(wanted) => names
            .iter()
            .find(|name| name.as_str() == wanted || name.eq_ignore_ascii_case(wanted))
            .cloned()
            .ok_or_else(|| {
                ToolhubError::InvalidInput(format!(
                    "workbook has no sheet named '{wanted}' (sheets: {})",
                    names.join(", ")
                ))
            })?,
        None => names
            .first()
            .cloned()
            .ok_or_else(|| ToolhubError::Conversion("workbook contains no sheets".into()))?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .ok_or_else(|| ToolhubError::Conversion(format!("sheet '{sheet_name}' not found")))?
        .map_err(|err| {
            ToolhubError::Conversion(format!("failed to read sheet '{sheet_name}': {err}"))
        })?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(|cell| cell_string(cell).trim().to_string()).collect())
        .unwrap_or_default();
    let body: Vec<Vec<String>> = rows
        .map(|row| row.iter().map(cell_string).collect())
        .collect();

    info!(sheet = %sheet_name, rows = body.len(), "worksheet read");
    Ok(Table::new(headers, body))
}

/// One worksheet as CSV text.
pub fn excel_to_csv(input: &[u8], sheet: Option<&str>, delimiter: u8) -> Result<String> {
    let table = excel_to_table(input, sheet)?;
    table_to_csv(&table, delimiter)
}

/// One worksheet as a JSON array of objects keyed by header.
pub fn excel_to_json(input: &[u8], sheet: Option<&str>, options: &ConvertOptions) -> Result<String> {
    let table = excel_to_table(input, sheet)?;
    render_json(&table_to_json(&table, options.infer_types), options.pretty)
}

/// Display form of a cell. Whole floats print without a fraction, so a
/// spreadsheet `3` stays `3` rather than `3.0`.
fn cell_string(cell: &DataType) -> String {
    match cell {
        DataType::Empty => String::new(),
        DataType::Float(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", *value as i64)
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::{DataConverter, DataFormat};
    use serde_json::json;

    /// Two sheets: "Stock" (part, qty, price) and "Suppliers" (name, city).
    const WORKBOOK: &[u8] = include_bytes!("../../tests/fixtures/inventory.xlsx");

    #[test]
    fn lists_sheets_in_workbook_order() {
        assert_eq!(excel_sheet_names(WORKBOOK).unwrap(), vec!["Stock", "Suppliers"]);
    }

    #[test]
    fn first_sheet_is_the_default() {
        let table = excel_to_table(WORKBOOK, None).unwrap();
        assert_eq!(table.headers, vec!["part", "qty", "price"]);
        assert_eq!(
            table.rows,
            vec![
                vec!["M3 bolt".to_string(), "10".into(), "0.25".into()],
                vec!["M4 nut".to_string(), "4".into(), "1.5".into()],
            ]
        );
    }

    #[test]
    fn sheet_is_chosen_by_name_ignoring_case() {
        let table = excel_to_table(WORKBOOK, Some("suppliers")).unwrap();
        assert_eq!(table.headers, vec!["name", "city"]);
        assert_eq!(table.rows, vec![vec!["Acme".to_string(), "Leeds".into()]]);
    }

    #[test]
    fn unknown_sheet_names_the_alternatives() {
        match excel_to_table(WORKBOOK, Some("Orders")) {
            Err(ToolhubError::InvalidInput(message)) => {
                assert!(message.contains("'Orders'"));
                assert!(message.contains("Stock, Suppliers"));
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn workbook_converts_to_each_text_format() {
        let mut options = ConvertOptions {
            infer_types: true,
            pretty: false,
            ..ConvertOptions::default()
        };

        let csv = DataConverter::convert(WORKBOOK, DataFormat::Excel, DataFormat::Csv, &options)
            .unwrap();
        assert_eq!(
            String::from_utf8(csv).unwrap(),
            "part,qty,price\nM3 bolt,10,0.25\nM4 nut,4,1.5\n"
        );

        let encoded =
            DataConverter::convert(WORKBOOK, DataFormat::Excel, DataFormat::Json, &options)
                .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&encoded).unwrap();
        assert_eq!(
            value,
            json!([
                { "part": "M3 bolt", "qty": 10, "price": 0.25 },
                { "part": "M4 nut", "qty": 4, "price": 1.5 }
            ])
        );

        options.sheet = Some("Suppliers".into());
        let xml = DataConverter::convert(WORKBOOK, DataFormat::Excel, DataFormat::Xml, &options)
            .unwrap();
        let xml = String::from_utf8(xml).unwrap();
        assert!(xml.contains("<name>Acme</name>"));
        assert!(xml.contains("<city>Leeds</city>"));
        assert_eq!(xml.matches("<row>").count(), 1);
    }

    #[test]
    fn whole_floats_print_as_integers() {
        assert_eq!(cell_string(&DataType::Float(3.0)), "3");
        assert_eq!(cell_string(&DataType::Float(2.5)), "2.5");
        assert_eq!(cell_string(&DataType::Int(-4)), "-4");
        assert_eq!(cell_string(&DataType::Bool(true)), "true");
        assert_eq!(cell_string(&DataType::String("x".into())), "x");
        assert_eq!(cell_string(&DataType::Empty), "");
    }

    #[test]
    fn rejects_non_workbook_bytes() {
        for result in [
            excel_to_table(b"name,qty\nbolt,4\n", None).map(|_| ()),
            excel_sheet_names(b"").map(|_| ()),
        ] {
            assert!(matches!(result, Err(ToolhubError::Conversion(_))));
        }
    }
}
