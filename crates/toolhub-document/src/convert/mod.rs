// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Structured-data conversion between CSV, JSON, XML, and Excel.
//
// Tabular formats pass through `Table`; tree formats pass through
// `serde_json::Value`. Excel is input-only.

pub mod excel;
pub mod tabular;
pub mod xml;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use toolhub_core::AppConfig;
use toolhub_core::error::{Result, ToolhubError};

pub use excel::{excel_sheet_names, excel_to_csv, excel_to_json, excel_to_table};
pub use tabular::{csv_to_json, csv_to_table, json_to_csv, json_to_table, table_to_csv, table_to_json};
pub use xml::{csv_to_xml, json_to_xml, table_to_xml, xml_to_csv, xml_to_json};

/// Data formats the converters understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataFormat {
    Csv,
    Json,
    Xml,
    /// Office Open XML workbook (`.xlsx`). Read-only.
    Excel,
}

impl DataFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" | "tsv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            "xlsx" | "xlsm" => Some(Self::Excel),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Excel => "xlsx",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Json => "application/json",
            Self::Xml => "application/xml",
            Self::Excel => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

impl FromStr for DataFormat {
    type Err = ToolhubError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().trim_start_matches('.');
        Self::from_extension(trimmed)
            .or_else(|| match trimmed.to_ascii_lowercase().as_str() {
                "excel" => Some(Self::Excel),
                _ => None,
            })
            .ok_or_else(|| ToolhubError::UnsupportedFormat(format!("data format '{s}'")))
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Rectangular intermediate form for tabular data.
///
/// Every row has exactly `headers.len()` cells; the readers pad short rows
/// and name surplus columns `column_N`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table, padding rows and headers so every row has the same width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut table = Self { headers, rows };
        table.normalise();
        table
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }

    fn normalise(&mut self) {
        let width = self
            .rows
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0)
            .max(self.headers.len());
        while self.headers.len() < width {
            let name = format!("column_{}", self.headers.len() + 1);
            self.headers.push(name);
        }
        for row in &mut self.rows {
            row.resize(width, String::new());
        }
    }
}

/// Knobs shared by the converters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Field delimiter for CSV input and output.
    pub delimiter: u8,
    /// Turn numeric, boolean, and empty CSV cells into JSON scalars.
    pub infer_types: bool,
    /// Name of the XML document element when writing XML.
    pub root_name: String,
    /// Worksheet to read from Excel input; the first sheet when `None`.
    pub sheet: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            infer_types: false,
            root_name: "root".into(),
            sheet: None,
            pretty: true,
        }
    }
}

impl ConvertOptions {
    /// Defaults taken from the user's configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            delimiter: config.csv_delimiter_byte(),
            root_name: config.xml_root_element.clone(),
            ..Self::default()
        }
    }
}

/// Format dispatcher.
pub struct DataConverter;

impl DataConverter {
    /// Convert `input` from one format to another, returning the encoded
    /// output bytes.
    ///
    /// Identity conversions and anything targeting Excel are rejected with
    /// `UnsupportedConversion`.
    #[instrument(skip(input, options), fields(input_len = input.len(), from = %from, to = %to))]
    pub fn convert(
        input: &[u8],
        from: DataFormat,
        to: DataFormat,
        options: &ConvertOptions,
    ) -> Result<Vec<u8>> {
        info!("converting data");
        let output = match (from, to) {
            (DataFormat::Csv, DataFormat::Json) => csv_to_json(input, options)?,
            (DataFormat::Csv, DataFormat::Xml) => csv_to_xml(input, options)?,
            (DataFormat::Json, DataFormat::Csv) => json_to_csv(input, options.delimiter)?,
            (DataFormat::Json, DataFormat::Xml) => json_to_xml(input, &options.root_name)?,
            (DataFormat::Xml, DataFormat::Json) => {
                let value = xml_to_json(input)?;
                render_json(&value, options.pretty)?
            }
            (DataFormat::Xml, DataFormat::Csv) => xml_to_csv(input, options.delimiter)?,
            (DataFormat::Excel, DataFormat::Csv) => {
                excel_to_csv(input, options.sheet.as_deref(), options.delimiter)?
            }
            (DataFormat::Excel, DataFormat::Json) => {
                excel_to_json(input, options.sheet.as_deref(), options)?
            }
            (DataFormat::Excel, DataFormat::Xml) => {
                let table = excel_to_table(input, options.sheet.as_deref())?;
                table_to_xml(&table, &options.root_name)?
            }
            _ => {
                return Err(ToolhubError::UnsupportedConversion {
                    from: from.to_string(),
                    to: to.to_string(),
                });
            }
        };

        debug!(output_len = output.len(), "conversion complete");
        Ok(output.into_bytes())
    }

    /// Whether a conversion from `from` to `to` exists.
    pub fn supports(from: DataFormat, to: DataFormat) -> bool {
        from != to && to != DataFormat::Excel
    }

    /// Every format `from` can be converted to.
    pub fn targets(from: DataFormat) -> Vec<DataFormat> {
        [DataFormat::Csv, DataFormat::Json, DataFormat::Xml]
            .into_iter()
            .filter(|to| Self::supports(from, *to))
            .collect()
    }
}

pub(crate) fn render_json(value: &serde_json::Value, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

pub(crate) fn utf8(input: &[u8], what: &str) -> Result<String> {
    let text = std::str::from_utf8(input)
        .map_err(|err| ToolhubError::Conversion(format!("{what} input is not UTF-8: {err}")))?;
    Ok(text.trim_start_matches('\u{feff}').to_string())
}
