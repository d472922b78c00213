// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// XML <-> JSON mapping and tabular XML output.
//
// Mapping used in both directions:
//   <item id="7">text</item>      {"item": {"@id": "7", "#text": "text"}}
//   <item>text</item>             {"item": "text"}
//   <a><b>1</b><b>2</b></a>       {"a": {"b": ["1", "2"]}}

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use toolhub_core::error::{Result, ToolhubError};

use super::tabular::{cell_text, csv_to_table, json_to_table, parse_json, table_to_csv};
use super::{ConvertOptions, Table};

const ATTRIBUTE_PREFIX: char = '@';
const TEXT_KEY: &str = "#text";
/// Element name used for members of a top-level JSON array.
const ITEM_ELEMENT: &str = "item";
/// Element name used for each table row.
const ROW_ELEMENT: &str = "row";

/// An element still open while reading.
struct Frame {
    name: String,
    children: Map<String, Value>,
    text: String,
}

impl Frame {
    fn into_value(self) -> Value {
        let text = self.text.trim().to_string();
        if self.children.is_empty() {
            return Value::String(text);
        }
        let mut children = self.children;
        if !text.is_empty() {
            children.insert(TEXT_KEY.into(), Value::String(text));
        }
        Value::Object(children)
    }
}

// -- XML -> JSON --------------------------------------------------------------

/// Parse an XML document into a JSON value whose single key is the root
/// element name.
#[instrument(skip(input), fields(input_len = input.len()))]
pub fn xml_to_json(input: &[u8]) -> Result<Value> {
    let mut reader = Reader::from_reader(input);
    reader.trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<Value> = None;
    let mut buf = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|err| {
            ToolhubError::Conversion(format!(
                "malformed XML at byte {}: {err}",
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(ref e) => {
                if root.is_some() {
                    return Err(multiple_roots());
                }
                stack.push(open_frame(e)?);
            }
            Event::Empty(ref e) => {
                if root.is_some() && stack.is_empty() {
                    return Err(multiple_roots());
                }
                let frame = open_frame(e)?;
                close_frame(frame, &mut stack, &mut root);
            }
            Event::Text(ref e) => {
                let text = e.unescape().map_err(|err| {
                    ToolhubError::Conversion(format!("bad XML text content: {err}"))
                })?;
                append_text(&mut stack, &text)?;
            }
            Event::CData(e) => {
                let bytes = e.into_inner();
                append_text(&mut stack, &String::from_utf8_lossy(&bytes))?;
            }
            Event::End(_) => {
                // quick-xml has already checked that the end tag matches.
                if let Some(frame) = stack.pop() {
                    close_frame(frame, &mut stack, &mut root);
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype.
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(ToolhubError::Conversion(format!(
            "XML ends before <{}> is closed",
            open.name
        )));
    }
    let value = root.ok_or_else(|| ToolhubError::Conversion("XML has no root element".into()))?;
    debug!("XML parsed");
    Ok(value)
}

/// Rows of an XML document as CSV.
///
/// The root's children are the rows: when the root has a single repeated (or
/// lone) child element, each occurrence becomes a row; otherwise the root
/// itself is the only row.
pub fn xml_to_csv(input: &[u8], delimiter: u8) -> Result<String> {
    let document = xml_to_json(input)?;
    let root = document
        .as_object()
        .and_then(|object| object.values().next())
        .cloned()
        .unwrap_or(Value::Null);

    let records = match &root {
        Value::Object(children) => {
            let mut elements = children
                .iter()
                .filter(|(key, _)| !key.starts_with(ATTRIBUTE_PREFIX) && key.as_str() != TEXT_KEY);
            match (elements.next(), elements.next()) {
                (Some((_, Value::Array(rows))), None) => Value::Array(rows.clone()),
                (Some((_, row @ Value::Object(_))), None) => Value::Array(vec![row.clone()]),
                _ => Value::Array(vec![root.clone()]),
            }
        }
        Value::String(text) if text.is_empty() => Value::Array(Vec::new()),
        other => Value::Array(vec![other.clone()]),
    };

    table_to_csv(&json_to_table(&records)?, delimiter)
}

fn open_frame(start: &BytesStart<'_>) -> Result<Frame> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut children = Map::new();
    for attribute in start.attributes() {
        let attribute = attribute
            .map_err(|err| ToolhubError::Conversion(format!("bad attribute on <{name}>: {err}")))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value().map_err(|err| {
            ToolhubError::Conversion(format!("bad attribute value on <{name}>: {err}"))
        })?;
        children.insert(format!("{ATTRIBUTE_PREFIX}{key}"), Value::String(value.into_owned()));
    }
    Ok(Frame {
        name,
        children,
        text: String::new(),
    })
}

fn close_frame(frame: Frame, stack: &mut [Frame], root: &mut Option<Value>) {
    let name = frame.name.clone();
    let value = frame.into_value();
    match stack.last_mut() {
        Some(parent) => insert_child(&mut parent.children, name, value),
        None => {
            let mut document = Map::new();
            document.insert(name, value);
            *root = Some(Value::Object(document));
        }
    }
}

/// Repeated element names collect into an array.
fn insert_child(children: &mut Map<String, Value>, name: String, value: Value) {
    match children.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            children.insert(name, value);
        }
    }
}

fn append_text(stack: &mut [Frame], text: &str) -> Result<()> {
    match stack.last_mut() {
        Some(frame) => {
            if !frame.text.is_empty() {
                frame.text.push(' ');
            }
            frame.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(ToolhubError::Conversion(
            "text found outside the root element".into(),
        )),
    }
}

fn multiple_roots() -> ToolhubError {
    ToolhubError::Conversion("XML has more than one root element".into())
}

// -- JSON -> XML --------------------------------------------------------------

/// Serialize a JSON document as XML.
///
/// Arrays repeat their element name, `"@name"` keys become attributes, and
/// `"#text"` becomes the element's text. An object with a single element key
/// (the shape [`xml_to_json`] produces) uses that key as the document
/// element; anything else goes under a `<root_name>` element. Members of a
/// top-level array, and arrays nested in arrays, are written as `<item>`
/// children.
#[instrument(skip(input), fields(input_len = input.len(), root_name))]
pub fn json_to_xml(input: &[u8], root_name: &str) -> Result<String> {
    let value = parse_json(input)?;

    let mut writer = new_writer()?;
    match &value {
        Value::Array(items) => write_wrapped(&mut writer, root_name, items)?,
        Value::Object(object) => match document_element(object) {
            Some((name, element)) => write_element(&mut writer, name, element)?,
            None => write_element(&mut writer, root_name, &value)?,
        },
        other => write_element(&mut writer, root_name, other)?,
    }
    finish(writer)
}

/// The lone element of `{"name": {...}}` or `{"name": "text"}`.
fn document_element(object: &Map<String, Value>) -> Option<(&str, &Value)> {
    if object.len() != 1 {
        return None;
    }
    let (name, value) = object.iter().next()?;
    if name.starts_with(ATTRIBUTE_PREFIX) || name == TEXT_KEY || value.is_array() {
        return None;
    }
    Some((name.as_str(), value))
}

/// Write a `Table` as `<root><row><column>…</column></row></root>`.
pub fn table_to_xml(table: &Table, root_name: &str) -> Result<String> {
    let root = sanitize_name(root_name);
    let columns: Vec<String> = table
        .headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            if header.trim().is_empty() {
                format!("column_{}", idx + 1)
            } else {
                sanitize_name(header)
            }
        })
        .collect();

    let mut writer = new_writer()?;
    writer
        .write_event(Event::Start(BytesStart::new(root.as_str())))
        .map_err(write_err)?;
    for row in &table.rows {
        writer
            .write_event(Event::Start(BytesStart::new(ROW_ELEMENT)))
            .map_err(write_err)?;
        for (column, cell) in columns.iter().zip(row) {
            write_text_element(&mut writer, column, cell)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(ROW_ELEMENT)))
            .map_err(write_err)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(root.as_str())))
        .map_err(write_err)?;
    finish(writer)
}

/// CSV text to XML with one `<row>` per record.
pub fn csv_to_xml(input: &[u8], options: &ConvertOptions) -> Result<String> {
    let table = csv_to_table(input, options.delimiter)?;
    table_to_xml(&table, &options.root_name)
}

/// Make `raw` usable as an XML element or attribute name: characters other
/// than letters, digits, `_`, `-`, and `.` become `_`, and a name that does
/// not start with a letter or `_` gets a `_` prefix.
pub fn sanitize_name(raw: &str) -> String {
    let mut name: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    match name.chars().next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => name.insert(0, '_'),
    }
    name
}

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn new_writer() -> Result<XmlWriter> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(write_err)?;
    Ok(writer)
}

fn finish(writer: XmlWriter) -> Result<String> {
    let mut text = String::from_utf8(writer.into_inner().into_inner())
        .map_err(|err| ToolhubError::Conversion(format!("XML output is not UTF-8: {err}")))?;
    text.push('\n');
    Ok(text)
}

/// `<name>` holding one `<item>` per member.
fn write_wrapped(writer: &mut XmlWriter, name: &str, items: &[Value]) -> Result<()> {
    let name = sanitize_name(name);
    if items.is_empty() {
        return writer
            .write_event(Event::Empty(BytesStart::new(name.as_str())))
            .map_err(write_err);
    }
    writer
        .write_event(Event::Start(BytesStart::new(name.as_str())))
        .map_err(write_err)?;
    for item in items {
        write_array_member(writer, ITEM_ELEMENT, item)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(name.as_str())))
        .map_err(write_err)
}

fn write_array_member(writer: &mut XmlWriter, name: &str, item: &Value) -> Result<()> {
    match item {
        Value::Array(inner) => write_wrapped(writer, name, inner),
        other => write_element(writer, name, other),
    }
}

fn write_element(writer: &mut XmlWriter, name: &str, value: &Value) -> Result<()> {
    let name = sanitize_name(name);
    match value {
        Value::Array(items) => {
            for item in items {
                write_array_member(writer, &name, item)?;
            }
            Ok(())
        }
        Value::Object(object) => {
            let mut start = BytesStart::new(name.as_str());
            let mut text = None;
            let mut children = Vec::new();
            for (key, child) in object {
                if let Some(attribute) = key.strip_prefix(ATTRIBUTE_PREFIX) {
                    let attribute = sanitize_name(attribute);
                    start.push_attribute((attribute.as_str(), cell_text(child).as_str()));
                } else if key == TEXT_KEY {
                    text = Some(cell_text(child));
                } else {
                    children.push((key, child));
                }
            }

            if text.is_none() && children.is_empty() {
                return writer.write_event(Event::Empty(start)).map_err(write_err);
            }
            writer.write_event(Event::Start(start)).map_err(write_err)?;
            if let Some(text) = text {
                writer
                    .write_event(Event::Text(BytesText::new(&text)))
                    .map_err(write_err)?;
            }
            for (key, child) in children {
                write_element(writer, key, child)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(name.as_str())))
                .map_err(write_err)
        }
        Value::Null => writer
            .write_event(Event::Empty(BytesStart::new(name.as_str())))
            .map_err(write_err),
        scalar => write_text_element(writer, &name, &cell_text(scalar)),
    }
}

fn write_text_element(writer: &mut XmlWriter, name: &str, text: &str) -> Result<()> {
    if text.is_empty() {
        return writer
            .write_event(Event::Empty(BytesStart::new(name)))
            .map_err(write_err);
    }
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(write_err)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(write_err)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(write_err)
}

fn write_err(err: impl std::fmt::Display) -> ToolhubError {
    ToolhubError::Conversion(format!("XML write failed: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn attributes_text_and_repeats() {
        let xml = br#"<?xml version="1.0"?>
            <library name="city">
              <!-- shelf list -->
              <book id="1">Dune</book>
              <book id="2"><title>Emma</title></book>
              <note>open &amp; free</note>
              <empty/>
            </library>"#;
        let value = xml_to_json(xml).unwrap();
        assert_eq!(
            value,
            json!({
                "library": {
                    "@name": "city",
                    "book": [
                        { "@id": "1", "#text": "Dune" },
                        { "@id": "2", "title": "Emma" }
                    ],
                    "note": "open & free",
                    "empty": ""
                }
            })
        );
    }

    #[test]
    fn cdata_is_text() {
        let value = xml_to_json(b"<a><![CDATA[1 < 2]]></a>").unwrap();
        assert_eq!(value, json!({ "a": "1 < 2" }));
    }

    #[test]
    fn malformed_xml_is_rejected() {
        assert!(xml_to_json(b"<a><b></a>").is_err());
        assert!(xml_to_json(b"<a>").is_err());
        assert!(xml_to_json(b"<a/><b/>").is_err());
        assert!(xml_to_json(b"").is_err());
    }

    #[test]
    fn json_to_xml_mirrors_the_mapping() {
        let input = br##"{"book": [{"@id": "1", "#text": "Dune"}, {"title": "Emma", "year": 1815}], "gone": null}"##;
        let xml = json_to_xml(input, "library").unwrap();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <library>\n\
             \x20 <book id=\"1\">Dune</book>\n\
             \x20 <book>\n\
             \x20   <title>Emma</title>\n\
             \x20   <year>1815</year>\n\
             \x20 </book>\n\
             \x20 <gone/>\n\
             </library>\n"
        );

        let back = xml_to_json(xml.as_bytes()).unwrap();
        assert_eq!(back["library"]["book"][0]["#text"], json!("Dune"));
        assert_eq!(back["library"]["book"][1]["year"], json!("1815"));
    }

    #[test]
    fn single_root_object_is_the_document_element() {
        let xml = json_to_xml(br#"{"library": {"book": "Dune"}}"#, "root").unwrap();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <library>\n\
             \x20 <book>Dune</book>\n\
             </library>\n"
        );
    }

    #[test]
    fn xml_survives_a_trip_through_json() {
        let original = br#"<shelf room="2">
              <book id="1">Dune</book>
              <book id="2"><title>Emma</title><year>1815</year></book>
              <note>open &amp; free</note>
              <empty/>
            </shelf>"#;
        let value = xml_to_json(original).unwrap();
        let encoded = serde_json::to_vec(&value).unwrap();
        let xml = json_to_xml(&encoded, "ignored").unwrap();

        assert!(xml.contains("<shelf room=\"2\">"));
        assert!(!xml.contains("ignored"));
        assert_eq!(xml_to_json(xml.as_bytes()).unwrap(), value);
    }

    #[test]
    fn nested_arrays_keep_their_grouping() {
        let xml = json_to_xml(b"[[1, 2], [3], []]", "grid").unwrap();
        assert_eq!(
            xml_to_json(xml.as_bytes()).unwrap(),
            json!({ "grid": { "item": [ { "item": ["1", "2"] }, { "item": "3" }, "" ] } })
        );

        let xml = json_to_xml(br#"{"a": [[1, 2], [3]], "b": 0}"#, "doc").unwrap();
        assert_eq!(
            xml_to_json(xml.as_bytes()).unwrap(),
            json!({ "doc": { "a": [ { "item": ["1", "2"] }, { "item": "3" } ], "b": "0" } })
        );
    }

    #[test]
    fn top_level_array_uses_item_elements() {
        let xml = json_to_xml(b"[1, \"a<b\"]", "values").unwrap();
        assert!(xml.contains("<item>1</item>"));
        assert!(xml.contains("<item>a&lt;b</item>"));
    }

    #[test]
    fn names_are_sanitized() {
        assert_eq!(sanitize_name("unit price"), "unit_price");
        assert_eq!(sanitize_name("2024"), "_2024");
        assert_eq!(sanitize_name(""), "_");
        assert_eq!(sanitize_name("a:b"), "a_b");
        assert_eq!(sanitize_name("-x"), "_-x");
    }

    #[test]
    fn csv_rows_become_row_elements() {
        let xml = csv_to_xml(b"part no,qty\nM3,10\nM4,\n", &ConvertOptions::default()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<root>"));
        assert!(xml.contains("<part_no>M3</part_no>"));
        assert!(xml.contains("<qty/>"));
        assert_eq!(xml.matches("<row>").count(), 2);
    }

    #[test]
    fn xml_without_repeats_is_a_single_row() {
        let csv = xml_to_csv(b"<cfg><host>a</host><port>80</port></cfg>", b',').unwrap();
        assert_eq!(csv, "host,port\na,80\n");
    }
}
