// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader: open, inspect, merge, split, extract, delete, and rotate pages
// of existing PDF documents using the `lopdf` crate.
//
// Page selections come from `toolhub_core::page_range`; everything here works
// with the validated 0-indexed `PageSelection` and converts to lopdf's
// 1-indexed page numbers at the edge.

use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};
use serde::Serialize;
use toolhub_core::error::{Result, ToolhubError};
use toolhub_core::page_range::{PageRangeError, PageSelection};
use toolhub_core::{DataUri, Rotation};
use tracing::{debug, info, instrument, warn};

/// Page attributes a page may inherit from its ancestors in the page tree
/// (ISO 32000-1, 7.7.3.4).
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Upper bound on page-tree depth; guards against `/Parent` cycles.
const MAX_TREE_DEPTH: usize = 64;

/// Summary of a PDF for the `info` tool.
#[derive(Debug, Clone, Serialize)]
pub struct PdfInfo {
    pub version: String,
    pub page_count: usize,
    pub pages: Vec<PageInfo>,
}

/// Size and rotation of one page. Sizes are in PostScript points.
#[derive(Debug, Clone, Serialize)]
pub struct PageInfo {
    pub number: u32,
    pub width_pt: f64,
    pub height_pt: f64,
    pub rotation: i64,
}

/// Reads and manipulates existing PDF files.
///
/// Every operation leaves the reader untouched and returns the serialised
/// bytes of a new document.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
    /// Source path, if opened from a file (useful for diagnostics).
    source_path: Option<String>,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            ToolhubError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self {
            document,
            source_path: Some(path_ref.display().to_string()),
        })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            ToolhubError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self {
            document,
            source_path: None,
        })
    }

    /// Create a reader from a `data:application/pdf;base64,...` URI.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let parsed = DataUri::parse(uri)?;
        if parsed.mime_type != "application/pdf" {
            warn!(mime = %parsed.mime_type, "data URI is not labelled as PDF, trying anyway");
        }
        Self::from_bytes(&parsed.data)
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Return the source path if the reader was created via [`PdfReader::open`].
    pub fn source_path(&self) -> Option<&str> {
        self.source_path.as_deref()
    }

    /// Version, page count, and per-page geometry.
    pub fn info(&self) -> PdfInfo {
        let pages = self
            .document
            .get_pages()
            .into_iter()
            .map(|(number, page_id)| {
                let (width_pt, height_pt) = inherited_attribute(&self.document, page_id, b"MediaBox")
                    .and_then(|media_box| rectangle_size(&self.document, &media_box))
                    .unwrap_or((0.0, 0.0));
                PageInfo {
                    number,
                    width_pt,
                    height_pt,
                    rotation: effective_rotation(&self.document, page_id),
                }
            })
            .collect();

        PdfInfo {
            version: self.document.version.clone(),
            page_count: self.page_count(),
            pages,
        }
    }

    // -- Page selection tools -------------------------------------------------

    /// New document containing only the selected pages, in ascending order.
    #[instrument(skip_all, fields(selection = %selection))]
    pub fn extract_pages(&self, selection: &PageSelection) -> Result<Vec<u8>> {
        self.check_selection(selection)?;
        info!(pages = selection.len(), "Extracting pages");
        self.keep_pages(&selection.page_numbers())
    }

    /// New document without the selected pages. Deleting every page is
    /// refused because a PDF must keep at least one.
    #[instrument(skip_all, fields(selection = %selection))]
    pub fn delete_pages(&self, selection: &PageSelection) -> Result<Vec<u8>> {
        self.check_selection(selection)?;
        let total = self.page_count();
        let keep: Vec<u32> = selection
            .complement(total)
            .into_iter()
            .map(|index| index as u32 + 1)
            .collect();
        if keep.is_empty() {
            return Err(PageRangeError::WouldRemoveAll { total }.into());
        }

        info!(deleted = selection.len(), remaining = keep.len(), "Deleting pages");
        self.keep_pages(&keep)
    }

    /// Rotate the selected pages by `degrees` (a multiple of 90, may be
    /// negative) relative to their current effective rotation.
    #[instrument(skip_all, fields(selection = %selection, degrees))]
    pub fn rotate_pages(&self, selection: &PageSelection, degrees: i32) -> Result<Vec<u8>> {
        self.check_selection(selection)?;
        let rotation = Rotation::from_degrees(degrees)?;

        let mut doc = self.document.clone();
        let pages = doc.get_pages();

        for page_number in selection.page_numbers() {
            let page_id = *pages.get(&page_number).ok_or_else(|| {
                ToolhubError::PdfError(format!("page {} not found in page tree", page_number))
            })?;

            let existing = effective_rotation(&doc, page_id);
            let new_rotation = (existing + rotation.degrees()).rem_euclid(360);

            if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(page_id) {
                dict.set("Rotate", Object::Integer(new_rotation));
            }
            debug!(page_number, existing, new_rotation, "Page rotated");
        }

        info!(pages = selection.len(), degrees = rotation.degrees(), "Rotation applied");
        serialise(&mut doc, "rotated PDF")
    }

    /// One output document per selection group, in group order.
    #[instrument(skip_all, fields(groups = groups.len()))]
    pub fn split_groups(&self, groups: &[PageSelection]) -> Result<Vec<Vec<u8>>> {
        if groups.is_empty() {
            return Err(PageRangeError::Empty.into());
        }
        info!(groups = groups.len(), "Splitting PDF into groups");
        groups
            .iter()
            .map(|group| self.extract_pages(group))
            .collect()
    }

    /// One single-page document per page.
    #[instrument(skip(self))]
    pub fn burst(&self) -> Result<Vec<Vec<u8>>> {
        let total = self.page_count() as u32;
        if total == 0 {
            return Err(PageRangeError::NoPages.into());
        }
        info!(total, "Bursting PDF into single pages");
        (1..=total).map(|page| self.keep_pages(&[page])).collect()
    }

    /// Split the document at `after_page` (1-indexed, inclusive) producing two
    /// byte-vectors: pages [1..=after_page] and pages [after_page+1..=end].
    #[instrument(skip(self), fields(after_page))]
    pub fn split_at(&self, after_page: u32) -> Result<(Vec<u8>, Vec<u8>)> {
        let total = self.page_count() as u32;
        if after_page == 0 || after_page >= total {
            return Err(ToolhubError::InvalidInput(format!(
                "split point {} invalid for {} page document",
                after_page, total
            )));
        }

        info!(after_page, total, "Splitting PDF");

        let first: Vec<u32> = (1..=after_page).collect();
        let second: Vec<u32> = (after_page + 1..=total).collect();
        Ok((self.keep_pages(&first)?, self.keep_pages(&second)?))
    }

    // -- Page-range string entry points ---------------------------------------

    /// Parse `ranges` against this document and extract those pages.
    pub fn extract_range_str(&self, ranges: &str) -> Result<Vec<u8>> {
        let selection = PageSelection::parse(ranges, self.page_count())?;
        self.extract_pages(&selection)
    }

    /// Parse `ranges` against this document and delete those pages.
    pub fn delete_range_str(&self, ranges: &str) -> Result<Vec<u8>> {
        let selection = PageSelection::parse_for_deletion(ranges, self.page_count())?;
        self.delete_pages(&selection)
    }

    /// Parse `ranges` (all pages when `None`) and rotate them by `degrees`.
    pub fn rotate_range_str(&self, ranges: Option<&str>, degrees: i32) -> Result<Vec<u8>> {
        let selection = match ranges {
            Some(ranges) => PageSelection::parse(ranges, self.page_count())?,
            None => PageSelection::all(self.page_count())?,
        };
        self.rotate_pages(&selection, degrees)
    }

    /// Parse `ranges` as split groups (`"1-3,4-6"` gives two documents).
    pub fn split_range_str(&self, ranges: &str) -> Result<Vec<Vec<u8>>> {
        let groups = PageSelection::parse_groups(ranges, self.page_count())?;
        self.split_groups(&groups)
    }

    // -- Merge ----------------------------------------------------------------

    /// Merge this document with one or more other PDF byte-slices, producing a
    /// combined PDF. Pages appear in the order: self, then each supplied
    /// document in order.
    ///
    /// Objects of each appended document are renumbered past the current
    /// maximum object id, the page trees are flattened into the first
    /// document's root `/Pages` node, and unreachable objects (the appended
    /// documents' catalogs and intermediate tree nodes) are pruned.
    #[instrument(skip_all, fields(additional_count = others.len()))]
    pub fn merge(&self, others: &[&[u8]]) -> Result<Vec<u8>> {
        info!(
            base_pages = self.page_count(),
            additional_documents = others.len(),
            "Merging PDFs"
        );

        let mut merged = self.document.clone();
        let mut page_ids = flatten_pages(&mut merged);

        for (index, other_bytes) in others.iter().enumerate() {
            let mut other = Document::load_mem(other_bytes).map_err(|err| {
                ToolhubError::PdfError(format!(
                    "failed to load additional PDF #{}: {}",
                    index + 1,
                    err
                ))
            })?;

            let other_pages = flatten_pages(&mut other);
            let offset = merged.max_id;
            let other_max_id = other.max_id;

            for ((number, generation), object) in other.objects {
                merged
                    .objects
                    .insert((number + offset, generation), remap_references(object, offset));
            }
            page_ids.extend(
                other_pages
                    .into_iter()
                    .map(|(number, generation)| (number + offset, generation)),
            );
            merged.max_id = merged.max_id.max(other_max_id + offset);

            debug!(document = index + 1, offset, "Appended document objects");
        }

        rebuild_page_tree(&mut merged, &page_ids)?;
        merged.prune_objects();

        let output = serialise(&mut merged, "merged PDF")?;
        debug!(pages = page_ids.len(), output_bytes = output.len(), "Merge complete");
        Ok(output)
    }

    // -- Helpers --------------------------------------------------------------

    /// Selections are parsed against a page count; make sure it was this
    /// document's.
    fn check_selection(&self, selection: &PageSelection) -> Result<()> {
        let total = self.page_count();
        match selection.indices().last() {
            Some(&last) if last >= total => Err(PageRangeError::OutOfBounds {
                page: last + 1,
                total,
            }
            .into()),
            Some(_) => Ok(()),
            None => Err(PageRangeError::Empty.into()),
        }
    }

    /// Serialise a copy of the document that keeps only `keep` (1-indexed).
    fn keep_pages(&self, keep: &[u32]) -> Result<Vec<u8>> {
        let total = self.page_count() as u32;
        let drop: Vec<u32> = (1..=total).filter(|page| !keep.contains(page)).collect();

        let mut doc = self.document.clone();
        if !drop.is_empty() {
            doc.delete_pages(&drop);
            doc.prune_objects();
        }

        serialise(&mut doc, "page selection")
    }
}

/// Merge a list of PDFs in order. A single document is returned unchanged.
pub fn merge_all(documents: &[Vec<u8>]) -> Result<Vec<u8>> {
    match documents {
        [] => Err(ToolhubError::InvalidInput("no documents to merge".into())),
        [single] => Ok(single.clone()),
        [first, rest @ ..] => {
            let others: Vec<&[u8]> = rest.iter().map(Vec::as_slice).collect();
            PdfReader::from_bytes(first)?.merge(&others)
        }
    }
}

fn serialise(doc: &mut Document, what: &str) -> Result<Vec<u8>> {
    doc.compress();
    let mut output = Vec::new();
    doc.save_to(&mut output).map_err(|err| {
        ToolhubError::PdfError(format!("failed to serialise {}: {}", what, err))
    })?;
    Ok(output)
}

/// Look up `key` on the page, then on each ancestor `/Pages` node.
fn inherited_attribute(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut current = Some(page_id);
    for _ in 0..MAX_TREE_DEPTH {
        let dict = doc.get_dictionary(current?).ok()?;
        if let Ok(value) = dict.get(key) {
            return Some(value.clone());
        }
        current = dict.get(b"Parent").and_then(Object::as_reference).ok();
    }
    warn!(?page_id, "page tree deeper than {MAX_TREE_DEPTH} levels, giving up");
    None
}

/// Effective clockwise rotation of a page in degrees, `0..360`.
fn effective_rotation(doc: &Document, page_id: ObjectId) -> i64 {
    inherited_attribute(doc, page_id, b"Rotate")
        .and_then(|value| resolve(doc, &value).as_i64().ok())
        .map(|degrees| degrees.rem_euclid(360))
        .unwrap_or(0)
}

/// Follow a single indirect reference, if `object` is one.
fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        other => other,
    }
}

/// Width and height of a PDF rectangle `[llx lly urx ury]`.
fn rectangle_size(doc: &Document, rect: &Object) -> Option<(f64, f64)> {
    let values = resolve(doc, rect).as_array().ok()?;
    let coords: Vec<f64> = values
        .iter()
        .map(|value| resolve(doc, value).as_float().map(f64::from))
        .collect::<std::result::Result<_, _>>()
        .ok()?;
    match coords.as_slice() {
        [llx, lly, urx, ury] => Some(((urx - llx).abs(), (ury - lly).abs())),
        _ => None,
    }
}

/// Copy inherited attributes onto every page and return the page ids in
/// page order. After this the page tree can be rebuilt flat without
/// changing how any page renders.
fn flatten_pages(doc: &mut Document) -> Vec<ObjectId> {
    let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();

    for &page_id in &page_ids {
        let missing: Vec<(&[u8], Object)> = INHERITABLE
            .iter()
            .filter(|key| {
                doc.get_dictionary(page_id)
                    .map(|dict| !dict.has(key))
                    .unwrap_or(false)
            })
            .filter_map(|key| inherited_attribute(doc, page_id, key).map(|value| (*key, value)))
            .collect();

        if missing.is_empty() {
            continue;
        }
        if let Ok(Object::Dictionary(dict)) = doc.get_object_mut(page_id) {
            for (key, value) in missing {
                dict.set(key.to_vec(), value);
            }
        }
    }

    page_ids
}

/// Point the catalog's root `/Pages` node at exactly `page_ids`, and each
/// page's `/Parent` back at the root.
fn rebuild_page_tree(doc: &mut Document, page_ids: &[ObjectId]) -> Result<()> {
    let pages_id = doc
        .catalog()
        .map_err(|err| ToolhubError::PdfError(format!("no catalog: {}", err)))?
        .get(b"Pages")
        .and_then(Object::as_reference)
        .map_err(|err| ToolhubError::PdfError(format!("no /Pages reference: {}", err)))?;

    match doc.get_object_mut(pages_id) {
        Ok(Object::Dictionary(pages_dict)) => {
            let kids = page_ids.iter().map(|&id| Object::Reference(id)).collect();
            pages_dict.set("Kids", Object::Array(kids));
            pages_dict.set("Count", Object::Integer(page_ids.len() as i64));
        }
        _ => {
            return Err(ToolhubError::PdfError(
                "/Pages is not a dictionary".to_string(),
            ));
        }
    }

    for &page_id in page_ids {
        if let Ok(Object::Dictionary(page_dict)) = doc.get_object_mut(page_id) {
            page_dict.set("Parent", Object::Reference(pages_id));
        }
    }
    Ok(())
}

/// Shift every indirect reference inside `object` by `offset`.
fn remap_references(object: Object, offset: u32) -> Object {
    match object {
        Object::Reference((number, generation)) => Object::Reference((number + offset, generation)),
        Object::Array(items) => Object::Array(
            items
                .into_iter()
                .map(|item| remap_references(item, offset))
                .collect(),
        ),
        Object::Dictionary(mut dict) => {
            remap_dictionary(&mut dict, offset);
            Object::Dictionary(dict)
        }
        Object::Stream(mut stream) => {
            remap_dictionary(&mut stream.dict, offset);
            Object::Stream(stream)
        }
        other => other,
    }
}

fn remap_dictionary(dict: &mut Dictionary, offset: u32) {
    for (_, value) in dict.iter_mut() {
        let taken = std::mem::replace(value, Object::Null);
        *value = remap_references(taken, offset);
    }
}
