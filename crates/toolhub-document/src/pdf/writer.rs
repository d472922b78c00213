// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer: create new PDF documents from text or images using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`.

use std::path::Path;

use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, RawImage,
    RawImageData, RawImageFormat, TextItem, XObjectTransform,
};
use toolhub_core::PaperSize;
use toolhub_core::error::{Result, ToolhubError};
use tracing::{debug, info, instrument, warn};

/// Text layout constants (points unless noted).
const FONT_SIZE_PT: f32 = 11.0;
const LINE_HEIGHT_PT: f32 = 14.0;
const TEXT_MARGIN_MM: f32 = 20.0;

/// Image placement constants.
const IMAGE_MARGIN_MM: f32 = 15.0;
const IMAGE_DPI: f32 = 150.0;

/// Creates new PDF documents from text content or raster images.
pub struct PdfWriter {
    /// Paper size for page creation.
    paper_size: PaperSize,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PdfWriter {
    /// Create a new writer targeting the given paper size.
    pub fn new(paper_size: PaperSize) -> Self {
        Self {
            paper_size,
            title: None,
        }
    }

    /// Create a new writer defaulting to A4.
    pub fn a4() -> Self {
        Self::new(PaperSize::A4)
    }

    /// Set the paper size.
    pub fn set_paper_size(&mut self, paper_size: PaperSize) {
        self.paper_size = paper_size;
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Paper dimensions in printpdf's Mm units.
    fn page_dimensions(&self) -> (Mm, Mm) {
        let (w_mm, h_mm) = self.paper_size.dimensions_mm();
        (Mm(w_mm as f32), Mm(h_mm as f32))
    }

    /// Reject paper too small to leave any room inside `margin_mm` on each side.
    fn check_margins(&self, margin_mm: f32) -> Result<()> {
        let (page_w, page_h) = self.page_dimensions();
        if page_w.0.min(page_h.0) <= 2.0 * margin_mm {
            return Err(ToolhubError::InvalidInput(format!(
                "paper {} mm is too small for {margin_mm} mm margins",
                self.paper_size
            )));
        }
        Ok(())
    }

    // -- Text to PDF ----------------------------------------------------------

    /// Create a PDF from plain text content.
    ///
    /// The text is laid out in a simple top-to-bottom flow using the built-in
    /// Helvetica font. Long lines are wrapped at an estimated character width
    /// and pages break automatically. Empty input yields one blank page.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub fn create_from_text(&self, text: &str) -> Result<Vec<u8>> {
        self.check_margins(TEXT_MARGIN_MM)?;
        let (page_w, page_h) = self.page_dimensions();
        let title = self.title.as_deref().unwrap_or("Toolhub Document");

        info!(paper = %self.paper_size, title, "Creating text PDF");

        let margin_pt: f32 = Mm(TEXT_MARGIN_MM).into_pt().0;
        let usable_width_mm = page_w.0 - 2.0 * TEXT_MARGIN_MM;

        // Average Helvetica glyph width is roughly half the font size
        // (1pt = 0.3528mm).
        let avg_char_width_mm: f32 = 0.50 * FONT_SIZE_PT * 0.3528;
        let max_chars_per_line = ((usable_width_mm / avg_char_width_mm) as usize).max(1);

        let wrapped_lines = wrap_text(text, max_chars_per_line);
        let page_h_pt = page_h.into_pt().0;
        let usable_height_pt = page_h_pt - 2.0 * margin_pt;
        let lines_per_page = ((usable_height_pt / LINE_HEIGHT_PT) as usize).max(1);

        let mut doc = PdfDocument::new(title);
        let mut pages: Vec<PdfPage> = wrapped_lines
            .chunks(lines_per_page)
            .map(|chunk| {
                let ops = chunk
                    .iter()
                    .enumerate()
                    .flat_map(|(line_idx, line)| {
                        let y_pt = page_h_pt - margin_pt - (line_idx as f32 * LINE_HEIGHT_PT);
                        text_line_ops(line, margin_pt, y_pt)
                    })
                    .collect();
                PdfPage::new(page_w, page_h, ops)
            })
            .collect();

        if pages.is_empty() {
            pages.push(PdfPage::new(page_w, page_h, Vec::new()));
        }

        doc.with_pages(pages);

        debug!(
            total_lines = wrapped_lines.len(),
            pages = doc.pages.len(),
            "Text layout complete"
        );

        Ok(save(&doc))
    }

    // -- Images to PDF --------------------------------------------------------

    /// Create a PDF with one page per image.
    ///
    /// Each image is scaled to fit within the page margins while preserving
    /// its aspect ratio, never upscaled, and centred.
    #[instrument(skip_all, fields(images = images.len()))]
    pub fn create_from_images(&self, images: &[&[u8]]) -> Result<Vec<u8>> {
        if images.is_empty() {
            return Err(ToolhubError::InvalidInput("no images to convert".into()));
        }
        self.check_margins(IMAGE_MARGIN_MM)?;

        let (page_w, page_h) = self.page_dimensions();
        let title = self.title.as_deref().unwrap_or("Toolhub Images");
        info!(paper = %self.paper_size, title, "Creating image PDF");

        let mut doc = PdfDocument::new(title);
        let mut pages = Vec::with_capacity(images.len());

        for (index, image_bytes) in images.iter().enumerate() {
            let dynamic_image = ::image::load_from_memory(image_bytes).map_err(|err| {
                ToolhubError::ImageError(format!("failed to decode image #{}: {}", index + 1, err))
            })?;

            let img_width = dynamic_image.width() as usize;
            let img_height = dynamic_image.height() as usize;

            let rgb_image = dynamic_image.to_rgb8();
            let raw = RawImage {
                pixels: RawImageData::U8(rgb_image.into_raw()),
                width: img_width,
                height: img_height,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            let placement = fit_on_page(img_width, img_height, page_w, page_h);
            debug!(
                index,
                rendered_w_pt = placement.width_pt,
                rendered_h_pt = placement.height_pt,
                scale = placement.scale,
                "Image placed on page"
            );

            let ops = vec![Op::UseXobject {
                id: xobject_id,
                transform: XObjectTransform {
                    translate_x: Some(Pt(placement.x_pt)),
                    translate_y: Some(Pt(placement.y_pt)),
                    scale_x: Some(placement.scale),
                    scale_y: Some(placement.scale),
                    dpi: Some(IMAGE_DPI),
                    rotate: None,
                },
            }];
            pages.push(PdfPage::new(page_w, page_h, ops));
        }

        doc.with_pages(pages);
        Ok(save(&doc))
    }

    /// Create a single-page PDF containing the given image.
    pub fn create_from_image(&self, image_bytes: &[u8]) -> Result<Vec<u8>> {
        self.create_from_images(&[image_bytes])
    }

    // -- File output convenience ----------------------------------------------

    /// Create a text PDF and write it directly to a file.
    pub fn write_text_to_file(&self, text: &str, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.create_from_text(text)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote text PDF to {}", path.as_ref().display());
        Ok(())
    }

    /// Create an image PDF and write it directly to a file.
    pub fn write_images_to_file(&self, images: &[&[u8]], path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.create_from_images(images)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote image PDF to {}", path.as_ref().display());
        Ok(())
    }
}

fn save(doc: &PdfDocument) -> Vec<u8> {
    let mut warnings: Vec<PdfWarnMsg> = Vec::new();
    let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        warn!(count = warnings.len(), "printpdf reported warnings while saving");
    }
    output
}

fn text_line_ops(line: &str, x_pt: f32, y_pt: f32) -> Vec<Op> {
    vec![
        Op::StartTextSection,
        Op::SetTextCursor {
            pos: Point {
                x: Pt(x_pt),
                y: Pt(y_pt),
            },
        },
        Op::SetFontSizeBuiltinFont {
            size: Pt(FONT_SIZE_PT),
            font: BuiltinFont::Helvetica,
        },
        Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(line.to_owned())],
            font: BuiltinFont::Helvetica,
        },
        Op::EndTextSection,
    ]
}

/// Where and how large an image lands on a page.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    x_pt: f32,
    y_pt: f32,
    width_pt: f32,
    height_pt: f32,
    scale: f32,
}

/// Scale an image (at `IMAGE_DPI`) to fit the printable area, without
/// upscaling, and centre it. The page must be wider and taller than twice
/// `IMAGE_MARGIN_MM`.
fn fit_on_page(img_width: usize, img_height: usize, page_w: Mm, page_h: Mm) -> Placement {
    let usable_w_pt = Mm(page_w.0 - 2.0 * IMAGE_MARGIN_MM).into_pt().0;
    let usable_h_pt = Mm(page_h.0 - 2.0 * IMAGE_MARGIN_MM).into_pt().0;

    let img_w_pt = (img_width.max(1) as f32) / IMAGE_DPI * 72.0;
    let img_h_pt = (img_height.max(1) as f32) / IMAGE_DPI * 72.0;

    let scale = (usable_w_pt / img_w_pt).min(usable_h_pt / img_h_pt).min(1.0);
    let width_pt = img_w_pt * scale;
    let height_pt = img_h_pt * scale;

    let margin_pt = Mm(IMAGE_MARGIN_MM).into_pt().0;
    Placement {
        x_pt: margin_pt + (usable_w_pt - width_pt) / 2.0,
        y_pt: margin_pt + (usable_h_pt - height_pt) / 2.0,
        width_pt,
        height_pt,
        scale,
    }
}

// -- Text wrapping helper -----------------------------------------------------

/// Wrap a multi-line string so that no line exceeds `max_width` characters.
///
/// Splits on existing newlines first, then performs simple word-wrap within each
/// paragraph. Words longer than `max_width` are force-broken on character
/// boundaries.
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut result = Vec::new();

    for paragraph in text.lines() {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            result.push(String::new());
            continue;
        }

        let mut current_line = String::new();
        let mut current_len = 0usize;

        for word in words {
            let word_len = word.chars().count();

            if word_len > max_width {
                if !current_line.is_empty() {
                    result.push(std::mem::take(&mut current_line));
                }
                let chars: Vec<char> = word.chars().collect();
                let mut chunks = chars.chunks(max_width).peekable();
                while let Some(chunk) = chunks.next() {
                    let piece: String = chunk.iter().collect();
                    if chunks.peek().is_some() {
                        result.push(piece);
                    } else {
                        current_len = chunk.len();
                        current_line = piece;
                    }
                }
            } else if current_line.is_empty() {
                current_line.push_str(word);
                current_len = word_len;
            } else if current_len + 1 + word_len <= max_width {
                current_line.push(' ');
                current_line.push_str(word);
                current_len += 1 + word_len;
            } else {
                result.push(std::mem::replace(&mut current_line, word.to_owned()));
                current_len = word_len;
            }
        }

        if !current_line.is_empty() {
            result.push(current_line);
        }
    }

    result
}
