// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `toolhub pdf ...`

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use tracing::info;

use toolhub_core::PaperSize;
use toolhub_document::{PdfReader, PdfWriter, merge_all};

use super::{Context, read_input};
use crate::cli::PdfCommand;
use crate::services::output::write_output;

/// Stand-in file name for inputs given as data URIs.
const DATA_URI_NAME: &str = "document.pdf";

pub fn run(command: PdfCommand, ctx: &Context) -> Result<()> {
    match command {
        PdfCommand::Info { input, json } => {
            let reader = open(&input)?;
            let info = reader.info();
            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("PDF version: {}", info.version);
                println!("Pages:       {}", info.page_count);
                for page in &info.pages {
                    println!(
                        "  {:>4}  {:.0} x {:.0} pt  rotated {}",
                        page.number, page.width_pt, page.height_pt, page.rotation
                    );
                }
            }
            Ok(())
        }

        PdfCommand::Merge { inputs, output } => {
            let documents = inputs
                .iter()
                .map(|input| load_bytes(input))
                .collect::<Result<Vec<_>>>()?;
            let merged = merge_all(&documents)?;
            let path = ctx
                .output
                .resolve(output.as_deref(), &input_path(&inputs[0]), "merged", "pdf");
            finish(&path, &merged)
        }

        PdfCommand::Split {
            input,
            ranges,
            at,
            output_dir,
        } => {
            let reader = open(&input)?;
            let (parts, label) = match (ranges, at) {
                (Some(ranges), _) => (reader.split_range_str(&ranges)?, "part"),
                (None, Some(at)) => {
                    let (first, second) = reader.split_at(at)?;
                    (vec![first, second], "part")
                }
                (None, None) => (reader.burst()?, "page"),
            };

            let source = input_path(&input);
            let dir = output_dir.unwrap_or_else(|| ctx.output.directory_for(&source));
            let stem = file_stem(&source);
            for (index, bytes) in parts.iter().enumerate() {
                let path = dir.join(format!("{stem}-{label}-{}.pdf", index + 1));
                write_output(&path, bytes)?;
            }
            info!(parts = parts.len(), dir = %dir.display(), "split complete");
            println!("Wrote {} files to {}", parts.len(), dir.display());
            Ok(())
        }

        PdfCommand::Extract {
            input,
            pages,
            output,
        } => {
            let bytes = open(&input)?.extract_range_str(&pages)?;
            let path = ctx
                .output
                .resolve(output.as_deref(), &input_path(&input), "extracted", "pdf");
            finish(&path, &bytes)
        }

        PdfCommand::Delete {
            input,
            pages,
            output,
        } => {
            let bytes = open(&input)?.delete_range_str(&pages)?;
            let path = ctx
                .output
                .resolve(output.as_deref(), &input_path(&input), "trimmed", "pdf");
            finish(&path, &bytes)
        }

        PdfCommand::Rotate {
            input,
            degrees,
            pages,
            output,
        } => {
            let bytes = open(&input)?.rotate_range_str(pages.as_deref(), degrees)?;
            let path = ctx
                .output
                .resolve(output.as_deref(), &input_path(&input), "rotated", "pdf");
            finish(&path, &bytes)
        }

        PdfCommand::FromText {
            input,
            paper,
            title,
            output,
        } => {
            let raw = read_input(&input)?;
            let text = String::from_utf8_lossy(&raw);
            let writer = writer(paper.unwrap_or(ctx.config.default_paper_size), title);
            let bytes = writer.create_from_text(&text)?;
            let path = ctx.output.resolve(output.as_deref(), &input, "", "pdf");
            finish(&path, &bytes)
        }

        PdfCommand::FromImages {
            images,
            paper,
            title,
            output,
        } => {
            let data = images
                .iter()
                .map(|path| read_input(path))
                .collect::<Result<Vec<_>>>()?;
            let slices: Vec<&[u8]> = data.iter().map(Vec::as_slice).collect();
            let writer = writer(paper.unwrap_or(ctx.config.default_paper_size), title);
            let bytes = writer.create_from_images(&slices)?;
            let path = ctx
                .output
                .resolve(output.as_deref(), &images[0], "images", "pdf");
            finish(&path, &bytes)
        }
    }
}

/// Open a PDF given as a path or a `data:` URI.
fn open(input: &str) -> Result<PdfReader> {
    if is_data_uri(input) {
        return Ok(PdfReader::from_data_uri(input)?);
    }
    PdfReader::open(input).with_context(|| format!("opening {input}"))
}

fn load_bytes(input: &str) -> Result<Vec<u8>> {
    if is_data_uri(input) {
        return Ok(toolhub_core::DataUri::parse(input)?.data);
    }
    read_input(Path::new(input))
}

fn is_data_uri(input: &str) -> bool {
    input
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

/// The path output names are derived from.
fn input_path(input: &str) -> PathBuf {
    if is_data_uri(input) {
        PathBuf::from(DATA_URI_NAME)
    } else {
        PathBuf::from(input)
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".into())
}

fn writer(paper: PaperSize, title: Option<String>) -> PdfWriter {
    let mut writer = PdfWriter::new(paper);
    if let Some(title) = title {
        writer.set_title(title);
    }
    writer
}

fn finish(path: &Path, bytes: &[u8]) -> Result<()> {
    write_output(path, bytes)?;
    if path != Path::new("-") {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolhub_core::AppConfig;

    fn context() -> Context {
        Context::new(AppConfig::default(), PathBuf::from("config.json"))
    }

    fn one_page_pdf(dir: &Path, name: &str, text: &str) -> PathBuf {
        let bytes = PdfWriter::a4().create_from_text(text).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    fn pages(path: &Path) -> usize {
        PdfReader::open(path).unwrap().page_count()
    }

    #[test]
    fn merge_then_extract_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let a = one_page_pdf(dir.path(), "a.pdf", "first");
        let b = one_page_pdf(dir.path(), "b.pdf", "second");
        let c = one_page_pdf(dir.path(), "c.pdf", "third");
        let ctx = context();

        let merged = dir.path().join("merged.pdf");
        run(
            PdfCommand::Merge {
                inputs: [&a, &b, &c].map(|p| p.display().to_string()).to_vec(),
                output: Some(merged.clone()),
            },
            &ctx,
        )
        .unwrap();
        assert_eq!(pages(&merged), 3);

        run(
            PdfCommand::Extract {
                input: merged.display().to_string(),
                pages: "1,3".into(),
                output: None,
            },
            &ctx,
        )
        .unwrap();
        assert_eq!(pages(&dir.path().join("merged-extracted.pdf")), 2);

        run(
            PdfCommand::Delete {
                input: merged.display().to_string(),
                pages: "2-".into(),
                output: None,
            },
            &ctx,
        )
        .unwrap();
        assert_eq!(pages(&dir.path().join("merged-trimmed.pdf")), 1);
    }

    #[test]
    fn deleting_every_page_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let a = one_page_pdf(dir.path(), "a.pdf", "only");
        let err = run(
            PdfCommand::Delete {
                input: a.display().to_string(),
                pages: "1".into(),
                output: None,
            },
            &context(),
        )
        .unwrap_err();
        assert!(err.downcast_ref::<toolhub_core::ToolhubError>().is_some());
        assert!(!dir.path().join("a-trimmed.pdf").exists());
    }

    #[test]
    fn burst_writes_numbered_pages() {
        let dir = tempfile::tempdir().unwrap();
        let a = one_page_pdf(dir.path(), "a.pdf", "one");
        let b = one_page_pdf(dir.path(), "b.pdf", "two");
        let merged = dir.path().join("doc.pdf");
        let bytes = merge_all(&[std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap()]).unwrap();
        std::fs::write(&merged, bytes).unwrap();

        let out = dir.path().join("parts");
        run(
            PdfCommand::Split {
                input: merged.display().to_string(),
                ranges: None,
                at: None,
                output_dir: Some(out.clone()),
            },
            &context(),
        )
        .unwrap();
        assert_eq!(pages(&out.join("doc-page-1.pdf")), 1);
        assert_eq!(pages(&out.join("doc-page-2.pdf")), 1);
    }

    #[test]
    fn data_uri_inputs() {
        assert!(is_data_uri("DATA:application/pdf;base64,AAAA"));
        assert!(!is_data_uri("data.pdf"));
        assert_eq!(input_path("data:application/pdf;base64,AA"), PathBuf::from(DATA_URI_NAME));

        let bytes = PdfWriter::a4().create_from_text("inline").unwrap();
        let uri = toolhub_core::DataUri::new("application/pdf", bytes).to_string();
        assert_eq!(open(&uri).unwrap().page_count(), 1);
    }
}
