// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `toolhub datauri ...`

use std::path::Path;

use anyhow::{Result, bail};

use toolhub_core::DataUri;
use toolhub_document::{DataFormat, ImageFormatKind};

use super::{Context, read_input};
use crate::cli::DataUriCommand;
use crate::services::output::write_output;

const PDF_MIME: &str = "application/pdf";
const FALLBACK_MIME: &str = "application/octet-stream";
const DATA_FORMATS: [DataFormat; 4] = [
    DataFormat::Csv,
    DataFormat::Json,
    DataFormat::Xml,
    DataFormat::Excel,
];

pub fn run(command: DataUriCommand, ctx: &Context) -> Result<()> {
    match command {
        DataUriCommand::Encode { input, mime } => {
            let data = read_input(&input)?;
            let mime = mime.unwrap_or_else(|| guess_mime(&input).to_owned());
            println!("{}", DataUri::new(mime, data));
            Ok(())
        }

        DataUriCommand::Decode { uri, output } => {
            let text = if uri.trim_start().starts_with("data:") {
                uri
            } else {
                let raw = read_input(Path::new(&uri))?;
                String::from_utf8_lossy(&raw).into_owned()
            };
            let text = text.trim();
            if !text.starts_with("data:") {
                bail!("expected a data: URI");
            }

            let decoded = DataUri::parse(text)?;
            let path = ctx.output.resolve(
                output.as_deref(),
                Path::new("decoded"),
                "",
                extension_for(&decoded.mime_type),
            );
            write_output(&path, &decoded.data)?;
            if path != Path::new("-") {
                println!(
                    "Wrote {} ({}, {} bytes)",
                    path.display(),
                    decoded.mime_type,
                    decoded.len()
                );
            }
            Ok(())
        }
    }
}

fn guess_mime(path: &Path) -> &'static str {
    if let Some(format) = ImageFormatKind::from_path(path) {
        return format.mime_type();
    }
    if let Some(format) = DataFormat::from_path(path) {
        return format.mime_type();
    }
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => PDF_MIME,
        Some(ext) if ext.eq_ignore_ascii_case("txt") => "text/plain",
        _ => FALLBACK_MIME,
    }
}

fn extension_for(mime: &str) -> &'static str {
    if let Some(format) = ImageFormatKind::from_mime(mime) {
        return format.extension();
    }
    if let Some(format) = DATA_FORMATS
        .into_iter()
        .find(|format| format.mime_type().eq_ignore_ascii_case(mime))
    {
        return format.extension();
    }
    match mime {
        PDF_MIME => "pdf",
        "text/plain" => "txt",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;
    use toolhub_core::AppConfig;

    #[test]
    fn mime_guessing() {
        assert_eq!(guess_mime(Path::new("a.PNG")), "image/png");
        assert_eq!(guess_mime(Path::new("a.pdf")), PDF_MIME);
        assert_eq!(guess_mime(Path::new("a.csv")), DataFormat::Csv.mime_type());
        assert_eq!(guess_mime(Path::new("a.xyz")), FALLBACK_MIME);
    }

    #[test]
    fn extensions_follow_mime() {
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for(PDF_MIME), "pdf");
        assert_eq!(extension_for("text/plain"), "txt");
        assert_eq!(extension_for("application/x-unknown"), "bin");
    }

    #[test]
    fn decode_from_file_to_derived_output() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            output_dir: Some(dir.path().to_path_buf()),
            ..AppConfig::default()
        };
        let ctx = Context::new(config, PathBuf::from("config.json"));

        let uri_file = dir.path().join("uri.txt");
        fs::write(&uri_file, "data:text/plain;base64,aGVsbG8=\n").unwrap();
        run(
            DataUriCommand::Decode {
                uri: uri_file.display().to_string(),
                output: None,
            },
            &ctx,
        )
        .unwrap();
        assert_eq!(fs::read(dir.path().join("decoded.txt")).unwrap(), b"hello");
    }
}
