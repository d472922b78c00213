// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `toolhub convert ...`

use std::path::Path;

use anyhow::{Result, anyhow, bail};

use toolhub_document::convert::excel_sheet_names;
use toolhub_document::{ConvertOptions, DataConverter, DataFormat};

use super::{Context, read_input};
use crate::cli::ConvertArgs;
use crate::services::output::write_output;

pub fn run(args: ConvertArgs, ctx: &Context) -> Result<()> {
    let from = source_format(args.from, &args.input)?;
    let input = read_input(&args.input)?;

    if args.list_sheets {
        if from != DataFormat::Excel {
            bail!("--list-sheets needs an Excel workbook, got {from}");
        }
        for name in excel_sheet_names(&input)? {
            println!("{name}");
        }
        return Ok(());
    }

    let to = args
        .to
        .ok_or_else(|| anyhow!("choose a target format with --to"))?;
    let path = ctx
        .output
        .resolve(args.output.as_deref(), &args.input, "", to.extension());
    if path == args.input {
        bail!(
            "output would overwrite the input {}; pass --output",
            path.display()
        );
    }

    let options = options(&args, ctx)?;
    let output = DataConverter::convert(&input, from, to, &options)?;
    write_output(&path, &output)?;
    if path != Path::new("-") {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

fn source_format(explicit: Option<DataFormat>, input: &Path) -> Result<DataFormat> {
    explicit.or_else(|| DataFormat::from_path(input)).ok_or_else(|| {
        anyhow!(
            "can't tell the format of {} from its extension; pass --from",
            input.display()
        )
    })
}

/// Config defaults overridden by command-line flags.
fn options(args: &ConvertArgs, ctx: &Context) -> Result<ConvertOptions> {
    let mut options = ConvertOptions::from_config(&ctx.config);
    if let Some(delimiter) = args.delimiter {
        if !delimiter.is_ascii() {
            bail!("the delimiter must be a single ASCII character, got '{delimiter}'");
        }
        options.delimiter = delimiter as u8;
    } else if args.input.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("tsv")) {
        options.delimiter = b'\t';
    }
    if let Some(root) = &args.root {
        options.root_name = root.clone();
    }
    options.sheet = args.sheet.clone();
    options.infer_types = args.infer_types;
    options.pretty = !args.compact;
    Ok(options)
}
