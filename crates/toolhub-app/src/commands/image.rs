// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `toolhub image ...`

use std::path::Path;

use anyhow::{Context as _, Result, bail};
use tracing::debug;

use toolhub_document::{ImageFormatKind, ImageProcessor, convert_image};

use super::{Context, read_input};
use crate::cli::{EncodeArgs, FlipArg, ImageCommand};
use crate::services::output::write_output;

pub fn run(command: ImageCommand, ctx: &Context) -> Result<()> {
    match command {
        ImageCommand::Convert {
            input,
            to,
            quality,
            output,
        } => {
            let data = read_input(&input)?;
            let bytes = convert_image(&data, to, quality.unwrap_or(ctx.config.jpeg_quality))?;
            let path = ctx
                .output
                .resolve(output.as_deref(), &input, "", to.extension());
            if path == input {
                bail!("output would overwrite the input {}; pass --output", path.display());
            }
            finish(&path, &bytes)
        }

        ImageCommand::Resize {
            input,
            width,
            height,
            percent,
            exact,
            encode,
        } => {
            let image = open(&input)?;
            let (before_w, before_h) = (image.width(), image.height());
            let image = match (percent, width, height) {
                (Some(percent), _, _) => image.resize_percent(percent)?,
                (None, Some(width), Some(height)) if exact => image.resize_exact(width, height)?,
                (None, Some(width), Some(height)) => image.resize(width, height)?,
                _ => bail!("give --width and --height, or --percent"),
            };
            debug!(before_w, before_h, after_w = image.width(), after_h = image.height(), "resized");
            save(&image, &input, "resized", encode, ctx)
        }

        ImageCommand::Rotate {
            input,
            degrees,
            encode,
        } => {
            let image = open(&input)?.rotate(degrees);
            save(&image, &input, "rotated", encode, ctx)
        }

        ImageCommand::Edit {
            input,
            crop,
            flip,
            grayscale,
            brightness,
            contrast,
            encode,
        } => {
            let mut image = open(&input)?;
            if let Some(rect) = crop {
                image = image.crop(rect.x, rect.y, rect.width, rect.height);
            }
            image = match flip {
                Some(FlipArg::Horizontal) => image.flip_horizontal(),
                Some(FlipArg::Vertical) => image.flip_vertical(),
                None => image,
            };
            if grayscale {
                image = image.grayscale();
            }
            if let Some(value) = brightness {
                image = image.adjust_brightness(value);
            }
            if let Some(factor) = contrast {
                image = image.adjust_contrast(factor);
            }
            save(&image, &input, "edited", encode, ctx)
        }
    }
}

fn open(path: &Path) -> Result<ImageProcessor> {
    let data = read_input(path)?;
    ImageProcessor::from_bytes(&data).with_context(|| format!("decoding {}", path.display()))
}

/// `--to`, else the output file's extension, else the input's, else PNG.
fn target_format(encode: &EncodeArgs, input: &Path) -> ImageFormatKind {
    encode
        .to
        .or_else(|| encode.output.as_deref().and_then(ImageFormatKind::from_path))
        .or_else(|| ImageFormatKind::from_path(input))
        .unwrap_or(ImageFormatKind::Png)
}

fn save(
    image: &ImageProcessor,
    input: &Path,
    suffix: &str,
    encode: EncodeArgs,
    ctx: &Context,
) -> Result<()> {
    let format = target_format(&encode, input);
    let bytes = image.encode(format, encode.quality.unwrap_or(ctx.config.jpeg_quality))?;
    let path = ctx
        .output
        .resolve(encode.output.as_deref(), input, suffix, format.extension());
    finish(&path, &bytes)
}

fn finish(path: &Path, bytes: &[u8]) -> Result<()> {
    write_output(path, bytes)?;
    if path != Path::new("-") {
        println!("Wrote {}", path.display());
    }
    Ok(())
}
