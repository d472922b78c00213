// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line definitions (clap derive).

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use toolhub_core::PaperSize;
use toolhub_document::{DataFormat, ImageFormatKind};
use toolhub_utility::LoremUnit;

const AFTER_HELP: &str = r#"PAGE RANGES:
  Pages are numbered from 1. Separate items with commas:
    5        a single page
    3-7      pages 3 to 7
    9-       page 9 to the end
    -4       pages 1 to 4
  Example: toolhub pdf extract report.pdf "1,3,5-7,9-"

OUTPUT:
  Without --output, results are written next to the input as
  <name>-<tool>.<ext>, or into `output_dir` from the config file.
  Use `-o -` to write to stdout.
"#;

/// Offline utility toolbox: PDF page tools, data converters, image
/// conversion, calculators, and generators.
#[derive(Parser, Debug)]
#[command(
    name = "toolhub",
    version,
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
pub struct Cli {
    /// Path to config.json (defaults to the user config directory).
    #[arg(long, global = true, env = "TOOLHUB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log warnings and errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// PDF page tools and PDF creation.
    #[command(subcommand)]
    Pdf(PdfCommand),
    /// Convert between CSV, JSON, XML, and Excel.
    Convert(ConvertArgs),
    /// Image conversion and editing.
    #[command(subcommand)]
    Image(ImageCommand),
    /// Unit, BMI, loan, and currency calculators.
    #[command(subcommand)]
    Calc(CalcCommand),
    /// Passwords, placeholder text, UUIDs, and checksums.
    #[command(subcommand)]
    Gen(GenCommand),
    /// Encode files as data URIs and decode them back.
    #[command(subcommand)]
    Datauri(DataUriCommand),
    /// Inspect or create the config file.
    #[command(subcommand)]
    Config(ConfigCommand),
}

// -- PDF ----------------------------------------------------------------------

#[derive(Subcommand, Debug)]
pub enum PdfCommand {
    /// Show version, page count, and page sizes.
    Info {
        /// PDF file or `data:application/pdf;base64,...` URI.
        input: String,
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Combine PDFs in the order given.
    Merge {
        #[arg(required = true, num_args = 2..)]
        inputs: Vec<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Split into several documents.
    ///
    /// With --ranges each comma-separated item becomes one document; with
    /// --at the document is cut in two; otherwise every page becomes its
    /// own document.
    Split {
        input: String,
        #[arg(long, conflicts_with = "at")]
        ranges: Option<String>,
        /// Last page of the first part.
        #[arg(long)]
        at: Option<u32>,
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Keep only the selected pages.
    Extract {
        input: String,
        /// Page range, e.g. "1,3,5-7,9-".
        pages: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Remove the selected pages. At least one page must remain.
    Delete {
        input: String,
        pages: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Rotate pages by a multiple of 90 degrees (negative is anticlockwise).
    Rotate {
        input: String,
        #[arg(long, allow_negative_numbers = true, default_value_t = 90)]
        degrees: i32,
        /// Pages to rotate; all pages when omitted.
        #[arg(long)]
        pages: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Lay out a plain-text file as a PDF.
    FromText {
        input: PathBuf,
        /// a4, a3, a5, letter, legal, tabloid, or WIDTHxHEIGHT in mm.
        #[arg(long)]
        paper: Option<PaperSize>,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// One page per image.
    FromImages {
        #[arg(required = true)]
        images: Vec<PathBuf>,
        #[arg(long)]
        paper: Option<PaperSize>,
        #[arg(long)]
        title: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

// -- Data conversion ----------------------------------------------------------

#[derive(Args, Debug)]
pub struct ConvertArgs {
    pub input: PathBuf,

    /// Target format: csv, json, or xml.
    #[arg(long, required_unless_present = "list_sheets")]
    pub to: Option<DataFormat>,

    /// Source format; detected from the file extension when omitted.
    #[arg(long)]
    pub from: Option<DataFormat>,

    /// Worksheet to read from an Excel workbook.
    #[arg(long)]
    pub sheet: Option<String>,

    /// Document element name for XML output.
    #[arg(long)]
    pub root: Option<String>,

    /// CSV field delimiter.
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Turn numbers, booleans, and empty cells into JSON scalars.
    #[arg(long)]
    pub infer_types: bool,

    /// Single-line JSON output.
    #[arg(long)]
    pub compact: bool,

    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// List the worksheets of an Excel workbook and exit.
    #[arg(long)]
    pub list_sheets: bool,
}

// -- Images -------------------------------------------------------------------

#[derive(Subcommand, Debug)]
pub enum ImageCommand {
    /// Re-encode in another format.
    Convert {
        input: PathBuf,
        /// png, jpeg, gif, bmp, tiff, webp, or ico.
        #[arg(long)]
        to: ImageFormatKind,
        /// JPEG quality 1-100.
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
        quality: Option<u8>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Scale to fit a box, to exact dimensions, or by a percentage.
    Resize {
        input: PathBuf,
        #[arg(long, required_unless_present = "percent")]
        width: Option<u32>,
        #[arg(long, required_unless_present = "percent")]
        height: Option<u32>,
        #[arg(long, conflicts_with_all = ["width", "height", "exact"])]
        percent: Option<f32>,
        /// Ignore the aspect ratio.
        #[arg(long)]
        exact: bool,
        #[command(flatten)]
        encode: EncodeArgs,
    },
    /// Rotate by any angle; quarter turns are lossless.
    Rotate {
        input: PathBuf,
        #[arg(long, allow_negative_numbers = true)]
        degrees: f32,
        #[command(flatten)]
        encode: EncodeArgs,
    },
    /// Crop, flip, and adjust colours. Operations apply in that order.
    Edit {
        input: PathBuf,
        /// X,Y,WIDTH,HEIGHT in pixels.
        #[arg(long, value_parser = parse_crop)]
        crop: Option<CropRect>,
        #[arg(long, value_enum)]
        flip: Option<FlipArg>,
        #[arg(long)]
        grayscale: bool,
        /// -255 to 255.
        #[arg(long, allow_negative_numbers = true)]
        brightness: Option<i32>,
        /// Contrast factor; 1.0 leaves the image unchanged.
        #[arg(long)]
        contrast: Option<f32>,
        #[command(flatten)]
        encode: EncodeArgs,
    },
}

/// Output options shared by the image editing tools.
#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Output format; taken from --output or the input when omitted.
    #[arg(long)]
    pub to: Option<ImageFormatKind>,
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: Option<u8>,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

fn parse_crop(raw: &str) -> Result<CropRect, String> {
    let parts: Vec<u32> = raw
        .split(',')
        .map(|part| part.trim().parse::<u32>())
        .collect::<Result<_, _>>()
        .map_err(|err| format!("crop values must be whole numbers: {err}"))?;
    match parts[..] {
        [x, y, width, height] if width > 0 && height > 0 => Ok(CropRect {
            x,
            y,
            width,
            height,
        }),
        [_, _, _, _] => Err("crop width and height must be positive".into()),
        _ => Err(format!("expected X,Y,WIDTH,HEIGHT, got '{raw}'")),
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipArg {
    Horizontal,
    Vertical,
}

// -- Calculators --------------------------------------------------------------

#[derive(Subcommand, Debug)]
pub enum CalcCommand {
    /// Convert between units of the same kind.
    Units {
        #[arg(allow_negative_numbers = true, required_unless_present = "list")]
        value: Option<f64>,
        #[arg(required_unless_present = "list")]
        from: Option<String>,
        #[arg(required_unless_present = "list")]
        to: Option<String>,
        /// List the known units by category.
        #[arg(long)]
        list: bool,
    },
    /// Body mass index.
    Bmi {
        /// Kilograms, or pounds with --imperial.
        #[arg(long)]
        weight: f64,
        /// Centimetres, or inches with --imperial.
        #[arg(long)]
        height: f64,
        #[arg(long)]
        imperial: bool,
    },
    /// Monthly repayment and amortization schedule.
    Loan {
        #[arg(long)]
        principal: f64,
        /// Annual interest rate in percent.
        #[arg(long)]
        rate: f64,
        /// Term in months.
        #[arg(long)]
        months: u32,
        /// Print the month-by-month schedule.
        #[arg(long)]
        schedule: bool,
        /// Loan start date (YYYY-MM-DD); payments fall due monthly after it.
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Convert between currencies using offline rates.
    Currency {
        #[arg(required_unless_present = "list")]
        amount: Option<f64>,
        #[arg(required_unless_present = "list")]
        from: Option<String>,
        #[arg(required_unless_present = "list")]
        to: Option<String>,
        /// List the known currency codes and their rates.
        #[arg(long)]
        list: bool,
    },
}

// -- Generators ---------------------------------------------------------------

#[derive(Subcommand, Debug)]
pub enum GenCommand {
    /// Random passwords.
    Password {
        /// Defaults to `password_length` from the config file.
        #[arg(long)]
        length: Option<usize>,
        #[arg(long)]
        no_uppercase: bool,
        #[arg(long)]
        no_lowercase: bool,
        #[arg(long)]
        no_digits: bool,
        #[arg(long)]
        no_symbols: bool,
        /// Leave out look-alike characters such as l, 1, O, and 0.
        #[arg(long)]
        exclude_ambiguous: bool,
        #[arg(long, default_value_t = 1)]
        count: usize,
        /// Print the estimated strength after each password.
        #[arg(long)]
        show_strength: bool,
    },
    /// Estimate the strength of an existing password.
    Strength { password: String },
    /// Lorem ipsum placeholder text.
    Lorem {
        #[arg(long, value_enum, default_value_t = LoremUnitArg::Paragraphs)]
        unit: LoremUnitArg,
        #[arg(long, default_value_t = 3)]
        count: usize,
        /// Do not open with "Lorem ipsum dolor sit amet".
        #[arg(long)]
        no_lorem_start: bool,
        /// Seed for reproducible output.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Random v4 UUIDs.
    Uuid {
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
    /// SHA-256 checksum of a file.
    Hash {
        input: PathBuf,
        /// Expected hex digest; exits with an error on mismatch.
        #[arg(long)]
        verify: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoremUnitArg {
    Words,
    Sentences,
    Paragraphs,
}

impl From<LoremUnitArg> for LoremUnit {
    fn from(value: LoremUnitArg) -> Self {
        match value {
            LoremUnitArg::Words => LoremUnit::Words,
            LoremUnitArg::Sentences => LoremUnit::Sentences,
            LoremUnitArg::Paragraphs => LoremUnit::Paragraphs,
        }
    }
}

// -- Data URIs ----------------------------------------------------------------

#[derive(Subcommand, Debug)]
pub enum DataUriCommand {
    /// Print a file as a base64 data URI.
    Encode {
        input: PathBuf,
        /// Media type; guessed from the extension when omitted.
        #[arg(long)]
        mime: Option<String>,
    },
    /// Decode a data URI (given inline or in a file) back to bytes.
    Decode {
        /// A `data:` URI, or a file containing one.
        uri: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

// -- Config -------------------------------------------------------------------

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration as JSON.
    Show,
    /// Write a config file with default values.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Print the config file location.
    Path,
}
