// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor: format conversion, resize, rotate, flip, crop, grayscale,
// brightness/contrast adjustment. Operates on in-memory images using the
// `image` and `imageproc` crates.

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use imageproc::geometric_transformations::{self, Interpolation};
use toolhub_core::error::{Result, ToolhubError};
use tracing::{debug, info, instrument};

use super::format::ImageFormatKind;

/// ICO files cannot hold images larger than this on either side.
const ICO_MAX_SIDE: u32 = 256;

/// Largest resize target accepted, per side and in total.
const MAX_OUTPUT_SIDE: u32 = 65_535;
const MAX_OUTPUT_PIXELS: u64 = 100_000_000;

/// Image processing pipeline operating on a single in-memory image.
///
/// Each transformation consumes `self` and returns a new `ImageProcessor`,
/// enabling method chaining.
///
/// ```ignore
/// let webp = ImageProcessor::from_bytes(&png)?
///     .resize(800, 600)?
///     .rotate(90.0)
///     .encode(ImageFormatKind::WebP, 90)?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Load an image from a file path.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let img = image::open(path.as_ref()).map_err(|err| {
            ToolhubError::ImageError(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        info!(width = img.width(), height = img.height(), "Image loaded");
        Ok(Self { image: img })
    }

    /// Create a processor from raw encoded bytes (JPEG, PNG, etc.).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data)
            .map_err(|err| ToolhubError::ImageError(format!("failed to decode image: {}", err)))?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the processor and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations -------------------------------------------------------

    /// Resize the image to fit within `max_width` x `max_height`, preserving
    /// aspect ratio. Uses Lanczos3 filtering for high-quality downscaling.
    #[instrument(skip(self), fields(max_width, max_height))]
    pub fn resize(self, max_width: u32, max_height: u32) -> Result<Self> {
        check_dimensions(max_width, max_height)?;
        info!(
            from_w = self.image.width(),
            from_h = self.image.height(),
            max_width,
            max_height,
            "Resizing image"
        );
        let resized = self
            .image
            .resize(max_width, max_height, FilterType::Lanczos3);
        debug!(
            new_w = resized.width(),
            new_h = resized.height(),
            "Resize complete"
        );
        Ok(Self { image: resized })
    }

    /// Resize the image to exactly `width` x `height`, ignoring aspect ratio.
    pub fn resize_exact(self, width: u32, height: u32) -> Result<Self> {
        check_dimensions(width, height)?;
        let resized = self.image.resize_exact(width, height, FilterType::Lanczos3);
        Ok(Self { image: resized })
    }

    /// Scale both sides by `percent` (e.g. 50.0 halves the image). Each side
    /// is at least one pixel.
    pub fn resize_percent(self, percent: f32) -> Result<Self> {
        if !percent.is_finite() || percent <= 0.0 {
            return Err(ToolhubError::InvalidInput(format!(
                "scale must be a positive percentage, got {percent}"
            )));
        }
        let scale = |side: u32| (f64::from(side) * f64::from(percent) / 100.0).round().max(1.0);
        let (width, height) = (scale(self.width()), scale(self.height()));
        if width > f64::from(MAX_OUTPUT_SIDE) || height > f64::from(MAX_OUTPUT_SIDE) {
            return Err(too_large(width, height));
        }
        self.resize_exact(width as u32, height as u32)
    }

    /// Rotate the image by an arbitrary angle in degrees (clockwise).
    ///
    /// For 90/180/270 degree rotations, lossless rotation is used. For other
    /// angles, bilinear interpolation is applied around the centre; corners
    /// that fall outside the source become transparent white.
    #[instrument(skip(self), fields(degrees))]
    pub fn rotate(self, degrees: f32) -> Self {
        info!(degrees, "Rotating image");

        let normalised = degrees.rem_euclid(360.0);
        if (normalised - 90.0).abs() < 0.01 {
            return Self {
                image: self.image.rotate90(),
            };
        }
        if (normalised - 180.0).abs() < 0.01 {
            return Self {
                image: self.image.rotate180(),
            };
        }
        if (normalised - 270.0).abs() < 0.01 {
            return Self {
                image: self.image.rotate270(),
            };
        }
        if normalised.abs() < 0.01 || (normalised - 360.0).abs() < 0.01 {
            return self;
        }

        let rgba = self.image.to_rgba8();
        let default_pixel = image::Rgba([255u8, 255, 255, 0]);
        let rotated: RgbaImage = geometric_transformations::rotate_about_center(
            &rgba,
            degrees.to_radians(),
            Interpolation::Bilinear,
            default_pixel,
        );

        debug!("General rotation applied");
        Self {
            image: DynamicImage::ImageRgba8(rotated),
        }
    }

    /// Mirror left-to-right.
    pub fn flip_horizontal(self) -> Self {
        Self {
            image: self.image.fliph(),
        }
    }

    /// Mirror top-to-bottom.
    pub fn flip_vertical(self) -> Self {
        Self {
            image: self.image.flipv(),
        }
    }

    /// Crop a rectangular region from the image.
    ///
    /// `x` and `y` are the top-left corner; `width` and `height` define the
    /// size of the crop rectangle. Values are clamped to image bounds.
    #[instrument(skip(self), fields(x, y, width, height))]
    pub fn crop(self, x: u32, y: u32, width: u32, height: u32) -> Self {
        let img_w = self.image.width();
        let img_h = self.image.height();

        let safe_x = x.min(img_w.saturating_sub(1));
        let safe_y = y.min(img_h.saturating_sub(1));
        let safe_w = width.min(img_w - safe_x);
        let safe_h = height.min(img_h - safe_y);

        info!(safe_x, safe_y, safe_w, safe_h, "Cropping image");

        let cropped = self.image.crop_imm(safe_x, safe_y, safe_w, safe_h);
        Self { image: cropped }
    }

    /// Convert the image to grayscale (luma).
    #[instrument(skip(self))]
    pub fn grayscale(self) -> Self {
        info!("Converting to grayscale");
        Self {
            image: self.image.grayscale(),
        }
    }

    /// Adjust brightness by `value`, clamped to -255..=255.
    pub fn adjust_brightness(self, value: i32) -> Self {
        let clamped = value.clamp(-255, 255);
        debug!(clamped, "Adjusting brightness");
        Self {
            image: self.image.brighten(clamped),
        }
    }

    /// Adjust contrast by a factor. Values > 1.0 increase contrast; values
    /// < 1.0 decrease it. A value of 1.0 is a no-op.
    pub fn adjust_contrast(self, factor: f32) -> Self {
        debug!(factor, "Adjusting contrast");

        let rgba = self.image.to_rgba8();
        let contrasted = image::ImageBuffer::from_fn(rgba.width(), rgba.height(), |x, y| {
            let image::Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
            let adjust = |channel: u8| -> u8 {
                let val = factor * (channel as f32 - 128.0) + 128.0;
                val.clamp(0.0, 255.0) as u8
            };
            image::Rgba([adjust(r), adjust(g), adjust(b), a])
        });

        Self {
            image: DynamicImage::ImageRgba8(contrasted),
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image in `format`. `quality` (1-100) only affects
    /// JPEG.
    #[instrument(skip(self), fields(format = %format, quality))]
    pub fn encode(&self, format: ImageFormatKind, quality: u8) -> Result<Vec<u8>> {
        let bytes = match format {
            ImageFormatKind::Jpeg => self.to_jpeg_bytes(quality)?,
            ImageFormatKind::Ico => {
                let fitted = if self.width() > ICO_MAX_SIDE || self.height() > ICO_MAX_SIDE {
                    debug!("Downscaling to fit ICO limits");
                    self.image
                        .resize(ICO_MAX_SIDE, ICO_MAX_SIDE, FilterType::Lanczos3)
                } else {
                    self.image.clone()
                };
                encode_to_format(&DynamicImage::ImageRgba8(fitted.to_rgba8()), format)?
            }
            ImageFormatKind::WebP | ImageFormatKind::Gif => {
                encode_to_format(&DynamicImage::ImageRgba8(self.image.to_rgba8()), format)?
            }
            _ => encode_to_format(&self.image, format)?,
        };
        debug!(output_bytes = bytes.len(), "Image encoded");
        Ok(bytes)
    }

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        encode_to_format(&self.image, ImageFormatKind::Png)
    }

    /// Encode the current image as JPEG bytes with the given quality (1-100).
    /// Alpha is dropped.
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let rgb = self.image.to_rgb8();
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
        rgb.write_with_encoder(encoder)
            .map_err(|err| ToolhubError::ImageError(format!("JPEG encoding failed: {}", err)))?;
        Ok(buffer)
    }

    /// Write the image to a file. The format is inferred from the file extension.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        self.image.save(path.as_ref()).map_err(|err| {
            ToolhubError::ImageError(format!(
                "failed to save image to {}: {}",
                path.as_ref().display(),
                err
            ))
        })
    }
}

/// Decode `data` in any supported format and re-encode it as `target`.
#[instrument(skip(data), fields(data_len = data.len(), target = %target))]
pub fn convert_image(data: &[u8], target: ImageFormatKind, quality: u8) -> Result<Vec<u8>> {
    let processor = ImageProcessor::from_bytes(data)?;
    info!(
        width = processor.width(),
        height = processor.height(),
        "Converting image"
    );
    processor.encode(target, quality)
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(ToolhubError::InvalidInput(format!(
            "image dimensions must be non-zero, got {width}x{height}"
        )));
    }
    if width > MAX_OUTPUT_SIDE
        || height > MAX_OUTPUT_SIDE
        || u64::from(width) * u64::from(height) > MAX_OUTPUT_PIXELS
    {
        return Err(too_large(f64::from(width), f64::from(height)));
    }
    Ok(())
}

fn too_large(width: f64, height: f64) -> ToolhubError {
    ToolhubError::InvalidInput(format!(
        "{width}x{height} is larger than the {MAX_OUTPUT_SIDE} px per side and \
         {MAX_OUTPUT_PIXELS} px total limit"
    ))
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
fn encode_to_format(image: &DynamicImage, format: ImageFormatKind) -> Result<Vec<u8>> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, format.image_format())
        .map_err(|err| ToolhubError::ImageError(format!("{} encoding failed: {}", format, err)))?;
    Ok(cursor.into_inner())
}
