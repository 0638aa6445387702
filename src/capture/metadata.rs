//! Metadata stripping for captured screenshots.
//!
//! The capture is decoded, its raw pixel buffer is copied into a freshly
//! allocated image of the same colour type and size, and that image is
//! written back over the original file. Only pixel data crosses over, so
//! EXIF, text chunks, timestamps and embedded colour profiles are dropped.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ImageBuffer, ImageReader};

use super::types::ImageError;

/// Rewrite the image at `path` without any ancillary metadata.
pub fn strip_metadata(path: &Path) -> Result<(), ImageError> {
    let display = path.display().to_string();

    let decoded = ImageReader::open(path)
        .map_err(|source| ImageError::Io {
            path: display.clone(),
            source,
        })?
        .with_guessed_format()
        .map_err(|source| ImageError::Io {
            path: display.clone(),
            source,
        })?
        .decode()
        .map_err(|source| ImageError::Decode {
            path: display.clone(),
            source,
        })?;

    let rebuilt = rebuild_from_pixels(&decoded)?;
    log::debug!(
        "Rebuilt {}x{} {:?} image from pixel data",
        rebuilt.width(),
        rebuilt.height(),
        rebuilt.color()
    );

    let file = File::create(path).map_err(|source| ImageError::Io {
        path: display.clone(),
        source,
    })?;
    let encoder = PngEncoder::new_with_quality(
        BufWriter::new(file),
        CompressionType::Best,
        FilterType::Adaptive,
    );
    rebuilt
        .write_with_encoder(encoder)
        .map_err(|source| ImageError::Encode {
            path: display.clone(),
            source,
        })?;

    log::info!("Cleared metadata from {}", display);
    Ok(())
}

/// Copy the pixel buffer of `image` into a new image with the same layout.
pub fn rebuild_from_pixels(image: &DynamicImage) -> Result<DynamicImage, ImageError> {
    let (width, height) = (image.width(), image.height());

    macro_rules! rebuild {
        ($buffer:expr, $variant:path) => {
            ImageBuffer::from_raw(width, height, $buffer.as_raw().to_vec()).map($variant)
        };
    }

    let rebuilt = match image {
        DynamicImage::ImageLuma8(buf) => rebuild!(buf, DynamicImage::ImageLuma8),
        DynamicImage::ImageLumaA8(buf) => rebuild!(buf, DynamicImage::ImageLumaA8),
        DynamicImage::ImageRgb8(buf) => rebuild!(buf, DynamicImage::ImageRgb8),
        DynamicImage::ImageRgba8(buf) => rebuild!(buf, DynamicImage::ImageRgba8),
        DynamicImage::ImageLuma16(buf) => rebuild!(buf, DynamicImage::ImageLuma16),
        DynamicImage::ImageLumaA16(buf) => rebuild!(buf, DynamicImage::ImageLumaA16),
        DynamicImage::ImageRgb16(buf) => rebuild!(buf, DynamicImage::ImageRgb16),
        DynamicImage::ImageRgba16(buf) => rebuild!(buf, DynamicImage::ImageRgba16),
        // PNG has no float layouts; settle for 16-bit.
        DynamicImage::ImageRgb32F(_) => Some(DynamicImage::ImageRgb16(image.to_rgb16())),
        DynamicImage::ImageRgba32F(_) => Some(DynamicImage::ImageRgba16(image.to_rgba16())),
        other => return Err(ImageError::UnsupportedLayout(other.color())),
    };

    rebuilt.ok_or(ImageError::UnsupportedLayout(image.color()))
}
