use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::error::{Error, Result};

/// Tightly packed 8-bit pixels as decoded from an image file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Where the pixels came from, for diagnostics.
    pub origin: PathBuf,
    pub width: u32,
    pub height: u32,
    pub bytes_per_pixel: u8,
    pub pixels: Vec<u8>,
}

/// Reads and decodes the image at `path`.
pub fn decode_image(path: &Path) -> Result<DecodedImage> {
    let bytes = std::fs::read(path).map_err(|source| Error::AssetRead {
        path: path.to_path_buf(),
        source,
    })?;
    decode_image_bytes(&bytes, path)
}

/// Decodes an in-memory image. `origin` only labels errors and logs.
///
/// Grayscale, grayscale+alpha, RGB and RGBA with 8-bit channels are kept
/// as-is. Anything else (16-bit or float channels) is rejected rather than
/// silently converted.
pub fn decode_image_bytes(bytes: &[u8], origin: &Path) -> Result<DecodedImage> {
    let img = image::load_from_memory(bytes).map_err(|source| Error::ImageDecode {
        path: origin.to_path_buf(),
        source,
    })?;

    let (width, height) = (img.width(), img.height());
    let (bytes_per_pixel, pixels) = match img {
        DynamicImage::ImageLuma8(buf) => (1, buf.into_raw()),
        DynamicImage::ImageLumaA8(buf) => (2, buf.into_raw()),
        DynamicImage::ImageRgb8(buf) => (3, buf.into_raw()),
        DynamicImage::ImageRgba8(buf) => (4, buf.into_raw()),
        other => {
            return Err(Error::UnsupportedPixelFormat {
                path: origin.to_path_buf(),
                bytes_per_pixel: other.color().bytes_per_pixel(),
            });
        }
    };

    Ok(DecodedImage {
        origin: origin.to_path_buf(),
        width,
        height,
        bytes_per_pixel,
        pixels,
    })
}
