//! Image decoding.
//!
//! Accepts raw image bytes (PNG, JPEG, BMP, TIFF) and produces the two
//! working copies the pipeline needs: the original RGBA image (kept for
//! background blackening and the final rotation) and a single-channel
//! grayscale view (input to edge detection).
//!
//! This is the first step in the pipeline: raw bytes in, raster buffers out.

use image::{GrayImage, RgbaImage};

use crate::types::DeskewError;

/// Decode raw image bytes into an RGBA original plus a grayscale copy.
///
/// Supports whatever formats the `image` crate is compiled with (PNG,
/// JPEG, BMP, TIFF here). The standard luminance formula is used for the
/// RGB-to-gray conversion.
///
/// # Errors
///
/// Returns [`DeskewError::EmptyInput`] if `bytes` is empty.
/// Returns [`DeskewError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
pub fn decode(bytes: &[u8]) -> Result<(RgbaImage, GrayImage), DeskewError> {
    if bytes.is_empty() {
        return Err(DeskewError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    Ok((img.to_rgba8(), img.to_luma8()))
}
