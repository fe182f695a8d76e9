//! Canny edge detection.
//!
//! Wraps [`imageproc::edges::canny`] to turn the grayscale working copy
//! into a binary edge map: white pixels (255) are edges, black pixels (0)
//! are background.

use image::GrayImage;

use crate::types::{DeskewError, Dimensions};

/// Minimum allowed Canny threshold.
///
/// A low threshold of zero causes every pixel with any gradient to be
/// treated as a potential edge, producing an extremely dense edge map
/// that overwhelms downstream hull computation.
pub const MIN_THRESHOLD: f32 = 1.0;
const _: () = assert!(MIN_THRESHOLD > 0.0);

/// Detect edges using the Canny algorithm.
///
/// Returns a binary image of the same dimensions as the input: 255 for
/// edge pixels, 0 for non-edge.
///
/// Internally, Canny performs Sobel gradient computation, non-maximum
/// suppression, and hysteresis thresholding: pixels with gradient
/// magnitude above `high_threshold` are definite edges; those between
/// `low_threshold` and `high_threshold` are edges only if connected to a
/// definite edge.
///
/// Both thresholds are clamped to a minimum of [`MIN_THRESHOLD`] and
/// `low_threshold` is clamped to be at most `high_threshold`.
///
/// # Errors
///
/// Returns [`DeskewError::InvalidInput`] if either image dimension is
/// zero, rather than silently producing an empty edge map.
pub fn detect_edges(
    image: &GrayImage,
    low_threshold: f32,
    high_threshold: f32,
) -> Result<GrayImage, DeskewError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(DeskewError::InvalidInput(Dimensions {
            width: image.width(),
            height: image.height(),
        }));
    }

    let high = high_threshold.max(MIN_THRESHOLD);
    let low = low_threshold.max(MIN_THRESHOLD).min(high);
    Ok(imageproc::edges::canny(image, low, high))
}
