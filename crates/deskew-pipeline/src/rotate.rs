//! Affine rotation about the image center.
//!
//! Applies the correction angle produced by the orientation estimator.
//! The output has the same dimensions as the input (no auto-cropping or
//! expansion); corners uncovered by the rotated source are filled with
//! opaque black.

use image::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};

/// Constant fill for pixels that fall outside the source after rotation.
const FILL: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Rotate an image about its geometric center by `angle` degrees,
/// counter-clockwise as displayed, with unit scale and bicubic
/// resampling.
///
/// A positive angle undoes a clockwise skew measurement and vice versa;
/// passing the value produced by
/// [`normalize_angle`](crate::orient::normalize_angle) aligns the text
/// long axis with the horizontal.
#[allow(clippy::cast_possible_truncation)]
#[must_use = "returns the rotated image"]
pub fn rotate(image: &RgbaImage, angle: f64) -> RgbaImage {
    // `rotate_about_center` treats positive theta as clockwise (as
    // displayed, with y growing downward), so the sign flips here.
    let theta = (-angle).to_radians() as f32;
    rotate_about_center(image, theta, Interpolation::Bicubic, FILL)
}
