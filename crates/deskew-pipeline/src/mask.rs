//! Background blackening: zero out everything outside the hull mask.
//!
//! A pure per-pixel operation. Pixels under the mask keep their original
//! values; everything else becomes opaque black, so background clutter
//! outside the text region cannot influence later viewing or OCR.

use image::{Rgba, RgbaImage};

use crate::types::{DeskewError, Dimensions, GrayImage};

/// Color written outside the mask: opaque black.
const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Apply a binary mask to the original image.
///
/// Returns a fresh image in which every pixel whose mask value is zero
/// is replaced with opaque black; pixels under the mask are copied
/// unchanged.
///
/// # Errors
///
/// Returns [`DeskewError::ShapeMismatch`] if the mask and image
/// dimensions differ.
pub fn apply_mask(image: &RgbaImage, mask: &GrayImage) -> Result<RgbaImage, DeskewError> {
    if image.dimensions() != mask.dimensions() {
        return Err(DeskewError::ShapeMismatch {
            image: Dimensions {
                width: image.width(),
                height: image.height(),
            },
            mask: Dimensions {
                width: mask.width(),
                height: mask.height(),
            },
        });
    }

    Ok(RgbaImage::from_fn(image.width(), image.height(), |x, y| {
        if mask.get_pixel(x, y).0[0] > 0 {
            *image.get_pixel(x, y)
        } else {
            BACKGROUND
        }
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn pixels_under_mask_are_unchanged() {
        let image = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
        let mut mask = GrayImage::new(4, 4);
        mask.put_pixel(1, 1, Luma([255]));
        mask.put_pixel(2, 2, Luma([255]));

        let out = apply_mask(&image, &mask).unwrap();
        assert_eq!(out.get_pixel(1, 1), &Rgba([10, 20, 30, 255]));
        assert_eq!(out.get_pixel(2, 2), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn pixels_outside_mask_become_black() {
        let image = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]));
        let mask = GrayImage::new(4, 4); // all zero
        let out = apply_mask(&image, &mask).unwrap();
        for pixel in out.pixels() {
            assert_eq!(pixel, &BACKGROUND);
        }
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let image = RgbaImage::new(4, 4);
        let mask = GrayImage::new(4, 5);
        let result = apply_mask(&image, &mask);
        assert!(matches!(result, Err(DeskewError::ShapeMismatch { .. })));
    }

    #[test]
    fn source_image_is_not_mutated() {
        let image = RgbaImage::from_pixel(3, 3, Rgba([99, 88, 77, 255]));
        let mask = GrayImage::new(3, 3);
        let _ = apply_mask(&image, &mask).unwrap();
        assert_eq!(image.get_pixel(0, 0), &Rgba([99, 88, 77, 255]));
    }
}
