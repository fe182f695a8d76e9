//! Region filtering: discard small contours as noise.
//!
//! Each contour's enclosed area (shoelace formula) is compared against a
//! fixed threshold; survivors are redrawn as 1-pixel outlines onto a
//! fresh binary canvas. The threshold is a tunable constant, not derived
//! from image statistics.

use image::{GrayImage, Luma};
use imageproc::drawing::draw_line_segment_mut;

use crate::types::{Contour, Dimensions};

/// Binary foreground value used on filtered canvases and masks.
pub const FOREGROUND: u8 = 255;

/// Redraw contours with enclosed area strictly greater than `min_area`
/// onto a zeroed canvas of the given dimensions.
///
/// Only the outline is drawn (1-pixel stroke, not filled). Drawing order
/// is irrelevant: strokes are idempotent OR writes on a binary canvas.
#[allow(clippy::cast_possible_truncation)]
#[must_use = "returns the filtered canvas"]
pub fn filter_small_regions(
    contours: &[Contour],
    dimensions: Dimensions,
    min_area: f64,
) -> GrayImage {
    let mut canvas = GrayImage::new(dimensions.width, dimensions.height);

    for contour in contours {
        if contour.area() <= min_area {
            continue;
        }
        let points = contour.points();
        for i in 0..points.len() {
            let a = points[i];
            let b = points[(i + 1) % points.len()];
            draw_line_segment_mut(
                &mut canvas,
                (a.x as f32, a.y as f32),
                (b.x as f32, b.y as f32),
                Luma([FOREGROUND]),
            );
        }
    }

    canvas
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    fn square(origin: f64, side: f64) -> Contour {
        Contour::new(vec![
            Point::new(origin, origin),
            Point::new(origin + side, origin),
            Point::new(origin + side, origin + side),
            Point::new(origin, origin + side),
        ])
    }

    fn foreground_count(canvas: &GrayImage) -> u32 {
        canvas.pixels().map(|p| u32::from(p.0[0] > 0)).sum()
    }

    #[test]
    fn large_contour_is_drawn() {
        let dims = Dimensions {
            width: 40,
            height: 40,
        };
        let canvas = filter_small_regions(&[square(5.0, 20.0)], dims, 20.0);
        assert!(foreground_count(&canvas) > 0, "expected outline pixels");
        // Corner vertices land on the canvas.
        assert_eq!(canvas.get_pixel(5, 5).0[0], FOREGROUND);
        assert_eq!(canvas.get_pixel(25, 25).0[0], FOREGROUND);
        // Interior stays empty: outline only, not filled.
        assert_eq!(canvas.get_pixel(15, 15).0[0], 0);
    }

    #[test]
    fn small_contour_is_discarded() {
        let dims = Dimensions {
            width: 40,
            height: 40,
        };
        // 4x4 square has area 16 <= 20.
        let canvas = filter_small_regions(&[square(5.0, 4.0)], dims, 20.0);
        assert_eq!(foreground_count(&canvas), 0);
    }

    #[test]
    fn threshold_is_strict() {
        let dims = Dimensions {
            width: 40,
            height: 40,
        };
        // Area exactly equal to the threshold is discarded.
        let exactly = Contour::new(vec![
            Point::new(2.0, 2.0),
            Point::new(12.0, 2.0),
            Point::new(12.0, 4.0),
            Point::new(2.0, 4.0),
        ]);
        assert!((exactly.area() - 20.0).abs() < f64::EPSILON);
        let canvas = filter_small_regions(&[exactly], dims, 20.0);
        assert_eq!(foreground_count(&canvas), 0);
    }

    #[test]
    fn mixed_contours_keep_only_survivors() {
        let dims = Dimensions {
            width: 60,
            height: 60,
        };
        let canvas = filter_small_regions(&[square(2.0, 3.0), square(20.0, 25.0)], dims, 20.0);
        // The small square's corner region stays empty.
        assert_eq!(canvas.get_pixel(2, 2).0[0], 0);
        // The large square's outline is present.
        assert_eq!(canvas.get_pixel(20, 20).0[0], FOREGROUND);
    }

    #[test]
    fn canvas_matches_requested_dimensions() {
        let dims = Dimensions {
            width: 13,
            height: 29,
        };
        let canvas = filter_small_regions(&[], dims, 20.0);
        assert_eq!(canvas.dimensions(), (13, 29));
    }
}
