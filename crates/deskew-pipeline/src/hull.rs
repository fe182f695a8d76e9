//! Convex hull construction and mask rasterization.
//!
//! Collects the foreground pixels of the filtered canvas, computes their
//! convex hull, and rasterizes the hull as a filled polygon. The hull is
//! computed once and shared by two consumers: the mask used for
//! background blackening and the orientation estimator's minimum-area
//! rectangle.

use image::{GrayImage, Luma};
use imageproc::drawing::draw_polygon_mut;

use crate::filter::FOREGROUND;
use crate::types::{DeskewError, Dimensions, Point};

/// Compute the convex hull of all foreground (non-zero) pixels.
///
/// Hull vertices are returned in boundary order with integer pixel
/// coordinates (as `f64` for downstream geometry).
///
/// # Errors
///
/// Returns [`DeskewError::EmptyRegion`] if the canvas has no foreground
/// pixels (no contour survived area filtering), since a hull of an empty
/// point set is undefined.
#[allow(clippy::cast_possible_wrap)]
pub fn hull_of_foreground(canvas: &GrayImage) -> Result<Vec<Point>, DeskewError> {
    let points: Vec<imageproc::point::Point<i32>> = canvas
        .enumerate_pixels()
        .filter(|(_, _, p)| p.0[0] > 0)
        .map(|(x, y, _)| imageproc::point::Point::new(x as i32, y as i32))
        .collect();

    if points.is_empty() {
        return Err(DeskewError::EmptyRegion);
    }

    let hull = imageproc::geometry::convex_hull(points);
    Ok(hull
        .into_iter()
        .map(|p| Point::new(f64::from(p.x), f64::from(p.y)))
        .collect())
}

/// Rasterize a convex hull as a filled polygon (255 inside, 0 outside)
/// on a zeroed canvas of the given dimensions.
///
/// # Errors
///
/// Returns [`DeskewError::DegenerateGeometry`] if the hull has fewer
/// than 3 vertices; such a hull encloses no area and cannot be filled.
#[allow(clippy::cast_possible_truncation)]
pub fn rasterize_mask(hull: &[Point], dimensions: Dimensions) -> Result<GrayImage, DeskewError> {
    if hull.len() < 3 {
        return Err(DeskewError::DegenerateGeometry(
            "hull has fewer than 3 vertices",
        ));
    }

    let polygon: Vec<imageproc::point::Point<i32>> = hull
        .iter()
        .map(|p| imageproc::point::Point::new(p.x.round() as i32, p.y.round() as i32))
        .collect();

    let mut mask = GrayImage::new(dimensions.width, dimensions.height);
    draw_polygon_mut(&mut mask, &polygon, Luma([FOREGROUND]));
    Ok(mask)
}
