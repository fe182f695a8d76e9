//! Contour extraction: closed outer boundaries of connected edge regions.
//!
//! Uses Suzuki-Abe border following via
//! [`imageproc::contours::find_contours`], keeps only *external* borders
//! (contours fully nested inside another are dropped), and collapses
//! collinear vertex runs so that straight boundary segments are stored as
//! two endpoints instead of every pixel.

use image::GrayImage;
use imageproc::contours::BorderType;

use crate::types::{Contour, Point};

/// Extract the external contours of a binary edge map.
///
/// White pixels (non-zero) are treated as foreground. Hole borders and
/// nested contours are discarded; only outermost boundaries survive.
/// An empty edge map yields an empty vector, not an error.
#[must_use = "returns the extracted contours"]
pub fn find_external_contours(edges: &GrayImage) -> Vec<Contour> {
    let raw: Vec<imageproc::contours::Contour<i32>> = imageproc::contours::find_contours(edges);

    raw.into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| {
            let points: Vec<Point> = c
                .points
                .into_iter()
                .map(|p| Point::new(f64::from(p.x), f64::from(p.y)))
                .collect();
            Contour::new(collapse_collinear(&points))
        })
        .collect()
}

/// Drop vertices that lie on the straight run between their cyclic
/// neighbors, preserving the polygon's geometry with a minimal vertex
/// count.
///
/// Fully degenerate inputs (everything collinear) are returned unchanged;
/// they carry zero enclosed area and are removed by downstream filtering
/// anyway.
fn collapse_collinear(points: &[Point]) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let prev = points[(i + n - 1) % n];
        let cur = points[i];
        let next = points[(i + 1) % n];
        let cross = (cur.x - prev.x).mul_add(next.y - prev.y, -((cur.y - prev.y) * (next.x - prev.x)));
        if cross.abs() > f64::EPSILON {
            out.push(cur);
        }
    }

    if out.len() < 3 {
        return points.to_vec();
    }
    out
}
