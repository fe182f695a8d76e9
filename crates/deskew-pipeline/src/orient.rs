//! Orientation estimation: minimum-area bounding rectangle and angle
//! normalization.
//!
//! The minimum-area rectangle of the text-region hull is found with the
//! rotating-calipers technique: the optimal rectangle has one side
//! collinear with a hull edge, so every hull edge direction is tried and
//! the smallest enclosing rectangle wins.
//!
//! # Raw-angle convention
//!
//! The returned [`RotatedRect`] carries its angle in degrees in
//! `[-90, 0)`: the rotation of the rectangle's reference edge from the
//! horizontal axis (y grows downward). `height` is the side length along
//! the reference edge and `width` the perpendicular side length, so
//! neither is guaranteed to be the larger. A rectangle's two edge
//! directions are 90 degrees apart and reduce to the same
//! `(angle, width, height)` triple, so the result depends only on the
//! hull's geometry, never on its vertex order.
//!
//! # Normalization
//!
//! The raw angle is ambiguous modulo 90 degrees: a rectangle has two
//! valid edge assignments. [`normalize_angle`] collapses the ambiguity
//! with the width/height comparison, producing the single signed
//! rotation that deviates the text long axis from horizontal. Positive
//! values mean the correction is applied counter-clockwise (as
//! displayed).

use crate::types::{DeskewError, Point, RotatedRect};

/// Compute the minimum-area rectangle enclosing a convex hull.
///
/// # Errors
///
/// Returns [`DeskewError::DegenerateGeometry`] if the hull has fewer
/// than 3 distinct points or zero enclosed area; no rectangle or angle
/// can be derived from such a hull.
pub fn min_area_rect(hull: &[Point]) -> Result<RotatedRect, DeskewError> {
    if distinct_count(hull) < 3 {
        return Err(DeskewError::DegenerateGeometry(
            "hull has fewer than 3 distinct points",
        ));
    }
    if polygon_area(hull) <= f64::EPSILON {
        return Err(DeskewError::DegenerateGeometry("hull has zero area"));
    }

    let n = hull.len();
    let mut best: Option<(f64, RotatedRect)> = None;

    for i in 0..n {
        let j = (i + 1) % n;
        let edge_x = hull[j].x - hull[i].x;
        let edge_y = hull[j].y - hull[i].y;
        let edge_len = edge_x.hypot(edge_y);
        if edge_len < f64::EPSILON {
            continue;
        }

        // Unit vector along the edge and its perpendicular.
        let nx = edge_x / edge_len;
        let ny = edge_y / edge_len;
        let px = -ny;
        let py = nx;

        // Project every hull point onto both axes.
        let mut min_u = f64::MAX;
        let mut max_u = f64::MIN;
        let mut min_v = f64::MAX;
        let mut max_v = f64::MIN;
        for p in hull {
            let u = nx.mul_add(p.x - hull[i].x, ny * (p.y - hull[i].y));
            let v = px.mul_add(p.x - hull[i].x, py * (p.y - hull[i].y));
            min_u = min_u.min(u);
            max_u = max_u.max(u);
            min_v = min_v.min(v);
            max_v = max_v.max(v);
        }

        let along = max_u - min_u;
        let perp = max_v - min_v;
        let area = along * perp;

        if best.as_ref().is_none_or(|(best_area, _)| area < *best_area) {
            let center_u = f64::midpoint(min_u, max_u);
            let center_v = f64::midpoint(min_v, max_v);
            let center = Point::new(
                hull[i].x + center_u * nx + center_v * px,
                hull[i].y + center_u * ny + center_v * py,
            );

            // Reduce the edge direction into (-90, 90], then into the
            // [-90, 0) raw convention. The side measured along the raw
            // direction becomes `height`, the perpendicular one `width`.
            let mut alpha = edge_y.atan2(edge_x).to_degrees();
            if alpha <= -90.0 {
                alpha += 180.0;
            } else if alpha > 90.0 {
                alpha -= 180.0;
            }

            let rect = if alpha < 0.0 {
                RotatedRect {
                    center,
                    width: perp,
                    height: along,
                    angle: alpha,
                }
            } else if alpha < 90.0 {
                RotatedRect {
                    center,
                    width: along,
                    height: perp,
                    angle: alpha - 90.0,
                }
            } else {
                // A vertical edge (alpha == 90) describes the same
                // rectangle as its horizontal neighbor; emit that
                // neighbor's triple so the raw angle stays in [-90, 0)
                // and equal-area ties canonicalize identically.
                RotatedRect {
                    center,
                    width: perp,
                    height: along,
                    angle: -90.0,
                }
            };
            best = Some((area, rect));
        }
    }

    best.map(|(_, rect)| rect)
        .ok_or(DeskewError::DegenerateGeometry("hull has no usable edges"))
}

/// Collapse a raw rectangle angle into the single signed correction.
///
/// The width/height comparison disambiguates which rectangle edge is the
/// long axis (the text line): whenever `angle < -45` or `width > height`
/// the complementary edge assignment is the right one and the angle maps
/// to `90 + angle`; otherwise it is already canonical.
#[must_use]
pub fn normalize_angle(rect: &RotatedRect) -> f64 {
    if rect.angle < -45.0 || rect.width > rect.height {
        90.0 + rect.angle
    } else {
        rect.angle
    }
}

/// Number of distinct points in a slice, by exact coordinate equality.
fn distinct_count(points: &[Point]) -> usize {
    let mut count = 0;
    for (i, p) in points.iter().enumerate() {
        if !points[..i].iter().any(|q| q == p) {
            count += 1;
        }
    }
    count
}

/// Enclosed polygon area via the shoelace formula.
fn polygon_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        twice_area += a.x.mul_add(b.y, -(b.x * a.y));
    }
    twice_area.abs() / 2.0
}
