//! Shared types for the deskewing pipeline.

use serde::{Deserialize, Serialize};

/// Re-export `GrayImage` so downstream crates can reference
/// intermediate raster data without depending on `image` directly.
pub use image::GrayImage;

/// Re-export `RgbaImage` so downstream crates can reference the
/// original decoded image without depending on `image` directly.
pub use image::RgbaImage;

/// A 2D point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (pixels from left edge).
    pub x: f64,
    /// Vertical position (pixels from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A closed boundary in a binary image, stored as an ordered sequence
/// of vertices. The closing edge from the last vertex back to the first
/// is implicit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contour(Vec<Point>);

impl Contour {
    /// Create a new contour from a vector of vertices.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Returns `true` if the contour has no vertices.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of vertices.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns a slice of all vertices.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Enclosed area of the closed polygon, via the shoelace formula.
    ///
    /// Degenerate contours (fewer than 3 vertices, or collinear runs)
    /// have zero area.
    #[must_use]
    pub fn area(&self) -> f64 {
        let n = self.0.len();
        if n < 3 {
            return 0.0;
        }
        let mut twice_area = 0.0;
        for i in 0..n {
            let a = self.0[i];
            let b = self.0[(i + 1) % n];
            twice_area += a.x.mul_add(b.y, -(b.x * a.y));
        }
        twice_area.abs() / 2.0
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Minimum-area rectangle enclosing a point set, in the raw-angle
/// convention used by [`crate::orient`].
///
/// `angle` is in degrees in `[-90, 0)`: the rotation of the rectangle's
/// reference edge from the horizontal axis. `height` is the side length
/// measured along the reference edge and `width` the side length
/// perpendicular to it, so neither is guaranteed to be the larger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotatedRect {
    /// Geometric center of the rectangle.
    pub center: Point,
    /// Side length perpendicular to the reference edge.
    pub width: f64,
    /// Side length along the reference edge.
    pub height: f64,
    /// Raw angle in degrees, in `[-90, 0)`.
    pub angle: f64,
}

/// Configuration for the deskewing pipeline.
///
/// All parameters default to the fixed values of the reference design:
/// Canny thresholds 50/200 and a noise-suppression area threshold of 20.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeskewConfig {
    /// Canny edge detector low threshold. Pixels with gradient magnitude
    /// between `canny_low` and `canny_high` are edges only if connected
    /// to a strong edge.
    pub canny_low: f32,

    /// Canny edge detector high threshold. Pixels with gradient magnitude
    /// above this value are definite edges.
    pub canny_high: f32,

    /// Minimum enclosed contour area, in square pixels. Contours at or
    /// below this area are discarded as noise before hull construction.
    pub min_region_area: f64,
}

impl DeskewConfig {
    /// Default Canny low threshold.
    pub const DEFAULT_CANNY_LOW: f32 = 50.0;
    /// Default Canny high threshold.
    pub const DEFAULT_CANNY_HIGH: f32 = 200.0;
    /// Default minimum contour area in square pixels.
    pub const DEFAULT_MIN_REGION_AREA: f64 = 20.0;
}

impl Default for DeskewConfig {
    fn default() -> Self {
        Self {
            canny_low: Self::DEFAULT_CANNY_LOW,
            canny_high: Self::DEFAULT_CANNY_HIGH,
            min_region_area: Self::DEFAULT_MIN_REGION_AREA,
        }
    }
}

/// Final result of deskewing one input image.
#[derive(Debug, Clone)]
pub struct DeskewOutput {
    /// The corrected image: background blackened outside the text-region
    /// hull, rotated so the text long axis is horizontal. Same dimensions
    /// as the input.
    pub image: RgbaImage,

    /// The estimated correction in degrees. Positive values rotate the
    /// image counter-clockwise (as displayed) to undo the measured skew.
    pub angle: f64,

    /// Dimensions of the source image in pixels.
    pub dimensions: Dimensions,
}

/// Result of running the pipeline with all intermediate stage outputs
/// preserved.
///
/// Each field captures the output of one pipeline stage, enabling
/// callers to write per-stage debug artifacts.
///
/// Note: does not derive `PartialEq` because the raster buffers from
/// `image` do not implement it usefully for this purpose.
#[derive(Debug, Clone)]
pub struct StagedDeskew {
    /// Stage 0: original decoded RGBA image.
    pub original: RgbaImage,
    /// Stage 0: grayscale working copy of the original.
    pub grayscale: GrayImage,
    /// Stage 1: binary Canny edge map.
    pub edges: GrayImage,
    /// Stage 2: extracted external contours (chain-approximated).
    pub contours: Vec<Contour>,
    /// Stage 3: canvas with surviving contour outlines redrawn.
    pub filtered: GrayImage,
    /// Stages 4+6 input: convex hull of the filtered canvas foreground,
    /// shared by the mask builder and the orientation estimator.
    pub hull: Vec<Point>,
    /// Stage 4: filled hull mask (255 inside, 0 outside).
    pub mask: GrayImage,
    /// Stage 5: original with the background outside the mask blackened.
    pub masked: RgbaImage,
    /// Stage 6: minimum-area rectangle of the hull.
    pub rect: RotatedRect,
    /// Stage 6: normalized correction angle in degrees.
    pub angle: f64,
    /// Stage 7: final rotated image.
    pub deskewed: RgbaImage,
    /// Source image dimensions in pixels.
    pub dimensions: Dimensions,
}

/// Errors that can occur during pipeline processing.
#[derive(Debug, thiserror::Error)]
pub enum DeskewError {
    /// Failed to decode the input image.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The input image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// The input image has a zero dimension.
    #[error("invalid input image: zero dimension ({0})")]
    InvalidInput(Dimensions),

    /// No contour survived area filtering, so no hull exists.
    #[error("no text region found: all contours fell below the area threshold")]
    EmptyRegion,

    /// The hull has fewer than 3 distinct points or zero area, so no
    /// bounding rectangle or angle can be derived.
    #[error("degenerate text region geometry: {0}")]
    DegenerateGeometry(&'static str),

    /// Mask and image dimensions do not match.
    #[error("mask dimensions {mask} do not match image dimensions {image}")]
    ShapeMismatch {
        /// Dimensions of the image being masked.
        image: Dimensions,
        /// Dimensions of the mask.
        mask: Dimensions,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // --- Contour tests ---

    #[test]
    fn contour_len_and_points() {
        let points = vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        let c = Contour::new(points.clone());
        assert_eq!(c.len(), 2);
        assert!(!c.is_empty());
        assert_eq!(c.points(), &points);
    }

    #[test]
    fn contour_area_unit_square() {
        let c = Contour::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]);
        assert!((c.area() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn contour_area_is_orientation_independent() {
        let cw = Contour::new(vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 4.0),
            Point::new(4.0, 4.0),
            Point::new(4.0, 0.0),
        ]);
        let ccw = Contour::new(vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 4.0),
        ]);
        assert!((cw.area() - ccw.area()).abs() < f64::EPSILON);
    }

    #[test]
    fn degenerate_contour_has_zero_area() {
        assert!(Contour::new(vec![]).area().abs() < f64::EPSILON);
        assert!(
            Contour::new(vec![Point::new(1.0, 1.0), Point::new(5.0, 5.0)])
                .area()
                .abs()
                < f64::EPSILON
        );
        // Collinear triangle.
        let thin = Contour::new(vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(8.0, 8.0),
        ]);
        assert!(thin.area().abs() < f64::EPSILON);
    }

    // --- DeskewConfig tests ---

    #[test]
    fn config_defaults() {
        let config = DeskewConfig::default();
        assert!((config.canny_low - 50.0).abs() < f32::EPSILON);
        assert!((config.canny_high - 200.0).abs() < f32::EPSILON);
        assert!((config.min_region_area - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn config_serde_round_trip() {
        let config = DeskewConfig {
            canny_low: 30.0,
            canny_high: 120.0,
            min_region_area: 45.5,
        };
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: DeskewConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    // --- Error display tests ---

    #[test]
    fn error_empty_region_display() {
        let err = DeskewError::EmptyRegion;
        assert_eq!(
            err.to_string(),
            "no text region found: all contours fell below the area threshold",
        );
    }

    #[test]
    fn error_shape_mismatch_display() {
        let err = DeskewError::ShapeMismatch {
            image: Dimensions {
                width: 10,
                height: 20,
            },
            mask: Dimensions {
                width: 10,
                height: 21,
            },
        };
        assert_eq!(
            err.to_string(),
            "mask dimensions 10x21 do not match image dimensions 10x20",
        );
    }
}
