//! deskew-pipeline: geometric document deskewing (sans-IO).
//!
//! Extracts the text region of a scanned document page, blackens the
//! background clutter around it, and rotates the page so the text long
//! axis is horizontal:
//!
//! edge detection -> contour extraction -> area filtering ->
//! convex hull -> {mask + background blackening, orientation
//! estimation} -> affine rotation.
//!
//! The convex hull of the surviving contour pixels is computed once and
//! consumed twice: it is rasterized into the background mask and it
//! feeds the minimum-area rectangle whose normalized angle is the
//! correction to apply.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and raster buffers and returns structured data. All
//! filesystem and terminal interaction lives in the `deskew` CLI crate.

pub mod contour;
pub mod decode;
pub mod edge;
pub mod filter;
pub mod hull;
pub mod mask;
pub mod orient;
pub mod rotate;
pub mod types;

pub use types::{
    Contour, DeskewConfig, DeskewError, DeskewOutput, Dimensions, GrayImage, Point, RgbaImage,
    RotatedRect, StagedDeskew,
};

/// Run the full deskewing pipeline on one image.
///
/// Takes raw image bytes (PNG, JPEG, BMP, TIFF) and a configuration,
/// and produces the corrected image together with the correction angle
/// that was applied.
///
/// # Errors
///
/// Returns [`DeskewError::EmptyInput`] if `image_bytes` is empty.
/// Returns [`DeskewError::ImageDecode`] if the bytes cannot be decoded.
/// Returns [`DeskewError::InvalidInput`] for zero-dimension images.
/// Returns [`DeskewError::EmptyRegion`] if no contour survives area
/// filtering.
/// Returns [`DeskewError::DegenerateGeometry`] if the surviving region
/// is too thin to orient.
pub fn process(image_bytes: &[u8], config: &DeskewConfig) -> Result<DeskewOutput, DeskewError> {
    let staged = process_staged(image_bytes, config)?;
    Ok(DeskewOutput {
        image: staged.deskewed,
        angle: staged.angle,
        dimensions: staged.dimensions,
    })
}

/// Run the deskewing pipeline with every intermediate stage preserved.
///
/// Identical processing to [`process`], but the returned
/// [`StagedDeskew`] keeps each stage's output so callers can write
/// per-stage debug artifacts.
///
/// # Errors
///
/// Same failure modes as [`process`].
pub fn process_staged(
    image_bytes: &[u8],
    config: &DeskewConfig,
) -> Result<StagedDeskew, DeskewError> {
    // 1. Decode to the RGBA original plus the grayscale working copy.
    let (original, grayscale) = decode::decode(image_bytes)?;
    let dimensions = Dimensions {
        width: grayscale.width(),
        height: grayscale.height(),
    };

    // 2. Binary edge map.
    let edges = edge::detect_edges(&grayscale, config.canny_low, config.canny_high)?;

    // 3. External contours, chain-approximated.
    let contours = contour::find_external_contours(&edges);

    // 4. Noise suppression: redraw only contours above the area threshold.
    let filtered = filter::filter_small_regions(&contours, dimensions, config.min_region_area);

    // 5. One convex hull, shared by the mask builder and the
    //    orientation estimator.
    let hull = hull::hull_of_foreground(&filtered)?;

    // 6a. Filled hull mask and background blackening.
    let mask = hull::rasterize_mask(&hull, dimensions)?;
    let masked = mask::apply_mask(&original, &mask)?;

    // 6b. Minimum-area rectangle and angle normalization.
    let rect = orient::min_area_rect(&hull)?;
    let angle = orient::normalize_angle(&rect);

    // 7. Affine correction about the image center.
    let deskewed = rotate::rotate(&masked, angle);

    Ok(StagedDeskew {
        original,
        grayscale,
        edges,
        contours,
        filtered,
        hull,
        mask,
        masked,
        rect,
        angle,
        deskewed,
        dimensions,
    })
}
