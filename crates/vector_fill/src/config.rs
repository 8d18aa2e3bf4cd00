use serde::{Deserialize, Serialize};

/// Tunable parameters of a fill operation.
///
/// The section tolerances are empirical; changing them changes the quality
/// of the produced outline, not whether the pipeline terminates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FillConfig {
    /// Raster resolution in pixels per map unit.
    pub pixels_per_unit: f64,
    /// Free pixels added on every side of the map extent.
    pub margin_px: u32,
    /// Largest raster (width * height) the rasterizer may allocate.
    pub max_raster_pixels: u64,
    /// A section ends when the arc-length jumps by more than this factor
    /// times the distance between consecutive contour pixels.
    pub jump_factor: f64,
    /// Back-and-forth sections are merged when their ends are closer than
    /// this many pixel lengths.
    pub backtrack_factor: f64,
    /// Zero-length sections are widened by this arc-length.
    pub widen_epsilon: f64,
    /// Contour pixels farther than this from any path are ignored.
    pub max_snap_distance: Option<f64>,
    /// Map area above which filling is reported as potentially slow.
    pub large_extent_area: f64,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            pixels_per_unit: 4.0,
            margin_px: 2,
            max_raster_pixels: 64_000_000,
            jump_factor: 5.0,
            backtrack_factor: 2.0,
            widen_epsilon: 1e-4,
            max_snap_distance: None,
            large_extent_area: 600.0 * 600.0,
        }
    }
}
