//! Structured run diagnostics, serializable for debug dumps.

use crate::geometry::LineSegment;
use serde::Serialize;

/// Where the grid boundaries for a run came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationSource {
    /// Inferred from calibration dots on this image.
    Fresh,
    /// Loaded from a saved template; dot detection skipped.
    Template,
}

/// Wall-clock milliseconds spent per stage.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct StageTimings {
    pub threshold_ms: f64,
    pub lines_ms: f64,
    pub rotate_ms: f64,
    pub calibrate_ms: f64,
    pub morphology_ms: f64,
    pub marks_ms: f64,
    pub total_ms: f64,
}

/// Counts, thresholds and timings collected while scoring one sheet.
#[derive(Clone, Debug, Serialize)]
pub struct SheetDiagnostics {
    pub image_width: usize,
    pub image_height: usize,
    pub segment_count: usize,
    pub skew_angle_deg: f32,
    /// The chosen baseline, in rotated-image coordinates.
    pub baseline: LineSegment,
    /// Number of detected calibration dots; absent when a template was used.
    pub dot_count: Option<usize>,
    pub mark_count: usize,
    pub calibration_source: CalibrationSource,
    pub timings: StageTimings,
}
