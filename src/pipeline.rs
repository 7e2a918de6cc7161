//! End-to-end scoring of one sheet image.
//!
//! Overview
//! - Inverse-threshold the grayscale scan so ink becomes foreground.
//! - Extract line segments and estimate page skew; rotate the binary image
//!   (and the baseline with it) so the grid is axis-aligned.
//! - Obtain grid boundaries: freshly calibrated from the bubble scatter, or
//!   verbatim from a caller-supplied template, skipping dot detection.
//! - Crop to the grid, dilate then erode so printed rings vanish and filled
//!   bubbles survive, detect the surviving blobs and classify them into
//!   cells.
//!
//! One image per call, no shared mutable state; batch runs are independent
//! and may be parallelized across processes as long as the report file has a
//! single writer.

use crate::detect;
use crate::diagnostics::{CalibrationSource, SheetDiagnostics, StageTimings};
use crate::error::CalibrationError;
use crate::grid::{self, GridBoundaries};
use crate::image::ops::{self, Kernel};
use crate::image::GrayBuffer;
use crate::params::SheetParams;
use crate::score::{self, Answer};
use crate::skew;
use log::debug;
use serde::Serialize;
use std::time::Instant;

/// Everything a run produces: answers, the boundaries that scored them, and
/// stage diagnostics.
#[derive(Clone, Debug, Serialize)]
pub struct SheetReport {
    pub answers: Vec<Answer>,
    pub boundaries: GridBoundaries,
    pub diagnostics: SheetDiagnostics,
}

/// Scores sheet images against a fixed parameter set.
#[derive(Clone, Debug, Default)]
pub struct SheetScorer {
    params: SheetParams,
}

impl SheetScorer {
    pub fn new(params: SheetParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SheetParams {
        &self.params
    }

    /// Runs the full pipeline on a grayscale image.
    ///
    /// With `template` given, its boundaries are used verbatim and dot
    /// detection is skipped; skew correction still runs, since the template
    /// was recorded against a deskewed image.
    pub fn process(
        &self,
        gray: &GrayBuffer,
        template: Option<&GridBoundaries>,
    ) -> Result<SheetReport, CalibrationError> {
        let t_start = Instant::now();
        let mut timings = StageTimings::default();

        let t = Instant::now();
        let binary = ops::threshold_binary_inv(gray, self.params.threshold);
        timings.threshold_ms = ms(t);

        let t = Instant::now();
        let segments = detect::extract_segments(&binary, &self.params.line);
        timings.lines_ms = ms(t);

        let estimate = skew::estimate_skew(&segments, &self.params.skew)?;
        let rotation = skew::correction_matrix(estimate.angle_rad);

        let t = Instant::now();
        let rotated = ops::rotate(&binary, &rotation);
        // The dots are detected in rotated coordinates; the baseline filter
        // must live in the same space.
        let baseline = skew::rotate_segment(&rotation, &estimate.baseline);
        timings.rotate_ms = ms(t);

        let t = Instant::now();
        let (boundaries, source, dot_count) = match template {
            Some(b) => (b.clone(), CalibrationSource::Template, None),
            None => {
                let dots = detect::find_dots(&rotated, &self.params.dot);
                let boundaries = grid::calibrate(&dots, &baseline, &self.params.calibration)?;
                (boundaries, CalibrationSource::Fresh, Some(dots.len()))
            }
        };
        timings.calibrate_ms = ms(t);

        let t = Instant::now();
        let cropped = ops::crop(&rotated, &boundaries.crop);
        let dilated = ops::dilate(&cropped, Kernel::Rect, self.params.mark.dilate_radius);
        let eroded = ops::erode(&dilated, Kernel::Ellipse, self.params.mark.erode_radius);
        timings.morphology_ms = ms(t);

        let t = Instant::now();
        let marks = detect::find_marks(&eroded, &self.params.mark);
        timings.marks_ms = ms(t);

        let answers = score::score_marks(&marks, &boundaries);
        timings.total_ms = ms(t_start);
        debug!(
            "pipeline: {} segment(s), {} mark(s), {} question(s) in {:.1} ms",
            segments.len(),
            marks.len(),
            answers.len(),
            timings.total_ms
        );

        let diagnostics = SheetDiagnostics {
            image_width: gray.w,
            image_height: gray.h,
            segment_count: segments.len(),
            skew_angle_deg: estimate.angle_rad.to_degrees(),
            baseline,
            dot_count,
            mark_count: marks.len(),
            calibration_source: source,
            timings,
        };

        Ok(SheetReport {
            answers,
            boundaries,
            diagnostics,
        })
    }
}

fn ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}
