//! Grid boundary inference from a scatter of calibration dots.
//!
//! The printed bubbles themselves act as calibration dots: their centres,
//! sorted along one axis, form well-separated clusters (one per column or
//! row). A single sweep groups them with a gap threshold and emits one
//! boundary per cluster using a reflected-midpoint rule: the new boundary is
//! `2*x - previous_boundary`, i.e. the previous boundary mirrored across the
//! cluster's first dot. Using only information seen so far, that lands the
//! boundary roughly midway toward where the next cluster will start, so a
//! mark slightly past a bubble still classifies into the bubble's own cell.
//!
//! Boundaries are expressed relative to the crop origin (`min_x`/`min_y`),
//! which is where the downstream mark detector's coordinates live. The
//! margins are asymmetric on x: the leftmost cluster usually sits next to a
//! printed question-label column and needs more clearance.

use crate::error::{Axis, CalibrationError};
use crate::geometry::{CalibrationDot, CropRect, LineSegment};
use crate::params::CalibrationParams;
use log::debug;
use serde::{Deserialize, Serialize};

/// Column/row thresholds plus the crop rectangle they are relative to.
///
/// Both bound sequences are strictly increasing; `column_bounds.len()` is the
/// number of choices per question and `row_bounds.len()` the number of
/// questions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridBoundaries {
    pub crop: CropRect,
    pub column_bounds: Vec<f32>,
    pub row_bounds: Vec<f32>,
}

impl GridBoundaries {
    /// Number of questions on the sheet.
    pub fn question_count(&self) -> usize {
        self.row_bounds.len()
    }

    /// Number of choices per question.
    pub fn choice_count(&self) -> usize {
        self.column_bounds.len()
    }

    /// First row whose bound lies strictly above `y`, if any. A value exactly
    /// on a bound belongs to the next row.
    pub fn row_index(&self, y: f32) -> Option<usize> {
        self.row_bounds.iter().position(|&b| y < b)
    }

    /// Column lookup, same rule as [`GridBoundaries::row_index`].
    pub fn column_index(&self, x: f32) -> Option<usize> {
        self.column_bounds.iter().position(|&b| x < b)
    }

    /// Checks that both bound sequences are strictly increasing.
    pub fn validate(&self) -> Result<(), Axis> {
        if !strictly_increasing(&self.column_bounds) {
            return Err(Axis::Column);
        }
        if !strictly_increasing(&self.row_bounds) {
            return Err(Axis::Row);
        }
        Ok(())
    }
}

fn strictly_increasing(values: &[f32]) -> bool {
    values.windows(2).all(|w| w[0] < w[1])
}

/// Infers grid boundaries from calibration dots below the baseline.
///
/// Dots at or above `baseline.y + margin_below_baseline` are registration
/// noise and are dropped before clustering. Fails with
/// [`CalibrationError::InsufficientDots`] when fewer than two dots remain and
/// with [`CalibrationError::NonMonotonicBounds`] if the dot scatter is too
/// degenerate to produce ordered boundaries.
pub fn calibrate(
    dots: &[CalibrationDot],
    baseline: &LineSegment,
    params: &CalibrationParams,
) -> Result<GridBoundaries, CalibrationError> {
    let min_y_kept = baseline.p0[1] + params.margin_below_baseline;
    let kept: Vec<&CalibrationDot> = dots.iter().filter(|d| d.y > min_y_kept).collect();
    if kept.len() < 2 {
        return Err(CalibrationError::InsufficientDots {
            kept: kept.len(),
            min_y: min_y_kept,
        });
    }
    debug!(
        "calibrate: dots={} kept={} (baseline_y={:.1} margin={:.0})",
        dots.len(),
        kept.len(),
        baseline.p0[1],
        params.margin_below_baseline
    );

    let mut xs: Vec<f32> = kept.iter().map(|d| d.x).collect();
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let (min_x, max_x, column_bounds) = sweep_axis(
        &xs,
        params.column_low_margin,
        params.column_high_margin,
        params.gap_px,
    );

    let mut ys: Vec<f32> = kept.iter().map(|d| d.y).collect();
    ys.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let (min_y, max_y, row_bounds) =
        sweep_axis(&ys, params.row_margin, params.row_margin, params.gap_px);

    let boundaries = GridBoundaries {
        crop: CropRect::new(min_x, min_y, max_x - min_x, max_y - min_y),
        column_bounds,
        row_bounds,
    };
    boundaries
        .validate()
        .map_err(|axis| CalibrationError::NonMonotonicBounds { axis })?;
    debug!(
        "calibrate: {} columns, {} rows, crop=({:.1},{:.1},{:.1},{:.1})",
        boundaries.choice_count(),
        boundaries.question_count(),
        boundaries.crop.x,
        boundaries.crop.y,
        boundaries.crop.w,
        boundaries.crop.h
    );
    Ok(boundaries)
}

/// Single-pass gap-threshold sweep over sorted 1-D positions.
///
/// Returns the padded extent `(min, max)` and one boundary per cluster,
/// offset so boundaries are relative to `min`. The first value always opens
/// a cluster; every cluster opening reflects the previous boundary across
/// the opening value.
fn sweep_axis(sorted: &[f32], low_margin: f32, high_margin: f32, gap: f32) -> (f32, f32, Vec<f32>) {
    debug_assert!(!sorted.is_empty());
    let min = sorted[0] - low_margin;
    let max = sorted[sorted.len() - 1] + high_margin;

    let mut bounds = Vec::new();
    let mut previous_boundary = min;
    let mut current = f32::NEG_INFINITY;
    for &v in sorted {
        if v > current + gap {
            previous_boundary = 2.0 * v - previous_boundary;
            bounds.push(previous_boundary - min);
        }
        current = v;
    }
    (min, max, bounds)
}
