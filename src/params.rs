//! Parameter types configuring the scoring pipeline stages.
//!
//! Defaults reproduce the reference sheet geometry: A4-ish scans around
//! 800–1700 px wide, bubbles of 10–20 px radius, a ruled header above the
//! answer grid. For other layouts start with the calibration margins and the
//! dot radius window.

use serde::{Deserialize, Serialize};

/// Pipeline-wide parameters, one sub-struct per stage.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetParams {
    /// Inverse binary threshold: pixels darker than this become foreground.
    pub threshold: u8,
    pub line: LineParams,
    pub skew: SkewParams,
    pub dot: DotParams,
    pub calibration: CalibrationParams,
    pub mark: MarkParams,
}

impl Default for SheetParams {
    fn default() -> Self {
        Self {
            threshold: 100,
            line: LineParams::default(),
            skew: SkewParams::default(),
            dot: DotParams::default(),
            calibration: CalibrationParams::default(),
            mark: MarkParams::default(),
        }
    }
}

/// Hough line-segment extraction knobs.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LineParams {
    /// Accumulator resolution along rho, in pixels.
    pub rho_res: f32,
    /// Accumulator resolution along theta, in degrees.
    pub theta_res_deg: f32,
    /// Minimum accumulator votes for a line to be considered.
    pub votes_threshold: u32,
    /// Minimum accepted segment length in pixels. `None` means half the
    /// image width, which suits full-width ruling lines.
    pub min_length_px: Option<f32>,
    /// Maximum run of background pixels bridged when walking a line.
    pub max_gap_px: f32,
}

impl Default for LineParams {
    fn default() -> Self {
        Self {
            rho_res: 1.0,
            theta_res_deg: 1.0,
            votes_threshold: 100,
            min_length_px: None,
            max_gap_px: 30.0,
        }
    }
}

/// Skew estimation and baseline selection knobs.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SkewParams {
    /// How many of the longest segments compete for the baseline role.
    pub max_baseline_candidates: usize,
    /// Baseline candidates must start above this y (the ruled header region).
    pub baseline_y_cutoff: f32,
}

impl Default for SkewParams {
    fn default() -> Self {
        Self {
            max_baseline_candidates: 40,
            baseline_y_cutoff: 500.0,
        }
    }
}

/// Calibration-dot detection window.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DotParams {
    pub min_radius: f32,
    pub max_radius: f32,
    /// Maximum bbox aspect deviation from square, as a ratio (1.0 = square).
    pub max_aspect: f32,
    /// Accepted component-area / bbox-area window. The low end admits thin
    /// printed rings, the high end rejects solid rectangles.
    pub min_fill: f32,
    pub max_fill: f32,
}

impl Default for DotParams {
    fn default() -> Self {
        Self {
            min_radius: 10.0,
            max_radius: 20.0,
            max_aspect: 1.6,
            min_fill: 0.15,
            max_fill: 0.95,
        }
    }
}

/// Grid boundary inference knobs.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationParams {
    /// Dots closer to the baseline than this are registration noise.
    pub margin_below_baseline: f32,
    /// Gap threshold for the 1-D cluster sweep, both axes.
    pub gap_px: f32,
    /// Extra space kept left of the leftmost dot (question-label column).
    pub column_low_margin: f32,
    /// Extra space kept right of the rightmost dot.
    pub column_high_margin: f32,
    /// Extra space kept above the first and below the last dot row.
    pub row_margin: f32,
}

impl Default for CalibrationParams {
    fn default() -> Self {
        Self {
            margin_below_baseline: 150.0,
            gap_px: 10.0,
            column_low_margin: 30.0,
            column_high_margin: 20.0,
            row_margin: 20.0,
        }
    }
}

/// Mark (filled bubble) detection knobs, applied after crop + morphology.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkParams {
    /// Rectangular dilation radius applied before erosion.
    pub dilate_radius: usize,
    /// Elliptical erosion radius; wipes printed rings, keeps filled discs.
    pub erode_radius: usize,
    /// Component area window for a surviving mark, in pixels.
    pub min_area: usize,
    pub max_area: usize,
}

impl Default for MarkParams {
    fn default() -> Self {
        Self {
            dilate_radius: 1,
            erode_radius: 5,
            min_area: 50,
            max_area: 800,
        }
    }
}
