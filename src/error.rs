//! Error taxonomy for calibration, templates and reporting.
//!
//! Calibration failures are fatal for the run and carry enough context
//! (counts, thresholds) to tell a bad photograph from a bad template.
//! Per-mark lookup misses are not errors; the scorer ignores them locally.

use std::path::PathBuf;
use thiserror::Error;

/// Which boundary axis a calibration invariant refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Column,
    Row,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Column => write!(f, "column"),
            Axis::Row => write!(f, "row"),
        }
    }
}

/// Fatal failures while estimating skew or inferring the grid.
#[derive(Debug, Error)]
pub enum CalibrationError {
    #[error("no line segments supplied, cannot estimate skew")]
    InsufficientSegments,

    #[error(
        "no baseline candidate among the {candidates} longest segments \
         with y below {cutoff}"
    )]
    NoBaselineFound { candidates: usize, cutoff: f32 },

    #[error(
        "only {kept} calibration dot(s) left after the baseline filter \
         (y > {min_y}), need at least 2"
    )]
    InsufficientDots { kept: usize, min_y: f32 },

    #[error("inferred {axis} bounds are not strictly increasing")]
    NonMonotonicBounds { axis: Axis },
}

/// Failures loading or saving a sheet template.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template {path} not found")]
    NotFound { path: PathBuf },

    #[error("failed to access template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed template {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("invalid template {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// Failure appending a scored row to the cumulative result file.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to append report row to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
