//! Page skew estimation from detected line segments.
//!
//! Scanned sheets carry full-width ruling lines in the header; most detected
//! segments are therefore near-horizontal, and their small per-segment angle
//! errors largely cancel in the mean. The estimator:
//!
//! - averages `atan2(dy, dx)` over ALL segments to obtain the skew angle;
//! - ranks segments by squared length and, among the longest few that start
//!   above a configured cutoff, picks the one with the median vertical
//!   position as the grid's reference baseline. The median favours a line
//!   near the visual centre of the candidate set over an outlier.
//!
//! Both outputs feed the rest of the pipeline: the angle becomes a whole-
//! image rotation (see [`correction_matrix`]), the baseline separates the
//! calibration dots of the answer grid from registration marks above it.

use crate::error::CalibrationError;
use crate::geometry::LineSegment;
use crate::params::SkewParams;
use log::debug;
use nalgebra::Matrix3;

/// Result of skew estimation: corrective angle plus the reference baseline.
#[derive(Clone, Copy, Debug)]
pub struct SkewEstimate {
    /// Mean segment orientation in radians. Positive means the page content
    /// slopes downward to the right (image y grows downward).
    pub angle_rad: f32,
    /// The segment chosen as the grid's top reference row.
    pub baseline: LineSegment,
}

/// Estimates page skew and selects a baseline from detected segments.
///
/// Fails with [`CalibrationError::InsufficientSegments`] on empty input and
/// with [`CalibrationError::NoBaselineFound`] when no long segment passes the
/// vertical-position filter.
pub fn estimate_skew(
    segments: &[LineSegment],
    params: &SkewParams,
) -> Result<SkewEstimate, CalibrationError> {
    if segments.is_empty() {
        return Err(CalibrationError::InsufficientSegments);
    }

    // f64 accumulation keeps the mean stable under permutation of the input.
    let sum: f64 = segments.iter().map(|s| f64::from(s.angle())).sum();
    let angle_rad = (sum / segments.len() as f64) as f32;

    let mut by_length: Vec<LineSegment> = segments.to_vec();
    by_length.sort_by(|a, b| {
        b.length_sq()
            .partial_cmp(&a.length_sq())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let candidates = params.max_baseline_candidates.min(by_length.len());
    let mut long_segments: Vec<LineSegment> = by_length[..candidates]
        .iter()
        .filter(|s| s.p0[1] < params.baseline_y_cutoff)
        .copied()
        .collect();
    if long_segments.is_empty() {
        return Err(CalibrationError::NoBaselineFound {
            candidates,
            cutoff: params.baseline_y_cutoff,
        });
    }

    long_segments.sort_by(|a, b| {
        a.p0[1]
            .partial_cmp(&b.p0[1])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let baseline = long_segments[long_segments.len() / 2];

    debug!(
        "skew: segments={} candidates={} angle_deg={:.3} baseline_y={:.1}",
        segments.len(),
        long_segments.len(),
        angle_rad.to_degrees(),
        baseline.p0[1]
    );

    Ok(SkewEstimate {
        angle_rad,
        baseline,
    })
}

/// Rotation about the image origin that maps segments at `angle_rad` to
/// horizontal. With image y growing downward this is
/// `[cos a, sin a; -sin a, cos a]` embedded in a 3x3 affine.
pub fn correction_matrix(angle_rad: f32) -> Matrix3<f32> {
    let (s, c) = angle_rad.sin_cos();
    Matrix3::new(
        c, s, 0.0, //
        -s, c, 0.0, //
        0.0, 0.0, 1.0,
    )
}

/// Maps a point through an affine rotation matrix.
#[inline]
pub fn apply_rotation(m: &Matrix3<f32>, p: [f32; 2]) -> [f32; 2] {
    [
        m[(0, 0)] * p[0] + m[(0, 1)] * p[1] + m[(0, 2)],
        m[(1, 0)] * p[0] + m[(1, 1)] * p[1] + m[(1, 2)],
    ]
}

/// Maps both endpoints of a segment through an affine rotation matrix.
pub fn rotate_segment(m: &Matrix3<f32>, segment: &LineSegment) -> LineSegment {
    LineSegment {
        p0: apply_rotation(m, segment.p0),
        p1: apply_rotation(m, segment.p1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizontal(y: f32, len: f32) -> LineSegment {
        LineSegment::new(0.0, y, len, y)
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = estimate_skew(&[], &SkewParams::default()).unwrap_err();
        assert!(matches!(err, CalibrationError::InsufficientSegments));
    }

    #[test]
    fn angle_is_mean_over_all_segments() {
        let segs = vec![
            LineSegment::new(0.0, 0.0, 100.0, 10.0),
            LineSegment::new(0.0, 20.0, 100.0, -10.0),
        ];
        let est = estimate_skew(&segs, &SkewParams::default()).unwrap();
        let expected = (segs[0].angle() + segs[1].angle()) / 2.0;
        assert!((est.angle_rad - expected).abs() < 1e-6);
    }

    #[test]
    fn angle_is_permutation_invariant() {
        let segs: Vec<LineSegment> = (0..25)
            .map(|i| LineSegment::new(0.0, i as f32, 200.0, i as f32 + (i % 5) as f32 - 2.0))
            .collect();
        let mut reversed = segs.clone();
        reversed.reverse();
        let a = estimate_skew(&segs, &SkewParams::default()).unwrap();
        let b = estimate_skew(&reversed, &SkewParams::default()).unwrap();
        assert!((a.angle_rad - b.angle_rad).abs() < 1e-6);
    }

    #[test]
    fn baseline_is_median_of_long_segments_by_y() {
        // Five header lines above the cutoff plus one below it; the median
        // by y among the surviving candidates wins.
        let segs = vec![
            horizontal(10.0, 800.0),
            horizontal(30.0, 800.0),
            horizontal(50.0, 800.0),
            horizontal(70.0, 800.0),
            horizontal(90.0, 800.0),
            horizontal(600.0, 800.0),
        ];
        let est = estimate_skew(&segs, &SkewParams::default()).unwrap();
        assert_eq!(est.baseline.p0[1], 50.0);
    }

    #[test]
    fn cutoff_excludes_low_segments_from_baseline() {
        let params = SkewParams {
            baseline_y_cutoff: 100.0,
            ..Default::default()
        };
        let segs = vec![horizontal(150.0, 800.0), horizontal(40.0, 700.0)];
        let est = estimate_skew(&segs, &params).unwrap();
        assert_eq!(est.baseline.p0[1], 40.0);

        let only_low = vec![horizontal(150.0, 800.0)];
        let err = estimate_skew(&only_low, &params).unwrap_err();
        assert!(matches!(err, CalibrationError::NoBaselineFound { .. }));
    }

    #[test]
    fn correction_matrix_levels_a_skewed_segment() {
        let angle = 0.05f32;
        let skewed = LineSegment::new(0.0, 0.0, 100.0, 100.0 * angle.tan());
        let m = correction_matrix(angle);
        let fixed = rotate_segment(&m, &skewed);
        assert!(fixed.p1[1].abs() < 1e-3, "residual y={}", fixed.p1[1]);
        assert!((fixed.angle()).abs() < 1e-4);
    }
}
