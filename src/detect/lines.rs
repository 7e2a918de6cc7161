//! Hough-transform line-segment extraction.
//!
//! Classic two-stage scheme: a rho–theta accumulator votes for global lines,
//! then each accumulator peak is walked across the image collecting runs of
//! foreground pixels into concrete segments. Peaks must clear a vote
//! threshold and be 3x3 local maxima, which collapses most of the smear a
//! thick line leaves in the accumulator. Runs bridge gaps up to `max_gap_px`
//! and are dropped below the minimum length (defaulting to half the image
//! width, which suits full-width ruling lines and suppresses text).
//!
//! Angles are those of the walk direction, so a left-to-right walk over a
//! level line reports exactly 0.

use crate::geometry::LineSegment;
use crate::image::GrayBuffer;
use crate::params::LineParams;
use log::debug;

/// Extracts line segments from a binary image.
pub fn extract_segments(bin: &GrayBuffer, params: &LineParams) -> Vec<LineSegment> {
    if bin.w == 0 || bin.h == 0 {
        return Vec::new();
    }
    let min_len = params.min_length_px.unwrap_or(bin.w as f32 * 0.5);
    let theta_res = params.theta_res_deg.to_radians();
    let num_theta = (std::f32::consts::PI / theta_res).round().max(1.0) as usize;
    let max_rho = ((bin.w * bin.w + bin.h * bin.h) as f32).sqrt();
    let num_rho = (2.0 * max_rho / params.rho_res).ceil() as usize + 1;

    let trig: Vec<(f32, f32)> = (0..num_theta)
        .map(|t| (t as f32 * theta_res).sin_cos())
        .collect();

    // Vote.
    let mut acc = vec![0u32; num_rho * num_theta];
    for y in 0..bin.h {
        let row = bin.row(y);
        for (x, &v) in row.iter().enumerate() {
            if v == 0 {
                continue;
            }
            for (t, &(sin_t, cos_t)) in trig.iter().enumerate() {
                let rho = x as f32 * cos_t + y as f32 * sin_t;
                let r = ((rho + max_rho) / params.rho_res).round() as usize;
                if r < num_rho {
                    acc[r * num_theta + t] += 1;
                }
            }
        }
    }

    // Peak selection: vote threshold plus 3x3 local maximum.
    let mut segments = Vec::new();
    for r in 0..num_rho {
        for t in 0..num_theta {
            let votes = acc[r * num_theta + t];
            if votes < params.votes_threshold || !is_local_max(&acc, num_rho, num_theta, r, t) {
                continue;
            }
            let rho = r as f32 * params.rho_res - max_rho;
            let (sin_t, cos_t) = trig[t];
            walk_line(bin, rho, sin_t, cos_t, params.max_gap_px, min_len, &mut segments);
        }
    }
    debug!(
        "hough: {} segment(s), vote_thresh={} min_len={:.0}",
        segments.len(),
        params.votes_threshold,
        min_len
    );
    segments
}

fn is_local_max(acc: &[u32], num_rho: usize, num_theta: usize, r: usize, t: usize) -> bool {
    let votes = acc[r * num_theta + t];
    for dr in -1isize..=1 {
        for dt in -1isize..=1 {
            if dr == 0 && dt == 0 {
                continue;
            }
            let nr = r as isize + dr;
            let nt = t as isize + dt;
            if nr < 0 || nt < 0 || nr as usize >= num_rho || nt as usize >= num_theta {
                continue;
            }
            if acc[nr as usize * num_theta + nt as usize] > votes {
                return false;
            }
        }
    }
    true
}

/// Walks the line `x cos + y sin = rho` along its dominant axis, emitting
/// one segment per foreground run longer than `min_len`.
fn walk_line(
    bin: &GrayBuffer,
    rho: f32,
    sin_t: f32,
    cos_t: f32,
    max_gap: f32,
    min_len: f32,
    out: &mut Vec<LineSegment>,
) {
    let mut run_start: Option<[f32; 2]> = None;
    let mut run_end: [f32; 2] = [0.0, 0.0];
    let mut gap = 0usize;

    let mut close_run = |start: &mut Option<[f32; 2]>, end: [f32; 2]| {
        if let Some(p0) = start.take() {
            let seg = LineSegment { p0, p1: end };
            if seg.length_sq() >= min_len * min_len {
                out.push(seg);
            }
        }
    };

    // Near-horizontal lines step along x, near-vertical along y; one sample
    // per step keeps runs dense.
    let horizontal_walk = sin_t.abs() >= cos_t.abs();
    let steps = if horizontal_walk { bin.w } else { bin.h };
    for i in 0..steps {
        let (xf, yf) = if horizontal_walk {
            let x = i as f32;
            (x, (rho - x * cos_t) / sin_t)
        } else {
            let y = i as f32;
            ((rho - y * sin_t) / cos_t, y)
        };
        let xi = xf.round() as isize;
        let yi = yf.round() as isize;
        let on = bin.contains(xi, yi) && bin.get(xi as usize, yi as usize) != 0;
        if on {
            if run_start.is_none() {
                run_start = Some([xf, yf]);
            }
            run_end = [xf, yf];
            gap = 0;
        } else if run_start.is_some() {
            gap += 1;
            if gap as f32 > max_gap {
                close_run(&mut run_start, run_end);
            }
        }
    }
    close_run(&mut run_start, run_end);
}
