//! Calibration-dot detection.
//!
//! Printed answer bubbles — empty rings or filled discs alike — show up in
//! the binary image as compact, near-square components whose bounding box
//! diameter sits in a known radius window. That is enough to tell them from
//! ruling lines (huge, elongated), text (small) and specks. The component
//! centroid is the dot centre: a ring's pixel mass is symmetric about its
//! centre, so no circle fit is needed.

use super::components::find_components;
use crate::geometry::CalibrationDot;
use crate::image::GrayBuffer;
use crate::params::DotParams;
use log::debug;

/// Finds calibration dots in a binary image.
pub fn find_dots(bin: &GrayBuffer, params: &DotParams) -> Vec<CalibrationDot> {
    let components = find_components(bin);
    let total = components.len();
    let mut dots = Vec::new();

    for c in components {
        let (bw, bh) = c.bbox_size();
        let radius = (bw + bh) as f32 / 4.0;
        if radius < params.min_radius || radius > params.max_radius {
            continue;
        }
        let aspect = bw.max(bh) as f32 / bw.min(bh) as f32;
        if aspect > params.max_aspect {
            continue;
        }
        let fill = c.area as f32 / (bw * bh) as f32;
        if fill < params.min_fill || fill > params.max_fill {
            continue;
        }
        let (x, y) = c.centroid();
        dots.push(CalibrationDot { x, y, radius });
    }
    debug!(
        "dots: kept {}/{} component(s) in radius window [{:.0}, {:.0}]",
        dots.len(),
        total,
        params.min_radius,
        params.max_radius
    );
    dots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ops::FG;

    fn draw_ring(img: &mut GrayBuffer, cx: i32, cy: i32, r: i32) {
        for y in (cy - r - 1)..=(cy + r + 1) {
            for x in (cx - r - 1)..=(cx + r + 1) {
                let d2 = (x - cx) * (x - cx) + (y - cy) * (y - cy);
                if d2 <= r * r && d2 >= (r - 2) * (r - 2) {
                    img.set(x as usize, y as usize, FG);
                }
            }
        }
    }

    fn draw_disc(img: &mut GrayBuffer, cx: i32, cy: i32, r: i32) {
        for y in (cy - r)..=(cy + r) {
            for x in (cx - r)..=(cx + r) {
                if (x - cx) * (x - cx) + (y - cy) * (y - cy) <= r * r {
                    img.set(x as usize, y as usize, FG);
                }
            }
        }
    }

    #[test]
    fn rings_and_discs_are_both_dots() {
        let mut img = GrayBuffer::new(120, 60);
        draw_ring(&mut img, 30, 30, 10);
        draw_disc(&mut img, 80, 30, 10);
        let mut dots = find_dots(&img, &DotParams::default());
        dots.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap());
        assert_eq!(dots.len(), 2);
        assert!((dots[0].x - 30.0).abs() < 0.5 && (dots[0].y - 30.0).abs() < 0.5);
        assert!((dots[1].x - 80.0).abs() < 0.5 && (dots[1].y - 30.0).abs() < 0.5);
        for d in &dots {
            assert!((d.radius - 10.5).abs() < 1.0);
        }
    }

    #[test]
    fn lines_text_and_specks_are_rejected() {
        let mut img = GrayBuffer::new(200, 100);
        // Full-width ruling line.
        for x in 0..200 {
            img.set(x, 10, FG);
            img.set(x, 11, FG);
        }
        // A 3x3 speck.
        for y in 50..53 {
            for x in 5..8 {
                img.set(x, y, FG);
            }
        }
        // A solid block in the radius window but fully filled.
        for y in 40..80 {
            for x in 100..140 {
                img.set(x, y, FG);
            }
        }
        let dots = find_dots(&img, &DotParams::default());
        assert!(dots.is_empty(), "got {dots:?}");
    }
}
