//! Filled-mark detection on the cropped, eroded grid image.
//!
//! By the time this runs, morphology has wiped the printed rings; what is
//! left of a filled bubble is a shrunken disc. An area window separates
//! those from residual specks and from smudges spanning several cells.
//! Centroids are reported in the input image's own coordinate space, which
//! for the pipeline is the cropped grid.

use super::components::find_components;
use crate::geometry::MarkCentroid;
use crate::image::GrayBuffer;
use crate::params::MarkParams;
use log::debug;

/// Finds mark centroids in a binary image.
pub fn find_marks(bin: &GrayBuffer, params: &MarkParams) -> Vec<MarkCentroid> {
    let components = find_components(bin);
    let total = components.len();
    let mut marks = Vec::new();
    for c in components {
        if c.area < params.min_area || c.area > params.max_area {
            continue;
        }
        let (x, y) = c.centroid();
        marks.push(MarkCentroid { x, y });
    }
    debug!(
        "blobs: kept {}/{} component(s) in area window [{}, {}]",
        marks.len(),
        total,
        params.min_area,
        params.max_area
    );
    marks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ops::FG;

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
    fn discs_in_the_area_window_are_marks() {
        let mut img = GrayBuffer::new(100, 50);
        draw_disc(&mut img, 25, 25, 6);
        draw_disc(&mut img, 70, 25, 6);
        let mut marks = find_marks(&img, &MarkParams::default());
        marks.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap());
        assert_eq!(marks.len(), 2);
        assert!((marks[0].x - 25.0).abs() < 0.5);
        assert!((marks[1].x - 70.0).abs() < 0.5);
    }

    #[test]
    fn specks_and_smudges_are_rejected() {
        let mut img = GrayBuffer::new(120, 120);
        draw_disc(&mut img, 10, 10, 2);
        for y in 40..110 {
            for x in 40..100 {
                img.set(x, y, FG);
            }
        }
        assert!(find_marks(&img, &MarkParams::default()).is_empty());
    }
}
