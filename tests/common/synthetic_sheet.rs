//! Renders a synthetic answer sheet for end-to-end tests.
//!
//! Layout: three full-width ruling lines in the header, then a 4-question x
//! 5-choice bubble grid. Bubbles are rings of outer radius 10; filled
//! answers are solid discs. All geometry is chosen so hand-computed grid
//! boundaries are exact.

use sheet_scorer::image::ops;
use sheet_scorer::image::GrayBuffer;
use sheet_scorer::skew::correction_matrix;

pub const WHITE: u8 = 255;
pub const INK: u8 = 0;

pub const WIDTH: usize = 800;
pub const HEIGHT: usize = 600;

/// Ruling-line rows in the header.
pub const RULING_YS: [usize; 3] = [30, 50, 70];
/// Bubble centre rows (questions) and columns (choices).
pub const ROW_YS: [i32; 4] = [230, 290, 350, 410];
pub const COL_XS: [i32; 5] = [200, 300, 400, 500, 600];
pub const BUBBLE_RADIUS: i32 = 10;

pub fn draw_hline(img: &mut GrayBuffer, y: usize, thickness: usize) {
    for row in y..y + thickness {
        for x in 0..img.w {
            img.set(x, row, INK);
        }
    }
}

pub fn draw_ring(img: &mut GrayBuffer, cx: i32, cy: i32, outer: i32, inner: i32) {
    for y in (cy - outer)..=(cy + outer) {
        for x in (cx - outer)..=(cx + outer) {
            let d2 = (x - cx) * (x - cx) + (y - cy) * (y - cy);
            if d2 <= outer * outer && d2 >= inner * inner {
                img.set(x as usize, y as usize, INK);
            }
        }
    }
}

pub fn draw_disc(img: &mut GrayBuffer, cx: i32, cy: i32, r: i32) {
    draw_ring(img, cx, cy, r, 0);
}

/// The standard sheet: marks on question 0 (choice 2) and question 1
/// (choice 0); question 2 blank; question 3 double-marked (choices 1 and 3).
pub fn answer_sheet() -> GrayBuffer {
    let mut img = GrayBuffer::filled(WIDTH, HEIGHT, WHITE);
    for &y in &RULING_YS {
        draw_hline(&mut img, y, 2);
    }

    let filled = [(0usize, 2usize), (1, 0), (3, 1), (3, 3)];
    for (qi, &cy) in ROW_YS.iter().enumerate() {
        for (ci, &cx) in COL_XS.iter().enumerate() {
            if filled.contains(&(qi, ci)) {
                draw_disc(&mut img, cx, cy, BUBBLE_RADIUS);
            } else {
                // 3 px stroke keeps rings connected under rotation.
                draw_ring(&mut img, cx, cy, BUBBLE_RADIUS, BUBBLE_RADIUS - 3);
            }
        }
    }
    img
}

/// Applies a skew of `angle_rad` to a rendered sheet: straight ruling lines
/// come out sloping by `angle_rad`, which the pipeline should undo.
pub fn skewed(img: &GrayBuffer, angle_rad: f32) -> GrayBuffer {
    // The correction matrix for -a rotates content by +a.
    let skewed = ops::rotate(img, &correction_matrix(-angle_rad));
    // rotate() fills uncovered corners with 0, which reads as ink; repaint
    // anything outside the original frame white.
    let mut out = skewed;
    let m = correction_matrix(angle_rad);
    for y in 0..out.h {
        for x in 0..out.w {
            let sx = m[(0, 0)] * x as f32 + m[(0, 1)] * y as f32;
            let sy = m[(1, 0)] * x as f32 + m[(1, 1)] * y as f32;
            if sx < 0.0 || sy < 0.0 || sx >= WIDTH as f32 || sy >= HEIGHT as f32 {
                out.set(x, y, WHITE);
            }
        }
    }
    out
}
