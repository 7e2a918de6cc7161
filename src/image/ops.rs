//! Pixel operations used by the scoring pipeline.
//!
//! Inverse binary threshold, nearest-neighbour rotation about the origin,
//! cropping, and rectangular/elliptical dilation and erosion. Everything
//! operates on binary images encoded as 0/255 in a [`GrayBuffer`]; the
//! morphology pair (small rect dilate, larger ellipse erode) wipes thin
//! printed rings while keeping filled discs alive.

use super::GrayBuffer;
use crate::geometry::CropRect;
use log::warn;
use nalgebra::Matrix3;

pub const FG: u8 = 255;

/// Inverse binary threshold: dark ink becomes foreground (255), paper 0.
pub fn threshold_binary_inv(src: &GrayBuffer, threshold: u8) -> GrayBuffer {
    let data = src
        .data
        .iter()
        .map(|&v| if v > threshold { 0 } else { FG })
        .collect();
    GrayBuffer::from_raw(src.w, src.h, data)
}

/// Rotates `src` by the affine matrix `m` (destination = m * source), same
/// output size, nearest-neighbour sampling, background filled with 0.
pub fn rotate(src: &GrayBuffer, m: &Matrix3<f32>) -> GrayBuffer {
    // Inverse of a pure rotation is its transpose.
    let inv = m.transpose();
    let mut dst = GrayBuffer::new(src.w, src.h);
    for y in 0..src.h {
        for x in 0..src.w {
            let xf = x as f32;
            let yf = y as f32;
            let sx = (inv[(0, 0)] * xf + inv[(0, 1)] * yf).round() as isize;
            let sy = (inv[(1, 0)] * xf + inv[(1, 1)] * yf).round() as isize;
            if src.contains(sx, sy) {
                dst.set(x, y, src.get(sx as usize, sy as usize));
            }
        }
    }
    dst
}

/// Extracts `rect` from `src`. The rectangle is clamped to the image; a
/// clamped overhang is logged since downstream coordinates assume the
/// requested origin.
pub fn crop(src: &GrayBuffer, rect: &CropRect) -> GrayBuffer {
    let x0 = rect.x.max(0.0) as usize;
    let y0 = rect.y.max(0.0) as usize;
    let x1 = ((rect.x + rect.w) as usize).min(src.w);
    let y1 = ((rect.y + rect.h) as usize).min(src.h);
    if x0 as f32 != rect.x || y0 as f32 != rect.y || (x1 - x0) as f32 != rect.w {
        warn!(
            "crop: rect ({:.1},{:.1},{:.1},{:.1}) clamped to image {}x{}",
            rect.x, rect.y, rect.w, rect.h, src.w, src.h
        );
    }
    if x1 <= x0 || y1 <= y0 {
        return GrayBuffer::new(0, 0);
    }
    let mut dst = GrayBuffer::new(x1 - x0, y1 - y0);
    for y in y0..y1 {
        let row = &src.row(y)[x0..x1];
        dst.data[(y - y0) * dst.w..(y - y0 + 1) * dst.w].copy_from_slice(row);
    }
    dst
}

/// Structuring element shape for [`dilate`] and [`erode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kernel {
    /// Square of side `2r + 1`.
    Rect,
    /// Disc of radius `r` inscribed in that square.
    Ellipse,
}

fn kernel_offsets(shape: Kernel, radius: usize) -> Vec<(isize, isize)> {
    let r = radius as isize;
    let mut offsets = Vec::new();
    for dy in -r..=r {
        for dx in -r..=r {
            let keep = match shape {
                Kernel::Rect => true,
                Kernel::Ellipse => dx * dx + dy * dy <= r * r,
            };
            if keep {
                offsets.push((dx, dy));
            }
        }
    }
    offsets
}

fn morph(src: &GrayBuffer, shape: Kernel, radius: usize, take_max: bool) -> GrayBuffer {
    if radius == 0 {
        return src.clone();
    }
    let offsets = kernel_offsets(shape, radius);
    let mut dst = GrayBuffer::new(src.w, src.h);
    for y in 0..src.h {
        for x in 0..src.w {
            let mut acc = if take_max { 0u8 } else { u8::MAX };
            for &(dx, dy) in &offsets {
                let nx = x as isize + dx;
                let ny = y as isize + dy;
                // Outside the image counts as background.
                let v = if src.contains(nx, ny) {
                    src.get(nx as usize, ny as usize)
                } else {
                    0
                };
                acc = if take_max { acc.max(v) } else { acc.min(v) };
            }
            dst.set(x, y, acc);
        }
    }
    dst
}

/// Grows foreground regions by `radius`.
pub fn dilate(src: &GrayBuffer, shape: Kernel, radius: usize) -> GrayBuffer {
    morph(src, shape, radius, true)
}

/// Shrinks foreground regions by `radius`; regions thinner than the kernel
/// disappear.
pub fn erode(src: &GrayBuffer, shape: Kernel, radius: usize) -> GrayBuffer {
    morph(src, shape, radius, false)
}
