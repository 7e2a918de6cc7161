//! Plain-text persistence for a calibrated sheet layout.
//!
//! A template freezes the crop rectangle and both boundary sequences so a
//! known layout can be scored without per-image dot detection. The format is
//! whitespace-separated, in this order: four crop scalars (x, y, width,
//! height), a count followed by that many column boundaries, a count
//! followed by that many row boundaries. Boundary values are integers in the
//! file; the crop scalars may carry fractions.
//!
//! ```text
//! 170 210 450 220
//! 5 60 200 260 400 460
//! 4 40 120 160 240
//! ```

use crate::error::TemplateError;
use crate::geometry::CropRect;
use crate::grid::GridBoundaries;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Loads a template, validating counts and boundary ordering.
pub fn load(path: &Path) -> Result<GridBoundaries, TemplateError> {
    let contents = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TemplateError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            TemplateError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let mut tokens = contents.split_whitespace();
    let mut next_f32 = |what: &str| -> Result<f32, TemplateError> {
        let token = tokens.next().ok_or_else(|| TemplateError::Parse {
            path: path.to_path_buf(),
            reason: format!("unexpected end of file, expected {what}"),
        })?;
        token.parse::<f32>().map_err(|_| TemplateError::Parse {
            path: path.to_path_buf(),
            reason: format!("expected a number for {what}, got {token:?}"),
        })
    };

    let x = next_f32("crop x")?;
    let y = next_f32("crop y")?;
    let w = next_f32("crop width")?;
    let h = next_f32("crop height")?;

    let column_count = next_f32("column count")? as usize;
    let mut column_bounds = Vec::with_capacity(column_count);
    for i in 0..column_count {
        column_bounds.push(next_f32(&format!("column boundary {i}"))?);
    }

    let row_count = next_f32("row count")? as usize;
    let mut row_bounds = Vec::with_capacity(row_count);
    for i in 0..row_count {
        row_bounds.push(next_f32(&format!("row boundary {i}"))?);
    }

    let boundaries = GridBoundaries {
        crop: CropRect::new(x, y, w, h),
        column_bounds,
        row_bounds,
    };
    boundaries.validate().map_err(|axis| TemplateError::Invalid {
        path: path.to_path_buf(),
        reason: format!("{axis} boundaries are not strictly increasing"),
    })?;
    Ok(boundaries)
}

/// Saves a template in the format read by [`load`].
///
/// Boundary values are rounded to integers at this serialization boundary;
/// crop scalars keep their value verbatim.
pub fn save(path: &Path, boundaries: &GridBoundaries) -> Result<(), TemplateError> {
    let mut out = String::new();
    let crop = &boundaries.crop;
    let _ = writeln!(out, "{} {} {} {}", crop.x, crop.y, crop.w, crop.h);

    let _ = write!(out, "{}", boundaries.column_bounds.len());
    for b in &boundaries.column_bounds {
        let _ = write!(out, " {}", b.round() as i64);
    }
    out.push('\n');

    let _ = write!(out, "{}", boundaries.row_bounds.len());
    for b in &boundaries.row_bounds {
        let _ = write!(out, " {}", b.round() as i64);
    }
    out.push('\n');

    fs::write(path, out).map_err(|e| TemplateError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
