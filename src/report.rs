//! Append-only result file, one line per scored sheet.
//!
//! Legacy format: the per-question report values comma-separated with a
//! trailing comma, then a newline. The whole row goes out in a single write
//! so a concurrent writer could interleave at line granularity at worst;
//! proper serialization still assumes one writer per file.

use crate::error::ReportError;
use crate::score::Answer;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Formats one report row: `2,-1,0,` plus newline.
pub fn format_row(answers: &[Answer]) -> String {
    let mut line = String::with_capacity(answers.len() * 3 + 1);
    for answer in answers {
        line.push_str(&answer.report_value().to_string());
        line.push(',');
    }
    line.push('\n');
    line
}

/// Appends one scored sheet to the cumulative result file, creating it on
/// first use.
pub fn append_row(path: &Path, answers: &[Answer]) -> Result<(), ReportError> {
    let io_err = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(io_err)?;
    file.write_all(format_row(answers).as_bytes()).map_err(io_err)
}
