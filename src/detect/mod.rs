//! Detector collaborators feeding the scoring core.
//!
//! These modules turn binary images into the geometric primitives the core
//! consumes: line segments for skew estimation, calibration dots for grid
//! inference, mark centroids for scoring. They are deliberately simple,
//! threshold-based detectors; the core never depends on how the primitives
//! were produced.

pub mod blobs;
pub mod components;
pub mod dots;
pub mod lines;

pub use blobs::find_marks;
pub use dots::find_dots;
pub use lines::extract_segments;
