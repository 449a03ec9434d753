//! Tile classification and treasure map reconstruction
//!
//! A directory of small images is classified tile by tile: each tile is either
//! blank or carries a foreground shape whose centroid and color are extracted.
//! The results are persisted as a CSV table and later laid out on a grid,
//! where found shapes are joined into a path drawn over a blank canvas.

#![forbid(unsafe_code)]

/// Segmentation and tile classification
pub mod analysis;
/// Input/output operations and error handling
pub mod io;
/// Masks, records and grid layout
pub mod spatial;

pub use io::error::{MapError, Result};
