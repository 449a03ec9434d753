//! Spatial data structures for tiles and the map canvas
//!
//! This module contains spatial-related functionality including:
//! - Binary pixel masks
//! - Per-tile classification records
//! - Grid layout of tiles on the canvas

/// Grid layout and canvas coordinate translation
pub mod grid;
/// Bit-packed binary masks for segmentation
pub mod mask;
/// Classification records and outcome types
pub mod tiles;

pub use grid::{GridLayout, LayoutConfig, PlacedTile};
pub use tiles::{Rgb, TileRecord};
