//! Input/output: discovery, persistence, rendering and the command line

/// Diagnostic overlays for classified tiles
pub mod analysis;
/// Tile image discovery and ordering
pub mod assets;
/// Command-line interface and stage orchestration
pub mod cli;
/// Constants and configuration defaults
pub mod configuration;
/// Error types
pub mod error;
/// Image loading and saving
pub mod image;
/// Logger installation
pub mod logging;
/// Progress display for batch classification
pub mod progress;
/// CSV record table
pub mod records;
/// Treasure map rendering
pub mod visualization;
