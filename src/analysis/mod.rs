//! Image analysis for tile classification

/// Blank/foreground classification pipeline
pub mod classifier;
/// External region extraction and moments
pub mod regions;
/// Blur, thresholding and morphological cleanup
pub mod segmentation;
/// Intensity statistics and Otsu thresholding
pub mod statistics;
