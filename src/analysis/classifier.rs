//! Blank/foreground classification of individual tiles
//!
//! Each tile goes through a fixed sequence of tests, any of which can end
//! classification early: a flatness test on the raw intensities, Otsu
//! segmentation with morphological cleanup, external region extraction, and
//! an area check on the largest region. Surviving tiles get a moment-based
//! centroid and the mean color of the region.

use crate::analysis::regions::{Region, external_regions, largest_region};
use crate::analysis::segmentation::{clean_mask, segment_foreground};
use crate::analysis::statistics::{
    IntensityStats, grayscale, intensity_stats, masked_mean_color, mean_color,
};
use crate::io::configuration::{
    BRIGHT_THRESHOLD, MIN_CONTOUR_AREA, MORPH_KERNEL_SIZE, STD_THRESHOLD,
};
use crate::io::error::{Result, invalid_parameter};
use crate::io::image::load_rgb;
use crate::spatial::tiles::{BlankReason, FailureKind, TileOutcome, TileRecord};
use image::RgbImage;
use std::path::Path;

/// Thresholds steering tile classification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierConfig {
    /// Intensity standard deviation below which a tile is flat
    pub std_threshold: f64,
    /// Intensity mean above which a tile is near-white
    pub bright_threshold: f64,
    /// Smallest accepted region area in pixels
    pub min_contour_area: u64,
    /// Side of the square structuring element for mask cleanup
    pub morph_kernel_size: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            std_threshold: STD_THRESHOLD,
            bright_threshold: BRIGHT_THRESHOLD,
            min_contour_area: MIN_CONTOUR_AREA,
            morph_kernel_size: MORPH_KERNEL_SIZE,
        }
    }
}

impl ClassifierConfig {
    /// Check that every threshold is usable
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if a threshold is negative, not finite, or
    /// the structuring element size is not a positive odd number
    pub fn validate(&self) -> Result<()> {
        if !self.std_threshold.is_finite() || self.std_threshold < 0.0 {
            return Err(invalid_parameter(
                "std_threshold",
                &self.std_threshold,
                &"must be a non-negative number",
            ));
        }
        if !self.bright_threshold.is_finite() || self.bright_threshold < 0.0 {
            return Err(invalid_parameter(
                "bright_threshold",
                &self.bright_threshold,
                &"must be a non-negative number",
            ));
        }
        if self.morph_kernel_size == 0 || self.morph_kernel_size % 2 == 0 {
            return Err(invalid_parameter(
                "morph_kernel_size",
                &self.morph_kernel_size,
                &"must be a positive odd number",
            ));
        }
        Ok(())
    }
}

/// Classification of one tile together with the region it was based on
#[derive(Debug, Clone)]
pub struct TileAnalysis {
    /// The persisted result
    pub record: TileRecord,
    /// Selected foreground region, present only for found tiles
    pub region: Option<Region>,
}

/// Classifies tiles as blank or foreground-bearing
#[derive(Debug, Clone, Default)]
pub struct TileClassifier {
    config: ClassifierConfig,
}

impl TileClassifier {
    /// Create a classifier after validating its thresholds
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active thresholds
    pub const fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify a decoded tile
    pub fn classify(&self, filename: &str, image: &RgbImage) -> TileRecord {
        self.analyze(filename, image).record
    }

    /// Load and classify a tile from disk
    ///
    /// A tile that cannot be decoded yields a `load_failed` record rather
    /// than an error, so one bad file never stops a batch.
    pub fn classify_file(&self, path: &Path) -> TileRecord {
        self.classify_file_with(path, |_, _| {})
    }

    /// Load and classify a tile, handing the decoded image and its analysis
    /// to `inspect` before the record is returned
    ///
    /// `inspect` is not called for tiles that fail to load.
    pub fn classify_file_with<F>(&self, path: &Path, inspect: F) -> TileRecord
    where
        F: FnOnce(&RgbImage, &TileAnalysis),
    {
        let filename = tile_name(path);
        match load_rgb(path) {
            Ok(image) => {
                let analysis = self.analyze(&filename, &image);
                inspect(&image, &analysis);
                analysis.record
            }
            Err(err) => {
                log::warn!("{err}");
                TileRecord::failed(filename, FailureKind::LoadFailed)
            }
        }
    }

    /// Classify a decoded tile, keeping the selected region for diagnostics
    pub fn analyze(&self, filename: &str, image: &RgbImage) -> TileAnalysis {
        let gray = grayscale(image);
        let stats = intensity_stats(&gray);

        let blank = |reason: BlankReason| TileAnalysis {
            record: blank_record(filename, image, stats, reason),
            region: None,
        };

        if stats.std < self.config.std_threshold || stats.mean > self.config.bright_threshold {
            return blank(BlankReason::Flat);
        }

        let mask = clean_mask(&segment_foreground(&gray), self.config.morph_kernel_size);

        let Some(region) = largest_region(external_regions(&mask)) else {
            return blank(BlankReason::NoContour);
        };

        let area = region.area();
        if area < self.config.min_contour_area {
            return blank(BlankReason::SmallContour);
        }

        let (width, height) = image.dimensions();
        let centroid = region
            .moments()
            .centroid()
            .unwrap_or([width / 2, height / 2]);
        let color = masked_mean_color(image, region.pixels()).unwrap_or_else(|| mean_color(image));

        TileAnalysis {
            record: TileRecord {
                filename: filename.to_string(),
                outcome: TileOutcome::Found { centroid, area },
                color,
                mean_intensity: stats.mean,
                std_intensity: stats.std,
            },
            region: Some(region),
        }
    }
}

fn blank_record(
    filename: &str,
    image: &RgbImage,
    stats: IntensityStats,
    reason: BlankReason,
) -> TileRecord {
    TileRecord {
        filename: filename.to_string(),
        outcome: TileOutcome::Blank { reason },
        color: mean_color(image),
        mean_intensity: stats.mean,
        std_intensity: stats.std,
    }
}

/// File name component of a tile path, as stored in the record table
pub fn tile_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}
