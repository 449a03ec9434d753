//! Command-line interface for tile analysis and map reconstruction

use crate::analysis::classifier::{ClassifierConfig, TileClassifier};
use crate::io::analysis::export_overlay;
use crate::io::assets::enumerate_tiles;
use crate::io::configuration::{
    BRIGHT_THRESHOLD, CANVAS_MARGIN, DEFAULT_ASSETS_DIR, DEFAULT_MAP_OUTPUT, DEFAULT_OVERLAY_DIR,
    DEFAULT_RESULTS_CSV, LINE_WIDTH, MARKER_RADIUS, MAX_COLS, MIN_CONTOUR_AREA, MORPH_KERNEL_SIZE,
    ROW_SPACING, STD_THRESHOLD, TILE_SIZE,
};
use crate::io::error::{MapError, Result};
use crate::io::progress::ProgressManager;
use crate::io::records::{load_records, save_records};
use crate::io::visualization::{MapMark, MarkerStyle, export_map};
use crate::spatial::grid::{GridLayout, LayoutConfig};
use crate::spatial::tiles::{OutcomeCounts, TileRecord};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "treasuremap")]
#[command(
    author,
    version,
    about = "Classify image tiles and reconstruct a treasure map from them"
)]
/// Command-line arguments for the treasure map tool
pub struct Cli {
    /// Stage to run
    #[command(subcommand)]
    pub command: Command,

    /// Suppress progress output and informational logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase logging detail (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also write the log to this file
    #[arg(long, value_name = "FILE", global = true)]
    pub log_file: Option<PathBuf>,
}

/// Pipeline stages
#[derive(Subcommand, Clone)]
pub enum Command {
    /// Classify every tile and write the record table
    Analyze(AnalyzeArgs),
    /// Draw the treasure map from the record table
    Draw(DrawArgs),
    /// Classify the tiles, then draw the map
    Run(RunArgs),
}

/// Arguments of the `analyze` stage
#[derive(Args, Clone)]
pub struct AnalyzeArgs {
    /// Directory of tile images
    #[arg(value_name = "ASSETS", default_value = DEFAULT_ASSETS_DIR)]
    pub assets: PathBuf,

    /// Record table to write
    #[arg(short, long, value_name = "CSV", default_value = DEFAULT_RESULTS_CSV)]
    pub results: PathBuf,

    /// Directory receiving diagnostic overlays
    #[arg(long, value_name = "DIR", default_value = DEFAULT_OVERLAY_DIR)]
    pub overlays: PathBuf,

    /// Skip writing diagnostic overlays
    #[arg(long)]
    pub no_overlays: bool,

    /// Classification thresholds
    #[command(flatten)]
    pub thresholds: ThresholdArgs,
}

/// Arguments of the `draw` stage
#[derive(Args, Clone)]
pub struct DrawArgs {
    /// Record table to read
    #[arg(short, long, value_name = "CSV", default_value = DEFAULT_RESULTS_CSV)]
    pub results: PathBuf,

    /// Tile directory, classified directly when the table is missing or empty
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_ASSETS_DIR)]
    pub assets: PathBuf,

    /// Map image to write
    #[arg(short, long, value_name = "PNG", default_value = DEFAULT_MAP_OUTPUT)]
    pub output: PathBuf,

    /// Canvas layout and markers
    #[command(flatten)]
    pub map: MapArgs,

    /// Classification thresholds for the fallback path
    #[command(flatten)]
    pub thresholds: ThresholdArgs,
}

/// Arguments of the `run` stage
#[derive(Args, Clone)]
pub struct RunArgs {
    /// Directory of tile images
    #[arg(value_name = "ASSETS", default_value = DEFAULT_ASSETS_DIR)]
    pub assets: PathBuf,

    /// Record table to write
    #[arg(short, long, value_name = "CSV", default_value = DEFAULT_RESULTS_CSV)]
    pub results: PathBuf,

    /// Directory receiving diagnostic overlays
    #[arg(long, value_name = "DIR", default_value = DEFAULT_OVERLAY_DIR)]
    pub overlays: PathBuf,

    /// Skip writing diagnostic overlays
    #[arg(long)]
    pub no_overlays: bool,

    /// Map image to write
    #[arg(short, long, value_name = "PNG", default_value = DEFAULT_MAP_OUTPUT)]
    pub output: PathBuf,

    /// Classification thresholds
    #[command(flatten)]
    pub thresholds: ThresholdArgs,

    /// Canvas layout and markers
    #[command(flatten)]
    pub map: MapArgs,
}

/// Classification thresholds
#[derive(Args, Clone, Copy)]
pub struct ThresholdArgs {
    /// Intensity standard deviation below which a tile is flat
    #[arg(long, default_value_t = STD_THRESHOLD)]
    pub std_threshold: f64,

    /// Intensity mean above which a tile is near-white
    #[arg(long, default_value_t = BRIGHT_THRESHOLD)]
    pub bright_threshold: f64,

    /// Smallest accepted foreground area in pixels
    #[arg(long, default_value_t = MIN_CONTOUR_AREA)]
    pub min_area: u64,
}

impl ThresholdArgs {
    /// Classifier configuration for these thresholds
    pub const fn config(&self) -> ClassifierConfig {
        ClassifierConfig {
            std_threshold: self.std_threshold,
            bright_threshold: self.bright_threshold,
            min_contour_area: self.min_area,
            morph_kernel_size: MORPH_KERNEL_SIZE,
        }
    }
}

/// Canvas layout and marker geometry
#[derive(Args, Clone, Copy)]
pub struct MapArgs {
    /// Per-tile pitch in pixels
    #[arg(long, default_value_t = TILE_SIZE)]
    pub tile_size: u32,

    /// Canvas margin in pixels
    #[arg(long, default_value_t = CANVAS_MARGIN)]
    pub margin: u32,

    /// Extra gap between grid rows
    #[arg(long, default_value_t = ROW_SPACING)]
    pub row_spacing: u32,

    /// Maximum number of grid columns
    #[arg(long, default_value_t = MAX_COLS)]
    pub max_cols: usize,

    /// Marker radius
    #[arg(long, default_value_t = MARKER_RADIUS)]
    pub radius: u32,

    /// Width of connecting segments
    #[arg(long, default_value_t = LINE_WIDTH)]
    pub line_width: u32,
}

impl MapArgs {
    /// Layout configuration for these arguments
    pub const fn layout(&self) -> LayoutConfig {
        LayoutConfig {
            tile_size: self.tile_size,
            margin: self.margin,
            row_spacing: self.row_spacing,
            max_cols: self.max_cols,
        }
    }

    /// Marker style for these arguments
    pub const fn style(&self) -> MarkerStyle {
        MarkerStyle {
            radius: self.radius,
            line_width: self.line_width,
        }
    }
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Outcome of a completed stage
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Records that were produced or read
    pub records: Vec<TileRecord>,
    /// Drawing plan of the map, when a map was drawn
    pub marks: Option<Vec<MapMark>>,
}

/// Orchestrates the analysis and drawing stages with progress tracking
pub struct MapProcessor {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl MapProcessor {
    /// Create a processor for the given CLI arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);

        Self {
            cli,
            progress_manager,
        }
    }

    /// Run the requested stage
    ///
    /// # Errors
    ///
    /// Returns `EmptyInputSet` when there are no tiles to work on, or any
    /// configuration, table or image export error
    pub fn process(&mut self) -> Result<RunSummary> {
        match self.cli.command.clone() {
            Command::Analyze(args) => {
                let records = self.analyze(
                    &args.assets,
                    &args.results,
                    (!args.no_overlays).then_some(args.overlays.as_path()),
                    args.thresholds.config(),
                )?;
                Ok(RunSummary {
                    records,
                    marks: None,
                })
            }
            Command::Draw(args) => {
                let records =
                    self.gather_tile_data(&args.results, &args.assets, args.thresholds.config())?;
                let marks = draw(&records, args.map, &args.output)?;
                Ok(RunSummary {
                    records,
                    marks: Some(marks),
                })
            }
            Command::Run(args) => {
                let records = self.analyze(
                    &args.assets,
                    &args.results,
                    (!args.no_overlays).then_some(args.overlays.as_path()),
                    args.thresholds.config(),
                )?;
                let marks = draw(&records, args.map, &args.output)?;
                Ok(RunSummary {
                    records,
                    marks: Some(marks),
                })
            }
        }
    }

    /// Classify every tile in `assets`, write overlays and the record table
    fn analyze(
        &mut self,
        assets: &Path,
        results: &Path,
        overlay_dir: Option<&Path>,
        config: ClassifierConfig,
    ) -> Result<Vec<TileRecord>> {
        let classifier = TileClassifier::new(config)?;
        let paths = enumerate_tiles(assets)?;
        log::info!("Analyzing {} tiles from {}", paths.len(), assets.display());

        let records = self.classify_batch(&classifier, &paths, overlay_dir);
        save_records(results, &records)?;
        log_counts(&records);
        Ok(records)
    }

    fn classify_batch(
        &mut self,
        classifier: &TileClassifier,
        paths: &[PathBuf],
        overlay_dir: Option<&Path>,
    ) -> Vec<TileRecord> {
        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(paths.len());
        }

        let mut records = Vec::with_capacity(paths.len());
        for (index, path) in paths.iter().enumerate() {
            if let Some(ref pm) = self.progress_manager {
                pm.start_tile(index, path);
            }

            let record = classify_one(classifier, path, overlay_dir);
            log::debug!(
                "[{}/{}] {} {}",
                index + 1,
                paths.len(),
                record.filename,
                record.outcome_label()
            );

            if let Some(ref mut pm) = self.progress_manager {
                pm.complete_tile(&record.outcome_label());
            }
            records.push(record);
        }

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }
        records
    }

    /// Read the record table, or classify the assets when it is unusable
    fn gather_tile_data(
        &mut self,
        results: &Path,
        assets: &Path,
        config: ClassifierConfig,
    ) -> Result<Vec<TileRecord>> {
        if results.is_file() {
            log::info!("Reading tile data from {}", results.display());
            match load_records(results) {
                Ok(set) if !set.records.is_empty() => {
                    if !set.defects.is_empty() {
                        log::warn!(
                            "{} cells in {} were replaced by defaults",
                            set.defects.len(),
                            results.display()
                        );
                    }
                    return Ok(set.records);
                }
                Ok(_) => log::warn!("{} holds no records", results.display()),
                Err(err) => log::warn!("{err}"),
            }
        }

        log::info!("Record table unusable, analyzing {} directly", assets.display());
        let classifier = TileClassifier::new(config)?;
        let paths = enumerate_tiles(assets)?;
        let records = self.classify_batch(&classifier, &paths, None);
        log_counts(&records);
        Ok(records)
    }
}

/// Load, classify and optionally overlay one tile; never fails
fn classify_one(classifier: &TileClassifier, path: &Path, overlay_dir: Option<&Path>) -> TileRecord {
    classifier.classify_file_with(path, |image, analysis| {
        if let Some(dir) = overlay_dir
            && let Err(err) = export_overlay(image, analysis, dir)
        {
            log::warn!("Overlay for {} not written: {err}", path.display());
        }
    })
}

/// Lay out and draw the map for a set of records
fn draw(records: &[TileRecord], map: MapArgs, output: &Path) -> Result<Vec<MapMark>> {
    let config = map.layout();
    config.validate()?;
    let layout = GridLayout::new(records.len(), config).ok_or_else(|| MapError::EmptyInputSet {
        path: output.to_path_buf(),
    })?;
    layout.validate()?;
    log::info!(
        "Laying out {} tiles on a {}x{} grid",
        layout.count(),
        layout.cols(),
        layout.rows()
    );
    export_map(&layout.place(records), &layout, map.style(), output)
}

fn log_counts(records: &[TileRecord]) {
    let counts = OutcomeCounts::tally(records);
    log::info!(
        "{} tiles: {} found, {} blank, {} failed",
        records.len(),
        counts.found,
        counts.blank,
        counts.failed
    );
}
