//! Per-tile classification records
//!
//! A [`TileRecord`] is produced once per input image by the classifier, written
//! verbatim by the record store and read back unchanged by the layout engine.
//! The outcome is a tagged variant so that a centroid can only exist for tiles
//! where a foreground region was actually found.

use crate::io::configuration::NEUTRAL_GRAY;

/// RGB triple, 0-255 per channel
pub type Rgb = [u8; 3];

/// Why a tile was judged to contain no usable foreground
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlankReason {
    /// Textureless or near-white tile, rejected before segmentation
    Flat,
    /// Segmentation produced no external region
    NoContour,
    /// Largest region was below the minimum area
    SmallContour,
    /// Reason not present in the source table
    Unrecorded,
}

impl BlankReason {
    /// Tag stored in the record table's `reason` column
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::NoContour => "no_contour",
            Self::SmallContour => "small_contour",
            Self::Unrecorded => "",
        }
    }

    /// Parse a `reason` cell, falling back to [`BlankReason::Unrecorded`]
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "flat" | "blank" => Self::Flat,
            "no_contour" => Self::NoContour,
            "small_contour" => Self::SmallContour,
            _ => Self::Unrecorded,
        }
    }

    /// Upper-case label used in diagnostics
    pub const fn label(self) -> &'static str {
        match self {
            Self::Flat => "BLANK",
            Self::NoContour => "NO_CONTOUR",
            Self::SmallContour => "SMALL_CONTOUR",
            Self::Unrecorded => "UNRECORDED",
        }
    }
}

/// Why classification could not run on a tile
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The image could not be opened or decoded
    LoadFailed,
    /// Any other tag found in a record table
    Other(String),
}

impl FailureKind {
    /// Tag stored in the record table's `error` column
    pub fn tag(&self) -> &str {
        match self {
            Self::LoadFailed => "load_failed",
            Self::Other(tag) => tag,
        }
    }

    /// Parse a non-empty `error` cell; unknown tags are kept verbatim
    pub fn from_tag(tag: &str) -> Self {
        if tag.trim().eq_ignore_ascii_case("load_failed") {
            Self::LoadFailed
        } else {
            Self::Other(tag.to_string())
        }
    }
}

/// Classification outcome of a single tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileOutcome {
    /// No meaningful foreground shape
    Blank {
        /// Which test rejected the tile
        reason: BlankReason,
    },
    /// A foreground region was found
    Found {
        /// Region centroid in tile-local pixel coordinates `[x, y]`
        centroid: [u32; 2],
        /// Enclosed area of the region in pixels
        area: u64,
    },
    /// Classification could not run
    Failed {
        /// What went wrong
        kind: FailureKind,
    },
}

/// One classified tile
#[derive(Debug, Clone, PartialEq)]
pub struct TileRecord {
    /// File name of the tile, unique within a batch
    pub filename: String,
    /// Classification outcome
    pub outcome: TileOutcome,
    /// Mean color of the foreground region, or of the whole tile when blank
    pub color: Rgb,
    /// Grayscale mean over the whole tile
    pub mean_intensity: f64,
    /// Grayscale standard deviation over the whole tile
    pub std_intensity: f64,
}

impl TileRecord {
    /// Record for a tile whose image could not be loaded
    pub fn failed(filename: impl Into<String>, kind: FailureKind) -> Self {
        Self {
            filename: filename.into(),
            outcome: TileOutcome::Failed { kind },
            color: [NEUTRAL_GRAY; 3],
            mean_intensity: 0.0,
            std_intensity: 0.0,
        }
    }

    /// True unless a foreground region was found
    pub const fn is_blank(&self) -> bool {
        !matches!(self.outcome, TileOutcome::Found { .. })
    }

    /// Tile-local centroid, present only for found regions
    pub const fn centroid(&self) -> Option<[u32; 2]> {
        match self.outcome {
            TileOutcome::Found { centroid, .. } => Some(centroid),
            _ => None,
        }
    }

    /// Foreground area, 0 unless a region was found
    pub const fn area(&self) -> u64 {
        match self.outcome {
            TileOutcome::Found { area, .. } => area,
            _ => 0,
        }
    }

    /// Diagnostic failure tag, if classification could not run
    pub const fn error(&self) -> Option<&FailureKind> {
        match &self.outcome {
            TileOutcome::Failed { kind } => Some(kind),
            _ => None,
        }
    }

    /// Blank reason, if the tile was classified blank
    pub const fn blank_reason(&self) -> Option<BlankReason> {
        match self.outcome {
            TileOutcome::Blank { reason } => Some(reason),
            _ => None,
        }
    }

    /// Short outcome label for logs and progress output
    pub fn outcome_label(&self) -> String {
        match &self.outcome {
            TileOutcome::Blank { reason } => reason.label().to_string(),
            TileOutcome::Found { centroid, .. } => {
                format!("center=({},{})", centroid[0], centroid[1])
            }
            TileOutcome::Failed { kind } => kind.tag().to_ascii_uppercase(),
        }
    }
}

/// Tally of outcomes over a batch of records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeCounts {
    /// Tiles with a foreground region
    pub found: usize,
    /// Tiles classified blank
    pub blank: usize,
    /// Tiles that could not be classified
    pub failed: usize,
}

impl OutcomeCounts {
    /// Count outcomes over a slice of records
    pub fn tally(records: &[TileRecord]) -> Self {
        records
            .iter()
            .fold(Self::default(), |mut counts, record| {
                match record.outcome {
                    TileOutcome::Found { .. } => counts.found += 1,
                    TileOutcome::Blank { .. } => counts.blank += 1,
                    TileOutcome::Failed { .. } => counts.failed += 1,
                }
                counts
            })
    }
}
