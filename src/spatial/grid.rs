//! Grid layout of classified tiles on the map canvas
//!
//! Tiles are placed row-major into cells of a fixed pitch. A tile's canvas
//! position combines two coordinate systems: the cell origin on the canvas and
//! the tile-local centroid found by the classifier. Found features therefore
//! keep their position inside each tile while the tiles themselves stay evenly
//! gridded. Tiles without a centroid sit at the center of their cell.

use crate::io::configuration::{CANVAS_MARGIN, MAX_COLS, ROW_SPACING, TILE_SIZE};
use crate::io::error::{Result, invalid_parameter};
use crate::spatial::tiles::TileRecord;

/// Canvas geometry parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Per-tile pitch in pixels
    pub tile_size: u32,
    /// Margin around the grid
    pub margin: u32,
    /// Extra gap between rows
    pub row_spacing: u32,
    /// Maximum number of columns
    pub max_cols: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            tile_size: TILE_SIZE,
            margin: CANVAS_MARGIN,
            row_spacing: ROW_SPACING,
            max_cols: MAX_COLS,
        }
    }
}

impl LayoutConfig {
    /// Check the geometry parameters
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the tile size or column limit is zero, or
    /// if a single cell with its margins leaves the canvas coordinate range
    pub fn validate(&self) -> Result<()> {
        if self.tile_size == 0 {
            return Err(invalid_parameter(
                "tile_size",
                &self.tile_size,
                &"must be positive",
            ));
        }
        if self.max_cols == 0 {
            return Err(invalid_parameter(
                "max_cols",
                &self.max_cols,
                &"must be positive",
            ));
        }
        let cell_extent = 2 * u64::from(self.margin)
            + u64::from(self.tile_size)
            + u64::from(self.row_spacing);
        if cell_extent > CANVAS_LIMIT {
            return Err(invalid_parameter(
                "margin",
                &self.margin,
                &format!("a cell spans {cell_extent} pixels, more than {CANVAS_LIMIT}"),
            ));
        }
        Ok(())
    }
}

/// Largest canvas extent; positions are signed 32-bit pixel coordinates
const CANVAS_LIMIT: u64 = i32::MAX as u64;

fn to_coordinate(value: u64) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// A record with its resolved canvas position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedTile<'a> {
    /// The classified tile
    pub record: &'a TileRecord,
    /// Canvas-global `[x, y]`
    pub position: [i32; 2],
}

impl PlacedTile<'_> {
    /// Whether the tile is drawn as a blank marker
    pub const fn is_blank(&self) -> bool {
        self.record.centroid().is_none()
    }
}

/// Grid dimensions for a given number of tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    config: LayoutConfig,
    count: usize,
    cols: usize,
    rows: usize,
}

impl GridLayout {
    /// Lay out `count` tiles; `None` when there is nothing to place
    pub fn new(count: usize, config: LayoutConfig) -> Option<Self> {
        if count == 0 {
            return None;
        }
        let cols = count.min(config.max_cols.max(1));
        let rows = count.div_ceil(cols);
        Some(Self {
            config,
            count,
            cols,
            rows,
        })
    }

    /// Number of grid columns
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Number of grid rows
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of tiles the grid was built for
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Geometry parameters
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Canvas extent in pixels, or `None` past 32-bit coordinates
    fn canvas_extent(&self) -> Option<(u64, u64)> {
        let tile = u64::from(self.config.tile_size);
        let margin = 2 * u64::from(self.config.margin);
        let cols = u64::try_from(self.cols).ok()?;
        let rows = u64::try_from(self.rows).ok()?;
        let width = cols.checked_mul(tile)?.checked_add(margin)?;
        let height = rows
            .checked_mul(tile)?
            .checked_add((rows - 1).checked_mul(u64::from(self.config.row_spacing))?)?
            .checked_add(margin)?;
        (width <= CANVAS_LIMIT && height <= CANVAS_LIMIT).then_some((width, height))
    }

    /// Check that the whole canvas fits 32-bit pixel coordinates
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the grid is too large to draw
    pub fn validate(&self) -> Result<()> {
        if self.canvas_extent().is_none() {
            return Err(invalid_parameter(
                "tile_size",
                &self.config.tile_size,
                &format!(
                    "a {}x{} grid does not fit a canvas of at most {CANVAS_LIMIT} pixels",
                    self.cols, self.rows
                ),
            ));
        }
        Ok(())
    }

    /// Canvas `(width, height)` in pixels, saturated for grids that fail
    /// [`GridLayout::validate`]
    pub fn canvas_size(&self) -> (u32, u32) {
        let limit = i32::MAX.unsigned_abs();
        let clamp = |extent: u64| u32::try_from(extent).unwrap_or(limit);
        self.canvas_extent()
            .map_or((limit, limit), |(width, height)| (clamp(width), clamp(height)))
    }

    /// Canvas origin `[x, y]` of the cell holding tile `index`
    pub fn cell_origin(&self, index: usize) -> [i32; 2] {
        let col = (index % self.cols) as u64;
        let row = (index / self.cols) as u64;
        let margin = u64::from(self.config.margin);
        let pitch_x = u64::from(self.config.tile_size);
        let pitch_y = pitch_x + u64::from(self.config.row_spacing);
        [
            to_coordinate(margin.saturating_add(col.saturating_mul(pitch_x))),
            to_coordinate(margin.saturating_add(row.saturating_mul(pitch_y))),
        ]
    }

    /// Canvas position of tile `index`
    ///
    /// Tiles with a centroid are offset by it from the cell origin; others
    /// sit at the cell's geometric center. Coordinates saturate rather than
    /// wrap.
    pub fn position(&self, index: usize, record: &TileRecord) -> [i32; 2] {
        let [ox, oy] = self.cell_origin(index);
        let (dx, dy) = match record.centroid() {
            Some([cx, cy]) => (u64::from(cx), u64::from(cy)),
            None => {
                let half = u64::from(self.config.tile_size / 2);
                (half, half)
            }
        };
        [
            ox.saturating_add(to_coordinate(dx)),
            oy.saturating_add(to_coordinate(dy)),
        ]
    }

    /// Place every record in enumeration order
    pub fn place<'a>(&self, records: &'a [TileRecord]) -> Vec<PlacedTile<'a>> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| PlacedTile {
                record,
                position: self.position(index, record),
            })
            .collect()
    }
}
