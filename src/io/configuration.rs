//! Pipeline constants and runtime configuration defaults

// Flatness test applied before any segmentation
/// Grayscale standard deviation below which a tile is considered textureless
pub const STD_THRESHOLD: f64 = 6.0;
/// Grayscale mean above which a tile is considered near-white
pub const BRIGHT_THRESHOLD: f64 = 245.0;

/// Smallest enclosed area (in pixels) accepted as a foreground region
pub const MIN_CONTOUR_AREA: u64 = 50;

/// Side length of the square structuring element used for mask cleanup
pub const MORPH_KERNEL_SIZE: usize = 3;

// Map layout
/// Per-tile pitch on the output canvas in pixels
pub const TILE_SIZE: u32 = 128;
/// Symmetric margin around the tile grid
pub const CANVAS_MARGIN: u32 = 40;
/// Extra vertical gap between grid rows
pub const ROW_SPACING: u32 = 20;
/// Upper bound on grid columns
pub const MAX_COLS: usize = 20;

// Map markers
/// Radius of tile markers
pub const MARKER_RADIUS: u32 = 8;
/// Width of connecting segments
pub const LINE_WIDTH: u32 = 4;
/// Stroke width of blank tile markers
pub const BLANK_STROKE_WIDTH: u32 = 2;
/// Color of blank tile markers
pub const BLANK_MARKER_COLOR: [u8; 3] = [120, 120, 120];
/// Outline color of found tile markers
pub const MARKER_OUTLINE_COLOR: [u8; 3] = [0, 0, 0];
/// Canvas background
pub const CANVAS_BACKGROUND: [u8; 3] = [255, 255, 255];

/// Substitute channel value for unreadable tiles and corrupt color cells
pub const NEUTRAL_GRAY: u8 = 128;

// Diagnostic overlays
/// Prefix added to overlay filenames
pub const OVERLAY_PREFIX: &str = "ov_";
/// Height of the label band drawn across the top of an overlay
pub const OVERLAY_BAND_HEIGHT: u32 = 6;
/// Radius of the centroid dot on overlays
pub const OVERLAY_CENTROID_RADIUS: u32 = 4;
/// Region boundary color on overlays
pub const OVERLAY_CONTOUR_COLOR: [u8; 3] = [0, 255, 0];
/// Centroid dot color on overlays
pub const OVERLAY_CENTROID_COLOR: [u8; 3] = [255, 0, 0];

// Input discovery
/// File extensions accepted as tile images (compared case-insensitively)
pub const RASTER_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

// Default paths
/// Directory holding the input tiles
pub const DEFAULT_ASSETS_DIR: &str = "assets";
/// Directory receiving diagnostic overlays
pub const DEFAULT_OVERLAY_DIR: &str = "debug_overlays";
/// Record table written by the analysis stage
pub const DEFAULT_RESULTS_CSV: &str = "tile_results.csv";
/// Composed map image
pub const DEFAULT_MAP_OUTPUT: &str = "treasure_map.png";

// Progress bar display settings
/// Width of progress bars in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;
