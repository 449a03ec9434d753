//! Progress display for batch tile classification

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;

static TILE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] Tiles: [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Tracks classification progress over a batch of tiles
///
/// Each tile is reported when it starts and when it is done; the bar message
/// shows the tile being worked on and then its outcome.
pub struct ProgressManager {
    bar: Option<ProgressBar>,
    tile_count: usize,
    completed: usize,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a progress manager with no bar yet
    pub const fn new() -> Self {
        Self {
            bar: None,
            tile_count: 0,
            completed: 0,
        }
    }

    /// Set up the bar for a batch of `tile_count` tiles
    pub fn initialize(&mut self, tile_count: usize) {
        self.tile_count = tile_count;
        self.completed = 0;
        let bar = ProgressBar::new(tile_count as u64);
        bar.set_style(TILE_STYLE.clone());
        self.bar = Some(bar);
    }

    /// Show the tile about to be classified
    pub fn start_tile(&self, index: usize, path: &Path) {
        if let Some(ref bar) = self.bar {
            let name = path.file_name().unwrap_or_default().to_string_lossy();
            bar.set_message(format!("{}/{} {name}", index + 1, self.tile_count));
        }
    }

    /// Record a finished tile with its outcome label
    pub fn complete_tile(&mut self, label: &str) {
        self.completed += 1;
        if let Some(ref bar) = self.bar {
            bar.set_message(label.to_string());
            bar.inc(1);
        }
    }

    /// Number of tiles reported as finished
    pub const fn completed(&self) -> usize {
        self.completed
    }

    /// Clear the bar
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}
