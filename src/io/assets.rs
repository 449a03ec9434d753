//! Discovery and ordering of tile images
//!
//! The order produced here defines tile adjacency on the map, so it must not
//! depend on the order the filesystem happens to list entries in.

use crate::io::configuration::RASTER_EXTENSIONS;
use crate::io::error::{MapError, Result, io_error};
use std::path::{Path, PathBuf};

/// Leading decimal digits of a file name, if any
pub fn numeric_prefix(name: &str) -> Option<u64> {
    let digits_end = name
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(name.len(), |(i, _)| i);
    name.get(..digits_end).and_then(|digits| digits.parse().ok())
}

/// Whether a path carries a recognized raster extension
pub fn is_raster_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            RASTER_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Sort paths by numeric file-name prefix
///
/// Paths without a prefix go last. The sort is stable, so ties keep their
/// incoming relative order.
pub fn order_by_prefix(paths: &mut [PathBuf]) {
    paths.sort_by_key(|path| {
        let prefix = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(numeric_prefix);
        (prefix.is_none(), prefix.unwrap_or(0))
    });
}

/// List tile images in a directory in map order
///
/// Entries are first ordered by file name so that the result is
/// deterministic, then stably sorted by numeric prefix.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be read
/// - No file with a recognized raster extension is present (`EmptyInputSet`)
pub fn enumerate_tiles(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| io_error(dir, "read directory", e))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| io_error(dir, "read directory entry", e))?
            .path();
        if path.is_file() && is_raster_image(&path) {
            paths.push(path);
        }
    }

    if paths.is_empty() {
        return Err(MapError::EmptyInputSet {
            path: dir.to_path_buf(),
        });
    }

    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    order_by_prefix(&mut paths);

    log::debug!("Found {} tile images in {}", paths.len(), dir.display());
    Ok(paths)
}
