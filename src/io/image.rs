//! Image loading and export with directory creation

use crate::io::error::{MapError, Result, io_error};
use image::RgbImage;
use std::path::Path;

/// Decode an image file into 8-bit RGB
///
/// # Errors
///
/// Returns `ImageLoad` if the file cannot be opened or decoded
pub fn load_rgb(path: &Path) -> Result<RgbImage> {
    image::open(path)
        .map(|decoded| decoded.to_rgb8())
        .map_err(|e| MapError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Save an RGB image, creating parent directories as needed
///
/// The format follows the file extension.
///
/// # Errors
///
/// Returns an error if:
/// - The parent directory cannot be created
/// - The image cannot be encoded or written to the specified path
pub fn save_rgb(image: &RgbImage, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| io_error(parent, "create directory", e))?;
    }

    image
        .save(output_path)
        .map_err(|e| MapError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })
}
