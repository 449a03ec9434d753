//! Diagnostic overlays for classified tiles
//!
//! Overlays are a side channel: they are rendered from a finished
//! [`TileAnalysis`] and never feed back into classification.

use crate::analysis::classifier::TileAnalysis;
use crate::analysis::statistics::grayscale;
use crate::io::configuration::{
    OVERLAY_BAND_HEIGHT, OVERLAY_CENTROID_COLOR, OVERLAY_CENTROID_RADIUS,
    OVERLAY_CONTOUR_COLOR, OVERLAY_PREFIX,
};
use crate::io::error::Result;
use crate::io::image::save_rgb;
use crate::spatial::tiles::{BlankReason, TileOutcome};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};

/// Label band color identifying why a tile is blank
pub const fn band_color(reason: BlankReason) -> [u8; 3] {
    match reason {
        BlankReason::Flat => [255, 0, 0],
        BlankReason::NoContour => [255, 140, 0],
        BlankReason::SmallContour => [255, 0, 255],
        BlankReason::Unrecorded => [128, 128, 128],
    }
}

/// Overlay file path for a tile inside `overlay_dir`
pub fn overlay_path(overlay_dir: &Path, filename: &str) -> PathBuf {
    overlay_dir.join(format!("{OVERLAY_PREFIX}{filename}"))
}

fn draw_band(canvas: &mut RgbImage, color: [u8; 3]) {
    let (width, height) = canvas.dimensions();
    let band = OVERLAY_BAND_HEIGHT.min(height);
    if width == 0 || band == 0 {
        return;
    }
    draw_filled_rect_mut(canvas, Rect::at(0, 0).of_size(width, band), Rgb(color));
}

/// Render the overlay image for an analysed tile
///
/// Blank tiles are shown in grayscale under a band colored by their reason.
/// Found tiles keep their colors, get their region boundary traced and their
/// centroid marked, under a black band.
pub fn render_overlay(image: &RgbImage, analysis: &TileAnalysis) -> RgbImage {
    match &analysis.record.outcome {
        TileOutcome::Found { centroid, .. } => {
            let mut canvas = image.clone();
            if let Some(region) = &analysis.region {
                let color = Rgb(OVERLAY_CONTOUR_COLOR);
                for [x, y] in region.boundary() {
                    // Thickened inwards only
                    for (dx, dy) in [(0, 0), (1, 0), (0, 1), (-1, 0), (0, -1)] {
                        let px = x as i64 + dx;
                        let py = y as i64 + dy;
                        if px >= 0 && py >= 0 && region.contains([px as u32, py as u32]) {
                            paint(&mut canvas, px as u32, py as u32, color);
                        }
                    }
                }
            }
            draw_filled_circle_mut(
                &mut canvas,
                (centroid[0] as i32, centroid[1] as i32),
                OVERLAY_CENTROID_RADIUS as i32,
                Rgb(OVERLAY_CENTROID_COLOR),
            );
            draw_band(&mut canvas, [0, 0, 0]);
            canvas
        }
        TileOutcome::Blank { reason } => {
            let mut canvas = gray_copy(image);
            draw_band(&mut canvas, band_color(*reason));
            canvas
        }
        TileOutcome::Failed { .. } => gray_copy(image),
    }
}

fn paint(canvas: &mut RgbImage, x: u32, y: u32, color: Rgb<u8>) {
    if let Some(pixel) = canvas.get_pixel_mut_checked(x, y) {
        *pixel = color;
    }
}

fn gray_copy(image: &RgbImage) -> RgbImage {
    let gray = grayscale(image);
    let (width, height) = image.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let value = gray.get((y as usize, x as usize)).copied().unwrap_or(0);
        Rgb([value; 3])
    })
}

/// Render and save the overlay for an analysed tile
///
/// # Errors
///
/// Returns an error if the overlay directory or file cannot be written
pub fn export_overlay(
    image: &RgbImage,
    analysis: &TileAnalysis,
    overlay_dir: &Path,
) -> Result<PathBuf> {
    let path = overlay_path(overlay_dir, &analysis.record.filename);
    save_rgb(&render_overlay(image, analysis), &path)?;
    log::debug!(
        "{} {} -> {}",
        analysis.record.filename,
        analysis.record.outcome_label(),
        path.display()
    );
    Ok(path)
}
