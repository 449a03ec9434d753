//! Treasure map rendering
//!
//! Rendering happens in two steps. [`plan_marks`] walks the placed tiles in
//! enumeration order and produces the marks to draw; [`render_map`] rasterizes
//! them onto a white canvas. A blank tile breaks the path: the next found tile
//! starts a new chain instead of being joined to the previous one.

use crate::io::configuration::{
    BLANK_MARKER_COLOR, BLANK_STROKE_WIDTH, CANVAS_BACKGROUND, LINE_WIDTH, MARKER_OUTLINE_COLOR,
    MARKER_RADIUS,
};
use crate::io::error::{Result, invalid_parameter};
use crate::io::image::save_rgb;
use crate::spatial::grid::{GridLayout, PlacedTile};
use crate::spatial::tiles::Rgb;
use image::RgbImage;
use imageproc::drawing::{draw_filled_circle_mut, draw_hollow_circle_mut, draw_line_segment_mut};
use std::path::Path;

/// Marker geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
    /// Radius of every marker
    pub radius: u32,
    /// Width of connecting segments
    pub line_width: u32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            radius: MARKER_RADIUS,
            line_width: LINE_WIDTH,
        }
    }
}

impl MarkerStyle {
    /// Check the marker geometry
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if the radius or line width is zero
    pub fn validate(&self) -> Result<()> {
        if self.radius == 0 {
            return Err(invalid_parameter("marker_radius", &self.radius, &"must be positive"));
        }
        if self.line_width == 0 {
            return Err(invalid_parameter(
                "line_width",
                &self.line_width,
                &"must be positive",
            ));
        }
        Ok(())
    }
}

/// One drawing instruction on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapMark {
    /// Crossed circle for a tile without a found feature
    Blank {
        /// Canvas position
        at: [i32; 2],
    },
    /// Filled circle for a found feature
    Marker {
        /// Canvas position
        at: [i32; 2],
        /// Fill color
        color: Rgb,
    },
    /// Path segment between consecutive found features
    Segment {
        /// Start position (the earlier tile)
        from: [i32; 2],
        /// End position (the later tile)
        to: [i32; 2],
        /// Color of the earlier tile
        color: Rgb,
    },
}

/// Turn placed tiles into drawing instructions, in drawing order
pub fn plan_marks(tiles: &[PlacedTile<'_>]) -> Vec<MapMark> {
    let mut marks = Vec::with_capacity(tiles.len() * 2);
    let mut anchor: Option<([i32; 2], Rgb)> = None;

    for tile in tiles {
        if tile.is_blank() {
            marks.push(MapMark::Blank { at: tile.position });
            anchor = None;
            continue;
        }

        let color = tile.record.color;
        marks.push(MapMark::Marker {
            at: tile.position,
            color,
        });
        if let Some((from, anchor_color)) = anchor {
            marks.push(MapMark::Segment {
                from,
                to: tile.position,
                color: anchor_color,
            });
        }
        anchor = Some((tile.position, color));
    }

    marks
}

/// Segments of a plan as `(from, to)` pairs
pub fn segments(marks: &[MapMark]) -> Vec<([i32; 2], [i32; 2])> {
    marks
        .iter()
        .filter_map(|mark| match *mark {
            MapMark::Segment { from, to, .. } => Some((from, to)),
            _ => None,
        })
        .collect()
}

/// Draw a line `width` pixels wide as parallel one-pixel strokes
fn draw_thick_line(canvas: &mut RgbImage, from: [i32; 2], to: [i32; 2], width: u32, color: Rgb) {
    let (x0, y0) = (from[0] as f32, from[1] as f32);
    let (x1, y1) = (to[0] as f32, to[1] as f32);
    let length = (x1 - x0).hypot(y1 - y0);
    let (nx, ny) = if length > 0.0 {
        (-(y1 - y0) / length, (x1 - x0) / length)
    } else {
        (0.0, 0.0)
    };

    let half = (width as f32 - 1.0) / 2.0;
    for step in 0..width {
        let offset = step as f32 - half;
        draw_line_segment_mut(
            canvas,
            (offset.mul_add(nx, x0), offset.mul_add(ny, y0)),
            (offset.mul_add(nx, x1), offset.mul_add(ny, y1)),
            image::Rgb(color),
        );
    }
}

fn draw_mark(canvas: &mut RgbImage, mark: &MapMark, style: MarkerStyle) {
    let radius = style.radius as i32;
    match *mark {
        MapMark::Blank { at: [x, y] } => {
            let gray = image::Rgb(BLANK_MARKER_COLOR);
            for inset in 0..BLANK_STROKE_WIDTH as i32 {
                draw_hollow_circle_mut(canvas, (x, y), (radius - inset).max(0), gray);
            }
            draw_thick_line(
                canvas,
                [x - radius, y - radius],
                [x + radius, y + radius],
                BLANK_STROKE_WIDTH,
                BLANK_MARKER_COLOR,
            );
            draw_thick_line(
                canvas,
                [x - radius, y + radius],
                [x + radius, y - radius],
                BLANK_STROKE_WIDTH,
                BLANK_MARKER_COLOR,
            );
        }
        MapMark::Marker { at: [x, y], color } => {
            draw_filled_circle_mut(canvas, (x, y), radius, image::Rgb(color));
            draw_hollow_circle_mut(canvas, (x, y), radius, image::Rgb(MARKER_OUTLINE_COLOR));
        }
        MapMark::Segment { from, to, color } => {
            draw_thick_line(canvas, from, to, style.line_width, color);
        }
    }
}

/// Rasterize a plan onto a fresh canvas sized for the layout
pub fn render_map(layout: &GridLayout, marks: &[MapMark], style: MarkerStyle) -> RgbImage {
    let (width, height) = layout.canvas_size();
    let mut canvas = RgbImage::from_pixel(width, height, image::Rgb(CANVAS_BACKGROUND));
    for mark in marks {
        draw_mark(&mut canvas, mark, style);
    }
    canvas
}

/// Lay out, draw and save a treasure map
///
/// Returns the plan that was drawn.
///
/// # Errors
///
/// Returns an error if:
/// - There are no tiles to draw
/// - The marker style is invalid
/// - The image cannot be saved
pub fn export_map(
    tiles: &[PlacedTile<'_>],
    layout: &GridLayout,
    style: MarkerStyle,
    output_path: &Path,
) -> Result<Vec<MapMark>> {
    style.validate()?;
    if tiles.is_empty() {
        return Err(invalid_parameter("tiles", &0, &"nothing to draw"));
    }

    let marks = plan_marks(tiles);
    let canvas = render_map(layout, &marks, style);
    save_rgb(&canvas, output_path)?;

    let (width, height) = canvas.dimensions();
    log::info!(
        "Saved {width}x{height} treasure map with {} segments to {}",
        segments(&marks).len(),
        output_path.display()
    );
    Ok(marks)
}
