//! Tests for map planning, rasterization and export

#[cfg(test)]
mod tests {
    use image::Rgb;
    use tempfile::TempDir;
    use treasuremap::io::configuration::{BLANK_MARKER_COLOR, CANVAS_BACKGROUND};
    use treasuremap::io::visualization::{
        MapMark, MarkerStyle, export_map, plan_marks, render_map, segments,
    };
    use treasuremap::spatial::grid::{GridLayout, LayoutConfig, PlacedTile};
    use treasuremap::spatial::tiles::{BlankReason, TileOutcome, TileRecord};

    fn found(color: [u8; 3]) -> TileRecord {
        TileRecord {
            filename: "f.png".to_string(),
            outcome: TileOutcome::Found {
                centroid: [64, 64],
                area: 400,
            },
            color,
            mean_intensity: 180.0,
            std_intensity: 50.0,
        }
    }

    fn blank() -> TileRecord {
        TileRecord {
            filename: "b.png".to_string(),
            outcome: TileOutcome::Blank {
                reason: BlankReason::Flat,
            },
            color: [255, 255, 255],
            mean_intensity: 255.0,
            std_intensity: 0.0,
        }
    }

    fn placed(records: &[TileRecord]) -> Vec<PlacedTile<'_>> {
        records
            .iter()
            .enumerate()
            .map(|(i, record)| PlacedTile {
                record,
                position: [i as i32 * 100, 0],
            })
            .collect()
    }

    // Tests consecutive found tiles are joined in order with the earlier color
    // Verified by coloring segments with the later tile
    #[test]
    fn test_plan_joins_consecutive_tiles() {
        let records = vec![found([255, 0, 0]), found([0, 255, 0]), found([0, 0, 255])];
        let marks = plan_marks(&placed(&records));

        assert_eq!(marks.len(), 5);
        assert_eq!(segments(&marks), vec![([0, 0], [100, 0]), ([100, 0], [200, 0])]);
        assert!(marks.contains(&MapMark::Segment {
            from: [0, 0],
            to: [100, 0],
            color: [255, 0, 0],
        }));
    }

    // Tests a blank tile breaks the path on both sides
    // Verified by keeping the anchor across blank tiles
    #[test]
    fn test_blank_breaks_path() {
        let records = vec![
            found([1, 1, 1]),
            blank(),
            found([2, 2, 2]),
            found([3, 3, 3]),
        ];
        let marks = plan_marks(&placed(&records));

        assert_eq!(segments(&marks), vec![([200, 0], [300, 0])]);
        assert_eq!(marks.get(1), Some(&MapMark::Blank { at: [100, 0] }));
    }

    // Tests the path connectivity law over random blank patterns
    // Verified by joining across a single blank tile
    #[test]
    fn test_connectivity_law() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(0x3a9);
        for _ in 0..100 {
            let count = rng.random_range(1..30);
            let records: Vec<TileRecord> = (0..count)
                .map(|_| if rng.random_bool(0.3) { blank() } else { found([9, 9, 9]) })
                .collect();
            let tiles = placed(&records);
            let joined = segments(&plan_marks(&tiles));

            let expected: Vec<([i32; 2], [i32; 2])> = tiles
                .windows(2)
                .filter_map(|pair| match pair {
                    [a, b] if !a.is_blank() && !b.is_blank() => Some((a.position, b.position)),
                    _ => None,
                })
                .collect();
            assert_eq!(joined, expected);
        }
    }

    // Tests markers are filled with the record color and blanks are gray
    // Verified by drawing blank markers in the background color
    #[test]
    fn test_render_markers() {
        let records = vec![blank(), found([200, 30, 30])];
        let layout = GridLayout::new(records.len(), LayoutConfig::default()).expect("layout");
        let tiles = layout.place(&records);
        let style = MarkerStyle::default();

        let canvas = render_map(&layout, &plan_marks(&tiles), style);
        assert_eq!(canvas.dimensions(), layout.canvas_size());

        let [bx, by] = tiles.first().map(|t| t.position).expect("blank tile");
        let ring_x = (bx + style.radius as i32) as u32;
        assert_eq!(canvas.get_pixel(ring_x, by as u32), &Rgb(BLANK_MARKER_COLOR));

        let [fx, fy] = tiles.get(1).map(|t| t.position).expect("found tile");
        assert_eq!(canvas.get_pixel(fx as u32, fy as u32), &Rgb([200, 30, 30]));
        assert_eq!(canvas.get_pixel(0, 0), &Rgb(CANVAS_BACKGROUND));
    }

    // Tests segments are drawn at least the configured width
    // Verified by drawing a single one-pixel stroke
    #[test]
    fn test_segment_width() {
        let records = vec![found([0, 0, 255]), found([0, 0, 255])];
        let layout = GridLayout::new(records.len(), LayoutConfig::default()).expect("layout");
        let tiles = layout.place(&records);
        let style = MarkerStyle {
            radius: 2,
            line_width: 4,
        };

        let canvas = render_map(&layout, &plan_marks(&tiles), style);
        let [x0, y] = tiles.first().map(|t| t.position).expect("tile");
        let mid_x = (x0 + 64) as u32;
        let painted = (y - 4..=y + 4)
            .filter(|&row| canvas.get_pixel(mid_x, row as u32) == &Rgb([0, 0, 255]))
            .count();
        assert!(painted >= 4, "painted {painted} rows");
    }

    // Tests export writes the map and validates inputs
    // Verified by skipping style validation
    #[test]
    fn test_export_map() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("maps/map.png");
        let records = vec![found([5, 5, 5])];
        let layout = GridLayout::new(1, LayoutConfig::default()).expect("layout");
        let tiles = layout.place(&records);

        let marks = export_map(&tiles, &layout, MarkerStyle::default(), &path).expect("export");
        assert_eq!(marks.len(), 1);
        assert!(path.exists());

        let bad_style = MarkerStyle {
            radius: 0,
            line_width: 4,
        };
        assert!(export_map(&tiles, &layout, bad_style, &path).is_err());
        assert!(export_map(&[], &layout, MarkerStyle::default(), &path).is_err());
    }
}
