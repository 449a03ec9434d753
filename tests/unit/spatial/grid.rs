//! Tests for grid layout and canvas coordinate translation

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use treasuremap::io::configuration::{CANVAS_MARGIN, MAX_COLS, ROW_SPACING, TILE_SIZE};
    use treasuremap::spatial::grid::{GridLayout, LayoutConfig};
    use treasuremap::spatial::tiles::{BlankReason, TileOutcome, TileRecord};

    fn found(cx: u32, cy: u32) -> TileRecord {
        TileRecord {
            filename: format!("{cx}_{cy}.png"),
            outcome: TileOutcome::Found {
                centroid: [cx, cy],
                area: 100,
            },
            color: [0, 0, 0],
            mean_intensity: 200.0,
            std_intensity: 30.0,
        }
    }

    fn blank() -> TileRecord {
        TileRecord {
            filename: "blank.png".to_string(),
            outcome: TileOutcome::Blank {
                reason: BlankReason::Flat,
            },
            color: [255, 255, 255],
            mean_intensity: 255.0,
            std_intensity: 0.0,
        }
    }

    // Tests grid partition law over random tile counts
    // Verified by computing rows with truncating division
    #[test]
    fn test_grid_partition_law() {
        let mut rng = StdRng::seed_from_u64(0x7ea5);
        for _ in 0..200 {
            let count = rng.random_range(1..=500);
            let max_cols = rng.random_range(1..=40);
            let config = LayoutConfig {
                max_cols,
                ..LayoutConfig::default()
            };

            let layout = GridLayout::new(count, config).expect("layout for a positive count");

            assert_eq!(layout.cols(), count.min(max_cols));
            assert!(layout.cols() * layout.rows() >= count);
            assert!(layout.cols() * (layout.rows() - 1) < count);
        }
    }

    // Tests no layout exists for zero tiles
    // Verified by removing the empty check
    #[test]
    fn test_empty_layout() {
        assert!(GridLayout::new(0, LayoutConfig::default()).is_none());
    }

    // Tests canvas size for a partial second row
    // Verified by omitting the row spacing term
    #[test]
    fn test_canvas_size() {
        let layout = GridLayout::new(25, LayoutConfig::default()).expect("layout should exist");

        assert_eq!(layout.cols(), MAX_COLS);
        assert_eq!(layout.rows(), 2);
        assert_eq!(layout.count(), 25);

        let (width, height) = layout.canvas_size();
        assert_eq!(width, 2 * CANVAS_MARGIN + 20 * TILE_SIZE);
        assert_eq!(height, 2 * CANVAS_MARGIN + 2 * TILE_SIZE + ROW_SPACING);
    }

    // Tests single-row canvas has no row spacing
    // Verified by always adding one row gap
    #[test]
    fn test_single_row_canvas() {
        let layout = GridLayout::new(3, LayoutConfig::default()).expect("layout should exist");

        assert_eq!(layout.canvas_size(), (464, 208));
    }

    // Tests centroids are offset from their cell origin
    // Verified by ignoring the row pitch for the second row
    #[test]
    fn test_positions_follow_centroids() {
        let config = LayoutConfig {
            tile_size: 100,
            margin: 10,
            row_spacing: 5,
            max_cols: 2,
        };
        let layout = GridLayout::new(3, config).expect("layout should exist");
        let records = vec![found(1, 2), found(30, 40), found(50, 60)];

        let placed = layout.place(&records);
        assert_eq!(placed.len(), 3);
        assert_eq!(layout.cell_origin(2), [10, 115]);
        assert_eq!(placed.first().map(|p| p.position), Some([11, 12]));
        assert_eq!(placed.get(1).map(|p| p.position), Some([140, 50]));
        assert_eq!(placed.get(2).map(|p| p.position), Some([60, 175]));
    }

    // Tests tiles without a centroid land at the cell center
    // Verified by placing blank tiles at the cell origin
    #[test]
    fn test_blank_tiles_at_cell_center() {
        let layout = GridLayout::new(2, LayoutConfig::default()).expect("layout should exist");
        let records = vec![blank(), found(5, 5)];

        let placed = layout.place(&records);
        let half = (TILE_SIZE / 2) as i32;
        let margin = CANVAS_MARGIN as i32;

        assert!(placed.first().is_some_and(|p| p.is_blank()));
        assert_eq!(placed.first().map(|p| p.position), Some([margin + half, margin + half]));
        assert!(placed.get(1).is_some_and(|p| !p.is_blank()));
    }

    // Tests layout configuration validation
    // Verified by accepting a zero tile size
    #[test]
    fn test_layout_config_validation() {
        assert!(LayoutConfig::default().validate().is_ok());

        let zero_tile = LayoutConfig {
            tile_size: 0,
            ..LayoutConfig::default()
        };
        assert!(zero_tile.validate().is_err());

        let zero_cols = LayoutConfig {
            max_cols: 0,
            ..LayoutConfig::default()
        };
        assert!(zero_cols.validate().is_err());

        let huge_margin = LayoutConfig {
            margin: u32::MAX,
            ..LayoutConfig::default()
        };
        assert!(huge_margin.validate().is_err());
    }

    // Tests oversized grids are rejected instead of overflowing
    // Verified by computing the canvas width with unchecked arithmetic
    #[test]
    fn test_oversized_canvas() {
        let config = LayoutConfig {
            tile_size: 1 << 28,
            margin: 0,
            ..LayoutConfig::default()
        };
        assert!(config.validate().is_ok());

        let layout = GridLayout::new(20, config).expect("layout should exist");
        assert!(layout.validate().is_err());
        assert_eq!(layout.canvas_size(), (i32::MAX.unsigned_abs(), i32::MAX.unsigned_abs()));
        assert_eq!(layout.cell_origin(19), [i32::MAX, 0]);

        let single = GridLayout::new(1, config).expect("layout should exist");
        assert!(single.validate().is_ok());
        assert_eq!(single.canvas_size(), (1 << 28, 1 << 28));
    }

    // Tests the layout keeps its configuration
    // Verified by returning the default configuration
    #[test]
    fn test_layout_config_accessor() {
        let config = LayoutConfig {
            margin: 0,
            ..LayoutConfig::default()
        };
        let layout = GridLayout::new(1, config).expect("layout should exist");

        assert_eq!(layout.config(), &config);
        assert_eq!(layout.cell_origin(0), [0, 0]);
    }
}
