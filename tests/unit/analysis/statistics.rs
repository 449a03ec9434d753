//! Tests for grayscale conversion, intensity statistics and Otsu thresholding

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};
    use ndarray::Array2;
    use treasuremap::analysis::statistics::{
        grayscale, histogram, intensity_stats, masked_mean_color, mean_color, otsu_threshold,
    };

    // Tests BT.601 luma weights with rounding and [row, col] indexing
    // Verified by using equal channel weights
    #[test]
    fn test_grayscale_weights() {
        let image = RgbImage::from_fn(3, 2, |x, y| match (x, y) {
            (0, 0) => Rgb([255, 0, 0]),
            (1, 0) => Rgb([0, 255, 0]),
            (2, 0) => Rgb([0, 0, 255]),
            _ => Rgb([255, 255, 255]),
        });

        let gray = grayscale(&image);
        assert_eq!(gray.dim(), (2, 3));
        assert_eq!(gray.get((0, 0)), Some(&76));
        assert_eq!(gray.get((0, 1)), Some(&150));
        assert_eq!(gray.get((0, 2)), Some(&29));
        assert_eq!(gray.get((1, 2)), Some(&255));
    }

    // Tests population mean and standard deviation
    // Verified by dividing the variance by n - 1
    #[test]
    fn test_intensity_stats() {
        let gray = Array2::from_shape_vec((1, 4), vec![0u8, 0, 255, 255]).expect("shape");
        let stats = intensity_stats(&gray);

        assert!((stats.mean - 127.5).abs() < 1e-9);
        assert!((stats.std - 127.5).abs() < 1e-9);

        let flat = Array2::from_elem((4, 4), 90u8);
        let flat_stats = intensity_stats(&flat);
        assert!((flat_stats.mean - 90.0).abs() < 1e-9);
        assert!(flat_stats.std.abs() < 1e-9);
    }

    // Tests statistics of an empty image are zero
    // Verified by removing the empty guard
    #[test]
    fn test_intensity_stats_empty() {
        let gray = Array2::<u8>::zeros((0, 5));
        let stats = intensity_stats(&gray);

        assert!(stats.mean.abs() < f64::EPSILON);
        assert!(stats.std.abs() < f64::EPSILON);
    }

    // Tests histogram counts every pixel once
    // Verified by skipping the last bin
    #[test]
    fn test_histogram() {
        let gray = Array2::from_shape_vec((2, 2), vec![0u8, 255, 255, 7]).expect("shape");
        let bins = histogram(&gray);

        assert_eq!(bins.first(), Some(&1));
        assert_eq!(bins.get(7), Some(&1));
        assert_eq!(bins.get(255), Some(&2));
        assert_eq!(bins.iter().sum::<u64>(), 4);
    }

    // Tests Otsu splits a bimodal image at the first maximizing level
    // Verified by picking the last maximizing level
    #[test]
    fn test_otsu_bimodal() {
        let mut values = vec![10u8; 50];
        values.extend(vec![200u8; 50]);
        let gray = Array2::from_shape_vec((10, 10), values).expect("shape");

        assert_eq!(otsu_threshold(&gray), 10);
    }

    // Tests Otsu on a single-valued image
    // Verified by returning the image value
    #[test]
    fn test_otsu_uniform() {
        let gray = Array2::from_elem((8, 8), 128u8);
        assert_eq!(otsu_threshold(&gray), 0);
    }

    // Tests Otsu separates a minority dark class from a bright majority
    // Verified by comparing with >= when tracking the best variance
    #[test]
    fn test_otsu_unbalanced() {
        let mut values = vec![240u8; 90];
        values.extend(vec![30u8; 10]);
        let gray = Array2::from_shape_vec((10, 10), values).expect("shape");

        let level = otsu_threshold(&gray);
        assert!((30..240).contains(&level));
    }

    // Tests channel means are truncated
    // Verified by rounding channel means
    #[test]
    fn test_mean_color_truncates() {
        let image = RgbImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 1])
            }
        });

        assert_eq!(mean_color(&image), [127, 127, 0]);
    }

    // Tests masked mean uses only listed in-bounds pixels
    // Verified by averaging the whole image
    #[test]
    fn test_masked_mean_color() {
        let image = RgbImage::from_fn(4, 4, |x, _| {
            if x < 2 {
                Rgb([200, 10, 10])
            } else {
                Rgb([0, 0, 250])
            }
        });

        assert_eq!(
            masked_mean_color(&image, &[[0, 0], [1, 3], [9, 9]]),
            Some([200, 10, 10])
        );
        assert_eq!(masked_mean_color(&image, &[]), None);
        assert_eq!(masked_mean_color(&image, &[[4, 0]]), None);
    }
}
