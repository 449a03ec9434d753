//! Intensity statistics and automatic thresholding over tile images

use crate::spatial::tiles::Rgb;
use image::RgbImage;
use ndarray::Array2;

/// Whole-tile grayscale statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityStats {
    /// Mean intensity
    pub mean: f64,
    /// Population standard deviation of intensity
    pub std: f64,
}

/// Convert an RGB image to 8-bit luma indexed `[row, col]`
///
/// Uses the ITU-R BT.601 weights with rounding, matching the usual
/// color-to-gray conversion of image processing toolkits.
pub fn grayscale(image: &RgbImage) -> Array2<u8> {
    let (width, height) = image.dimensions();
    let mut gray = Array2::zeros((height as usize, width as usize));
    for (x, y, pixel) in image.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let luma = 0.114f64.mul_add(
            f64::from(b),
            0.299f64.mul_add(f64::from(r), 0.587 * f64::from(g)),
        );
        if let Some(value) = gray.get_mut((y as usize, x as usize)) {
            *value = luma.round().clamp(0.0, 255.0) as u8;
        }
    }
    gray
}

/// Mean and population standard deviation of a grayscale image
pub fn intensity_stats(gray: &Array2<u8>) -> IntensityStats {
    let count = gray.len();
    if count == 0 {
        return IntensityStats { mean: 0.0, std: 0.0 };
    }

    let n = count as f64;
    let sum: f64 = gray.iter().map(|&v| f64::from(v)).sum();
    let mean = sum / n;
    let variance = gray
        .iter()
        .map(|&v| (f64::from(v) - mean).powi(2))
        .sum::<f64>()
        / n;

    IntensityStats {
        mean,
        std: variance.sqrt(),
    }
}

/// 256-bin intensity histogram
pub fn histogram(gray: &Array2<u8>) -> [u64; 256] {
    let mut bins = [0u64; 256];
    for &value in gray {
        if let Some(bin) = bins.get_mut(value as usize) {
            *bin += 1;
        }
    }
    bins
}

/// Otsu's threshold level
///
/// Returns the level `t` that maximizes the between-class variance of the
/// classes `<= t` and `> t`, which is equivalent to minimizing the combined
/// intra-class variance. The first maximum wins, and a single-valued image
/// yields 0.
pub fn otsu_threshold(gray: &Array2<u8>) -> u8 {
    let bins = histogram(gray);
    let total = gray.len() as f64;
    if total == 0.0 {
        return 0;
    }

    let sum_total: f64 = bins
        .iter()
        .enumerate()
        .map(|(value, &count)| value as f64 * count as f64)
        .sum();

    let mut sum_background = 0.0;
    let mut weight_background = 0.0;
    let mut best_variance = 0.0;
    let mut threshold = 0u8;

    for (value, &count) in bins.iter().enumerate() {
        weight_background += count as f64;
        if weight_background == 0.0 {
            continue;
        }

        let weight_foreground = total - weight_background;
        if weight_foreground == 0.0 {
            break;
        }

        sum_background += value as f64 * count as f64;

        let mean_background = sum_background / weight_background;
        let mean_foreground = (sum_total - sum_background) / weight_foreground;
        let variance =
            weight_background * weight_foreground * (mean_background - mean_foreground).powi(2);

        if variance > best_variance {
            best_variance = variance;
            threshold = value as u8;
        }
    }

    threshold
}

/// Mean color over the whole image, truncated per channel
pub fn mean_color(image: &RgbImage) -> Rgb {
    mean_of(image.pixels().map(|p| p.0)).unwrap_or([0, 0, 0])
}

/// Mean color over the given `[x, y]` pixels, truncated per channel
///
/// Returns `None` when no listed pixel lies inside the image.
pub fn masked_mean_color(image: &RgbImage, pixels: &[[u32; 2]]) -> Option<Rgb> {
    mean_of(
        pixels
            .iter()
            .filter_map(|&[x, y]| image.get_pixel_checked(x, y).map(|p| p.0)),
    )
}

fn mean_of(colors: impl Iterator<Item = Rgb>) -> Option<Rgb> {
    let mut sums = [0u64; 3];
    let mut count = 0u64;
    for color in colors {
        for (sum, channel) in sums.iter_mut().zip(color) {
            *sum += u64::from(channel);
        }
        count += 1;
    }

    (count > 0).then(|| sums.map(|sum| (sum / count) as u8))
}
