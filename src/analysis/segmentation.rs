//! Foreground segmentation: smoothing, global thresholding and mask cleanup

use crate::analysis::statistics::otsu_threshold;
use crate::spatial::mask::BinaryMask;
use ndarray::Array2;

/// 5-tap binomial approximation of a Gaussian with sigma ~1.1
const GAUSSIAN_KERNEL: [u32; 5] = [1, 4, 6, 4, 1];
const GAUSSIAN_KERNEL_SUM: u32 = 16;

/// Reflect an index into `0..len` without repeating the edge sample
///
/// `-1` maps to `1` and `len` maps to `len - 2`.
fn reflect_101(index: isize, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let last = len as isize - 1;
    let mut i = index;
    while i < 0 || i > last {
        i = if i < 0 { -i } else { 2 * last - i };
    }
    i as usize
}

/// Separable 5x5 Gaussian blur with reflect-101 borders
///
/// Computed in integer arithmetic and rounded back to 8 bits.
pub fn gaussian_blur(gray: &Array2<u8>) -> Array2<u8> {
    let (rows, cols) = gray.dim();
    if rows == 0 || cols == 0 {
        return gray.clone();
    }

    let mut horizontal = Array2::<u32>::zeros((rows, cols));
    for row in 0..rows {
        for col in 0..cols {
            let mut acc = 0;
            for (tap, &weight) in GAUSSIAN_KERNEL.iter().enumerate() {
                let source = reflect_101(col as isize + tap as isize - 2, cols);
                acc += weight * u32::from(gray.get((row, source)).copied().unwrap_or(0));
            }
            if let Some(cell) = horizontal.get_mut((row, col)) {
                *cell = acc;
            }
        }
    }

    let scale = GAUSSIAN_KERNEL_SUM * GAUSSIAN_KERNEL_SUM;
    let mut blurred = Array2::<u8>::zeros((rows, cols));
    for row in 0..rows {
        for col in 0..cols {
            let mut acc = 0;
            for (tap, &weight) in GAUSSIAN_KERNEL.iter().enumerate() {
                let source = reflect_101(row as isize + tap as isize - 2, rows);
                acc += weight * horizontal.get((source, col)).copied().unwrap_or(0);
            }
            if let Some(cell) = blurred.get_mut((row, col)) {
                *cell = ((acc + scale / 2) / scale).min(255) as u8;
            }
        }
    }

    blurred
}

/// Pixels strictly brighter than `level` are on
pub fn binarize(gray: &Array2<u8>, level: u8) -> BinaryMask {
    let (rows, cols) = gray.dim();
    BinaryMask::from_fn(cols as u32, rows as u32, |x, y| {
        gray.get((y as usize, x as usize))
            .is_some_and(|&value| value > level)
    })
}

/// Blur, Otsu-threshold and orient the mask so the foreground is the minority
///
/// When more than half of the pixels end up on, the mask is inverted: a
/// mostly-light background would otherwise be labeled as foreground.
pub fn segment_foreground(gray: &Array2<u8>) -> BinaryMask {
    let blurred = gaussian_blur(gray);
    let level = otsu_threshold(&blurred);
    let mut mask = binarize(&blurred, level);
    if mask.on_fraction() > 0.5 {
        mask.invert();
    }
    mask
}

fn neighbourhood(mask: &BinaryMask, kernel_size: usize, want_all: bool) -> BinaryMask {
    let reach = (kernel_size / 2) as i64;
    BinaryMask::from_fn(mask.width(), mask.height(), |x, y| {
        let mut any = false;
        let mut all = true;
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let nx = i64::from(x) + dx;
                let ny = i64::from(y) + dy;
                // Samples outside the mask do not take part
                if nx < 0 || ny < 0 || nx >= i64::from(mask.width()) || ny >= i64::from(mask.height())
                {
                    continue;
                }
                if mask.get_signed(nx, ny) {
                    any = true;
                } else {
                    all = false;
                }
            }
        }
        if want_all { all } else { any }
    })
}

/// Erosion with a square structuring element
pub fn erode(mask: &BinaryMask, kernel_size: usize) -> BinaryMask {
    neighbourhood(mask, kernel_size, true)
}

/// Dilation with a square structuring element
pub fn dilate(mask: &BinaryMask, kernel_size: usize) -> BinaryMask {
    neighbourhood(mask, kernel_size, false)
}

/// Erosion followed by dilation; removes speckles smaller than the kernel
pub fn open(mask: &BinaryMask, kernel_size: usize) -> BinaryMask {
    dilate(&erode(mask, kernel_size), kernel_size)
}

/// Dilation followed by erosion; fills gaps smaller than the kernel
pub fn close(mask: &BinaryMask, kernel_size: usize) -> BinaryMask {
    erode(&dilate(mask, kernel_size), kernel_size)
}

/// Opening then closing, the cleanup applied before region extraction
pub fn clean_mask(mask: &BinaryMask, kernel_size: usize) -> BinaryMask {
    close(&open(mask, kernel_size), kernel_size)
}
