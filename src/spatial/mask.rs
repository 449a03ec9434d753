//! Bit-packed binary masks

use bitvec::bitvec;
use bitvec::vec::BitVec;
use std::fmt;

/// Fixed-size binary image used for segmentation masks
///
/// Pixels are stored row-major in a bit vector. Out-of-bounds reads return
/// `false`, so neighbourhood operations need no special casing at the edges.
#[derive(Clone, PartialEq, Eq)]
pub struct BinaryMask {
    bits: BitVec,
    width: u32,
    height: u32,
}

impl BinaryMask {
    /// Create a mask with every pixel off
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            bits: bitvec![0; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Create a mask from a per-pixel predicate over `(x, y)`
    pub fn from_fn(width: u32, height: u32, mut on: impl FnMut(u32, u32) -> bool) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if on(x, y) {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    /// Mask width in pixels
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Mask height in pixels
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of pixels
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True for a zero-sized mask
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    /// Test a pixel
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.index(x, y)
            .and_then(|i| self.bits.get(i).as_deref().copied())
            .unwrap_or(false)
    }

    /// Test a pixel given signed coordinates
    pub fn get_signed(&self, x: i64, y: i64) -> bool {
        match (u32::try_from(x), u32::try_from(y)) {
            (Ok(x), Ok(y)) => self.get(x, y),
            _ => false,
        }
    }

    /// Set a pixel; out-of-bounds writes are ignored
    pub fn set(&mut self, x: u32, y: u32, value: bool) {
        if let Some(i) = self.index(x, y) {
            self.bits.set(i, value);
        }
    }

    /// Number of pixels that are on
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    /// Fraction of pixels that are on
    pub fn on_fraction(&self) -> f64 {
        if self.bits.is_empty() {
            0.0
        } else {
            self.count_ones() as f64 / self.bits.len() as f64
        }
    }

    /// Flip every pixel in place
    pub fn invert(&mut self) {
        let bits = std::mem::take(&mut self.bits);
        self.bits = !bits;
    }

    /// Coordinates of every pixel that is on, in row-major order
    pub fn iter_ones(&self) -> impl Iterator<Item = [u32; 2]> + '_ {
        let width = self.width.max(1) as usize;
        self.bits
            .iter_ones()
            .map(move |i| [(i % width) as u32, (i / width) as u32])
    }
}

impl fmt::Debug for BinaryMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BinaryMask({}x{}, {} on)",
            self.width,
            self.height,
            self.count_ones()
        )
    }
}
