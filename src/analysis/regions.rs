//! External region extraction and moment computation on binary masks
//!
//! Regions are 8-connected components of the mask with their holes filled,
//! which is the pixel set enclosed by each component's outer boundary.
//! Components lying inside another component's hole are not external and are
//! skipped.

use crate::spatial::mask::BinaryMask;
use std::collections::VecDeque;

const NEIGHBOURS_8: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const NEIGHBOURS_4: [(i64, i64); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

/// Inclusive pixel bounds of a region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// Minimum `[x, y]`
    pub min: [u32; 2],
    /// Maximum `[x, y]`
    pub max: [u32; 2],
}

impl Bounds {
    const fn of(point: [u32; 2]) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    fn include(&mut self, [x, y]: [u32; 2]) {
        self.min = [self.min[0].min(x), self.min[1].min(y)];
        self.max = [self.max[0].max(x), self.max[1].max(y)];
    }

    /// Width in pixels
    pub const fn width(&self) -> u32 {
        self.max[0] - self.min[0] + 1
    }

    /// Height in pixels
    pub const fn height(&self) -> u32 {
        self.max[1] - self.min[1] + 1
    }
}

/// Raw image moments up to first order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moments {
    /// Zeroth moment (area)
    pub m00: f64,
    /// First moment along x
    pub m10: f64,
    /// First moment along y
    pub m01: f64,
}

impl Moments {
    /// Centroid `[x, y]` truncated to whole pixels, `None` for zero area
    pub fn centroid(&self) -> Option<[u32; 2]> {
        (self.m00 > 0.0).then(|| {
            [
                (self.m10 / self.m00).max(0.0) as u32,
                (self.m01 / self.m00).max(0.0) as u32,
            ]
        })
    }
}

/// A filled external region of a mask
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pixels: Vec<[u32; 2]>,
    bounds: Bounds,
}

impl Region {
    /// Build a region from its pixel set; `None` when empty
    ///
    /// Pixels are kept in row-major order.
    pub fn from_pixels(mut pixels: Vec<[u32; 2]>) -> Option<Self> {
        pixels.sort_unstable_by_key(|&[x, y]| (y, x));
        pixels.dedup();
        let (&first, rest) = pixels.split_first()?;
        let mut bounds = Bounds::of(first);
        for &point in rest {
            bounds.include(point);
        }
        Some(Self { pixels, bounds })
    }

    /// Every `[x, y]` pixel enclosed by the region's outer boundary
    pub fn pixels(&self) -> &[[u32; 2]] {
        &self.pixels
    }

    /// Whether `[x, y]` lies inside the region
    pub fn contains(&self, [x, y]: [u32; 2]) -> bool {
        self.pixels
            .binary_search_by_key(&(y, x), |&[px, py]| (py, px))
            .is_ok()
    }

    /// Enclosed area in pixels
    pub fn area(&self) -> u64 {
        self.pixels.len() as u64
    }

    /// Inclusive bounding box
    pub const fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Raw moments of the filled region
    pub fn moments(&self) -> Moments {
        self.pixels.iter().fold(
            Moments {
                m00: 0.0,
                m10: 0.0,
                m01: 0.0,
            },
            |m, &[x, y]| Moments {
                m00: m.m00 + 1.0,
                m10: m.m10 + f64::from(x),
                m01: m.m01 + f64::from(y),
            },
        )
    }

    /// Region pixels that touch a pixel outside the region (4-neighbourhood)
    pub fn boundary(&self) -> Vec<[u32; 2]> {
        let origin = self.bounds.min;
        let mut local = BinaryMask::new(self.bounds.width(), self.bounds.height());
        for &[x, y] in &self.pixels {
            local.set(x - origin[0], y - origin[1], true);
        }

        self.pixels
            .iter()
            .copied()
            .filter(|&[x, y]| {
                let lx = i64::from(x - origin[0]);
                let ly = i64::from(y - origin[1]);
                NEIGHBOURS_4
                    .iter()
                    .any(|&(dx, dy)| !local.get_signed(lx + dx, ly + dy))
            })
            .collect()
    }
}

/// Extract all external regions of a mask in raster-scan order
pub fn external_regions(mask: &BinaryMask) -> Vec<Region> {
    let mut visited = BinaryMask::new(mask.width(), mask.height());
    let mut enclosed = BinaryMask::new(mask.width(), mask.height());
    let mut regions = Vec::new();

    for y in 0..mask.height() {
        for x in 0..mask.width() {
            if !mask.get(x, y) || visited.get(x, y) {
                continue;
            }

            let component = trace_component(mask, &mut visited, [x, y]);

            // Raster order reaches an enclosing component first
            if enclosed.get(x, y) {
                continue;
            }

            let filled = fill_holes(&component);
            for &[fx, fy] in &filled {
                enclosed.set(fx, fy, true);
            }
            if let Some(region) = Region::from_pixels(filled) {
                regions.push(region);
            }
        }
    }

    regions
}

/// Pick the region with the greatest area; the earliest wins ties
pub fn largest_region(regions: Vec<Region>) -> Option<Region> {
    let mut best: Option<Region> = None;
    for region in regions {
        let replace = best
            .as_ref()
            .is_none_or(|current| region.area() > current.area());
        if replace {
            best = Some(region);
        }
    }
    best
}

fn trace_component(mask: &BinaryMask, visited: &mut BinaryMask, start: [u32; 2]) -> Vec<[u32; 2]> {
    let mut component = Vec::new();
    let mut queue = VecDeque::new();
    visited.set(start[0], start[1], true);
    queue.push_back(start);

    while let Some([x, y]) = queue.pop_front() {
        component.push([x, y]);
        for &(dx, dy) in &NEIGHBOURS_8 {
            let nx = i64::from(x) + dx;
            let ny = i64::from(y) + dy;
            if mask.get_signed(nx, ny) && !visited.get_signed(nx, ny) {
                let next = [nx as u32, ny as u32];
                visited.set(next[0], next[1], true);
                queue.push_back(next);
            }
        }
    }

    component
}

/// Add every pixel enclosed by the component to it
///
/// Works in a local frame padded by one pixel on each side: background
/// reachable from the padding (4-connected) is outside, everything else is
/// inside.
fn fill_holes(component: &[[u32; 2]]) -> Vec<[u32; 2]> {
    let Some(&first) = component.first() else {
        return Vec::new();
    };
    let mut bounds = Bounds::of(first);
    for &point in component {
        bounds.include(point);
    }

    let width = bounds.width() + 2;
    let height = bounds.height() + 2;
    let to_local = |[x, y]: [u32; 2]| [x - bounds.min[0] + 1, y - bounds.min[1] + 1];

    let mut body = BinaryMask::new(width, height);
    for &point in component {
        let [lx, ly] = to_local(point);
        body.set(lx, ly, true);
    }

    let mut outside = BinaryMask::new(width, height);
    let mut queue = VecDeque::new();
    outside.set(0, 0, true);
    queue.push_back([0u32, 0u32]);
    while let Some([x, y]) = queue.pop_front() {
        for &(dx, dy) in &NEIGHBOURS_4 {
            let nx = i64::from(x) + dx;
            let ny = i64::from(y) + dy;
            if nx < 0 || ny < 0 || nx >= i64::from(width) || ny >= i64::from(height) {
                continue;
            }
            if !body.get_signed(nx, ny) && !outside.get_signed(nx, ny) {
                outside.set(nx as u32, ny as u32, true);
                queue.push_back([nx as u32, ny as u32]);
            }
        }
    }

    let mut filled = Vec::with_capacity(component.len());
    for ly in 1..height - 1 {
        for lx in 1..width - 1 {
            if !outside.get(lx, ly) {
                filled.push([lx - 1 + bounds.min[0], ly - 1 + bounds.min[1]]);
            }
        }
    }
    filled
}
