//! Occupancy buffers and the transform between map and pixel space.

pub mod rasterizer;

use std::ops::{Add, Neg, Sub};
use std::path::Path;

use geo_types::Coord;
use image::{GrayImage, Luma, RgbaImage};

use crate::error::Result;

const OCCUPIED: Luma<u8> = Luma([255u8]);
const FREE: Luma<u8> = Luma([0u8]);

/// Integer pixel coordinate; y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelPos {
    pub x: i32,
    pub y: i32,
}

impl PixelPos {
    pub const RIGHT: PixelPos = PixelPos { x: 1, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Rotates by 90 degrees, `(x, y) -> (y, -x)`.
    ///
    /// Applied to a heading this yields the right-hand side of travel.
    pub const fn rotate_right(self) -> Self {
        Self { x: self.y, y: -self.x }
    }

    /// Whether two pixels touch by an edge or a corner (or coincide).
    pub fn is_adjacent(self, other: PixelPos) -> bool {
        (self.x - other.x).abs() <= 1 && (self.y - other.y).abs() <= 1
    }
}

impl Add for PixelPos {
    type Output = PixelPos;
    fn add(self, rhs: PixelPos) -> PixelPos {
        PixelPos::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for PixelPos {
    type Output = PixelPos;
    fn sub(self, rhs: PixelPos) -> PixelPos {
        PixelPos::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for PixelPos {
    type Output = PixelPos;
    fn neg(self) -> PixelPos {
        PixelPos::new(-self.x, -self.y)
    }
}

/// Binary raster: a pixel is occupied when anything was drawn on it.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyGrid {
    mask: GrayImage,
}

impl OccupancyGrid {
    /// A grid with every pixel free.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            mask: GrayImage::new(width, height),
        }
    }

    /// Wraps a mask; any non-zero value counts as occupied.
    pub fn from_mask(mask: GrayImage) -> Self {
        Self { mask }
    }

    /// Occupancy from an RGBA rendering: covered where alpha > 0.
    pub fn from_alpha(image: &RgbaImage) -> Self {
        let mask = GrayImage::from_fn(image.width(), image.height(), |x, y| {
            if image.get_pixel(x, y)[3] > 0 { OCCUPIED } else { FREE }
        });
        Self { mask }
    }

    /// Parses rows of text where `#` marks an occupied pixel.
    ///
    /// Shorter rows are padded with free pixels.
    pub fn from_rows(rows: &[&str]) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;
        let mut grid = Self::new(width, rows.len() as u32);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c == '#' {
                    grid.set_occupied(PixelPos::new(x as i32, y as i32), true);
                }
            }
        }
        grid
    }

    pub fn width(&self) -> u32 {
        self.mask.width()
    }

    pub fn height(&self) -> u32 {
        self.mask.height()
    }

    pub fn contains(&self, p: PixelPos) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as i64) < self.width() as i64 && (p.y as i64) < self.height() as i64
    }

    /// Like [`contains`](Self::contains) but excludes the outermost ring of
    /// pixels.
    pub fn contains_strictly(&self, p: PixelPos) -> bool {
        p.x > 0
            && p.y > 0
            && (p.x as i64) < self.width() as i64 - 1
            && (p.y as i64) < self.height() as i64 - 1
    }

    /// Pixels outside the grid are reported as free.
    pub fn is_occupied(&self, p: PixelPos) -> bool {
        self.contains(p) && self.mask.get_pixel(p.x as u32, p.y as u32)[0] > 0
    }

    pub fn set_occupied(&mut self, p: PixelPos, occupied: bool) {
        if self.contains(p) {
            self.mask
                .put_pixel(p.x as u32, p.y as u32, if occupied { OCCUPIED } else { FREE });
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.mask.pixels().filter(|p| p[0] > 0).count()
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.mask
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.mask.save(path)?;
        Ok(())
    }
}

/// Axis-aligned scaling between map coordinates and pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelTransform {
    /// Map position of the top-left corner of pixel (0, 0).
    pub origin: Coord<f64>,
    pub pixels_per_unit: f64,
}

impl PixelTransform {
    pub fn new(origin: Coord<f64>, pixels_per_unit: f64) -> Self {
        Self { origin, pixels_per_unit }
    }

    /// Continuous pixel-space position of a map coordinate.
    pub fn scene_to_raster(&self, c: Coord<f64>) -> Coord<f64> {
        Coord {
            x: (c.x - self.origin.x) * self.pixels_per_unit,
            y: (c.y - self.origin.y) * self.pixels_per_unit,
        }
    }

    /// The pixel covering a map coordinate.
    pub fn scene_to_pixel(&self, c: Coord<f64>) -> PixelPos {
        let r = self.scene_to_raster(c);
        PixelPos::new(r.x.floor() as i32, r.y.floor() as i32)
    }

    /// Map position of a pixel's centre.
    pub fn pixel_to_scene(&self, p: PixelPos) -> Coord<f64> {
        Coord {
            x: self.origin.x + (p.x as f64 + 0.5) / self.pixels_per_unit,
            y: self.origin.y + (p.y as f64 + 0.5) / self.pixels_per_unit,
        }
    }

    /// Map-space length of one pixel step.
    pub fn pixel_length(&self) -> f64 {
        let a = self.pixel_to_scene(PixelPos::new(0, 0));
        let b = self.pixel_to_scene(PixelPos::new(1, 0));
        (a.x - b.x).abs() + (a.y - b.y).abs()
    }
}

/// Output of a [`Rasterizer`](crate::traits::Rasterizer).
#[derive(Debug, Clone)]
pub struct RasterizedRegion {
    pub grid: OccupancyGrid,
    pub transform: PixelTransform,
}
