use geo_types::{Coord, Rect};
use image::{GrayImage, Luma};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;
use tracing::debug;

use super::{OccupancyGrid, PixelTransform, RasterizedRegion};
use crate::{
    config::FillConfig,
    error::{FillError, Result},
    geometry::{Map, MapObject, ObjectGeometry, VectorPath},
    traits::Rasterizer,
};

const INK: Luma<u8> = Luma([255u8]);

/// Strokes thinner than this many pixels are drawn as single-pixel lines.
const THIN_STROKE_PX: f64 = 1.5;

impl Rasterizer for Map {
    fn rasterize(&self, extent: Rect<f64>, config: &FillConfig) -> Result<RasterizedRegion> {
        let scale = config.pixels_per_unit;
        let margin = config.margin_px;
        let width = (extent.width() * scale).ceil() as u32 + 2 * margin + 1;
        let height = (extent.height() * scale).ceil() as u32 + 2 * margin + 1;
        if width as u64 * height as u64 > config.max_raster_pixels {
            return Err(FillError::RasterTooLarge { width, height });
        }

        let pad = margin as f64 / scale;
        let transform = PixelTransform::new(
            Coord { x: extent.min().x - pad, y: extent.min().y - pad },
            scale,
        );

        let mut mask = GrayImage::new(width, height);
        for object in self.objects().iter().filter(|o| !o.symbol.hidden) {
            draw_object(&mut mask, object, &transform);
        }
        debug!(width, height, "rasterized map");

        Ok(RasterizedRegion {
            grid: OccupancyGrid::from_mask(mask),
            transform,
        })
    }
}

fn draw_object(canvas: &mut GrayImage, object: &MapObject, transform: &PixelTransform) {
    let stroke_px = object.symbol.line_width.max(0.0) * transform.pixels_per_unit;
    match &object.geometry {
        ObjectGeometry::Point([x, y]) => {
            let center = transform.scene_to_pixel(Coord { x: *x, y: *y });
            let radius = (stroke_px / 2.0).round() as i32;
            draw_filled_circle_mut(canvas, (center.x, center.y), radius, INK);
        }
        ObjectGeometry::Path(path) => {
            if object.kind().fills_interior() {
                fill_ring(canvas, path, transform);
            }
            stroke(canvas, path, transform, stroke_px);
        }
    }
}

fn fill_ring(canvas: &mut GrayImage, path: &VectorPath, transform: &PixelTransform) {
    let mut ring: Vec<Point<i32>> = path
        .coords()
        .iter()
        .map(|&c| {
            let p = transform.scene_to_pixel(c);
            Point::new(p.x, p.y)
        })
        .collect();
    ring.dedup();
    while ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    // draw_polygon_mut rejects rings that repeat their first point.
    if ring.len() >= 3 {
        draw_polygon_mut(canvas, &ring, INK);
    }
}

fn stroke(canvas: &mut GrayImage, path: &VectorPath, transform: &PixelTransform, stroke_px: f64) {
    let points: Vec<Coord<f64>> = path
        .coords()
        .iter()
        .map(|&c| transform.scene_to_raster(c))
        .collect();

    if stroke_px <= THIN_STROKE_PX {
        if let [only] = points.as_slice() {
            draw_line_segment_mut(canvas, to_f32(*only), to_f32(*only), INK);
        }
        for pair in points.windows(2) {
            draw_line_segment_mut(canvas, to_f32(pair[0]), to_f32(pair[1]), INK);
        }
        return;
    }

    let half = stroke_px / 2.0;
    for pair in points.windows(2) {
        if let Some(quad) = segment_quad(pair[0], pair[1], half) {
            draw_polygon_mut(canvas, &quad, INK);
        }
    }
    let radius = half.round() as i32;
    for p in &points {
        draw_filled_circle_mut(canvas, (p.x.floor() as i32, p.y.floor() as i32), radius, INK);
    }
}

/// The rectangle covered by a wide stroke along one segment.
fn segment_quad(a: Coord<f64>, b: Coord<f64>, half: f64) -> Option<Vec<Point<i32>>> {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len = (dx * dx + dy * dy).sqrt();
    if len == 0.0 {
        return None;
    }
    let (nx, ny) = (-dy / len * half, dx / len * half);
    let corner = |c: Coord<f64>, s: f64| Point::new((c.x + s * nx).floor() as i32, (c.y + s * ny).floor() as i32);
    let mut quad = vec![corner(a, 1.0), corner(b, 1.0), corner(b, -1.0), corner(a, -1.0)];
    quad.dedup();
    if quad.len() < 3 || quad.first() == quad.last() {
        return None;
    }
    Some(quad)
}

fn to_f32(c: Coord<f64>) -> (f32, f32) {
    (c.x as f32, c.y as f32)
}
