//! # Vector Fill
//!
//! Paint bucket for vector maps. A click inside an enclosed empty region
//! produces a new closed path that follows the surrounding boundary, built
//! from pieces of the map's existing paths rather than from pixels.
//!
//! ## Pipeline
//!
//! - **Rasterize**: draw the map into a binary occupancy grid
//! - **Trace**: walk the obstruction found to the right of the click with a
//!   right-hand wall follower
//! - **Contain**: keep the first traced boundary that encloses the click
//! - **Sections**: snap boundary pixels onto paths and group them into
//!   arc-length ranges, then drop back-and-forth noise
//! - **Reconstruct**: concatenate the sub-paths and close the result
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vector_fill::{FillTool, Map};
//! use geo_types::Coord;
//!
//! let mut map = Map::from_json_file("map.json")?;
//! let symbol = map.symbol("meadow").cloned().expect("palette has a meadow symbol");
//!
//! let outcome = FillTool::default().fill_at(&mut map, &symbol, Coord { x: 20.0, y: 15.0 })?;
//! println!("created object {}", outcome.object_index);
//!
//! map.save_geojson("filled.geojson")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod config;
pub mod types;
pub mod traits;
pub mod geometry;
pub mod raster;
pub mod algorithms;
pub mod fill;
pub mod io;

pub use error::{FillError, Result};
pub use config::FillConfig;
pub use types::{Contour, FillOutcome, Heading, PathSnap, Section};
pub use traits::*;
pub use geometry::{GeometryKind, Map, MapObject, ObjectGeometry, ObjectId, Symbol, UndoStep, VectorPath};
pub use raster::{OccupancyGrid, PixelPos, PixelTransform, RasterizedRegion};
pub use algorithms::*;
pub use fill::{FillSession, FillTool, Outline};

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;
    use geo_types::{Coord, Polygon};

    fn fence() -> Symbol {
        Symbol::new("fence", GeometryKind::Line, 0.1)
    }

    fn meadow() -> Symbol {
        Symbol::new("meadow", GeometryKind::Area, 0.0)
    }

    fn click(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64) -> VectorPath {
        VectorPath::from_points(&[[x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]])
    }

    fn map_with(paths: Vec<VectorPath>) -> Map {
        let mut map = Map::new();
        map.symbols.extend([fence(), meadow()]);
        for path in paths {
            map.add_object(MapObject::path(fence(), path));
        }
        map
    }

    fn fill_path(map: &Map, outcome: &FillOutcome) -> VectorPath {
        map.object(ObjectId(outcome.object_index))
            .and_then(MapObject::as_path)
            .cloned()
            .expect("Fill object should be a path")
    }

    fn area(path: &VectorPath) -> f64 {
        Polygon::new(path.line_string().clone(), vec![]).unsigned_area()
    }

    fn assert_near_vertex(path: &VectorPath, corner: [f64; 2], tolerance: f64) {
        let nearest = path
            .coords()
            .iter()
            .map(|c| ((c.x - corner[0]).powi(2) + (c.y - corner[1]).powi(2)).sqrt())
            .fold(f64::INFINITY, f64::min);
        assert!(nearest <= tolerance, "No vertex within {tolerance} of {corner:?}, nearest {nearest}");
    }

    #[test]
    fn test_rectangle_round_trip() {
        let mut map = map_with(vec![rectangle(10.0, 10.0, 30.0, 20.0)]);
        let tool = FillTool::default();

        let outcome = tool.fill_at(&mut map, &meadow(), click(20.0, 15.0)).expect("Should fill");
        assert_eq!(outcome.object_index, 1);
        assert_eq!(outcome.section_count, 1, "A single loop gives a single section");
        assert!(outcome.contour_len > 0);

        let path = fill_path(&map, &outcome);
        assert!(path.is_closed());
        let tolerance = 0.25;
        for corner in [[10.0, 10.0], [30.0, 10.0], [30.0, 20.0], [10.0, 20.0]] {
            assert_near_vertex(&path, corner, tolerance);
        }
        assert!((area(&path) - 200.0).abs() < 2.0);
        assert_eq!(map.selection(), &[1]);
        assert!(map.can_undo());
    }

    #[test]
    fn test_rectangle_from_separate_sides() {
        // The left side runs against the direction of the trace.
        let mut map = map_with(vec![
            VectorPath::from_points(&[[10.0, 10.0], [30.0, 10.0]]),
            VectorPath::from_points(&[[30.0, 10.0], [30.0, 20.0]]),
            VectorPath::from_points(&[[30.0, 20.0], [10.0, 20.0]]),
            VectorPath::from_points(&[[10.0, 10.0], [10.0, 20.0]]),
        ]);

        let outcome = FillTool::default()
            .fill_at(&mut map, &meadow(), click(20.0, 15.0))
            .expect("Should fill");
        assert_eq!(outcome.section_count, 4, "One section per side");

        let path = fill_path(&map, &outcome);
        assert!(path.is_closed());
        assert!((area(&path) - 200.0).abs() < 4.0);
    }

    #[test]
    fn test_floating_object_between_click_and_wall_is_skipped() {
        let mut map = map_with(vec![
            rectangle(0.0, 0.0, 40.0, 20.0),
            rectangle(20.0, 8.0, 24.0, 12.0),
        ]);

        let outcome = FillTool::default()
            .fill_at(&mut map, &meadow(), click(10.0, 10.0))
            .expect("Should fill the outer ring");
        let path = fill_path(&map, &outcome);
        assert!((area(&path) - 800.0).abs() < 16.0);
    }

    #[test]
    fn test_divided_room_fills_one_side() {
        let mut map = map_with(vec![
            rectangle(0.0, 0.0, 40.0, 20.0),
            VectorPath::from_points(&[[20.0, 0.0], [20.0, 20.0]]),
        ]);

        let outcome = FillTool::default()
            .fill_at(&mut map, &meadow(), click(10.0, 10.0))
            .expect("Should fill the left room");
        let path = fill_path(&map, &outcome);
        let filled = area(&path);
        assert!((filled - 400.0).abs() < 20.0, "Left room only, got {filled}");
        assert!(path.coords().iter().all(|c| c.x <= 20.5));
    }

    #[test]
    fn test_ring_of_points_cannot_be_reconstructed() {
        let mut map = Map::new();
        let boulder = Symbol::new("boulder", GeometryKind::Point, 2.0);
        for i in 0..10 {
            let t = i as f64;
            for position in [click(t, 0.0), click(10.0, t), click(10.0 - t, 10.0), click(0.0, 10.0 - t)] {
                map.add_object(MapObject::point(boulder.clone(), position));
            }
        }
        let before = map.object_count();

        let result = FillTool::default().fill_at(&mut map, &meadow(), click(5.0, 5.0));
        assert!(matches!(result, Err(FillError::ReconstructionFailed)));
        assert_eq!(map.object_count(), before);
        assert!(map.selection().is_empty());
        assert!(!map.can_undo());
    }

    #[test]
    fn test_undo_removes_fill() {
        let mut map = map_with(vec![rectangle(10.0, 10.0, 30.0, 20.0)]);
        FillTool::default()
            .fill_at(&mut map, &meadow(), click(20.0, 15.0))
            .expect("Should fill");
        assert_eq!(map.object_count(), 2);

        assert_eq!(map.undo(), Some(UndoStep::DeleteObjects(vec![1])));
        assert_eq!(map.object_count(), 1);
        assert!(map.selection().is_empty());
    }

    #[test]
    fn test_symbol_is_validated_first() {
        let mut map = map_with(vec![rectangle(10.0, 10.0, 30.0, 20.0)]);
        let tool = FillTool::default();

        let point = Symbol::new("boulder", GeometryKind::Point, 1.0);
        assert!(matches!(
            tool.fill_at(&mut map, &point, click(20.0, 15.0)),
            Err(FillError::UnsupportedSymbol { kind: GeometryKind::Point, .. })
        ));

        let mut hidden = meadow();
        hidden.hidden = true;
        assert!(matches!(
            tool.fill_at(&mut map, &hidden, click(20.0, 15.0)),
            Err(FillError::HiddenSymbol { .. })
        ));
        assert_eq!(map.object_count(), 1);
    }

    #[test]
    fn test_click_failures() {
        let tool = FillTool::default();
        let mut empty = Map::new();
        assert!(matches!(
            tool.fill_at(&mut empty, &meadow(), click(0.0, 0.0)),
            Err(FillError::EmptyScene)
        ));

        let mut map = map_with(vec![rectangle(10.0, 10.0, 30.0, 20.0)]);
        assert!(matches!(
            tool.fill_at(&mut map, &meadow(), click(100.0, 100.0)),
            Err(FillError::ClickOutsideBounds)
        ));
        assert!(matches!(
            tool.fill_at(&mut map, &meadow(), click(20.0, 10.0)),
            Err(FillError::ClickOnObstruction)
        ));
        assert!(FillError::ClickOnObstruction.is_recoverable());
        assert_eq!(map.object_count(), 1);
    }

    #[test]
    fn test_open_lines_give_no_boundary() {
        let mut map = map_with(vec![
            VectorPath::from_points(&[[0.0, 0.0], [0.0, 20.0]]),
            VectorPath::from_points(&[[10.0, 0.0], [10.0, 20.0]]),
        ]);
        assert!(matches!(
            FillTool::default().fill_at(&mut map, &meadow(), click(5.0, 10.5)),
            Err(FillError::NoEnclosingBoundary)
        ));
        assert_eq!(map.object_count(), 2);
        assert!(!map.can_undo());
    }
}
