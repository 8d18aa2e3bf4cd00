use geo_types::{Coord, Rect};

use crate::{
    config::FillConfig,
    error::Result,
    geometry::{MapObject, ObjectId, VectorPath},
    raster::RasterizedRegion,
    types::PathSnap,
};

/// Renders a region of the scene into an occupancy buffer
pub trait Rasterizer {
    /// Rasterize `extent` at the resolution given by `config`
    fn rasterize(&self, extent: Rect<f64>, config: &FillConfig) -> Result<RasterizedRegion>;
}

/// Nearest-point queries against the scene's path objects
pub trait PathSnapper {
    /// Project a scene point onto the nearest path-like object
    fn snap_to_path(&self, point: Coord<f64>) -> Option<PathSnap>;

    /// The path of a path-like object
    fn path(&self, object: ObjectId) -> Option<&VectorPath>;
}

/// Mutations a fill performs on the scene once it has succeeded
pub trait SceneEditor {
    /// Bounding box of everything drawn in the scene
    fn extent(&self) -> Option<Rect<f64>>;

    /// Insert an object and return its index
    fn add_object(&mut self, object: MapObject) -> usize;

    /// Make the object at `index` the only selected one
    fn select_only(&mut self, index: usize);

    /// Register the creation of the object at `index` for undo
    fn record_creation(&mut self, index: usize);
}
