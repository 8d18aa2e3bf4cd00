//! The fill operation: locate the boundary around a click and rebuild it
//! from the map's own paths.

use geo_types::Coord;
use tracing::{debug, info, warn};

use crate::{
    algorithms::{trace_boundary, PathReconstructor, SectionBuilder, SectionCleaner},
    config::FillConfig,
    error::{FillError, Result},
    geometry::{MapObject, Symbol, VectorPath},
    raster::{OccupancyGrid, PixelPos, PixelTransform, RasterizedRegion},
    traits::{PathSnapper, Rasterizer, SceneEditor},
    types::{Contour, FillOutcome, Section},
};

/// Closed path produced for a contour, with the sections it was built from.
#[derive(Debug, Clone)]
pub struct Outline {
    pub path: VectorPath,
    pub sections: Vec<Section>,
}

/// State of one fill operation.
///
/// Owns the occupancy grid for the lifetime of the operation; nothing in it
/// outlives a single click.
#[derive(Debug, Clone)]
pub struct FillSession {
    pub grid: OccupancyGrid,
    pub transform: PixelTransform,
}

impl FillSession {
    pub fn new(region: RasterizedRegion) -> Self {
        Self {
            grid: region.grid,
            transform: region.transform,
        }
    }

    pub fn from_grid(grid: OccupancyGrid, transform: PixelTransform) -> Self {
        Self { grid, transform }
    }

    /// Scans rightwards from `click` for the boundary that encloses it.
    ///
    /// Obstructions that do not surround the click are skipped over and the
    /// scan continues behind them.
    pub fn find_enclosing_contour(&self, click: PixelPos) -> Result<Contour> {
        if !self.grid.contains_strictly(click) {
            return Err(FillError::ClickOutsideBounds);
        }
        if self.grid.is_occupied(click) {
            return Err(FillError::ClickOnObstruction);
        }

        let width = self.grid.width() as i32;
        let mut probe = click + PixelPos::RIGHT;
        while probe.x < width {
            if !self.grid.is_occupied(probe) {
                probe = probe + PixelPos::RIGHT;
                continue;
            }

            match trace_boundary(&self.grid, probe - PixelPos::RIGHT, probe) {
                // The hole of a floating ring also encloses the probe, so the
                // click itself has to be inside too.
                Some(traced) if traced.encloses_start && traced.contour.contains(click) => {
                    debug!(x = probe.x, y = probe.y, len = traced.contour.len(), "found enclosing boundary");
                    return Ok(traced.contour);
                }
                Some(_) => debug!(x = probe.x, y = probe.y, "skipping floating obstruction"),
                None => debug!(x = probe.x, y = probe.y, "boundary is open"),
            }

            while probe.x < width && self.grid.is_occupied(probe) {
                probe = probe + PixelPos::RIGHT;
            }
        }
        Err(FillError::NoEnclosingBoundary)
    }

    /// Snaps `contour` onto the map's paths and assembles the fill outline.
    pub fn outline<S: PathSnapper + ?Sized>(
        &self,
        contour: &Contour,
        snapper: &S,
        config: &FillConfig,
    ) -> Result<Outline> {
        let sections = SectionBuilder::from_config(config).build(contour, &self.transform, snapper);
        let built = sections.len();
        let sections = SectionCleaner::new(self.transform.pixel_length(), config).clean(sections);
        debug!(built, cleaned = sections.len(), "sections");

        let path = PathReconstructor::new(config.widen_epsilon)
            .reconstruct(&sections, snapper)
            .ok_or(FillError::ReconstructionFailed)?;
        Ok(Outline { path, sections })
    }
}

/// Paint bucket for vector maps.
#[derive(Debug, Clone, Default)]
pub struct FillTool {
    config: FillConfig,
}

impl FillTool {
    pub fn new(config: FillConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FillConfig {
        &self.config
    }

    /// Fills the region around `click` with a new object of `symbol`.
    ///
    /// The scene is modified only when the whole operation succeeds.
    pub fn fill_at<S>(&self, scene: &mut S, symbol: &Symbol, click: Coord<f64>) -> Result<FillOutcome>
    where
        S: Rasterizer + PathSnapper + SceneEditor,
    {
        // Step 1: Validate the symbol and the area to rasterize
        symbol.check_fillable()?;
        let extent = scene.extent().ok_or(FillError::EmptyScene)?;
        let area = extent.width() * extent.height();
        if area > self.config.large_extent_area {
            warn!(area, "map area is large, filling may be slow");
        }

        // Step 2: Rasterize and find the enclosing boundary
        let session = FillSession::new(scene.rasterize(extent, &self.config)?);
        let contour = session.find_enclosing_contour(session.transform.scene_to_pixel(click))?;

        // Step 3: Rebuild the boundary from the map's paths
        let outline = session.outline(&contour, &*scene, &self.config)?;
        let section_count = outline.sections.len();

        // Step 4: Insert the result
        let object_index = scene.add_object(MapObject::path(symbol.clone(), outline.path));
        scene.select_only(object_index);
        scene.record_creation(object_index);

        info!(
            object_index,
            contour_len = contour.len(),
            section_count,
            symbol = %symbol.name,
            "created fill object"
        );
        Ok(FillOutcome {
            object_index,
            contour_len: contour.len(),
            section_count,
        })
    }
}
