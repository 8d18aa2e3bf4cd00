use thiserror::Error;

use crate::geometry::GeometryKind;

#[derive(Error, Debug)]
pub enum FillError {
    #[error("The clicked area is not bounded, cannot fill this area")]
    ClickOutsideBounds,

    #[error("The clicked position is not free, cannot use the fill tool there")]
    ClickOnObstruction,

    #[error("No boundary enclosing the clicked position was found")]
    NoEnclosingBoundary,

    #[error("Failed to create the fill object")]
    ReconstructionFailed,

    #[error("Symbol '{name}' of kind {kind} cannot be used for filling")]
    UnsupportedSymbol { name: String, kind: GeometryKind },

    #[error("Symbol '{name}' is hidden")]
    HiddenSymbol { name: String },

    #[error("The map contains no objects")]
    EmptyScene,

    #[error("Raster of {width}x{height} pixels exceeds the configured limit")]
    RasterTooLarge { width: u32, height: u32 },

    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),
}

impl FillError {
    /// Fill-level failures leave the map untouched and can be retried with
    /// another click or symbol.
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::Image(_) | Self::Serialization(_) | Self::Io(_) | Self::GeoJson(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FillError>;
