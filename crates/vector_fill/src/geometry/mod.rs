pub mod map;
pub mod path;

pub use map::{Map, UndoStep};
pub use path::{PathProjection, VectorPath};

use geo_types::{Coord, Rect};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::{FillError, Result};

/// Closed classification of map geometry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash,
    Serialize, Deserialize,
    Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GeometryKind {
    Point,
    Line,
    Area,
    Combined,
}

impl GeometryKind {
    /// Whether objects of this kind carry a path that can be snapped to and
    /// whether a fill object may use this kind.
    pub fn is_path_like(self) -> bool {
        matches!(self, Self::Line | Self::Area | Self::Combined)
    }

    /// Whether the interior of a closed path of this kind is painted.
    pub fn fills_interior(self) -> bool {
        matches!(self, Self::Area | Self::Combined)
    }
}

/// Drawing style of a map object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    pub name: String,
    pub kind: GeometryKind,
    /// Stroke width for paths, diameter for points (map units).
    #[serde(default)]
    pub line_width: f64,
    #[serde(default)]
    pub hidden: bool,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: GeometryKind, line_width: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            line_width,
            hidden: false,
        }
    }

    /// Checks that new fill objects may be created with this symbol.
    pub fn check_fillable(&self) -> Result<()> {
        if !self.kind.is_path_like() {
            return Err(FillError::UnsupportedSymbol {
                name: self.name.clone(),
                kind: self.kind,
            });
        }
        if self.hidden {
            return Err(FillError::HiddenSymbol {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

/// Index of an object in the map's object collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub usize);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates", rename_all = "snake_case")]
pub enum ObjectGeometry {
    Point([f64; 2]),
    Path(VectorPath),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    pub symbol: Symbol,
    pub geometry: ObjectGeometry,
}

impl MapObject {
    pub fn point(symbol: Symbol, position: Coord<f64>) -> Self {
        Self {
            symbol,
            geometry: ObjectGeometry::Point([position.x, position.y]),
        }
    }

    pub fn path(symbol: Symbol, path: VectorPath) -> Self {
        Self {
            symbol,
            geometry: ObjectGeometry::Path(path),
        }
    }

    pub fn kind(&self) -> GeometryKind {
        self.symbol.kind
    }

    /// The object's path, if it is a path-like object.
    pub fn as_path(&self) -> Option<&VectorPath> {
        match &self.geometry {
            ObjectGeometry::Path(path) if self.kind().is_path_like() => Some(path),
            _ => None,
        }
    }

    /// Bounding box including half the stroke width.
    pub fn extent(&self) -> Option<Rect<f64>> {
        let half = self.symbol.line_width.max(0.0) / 2.0;
        let rect = match &self.geometry {
            ObjectGeometry::Point([x, y]) => Rect::new(Coord { x: *x, y: *y }, Coord { x: *x, y: *y }),
            ObjectGeometry::Path(path) => path.bounding_rect()?,
        };
        Some(Rect::new(
            Coord { x: rect.min().x - half, y: rect.min().y - half },
            Coord { x: rect.max().x + half, y: rect.max().y + half },
        ))
    }
}
