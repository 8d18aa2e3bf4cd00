use serde::{Deserialize, Serialize};

use crate::geometry::ObjectId;
use crate::raster::PixelPos;

/// Closed, ordered sequence of obstructed pixels along one boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Contour {
    pub points: Vec<PixelPos>,
}

impl Contour {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Even-odd containment test, see [`crate::algorithms::point_in_contour`].
    pub fn contains(&self, pixel: PixelPos) -> bool {
        crate::algorithms::point_in_contour(&self.points, pixel)
    }
}

/// A scene point projected onto the nearest path object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSnap {
    pub object: ObjectId,
    /// Arc-length position on the object's path.
    pub clen: f64,
    /// Distance between the query point and the path.
    pub distance: f64,
}

/// Traversal direction of a section along its object's path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    Forward,
    Backward,
    Stationary,
}

/// A contiguous arc-length range on one path object.
///
/// `end < start` means the boundary was traversed against the path's
/// natural direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub object: ObjectId,
    pub start: f64,
    pub end: f64,
}

impl Section {
    pub fn at(object: ObjectId, clen: f64) -> Self {
        Self { object, start: clen, end: clen }
    }

    /// Signed arc-length covered by the section.
    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    /// Direction of travel; spans within `tolerance` count as stationary.
    pub fn heading(&self, tolerance: f64) -> Heading {
        let span = self.span();
        if span > tolerance {
            Heading::Forward
        } else if span < -tolerance {
            Heading::Backward
        } else {
            Heading::Stationary
        }
    }

    pub fn is_reversed(&self) -> bool {
        self.end < self.start
    }

    /// Lower and upper arc-length bounds.
    pub fn bounds(&self) -> (f64, f64) {
        (self.start.min(self.end), self.start.max(self.end))
    }
}

/// Result of a successful fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillOutcome {
    /// Index of the inserted fill object in the map.
    pub object_index: usize,
    /// Number of pixels on the traced boundary.
    pub contour_len: usize,
    /// Number of sections the outline was assembled from.
    pub section_count: usize,
}
