use geo::{BoundingRect, Closest, ClosestPoint, EuclideanDistance};
use geo_types::{Coord, LineString, Point, Rect};
use serde::{Deserialize, Serialize};

/// Coordinates closer than this are treated as the same vertex when paths
/// are concatenated.
const JOIN_TOLERANCE: f64 = 1e-9;

/// Result of projecting a point onto a [`VectorPath`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathProjection {
    /// Arc-length position of the projected point.
    pub clen: f64,
    /// The projected point itself.
    pub point: Coord<f64>,
    /// Distance between the query point and its projection.
    pub distance: f64,
}

/// Single-part polyline parameterized by arc-length.
///
/// Curves are stored flattened; the cumulative length table is kept in sync
/// with the coordinates so that arc-length lookups stay logarithmic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<[f64; 2]>", into = "Vec<[f64; 2]>")]
pub struct VectorPath {
    line: LineString<f64>,
    cumulative: Vec<f64>,
}

impl VectorPath {
    pub fn new(coords: Vec<Coord<f64>>) -> Self {
        let mut path = Self {
            line: LineString::new(Vec::with_capacity(coords.len())),
            cumulative: Vec::with_capacity(coords.len()),
        };
        for coord in coords {
            path.push(coord);
        }
        path
    }

    pub fn from_points(points: &[[f64; 2]]) -> Self {
        Self::new(points.iter().map(|&[x, y]| Coord { x, y }).collect())
    }

    fn push(&mut self, coord: Coord<f64>) {
        let clen = match self.line.0.last() {
            Some(&last) => {
                self.length() + Point::from(last).euclidean_distance(&Point::from(coord))
            }
            None => 0.0,
        };
        self.line.0.push(coord);
        self.cumulative.push(clen);
    }

    pub fn coords(&self) -> &[Coord<f64>] {
        &self.line.0
    }

    pub fn line_string(&self) -> &LineString<f64> {
        &self.line
    }

    pub fn coordinate_count(&self) -> usize {
        self.line.0.len()
    }

    /// Total arc-length of the path.
    pub fn length(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    pub fn is_closed(&self) -> bool {
        match (self.line.0.first(), self.line.0.last()) {
            (Some(first), Some(last)) => self.line.0.len() > 2 && first == last,
            _ => false,
        }
    }

    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        self.line.bounding_rect()
    }

    /// Point at the given arc-length, clamped to the ends of the path.
    pub fn point_at(&self, clen: f64) -> Option<Coord<f64>> {
        let first = *self.line.0.first()?;
        if clen <= 0.0 {
            return Some(first);
        }
        if clen >= self.length() {
            return self.line.0.last().copied();
        }

        // First vertex strictly beyond clen; clen lies on the segment ending there.
        let end = self.cumulative.partition_point(|&c| c <= clen);
        let start = end - 1;
        let a = self.line.0[start];
        let b = self.line.0[end];
        let span = self.cumulative[end] - self.cumulative[start];
        if span <= 0.0 {
            return Some(a);
        }
        let t = (clen - self.cumulative[start]) / span;
        Some(Coord {
            x: a.x + (b.x - a.x) * t,
            y: a.y + (b.y - a.y) * t,
        })
    }

    /// Nearest point on the path to `point`.
    pub fn nearest(&self, point: Coord<f64>) -> Option<PathProjection> {
        let query = Point::from(point);

        if self.line.0.len() == 1 {
            let only = self.line.0[0];
            return Some(PathProjection {
                clen: 0.0,
                point: only,
                distance: query.euclidean_distance(&Point::from(only)),
            });
        }

        let mut best: Option<PathProjection> = None;
        for (i, segment) in self.line.lines().enumerate() {
            let projected = match segment.closest_point(&query) {
                Closest::Intersection(p) | Closest::SinglePoint(p) => p,
                Closest::Indeterminate => continue,
            };
            let distance = query.euclidean_distance(&projected);
            if best.is_some_and(|b| b.distance <= distance) {
                continue;
            }
            best = Some(PathProjection {
                clen: self.cumulative[i] + Point::from(segment.start).euclidean_distance(&projected),
                point: projected.0,
                distance,
            });
        }
        best
    }

    /// Copy of the range `[start, end]` of this path.
    ///
    /// The bounds are swapped if given in descending order and clamped to the
    /// path; the result keeps the path's natural direction.
    pub fn sub_path(&self, start: f64, end: f64) -> VectorPath {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let (Some(first), Some(last)) = (self.point_at(start), self.point_at(end)) else {
            return VectorPath::default();
        };

        let mut coords = vec![first];
        coords.extend(
            self.line
                .0
                .iter()
                .zip(&self.cumulative)
                .filter(|&(_, &c)| c > start && c < end)
                .map(|(&coord, _)| coord),
        );
        coords.push(last);
        coords.dedup();
        VectorPath::new(coords)
    }

    pub fn reversed(&self) -> VectorPath {
        VectorPath::new(self.line.0.iter().rev().copied().collect())
    }

    /// Appends `other` to the end of this path.
    ///
    /// A leading coordinate of `other` that coincides with the current end is
    /// dropped, so touching pieces join without a zero-length segment.
    pub fn connect(&mut self, other: &VectorPath) {
        let mut incoming = other.line.0.iter().copied().peekable();
        if let (Some(&last), Some(&next)) = (self.line.0.last(), incoming.peek()) {
            if Point::from(last).euclidean_distance(&Point::from(next)) <= JOIN_TOLERANCE {
                incoming.next();
            }
        }
        for coord in incoming {
            self.push(coord);
        }
    }

    /// Connects the end of the path back to its start.
    pub fn close(&mut self) {
        if self.line.0.len() < 2 || self.is_closed() {
            return;
        }
        if let Some(&first) = self.line.0.first() {
            self.push(first);
        }
    }
}

impl Default for VectorPath {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl From<Vec<[f64; 2]>> for VectorPath {
    fn from(points: Vec<[f64; 2]>) -> Self {
        Self::from_points(&points)
    }
}

impl From<VectorPath> for Vec<[f64; 2]> {
    fn from(path: VectorPath) -> Self {
        path.line.0.iter().map(|c| [c.x, c.y]).collect()
    }
}
