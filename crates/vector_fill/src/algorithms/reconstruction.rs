use tracing::warn;

use crate::{geometry::VectorPath, traits::PathSnapper, types::Section};

/// Assembles a closed path from cleaned sections.
#[derive(Debug, Clone, Default)]
pub struct PathReconstructor {
    /// Arc-length a section may overshoot its path's end and still be used.
    pub tolerance: f64,
}

impl PathReconstructor {
    pub fn new(tolerance: f64) -> Self {
        Self { tolerance }
    }

    /// Concatenates the sub-path of every section in order and closes the
    /// result.
    ///
    /// Sections whose object is gone or whose range lies outside the path are
    /// skipped. Returns `None` when fewer than two coordinates remain.
    pub fn reconstruct<S: PathSnapper + ?Sized>(
        &self,
        sections: &[Section],
        paths: &S,
    ) -> Option<VectorPath> {
        let mut result = VectorPath::default();

        for section in sections {
            let Some(path) = paths.path(section.object) else {
                warn!(object = section.object.0, "section refers to a missing path, skipping");
                continue;
            };
            let valid = 0.0..=path.length() + self.tolerance;
            if !valid.contains(&section.start) || !valid.contains(&section.end) {
                warn!(
                    object = section.object.0,
                    start = section.start,
                    end = section.end,
                    length = path.length(),
                    "section lies outside its path, skipping"
                );
                continue;
            }

            let piece = path.sub_path(section.start, section.end);
            if section.is_reversed() {
                result.connect(&piece.reversed());
            } else {
                result.connect(&piece);
            }
        }

        if result.coordinate_count() < 2 {
            return None;
        }
        result.close();
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Area;
    use geo_types::Polygon;

    use crate::geometry::{GeometryKind, Map, MapObject, ObjectId, Symbol};

    fn line(points: &[[f64; 2]]) -> MapObject {
        MapObject::path(Symbol::new("wall", GeometryKind::Line, 0.1), VectorPath::from_points(points))
    }

    fn section(object: usize, start: f64, end: f64) -> Section {
        Section { object: ObjectId(object), start, end }
    }

    /// A 10x10 square drawn as two L-shaped lines meeting at opposite corners.
    fn two_halves() -> Map {
        let mut map = Map::new();
        map.add_object(line(&[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0]]));
        map.add_object(line(&[[0.0, 0.0], [0.0, 10.0], [10.0, 10.0]]));
        map
    }

    #[test]
    fn test_single_section_is_closed() {
        let map = two_halves();
        let path = PathReconstructor::default()
            .reconstruct(&[section(0, 2.0, 8.0)], &map)
            .expect("Should reconstruct");
        assert_eq!(path.coords().len(), 3);
        assert!(path.is_closed());
    }

    #[test]
    fn test_reversed_section_is_flipped() {
        let map = two_halves();
        let path = PathReconstructor::default()
            .reconstruct(&[section(0, 0.0, 20.0), section(1, 20.0, 0.0)], &map)
            .expect("Should reconstruct");

        let expected: Vec<[f64; 2]> = vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]];
        let actual: Vec<[f64; 2]> = path.clone().into();
        assert_eq!(actual, expected);

        let area = Polygon::new(path.line_string().clone(), vec![]).unsigned_area();
        assert!((area - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_stale_sections_are_skipped() {
        let map = two_halves();
        let path = PathReconstructor::default()
            .reconstruct(
                &[section(0, 0.0, 50.0), section(0, 0.0, 20.0), section(99, 0.0, 1.0)],
                &map,
            )
            .expect("Should reconstruct from the valid section");
        assert_eq!(path.coords().len(), 4);
    }

    #[test]
    fn test_overshoot_within_tolerance_is_clamped() {
        let map = two_halves();
        let path = PathReconstructor::new(1e-4)
            .reconstruct(&[section(0, 19.0, 20.00005)], &map)
            .expect("Should reconstruct");
        assert_eq!(path.coords().last(), path.coords().first());
    }

    #[test]
    fn test_nothing_usable_fails() {
        let map = two_halves();
        let reconstructor = PathReconstructor::default();
        assert!(reconstructor.reconstruct(&[], &map).is_none());
        assert!(reconstructor.reconstruct(&[section(1, 30.0, 40.0)], &map).is_none());
    }
}
