use std::fs;
use std::path::Path;

use geo_types::{Coord, Rect};
use serde::{Deserialize, Serialize};

use super::{MapObject, ObjectId, Symbol, VectorPath};
use crate::{
    error::Result,
    traits::{PathSnapper, SceneEditor},
    types::PathSnap,
};

/// Reversible edit recorded on the map's undo stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoStep {
    /// Undoing a creation deletes the created objects again.
    DeleteObjects(Vec<usize>),
}

/// Vector map: a symbol palette and an ordered object collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Map {
    #[serde(default)]
    pub symbols: Vec<Symbol>,
    #[serde(default)]
    objects: Vec<MapObject>,
    #[serde(skip)]
    selection: Vec<usize>,
    #[serde(skip)]
    undo_steps: Vec<UndoStep>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Looks up a palette symbol by name.
    pub fn symbol(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.name == name)
    }

    pub fn objects(&self) -> &[MapObject] {
        &self.objects
    }

    pub fn object(&self, id: ObjectId) -> Option<&MapObject> {
        self.objects.get(id.0)
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Appends an object and returns its index.
    pub fn add_object(&mut self, object: MapObject) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    /// Bounding box of all visible objects.
    pub fn extent(&self) -> Option<Rect<f64>> {
        self.objects
            .iter()
            .filter(|o| !o.symbol.hidden)
            .filter_map(MapObject::extent)
            .reduce(|a, b| {
                Rect::new(
                    Coord { x: a.min().x.min(b.min().x), y: a.min().y.min(b.min().y) },
                    Coord { x: a.max().x.max(b.max().x), y: a.max().y.max(b.max().y) },
                )
            })
    }

    pub fn selection(&self) -> &[usize] {
        &self.selection
    }

    pub fn select_only(&mut self, index: usize) {
        self.selection.clear();
        self.selection.push(index);
    }

    pub fn record_creation(&mut self, index: usize) {
        self.undo_steps.push(UndoStep::DeleteObjects(vec![index]));
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_steps.is_empty()
    }

    /// Reverts the most recent recorded step.
    pub fn undo(&mut self) -> Option<UndoStep> {
        let step = self.undo_steps.pop()?;
        match &step {
            UndoStep::DeleteObjects(indices) => {
                let mut indices = indices.clone();
                indices.sort_unstable_by(|a, b| b.cmp(a));
                for index in indices {
                    if index < self.objects.len() {
                        self.objects.remove(index);
                        self.selection.retain(|&s| s != index);
                        for s in &mut self.selection {
                            if *s > index {
                                *s -= 1;
                            }
                        }
                    }
                }
            }
        }
        Some(step)
    }
}

impl PathSnapper for Map {
    fn snap_to_path(&self, point: Coord<f64>) -> Option<PathSnap> {
        self.objects
            .iter()
            .enumerate()
            .filter(|(_, o)| !o.symbol.hidden)
            .filter_map(|(i, o)| {
                let projection = o.as_path()?.nearest(point)?;
                Some(PathSnap {
                    object: ObjectId(i),
                    clen: projection.clen,
                    distance: projection.distance,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn path(&self, object: ObjectId) -> Option<&VectorPath> {
        self.object(object)?.as_path()
    }
}

impl SceneEditor for Map {
    fn extent(&self) -> Option<Rect<f64>> {
        Map::extent(self)
    }

    fn add_object(&mut self, object: MapObject) -> usize {
        Map::add_object(self, object)
    }

    fn select_only(&mut self, index: usize) {
        Map::select_only(self, index)
    }

    fn record_creation(&mut self, index: usize) {
        Map::record_creation(self, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::GeometryKind;

    fn fence() -> Symbol {
        Symbol::new("fence", GeometryKind::Line, 0.5)
    }

    #[test]
    fn test_snap_picks_nearest_path_object() {
        let mut map = Map::new();
        map.add_object(MapObject::path(fence(), VectorPath::from_points(&[[0.0, 0.0], [10.0, 0.0]])));
        map.add_object(MapObject::point(
            Symbol::new("boulder", GeometryKind::Point, 1.0),
            Coord { x: 4.0, y: 4.5 },
        ));
        map.add_object(MapObject::path(fence(), VectorPath::from_points(&[[0.0, 5.0], [10.0, 5.0]])));

        let snap = map.snap_to_path(Coord { x: 4.0, y: 4.0 }).expect("Should snap");
        assert_eq!(snap.object, ObjectId(2));
        assert!((snap.clen - 4.0).abs() < 1e-9);
        assert!((snap.distance - 1.0).abs() < 1e-9);
        assert!(map.path(ObjectId(1)).is_none(), "Point objects have no path");
    }

    #[test]
    fn test_snap_without_paths() {
        let mut map = Map::new();
        map.add_object(MapObject::point(
            Symbol::new("boulder", GeometryKind::Point, 1.0),
            Coord { x: 0.0, y: 0.0 },
        ));
        assert!(map.snap_to_path(Coord { x: 0.0, y: 0.0 }).is_none());
    }

    #[test]
    fn test_extent_includes_stroke() {
        let mut map = Map::new();
        assert!(map.extent().is_none());
        map.add_object(MapObject::path(fence(), VectorPath::from_points(&[[0.0, 0.0], [10.0, 4.0]])));
        let extent = map.extent().expect("Should have extent");
        assert_eq!(extent.min(), Coord { x: -0.25, y: -0.25 });
        assert_eq!(extent.max(), Coord { x: 10.25, y: 4.25 });
    }

    #[test]
    fn test_undo_removes_created_object() {
        let mut map = Map::new();
        map.add_object(MapObject::path(fence(), VectorPath::from_points(&[[0.0, 0.0], [1.0, 0.0]])));
        let index = map.add_object(MapObject::path(fence(), VectorPath::from_points(&[[0.0, 1.0], [1.0, 1.0]])));
        map.select_only(index);
        map.record_creation(index);

        assert_eq!(map.undo(), Some(UndoStep::DeleteObjects(vec![1])));
        assert_eq!(map.object_count(), 1);
        assert!(map.selection().is_empty());
        assert!(!map.can_undo());
        assert_eq!(map.undo(), None);
    }

    #[test]
    fn test_json_roundtrip_keeps_objects() {
        let mut map = Map::new();
        map.symbols.push(fence());
        map.add_object(MapObject::path(fence(), VectorPath::from_points(&[[0.0, 0.0], [2.0, 0.0]])));
        map.add_object(MapObject::point(
            Symbol::new("boulder", GeometryKind::Point, 1.0),
            Coord { x: 3.0, y: 3.0 },
        ));

        let json = map.to_json().expect("Should serialize");
        let parsed = Map::from_json(&json).expect("Should parse");
        assert_eq!(parsed.objects(), map.objects());
        assert_eq!(parsed.symbol("fence"), Some(&fence()));
    }
}
