use std::path::Path;

use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map as JsonMap, Number, Value as JsonValue};

use crate::{
    error::Result,
    geometry::{Map, MapObject, ObjectGeometry},
};

impl MapObject {
    /// GeoJSON geometry: closed paths become polygons, open paths line
    /// strings.
    pub fn to_geojson_geometry(&self) -> Geometry {
        let value = match &self.geometry {
            ObjectGeometry::Point([x, y]) => Value::Point(vec![*x, *y]),
            ObjectGeometry::Path(path) => {
                let coords: Vec<Vec<f64>> = path.coords().iter().map(|c| vec![c.x, c.y]).collect();
                if path.is_closed() {
                    Value::Polygon(vec![coords])
                } else {
                    Value::LineString(coords)
                }
            }
        };
        Geometry::new(value)
    }
}

impl Map {
    /// Export every object as a GeoJSON feature
    pub fn to_geojson(&self) -> Result<FeatureCollection> {
        let mut features = Vec::with_capacity(self.object_count());

        for (i, object) in self.objects().iter().enumerate() {
            let mut properties = JsonMap::new();
            properties.insert("index".to_string(), JsonValue::Number(Number::from(i)));
            properties.insert("symbol".to_string(), JsonValue::String(object.symbol.name.clone()));
            properties.insert("kind".to_string(), JsonValue::String(object.kind().to_string()));
            if object.symbol.hidden {
                properties.insert("hidden".to_string(), JsonValue::Bool(true));
            }

            features.push(Feature {
                bbox: None,
                geometry: Some(object.to_geojson_geometry()),
                id: Some(geojson::feature::Id::Number(Number::from(i))),
                properties: Some(properties),
                foreign_members: None,
            });
        }

        let mut foreign_members = JsonMap::new();
        foreign_members.insert("object_count".to_string(), JsonValue::Number(Number::from(features.len())));

        Ok(FeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(foreign_members),
        })
    }

    /// Export to GeoJSON and serialize to JSON string
    pub fn to_geojson_string(&self) -> Result<String> {
        let collection = self.to_geojson()?;
        Ok(serde_json::to_string_pretty(&collection)?)
    }

    /// Save GeoJSON to file
    pub fn save_geojson<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_geojson_string()?)?;
        Ok(())
    }
}
