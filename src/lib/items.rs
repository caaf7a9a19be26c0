use serde_json::{Map, Value};
use std::slice;

/// A (longitude, latitude) pair in degrees.
pub type Coordinate = (f64, f64);

/// One polygon boundary, outer or hole. Closure and winding are the
/// source's business, vertices pass through untouched.
pub type Ring = Vec<Coordinate>;

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
    Unsupported,
}

impl Geometry {
    /// The polygons contributing rows: one for a Polygon, the
    /// constituents in index order for a MultiPolygon, none otherwise.
    pub fn polygons(&self) -> &[Vec<Ring>] {
        match self {
            Geometry::Polygon(rings) => slice::from_ref(rings),
            Geometry::MultiPolygon(polygons) => polygons,
            Geometry::Unsupported => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: String,
    pub properties: Map<String, Value>,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}
