use super::items;
use serde::{Deserialize, Serialize};
use serde_json::{to_string, Map, Value};
use std::error::Error;
use std::io::{Read, Write};

/// Polygonal GeoJSON geometries. Everything else lands on the
/// `Unsupported` variant so a collection with stray points or lines
/// still parses.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon {
        coordinates: Vec<Vec<Vec<f64>>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Vec<f64>>>>,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum Entity {
    Feature {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<Value>,
        #[serde(default)]
        properties: Option<Map<String, Value>>,
        #[serde(default)]
        geometry: Option<Geometry>,
    },
    FeatureCollection {
        features: Vec<Entity>,
    },
}

/// Read a GeoJSON FeatureCollection. Anything else at the top level is
/// an error; features inside keep their id, properties and geometry.
/// Positions use their first two members, so an altitude is read and
/// dropped; fewer than two members is an error.
pub fn from_reader(reader: impl Read) -> Result<items::FeatureCollection, Box<dyn Error>> {
    let entity: Entity = serde_json::from_reader(reader)?;
    let features = match entity {
        Entity::FeatureCollection { features } => features,
        Entity::Feature { .. } => return Err("expected a FeatureCollection".into()),
    };
    let features = features
        .into_iter()
        .map(convert_feature)
        .collect::<Result<Vec<items::Feature>, Box<dyn Error>>>()?;
    Ok(items::FeatureCollection { features })
}

pub fn to_writer(
    collection: &items::FeatureCollection,
    writer: &mut dyn Write,
) -> Result<(), Box<dyn Error>> {
    let features = collection.features.iter().map(wire_feature).collect();
    let entity = Entity::FeatureCollection { features };
    let json = to_string(&entity)?;
    writeln!(writer, "{}", json)?;
    Ok(())
}

fn convert_feature(entity: Entity) -> Result<items::Feature, Box<dyn Error>> {
    match entity {
        Entity::Feature {
            id,
            properties,
            geometry,
        } => Ok(items::Feature {
            id: id.map(id_string).unwrap_or_default(),
            properties: properties.unwrap_or_default(),
            geometry: convert_geometry(geometry)?,
        }),
        Entity::FeatureCollection { .. } => Err("nested FeatureCollection".into()),
    }
}

fn id_string(id: Value) -> String {
    match id {
        Value::String(id) => id,
        Value::Number(id) => id.to_string(),
        _ => String::new(),
    }
}

fn convert_geometry(geometry: Option<Geometry>) -> Result<items::Geometry, Box<dyn Error>> {
    let geometry = match geometry {
        Some(Geometry::Polygon { coordinates }) => {
            items::Geometry::Polygon(convert_rings(coordinates)?)
        }
        Some(Geometry::MultiPolygon { coordinates }) => {
            let polygons = coordinates
                .into_iter()
                .map(convert_rings)
                .collect::<Result<Vec<Vec<items::Ring>>, Box<dyn Error>>>()?;
            items::Geometry::MultiPolygon(polygons)
        }
        Some(Geometry::Unsupported) | None => items::Geometry::Unsupported,
    };
    Ok(geometry)
}

fn convert_rings(rings: Vec<Vec<Vec<f64>>>) -> Result<Vec<items::Ring>, Box<dyn Error>> {
    rings.into_iter().map(convert_ring).collect()
}

fn convert_ring(ring: Vec<Vec<f64>>) -> Result<items::Ring, Box<dyn Error>> {
    ring.into_iter()
        .map(|position| match position[..] {
            // an altitude member parses but does not survive
            [lon, lat, ..] => Ok((lon, lat)),
            _ => Err("a position needs longitude and latitude".into()),
        })
        .collect()
}

fn wire_feature(feature: &items::Feature) -> Entity {
    let id = if feature.id.is_empty() {
        None
    } else {
        Some(Value::String(feature.id.clone()))
    };
    let properties = if feature.properties.is_empty() {
        None
    } else {
        Some(feature.properties.clone())
    };
    let geometry = match &feature.geometry {
        items::Geometry::Polygon(rings) => Some(Geometry::Polygon {
            coordinates: rings.iter().map(|ring| wire_ring(ring)).collect(),
        }),
        items::Geometry::MultiPolygon(polygons) => Some(Geometry::MultiPolygon {
            coordinates: polygons
                .iter()
                .map(|rings| rings.iter().map(|ring| wire_ring(ring)).collect())
                .collect(),
        }),
        items::Geometry::Unsupported => None,
    };
    Entity::Feature {
        id,
        properties,
        geometry,
    }
}

fn wire_ring(ring: &[items::Coordinate]) -> Vec<Vec<f64>> {
    ring.iter().map(|&(lon, lat)| vec![lon, lat]).collect()
}
