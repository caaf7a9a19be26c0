use super::error::RowError;
use super::items::{Feature, Geometry, Ring};
use super::polyline::{decode_coords, encode_coords};
use itertools::Itertools;
use serde_json::{to_string, Map, Value};

/// One decoded line of the tab-delimited format: an id, optional
/// properties and any number of rings. The first ring is the outer
/// boundary, the rest are holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: String,
    pub properties: Option<Map<String, Value>>,
    pub rings: Vec<Ring>,
}

impl From<Row> for Feature {
    fn from(row: Row) -> Self {
        Feature {
            id: row.id,
            properties: row.properties.unwrap_or_default(),
            geometry: Geometry::Polygon(row.rings),
        }
    }
}

/// Serialize one row. The id lands in the first field, the properties
/// JSON (or nothing) in the second, one encoded ring per field after
/// that. Map keys serialize in sorted order, so equal input yields
/// byte-equal output.
pub fn encode_row(
    id: &str,
    properties: Option<&Map<String, Value>>,
    rings: &[Ring],
) -> Result<String, serde_json::Error> {
    let json = match properties {
        Some(map) => to_string(map)?,
        None => String::new(),
    };
    let row = vec![id.to_string(), json]
        .into_iter()
        .chain(rings.iter().map(|ring| encode_coords(ring)))
        .join("\t");
    Ok(row)
}

/// Parse one line. Lines with fewer than two fields carry no feature
/// and yield `None`; empty ring fields are skipped. Ring indices in
/// errors count decoded fields, not tab positions.
pub fn decode_row(line: &str) -> Result<Option<Row>, RowError> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 2 {
        return Ok(None);
    }
    let properties = if fields[1].is_empty() {
        None
    } else {
        Some(serde_json::from_str(fields[1])?)
    };
    let mut rings = Vec::new();
    for field in fields[2..].iter().filter(|field| !field.is_empty()) {
        let ring = decode_coords(field.as_bytes()).map_err(|source| {
            RowError::MalformedEncoding {
                ring: rings.len(),
                source,
            }
        })?;
        rings.push(ring);
    }
    Ok(Some(Row {
        id: fields[0].to_string(),
        properties,
        rings,
    }))
}
