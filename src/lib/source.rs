use super::geojson;
use super::items::{Coordinate, Feature, FeatureCollection, Geometry, Ring};
use serde_json::{Map, Value};
use shapefile::dbase::{FieldValue, Record};
use shapefile::{PolygonRing, Shape, ShapeReader};
use std::error::Error;
use std::io::{BufReader, Cursor, Read, Seek};
use std::str::FromStr;
use zip::ZipArchive;

/// The geometry containers the encoder accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Geojson,
    ZipGeojson,
    Shapefile,
}

impl FromStr for SourceFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "geojson" => Ok(SourceFormat::Geojson),
            "zipgeojson" => Ok(SourceFormat::ZipGeojson),
            "shapefile" => Ok(SourceFormat::Shapefile),
            other => Err(format!("unknown format: {}", other)),
        }
    }
}

/// Read a feature collection from `source` in the given format.
pub fn read<R: Read + Seek>(
    format: SourceFormat,
    source: R,
) -> Result<FeatureCollection, Box<dyn Error>> {
    match format {
        SourceFormat::Geojson => geojson::from_reader(source),
        SourceFormat::ZipGeojson => read_zip_geojson(source),
        SourceFormat::Shapefile => read_shapefile(source),
    }
}

/// Concatenate the features of every `.json` and `.geojson` entry, in
/// archive order. Other entries are ignored.
fn read_zip_geojson<R: Read + Seek>(source: R) -> Result<FeatureCollection, Box<dyn Error>> {
    let mut archive = ZipArchive::new(source)?;
    let mut collection = FeatureCollection::default();
    for index in 0..archive.len() {
        let entry = archive.by_index(index)?;
        let name = entry.name();
        if !(name.ends_with(".json") || name.ends_with(".geojson")) {
            continue;
        }
        let mut part = geojson::from_reader(BufReader::new(entry))?;
        collection.features.append(&mut part.features);
    }
    Ok(collection)
}

/// Read a zipped shapefile. Every record becomes a feature without an
/// id; its dbf fields become the properties.
fn read_shapefile<R: Read + Seek>(source: R) -> Result<FeatureCollection, Box<dyn Error>> {
    let mut archive = ZipArchive::new(source)?;
    let shp = read_entry(&mut archive, ".shp")?.ok_or("no .shp entry in archive")?;
    let dbf = read_entry(&mut archive, ".dbf")?.ok_or("no .dbf entry in archive")?;
    let shape_reader = ShapeReader::new(Cursor::new(shp))?;
    let dbase_reader = shapefile::dbase::Reader::new(Cursor::new(dbf))?;
    let mut reader = shapefile::Reader::new(shape_reader, dbase_reader);
    let mut features = Vec::new();
    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result?;
        features.push(Feature {
            id: String::new(),
            properties: record_properties(record),
            geometry: shape_geometry(shape),
        });
    }
    Ok(FeatureCollection { features })
}

fn read_entry<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    suffix: &str,
) -> Result<Option<Vec<u8>>, Box<dyn Error>> {
    let name = archive
        .file_names()
        .find(|name| name.to_ascii_lowercase().ends_with(suffix))
        .map(|name| name.to_string());
    let name = match name {
        Some(name) => name,
        None => return Ok(None),
    };
    let mut entry = archive.by_name(&name)?;
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes)?;
    Ok(Some(bytes))
}

fn shape_geometry(shape: Shape) -> Geometry {
    match shape {
        Shape::Polygon(polygon) => group_rings(polygon.rings()),
        Shape::PolygonM(polygon) => group_rings(polygon.rings()),
        Shape::PolygonZ(polygon) => group_rings(polygon.rings()),
        _ => Geometry::Unsupported,
    }
}

trait RingPoint {
    fn coordinate(&self) -> Coordinate;
}

impl RingPoint for shapefile::Point {
    fn coordinate(&self) -> Coordinate {
        (self.x, self.y)
    }
}

impl RingPoint for shapefile::PointM {
    fn coordinate(&self) -> Coordinate {
        (self.x, self.y)
    }
}

impl RingPoint for shapefile::PointZ {
    fn coordinate(&self) -> Coordinate {
        (self.x, self.y)
    }
}

/// ESRI polygons list each outer ring before the holes that cut it. A
/// record with several outer rings maps to a MultiPolygon; a stray
/// leading hole starts a polygon of its own.
fn group_rings<P: RingPoint>(rings: &[PolygonRing<P>]) -> Geometry {
    let mut polygons: Vec<Vec<Ring>> = Vec::new();
    for ring in rings {
        match ring {
            PolygonRing::Outer(points) => polygons.push(vec![coordinates(points)]),
            PolygonRing::Inner(points) => match polygons.last_mut() {
                Some(polygon) => polygon.push(coordinates(points)),
                None => polygons.push(vec![coordinates(points)]),
            },
        }
    }
    match polygons.len() {
        0 => Geometry::Polygon(vec![]),
        1 => Geometry::Polygon(polygons.swap_remove(0)),
        _ => Geometry::MultiPolygon(polygons),
    }
}

fn coordinates<P: RingPoint>(points: &[P]) -> Ring {
    points.iter().map(RingPoint::coordinate).collect()
}

fn record_properties(record: Record) -> Map<String, Value> {
    record
        .into_iter()
        .map(|(name, value)| (name, field_value(value)))
        .collect()
}

fn field_value(value: FieldValue) -> Value {
    match value {
        FieldValue::Character(Some(text)) => Value::String(text),
        FieldValue::Memo(text) => Value::String(text),
        FieldValue::Numeric(Some(number)) => number_value(number),
        FieldValue::Float(Some(number)) => number_value(f64::from(number)),
        FieldValue::Integer(number) => Value::from(number),
        FieldValue::Double(number) | FieldValue::Currency(number) => number_value(number),
        FieldValue::Logical(Some(flag)) => Value::Bool(flag),
        FieldValue::Date(Some(date)) => Value::String(format!(
            "{:04}-{:02}-{:02}",
            date.year(),
            date.month(),
            date.day()
        )),
        _ => Value::Null,
    }
}

fn number_value(number: f64) -> Value {
    serde_json::Number::from_f64(number)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
