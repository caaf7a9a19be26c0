use log::{debug, info};
use rayon::prelude::*;
use std::error::Error;
use std::io::{BufRead, Lines, Write};

pub mod dataset;
pub mod error;
pub mod geojson;
pub mod items;
pub mod polyline;
pub mod row;
pub mod select;
pub mod source;

use error::DecodeError;
use items::{Feature, FeatureCollection};
use row::{decode_row, encode_row};
use select::Selection;

fn feature_rows(
    feature: &Feature,
    selection: &Selection,
) -> Result<Vec<String>, serde_json::Error> {
    let id = selection.feature_id(feature);
    let properties = selection.properties(feature);
    feature
        .geometry
        .polygons()
        .iter()
        .map(|rings| encode_row(&id, properties.as_ref(), rings))
        .collect()
}

/// Encode a feature collection as tab-delimited polyline rows. Every
/// polygon becomes one row; a MultiPolygon contributes one row per
/// member polygon, all sharing the feature's id and properties.
/// Features without polygonal geometry are skipped.
pub fn encode(
    collection: &FeatureCollection,
    writer: &mut dyn Write,
    selection: &Selection,
) -> Result<(), Box<dyn Error>> {
    if let Some(feature) = collection.features.first() {
        let keys: Vec<&String> = feature.properties.keys().collect();
        debug!("first record has keys: {:?}", keys);
        debug!("selecting keys: {:?}", selection.property_keys);
    }
    info!("encoding {} features", collection.features.len());
    let rows = collection
        .features
        .par_iter()
        .map(|feature| feature_rows(feature, selection))
        .collect::<Result<Vec<Vec<String>>, serde_json::Error>>()?;
    // rows are built in parallel but written in feature order
    for line in rows.into_iter().flatten() {
        writeln!(writer, "{}", line)?;
    }
    Ok(())
}

/// Row iterator over a reader, yielding one feature per row. Lines
/// that carry no feature are skipped; errors name the 1-based line
/// they came from, and the iterator continues past them.
pub struct Rows<R> {
    lines: Lines<R>,
    line: usize,
}

impl<R: BufRead> Iterator for Rows<R> {
    type Item = Result<Feature, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(DecodeError::Io(err))),
            };
            self.line += 1;
            match decode_row(&line) {
                Ok(Some(row)) => return Some(Ok(row.into())),
                Ok(None) => continue,
                Err(source) => {
                    return Some(Err(DecodeError::Row {
                        line: self.line,
                        source,
                    }))
                }
            }
        }
    }
}

pub fn rows<R: BufRead>(reader: R) -> Rows<R> {
    Rows {
        lines: reader.lines(),
        line: 0,
    }
}

/// Decode a complete row stream into a feature collection. The first
/// bad row aborts the decode; use `rows` to skip instead.
///
/// The flattening applied on encode is not undone: every row comes
/// back as its own Polygon feature, and rows that once formed a
/// MultiPolygon stay separate features sharing an id.
pub fn decode(reader: impl BufRead) -> Result<FeatureCollection, DecodeError> {
    let features = rows(reader).collect::<Result<Vec<Feature>, DecodeError>>()?;
    Ok(FeatureCollection { features })
}
