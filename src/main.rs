use geojson2polyline::error::DecodeError;
use geojson2polyline::geojson;
use geojson2polyline::items::FeatureCollection;
use geojson2polyline::select::Selection;
use geojson2polyline::source::{self, SourceFormat};
use geojson2polyline::{decode, encode, rows};
use log::{info, warn};
use std::error::Error;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Cursor, Write};
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(
    name = "geojson2polyline",
    about = "Convert polygon feature collections to tab-delimited polyline rows and back"
)]
enum Opt {
    /// Encode a feature collection as polyline rows
    Encode {
        /// Input format: geojson, zipgeojson or shapefile
        format: SourceFormat,
        /// Input path or http(s) URL
        input: String,
        /// Output file
        output: PathBuf,
        /// Use this string property as the row id
        #[structopt(long = "idkey")]
        id_key: Option<String>,
        /// Copy this comma-separated set of properties into the rows
        #[structopt(long = "include")]
        include: Option<String>,
    },
    /// Decode polyline rows into a GeoJSON FeatureCollection
    Decode {
        /// Input file
        input: PathBuf,
        /// Output file
        output: PathBuf,
        /// Skip undecodable rows instead of aborting
        #[structopt(long = "skip-invalid")]
        skip_invalid: bool,
    },
}

fn fetch(input: &str) -> Result<Vec<u8>, Box<dyn Error>> {
    if input.starts_with("http") {
        let response = reqwest::blocking::get(input)?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    } else {
        Ok(fs::read(input)?)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    match Opt::from_args() {
        Opt::Encode {
            format,
            input,
            output,
            id_key,
            include,
        } => {
            info!("reading {:?} from {}", format, input);
            let bytes = fetch(&input)?;
            let collection = source::read(format, Cursor::new(bytes))?;
            let selection = Selection::parse(id_key, include.as_deref());
            let file = File::create(&output)?;
            let mut writer = BufWriter::new(file);
            encode(&collection, &mut writer, &selection)?;
            writer.flush()?;
        }
        Opt::Decode {
            input,
            output,
            skip_invalid,
        } => {
            let reader = BufReader::new(File::open(&input)?);
            let collection = if skip_invalid {
                let features = rows(reader)
                    .filter_map(|result| match result {
                        Ok(feature) => Some(Ok(feature)),
                        Err(DecodeError::Row { line, source }) => {
                            warn!("skipping line {}: {}", line, source);
                            None
                        }
                        Err(err) => Some(Err(err)),
                    })
                    .collect::<Result<Vec<_>, DecodeError>>()?;
                FeatureCollection { features }
            } else {
                decode(reader)?
            };
            let file = File::create(&output)?;
            let mut writer = BufWriter::new(file);
            geojson::to_writer(&collection, &mut writer)?;
            writer.flush()?;
        }
    }
    Ok(())
}
