use criterion::{criterion_group, criterion_main, Criterion};
use geojson2polyline::items::{Feature, FeatureCollection, Geometry, Ring};
use geojson2polyline::select::Selection;
use geojson2polyline::{decode, encode};
use serde_json::{Map, Value};
use std::io::{Result, Write};

struct MockWriter;

impl Write for MockWriter {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        Ok(buf.len())
    }
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

fn create_ring(center: (f64, f64), points: usize) -> Ring {
    (0..points)
        .map(|i| {
            let angle = (i as f64) / (points as f64) * std::f64::consts::PI * 2.0;
            (center.0 + angle.cos() * 0.25, center.1 + angle.sin() * 0.25)
        })
        .collect()
}

fn create_collection(count: usize) -> FeatureCollection {
    let features = (0..count)
        .map(|i| {
            let center = ((i % 360) as f64 - 180.0, (i % 170) as f64 - 85.0);
            let mut properties = Map::new();
            properties.insert("tzid".to_string(), Value::String(format!("zone/{}", i)));
            Feature {
                id: format!("zone/{}", i),
                properties,
                geometry: Geometry::Polygon(vec![create_ring(center, 64)]),
            }
        })
        .collect();
    FeatureCollection { features }
}

pub fn encode_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    group.sample_size(10);
    let collection = create_collection(1000);
    let selection = Selection::parse(None, Some("tzid"));
    group.bench_function("encode", |b| {
        b.iter(|| {
            let mut writer = MockWriter;
            encode(&collection, &mut writer, &selection).unwrap();
        })
    });
    group.finish();
}

pub fn decode_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    group.sample_size(10);
    let collection = create_collection(1000);
    let selection = Selection::parse(None, Some("tzid"));
    let mut rows: Vec<u8> = Vec::new();
    encode(&collection, &mut rows, &selection).unwrap();
    group.bench_function("decode", |b| {
        b.iter(|| {
            decode(rows.as_slice()).unwrap();
        })
    });
    group.finish();
}

criterion_group!(benches, encode_bench, decode_bench);
criterion_main!(benches);
