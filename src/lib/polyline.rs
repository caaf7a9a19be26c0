use super::items::Coordinate;
use thiserror::Error;

/// Coordinate scale of the row format: six decimal digits, ~0.11m at
/// the equator. The format does not self-describe its scale, so
/// encoder and decoder must use this constant; changing it is a
/// format break.
pub const SCALE: f64 = 1_000_000.0;

/// A ring field's bytes are not a valid polyline: a value chunk never
/// terminates, a byte falls outside the alphabet, or the data ends
/// with a longitude missing its latitude.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid or truncated polyline data at byte {at}")]
pub struct MalformedEncoding {
    pub at: usize,
}

/// Encode a coordinate sequence into a polyline string.
///
/// Coordinates are rounded to 1/[`SCALE`] degrees and delta-encoded,
/// longitude before latitude, the first delta taken from origin 0.
///
/// # Example
///
/// ```
/// use geojson2polyline::polyline::encode_coords;
///
/// let coords = vec![(-122.0, 37.0), (-122.0, 38.0)];
/// assert_eq!(encode_coords(&coords), "~fhugF_shqeA?_c`|@");
/// ```
pub fn encode_coords(coords: &[Coordinate]) -> String {
    encode_scaled(coords, SCALE)
}

/// Decode a polyline string back into coordinates. The whole byte
/// slice is consumed; trailing garbage is a [`MalformedEncoding`].
pub fn decode_coords(bytes: &[u8]) -> Result<Vec<Coordinate>, MalformedEncoding> {
    decode_scaled(bytes, SCALE)
}

fn encode_scaled(coords: &[Coordinate], scale: f64) -> String {
    let mut out = String::new();
    let mut prev_x: i64 = 0;
    let mut prev_y: i64 = 0;
    for &(lon, lat) in coords {
        let x = (lon * scale).round() as i64;
        let y = (lat * scale).round() as i64;
        encode_value(x - prev_x, &mut out);
        encode_value(y - prev_y, &mut out);
        prev_x = x;
        prev_y = y;
    }
    out
}

fn encode_value(value: i64, out: &mut String) {
    let mut shifted = value << 1;
    if value < 0 {
        shifted = !shifted;
    }
    while shifted >= 0x20 {
        out.push((((shifted & 0x1f) | 0x20) as u8 + 63) as char);
        shifted >>= 5;
    }
    out.push((shifted as u8 + 63) as char);
}

fn decode_scaled(bytes: &[u8], scale: f64) -> Result<Vec<Coordinate>, MalformedEncoding> {
    let mut coords = Vec::new();
    let mut x: i64 = 0;
    let mut y: i64 = 0;
    let mut pos = 0;
    while pos < bytes.len() {
        let (dx, next) = decode_value(bytes, pos)?;
        let (dy, next) = decode_value(bytes, next)?;
        x += dx;
        y += dy;
        coords.push((x as f64 / scale, y as f64 / scale));
        pos = next;
    }
    Ok(coords)
}

fn decode_value(bytes: &[u8], start: usize) -> Result<(i64, usize), MalformedEncoding> {
    let mut result: i64 = 0;
    let mut shift = 0;
    let mut pos = start;
    loop {
        let chunk = match bytes.get(pos) {
            Some(&byte) if byte >= 63 && byte <= 126 => byte - 63,
            _ => return Err(MalformedEncoding { at: pos }),
        };
        // a thirteenth chunk only has room for the i64's top four bits
        if shift == 60 && chunk & 0x1f > 0xf {
            return Err(MalformedEncoding { at: pos });
        }
        pos += 1;
        result |= i64::from(chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
        // longer sequences cannot come from an i64 delta
        if shift > 60 {
            return Err(MalformedEncoding { at: pos });
        }
    }
    let value = if result & 1 == 1 {
        !(result >> 1)
    } else {
        result >> 1
    };
    Ok((value, pos))
}

#[cfg(test)]
mod encode_coords {
    use super::*;

    #[test]
    fn empty_sequence() {
        assert_eq!(encode_coords(&[]), "");
    }

    #[test]
    fn single_coordinate() {
        assert_eq!(encode_coords(&[(2.0, 1.0)]), "_gayB_c`|@");
    }

    #[test]
    fn zero_deltas_still_emit_a_chunk() {
        assert_eq!(encode_coords(&[(0.0, 0.0)]), "??");
    }

    #[test]
    fn square_ring() {
        let ring = vec![
            (-122.0, 37.0),
            (-122.0, 38.0),
            (-121.0, 38.0),
            (-121.0, 37.0),
            (-122.0, 37.0),
        ];
        assert_eq!(encode_coords(&ring), "~fhugF_shqeA?_c`|@_c`|@??~b`|@~b`|@?");
    }

    #[test]
    fn sign_interleaving() {
        assert_eq!(encode_coords(&[(0.5, -0.5), (-0.5, 0.5)]), "_qo]~po]~b`|@_c`|@");
    }

    #[test]
    fn precision_five_reference_vector() {
        // the published example of the encoding family, (lat, lng) order
        let coords = vec![(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)];
        assert_eq!(encode_scaled(&coords, 100_000.0), "_p~iF~ps|U_ulLnnqC_mqNvxq`@");
    }
}

#[cfg(test)]
mod decode_coords {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_coords_eq(left: &[Coordinate], right: &[Coordinate]) {
        assert_eq!(left.len(), right.len());
        for (a, b) in left.iter().zip(right) {
            assert_abs_diff_eq!(a.0, b.0, epsilon = 1e-6);
            assert_abs_diff_eq!(a.1, b.1, epsilon = 1e-6);
        }
    }

    #[test]
    fn empty_input() {
        assert_eq!(decode_coords(b""), Ok(vec![]));
    }

    #[test]
    fn single_coordinate() {
        let coords = decode_coords(b"_gayB_c`|@").unwrap();
        assert_coords_eq(&coords, &[(2.0, 1.0)]);
    }

    #[test]
    fn round_trip_within_precision() {
        let ring = vec![
            (13.377001, 52.516288),
            (13.379998, 52.520001),
            (13.375512, 52.513456),
            (13.377001, 52.516288),
        ];
        let decoded = decode_coords(encode_coords(&ring).as_bytes()).unwrap();
        assert_coords_eq(&decoded, &ring);
    }

    #[test]
    fn round_trip_rounds_excess_precision() {
        let coords = vec![(9.1234567891, -44.9999999531)];
        let decoded = decode_coords(encode_coords(&coords).as_bytes()).unwrap();
        assert_coords_eq(&decoded, &[(9.123457, -45.0)]);
    }

    #[test]
    fn truncated_chunk_sequence() {
        // final byte of "_gayB_c`|@" removed, the latitude never terminates
        let err = decode_coords(b"_gayB_c`|").unwrap_err();
        assert_eq!(err, MalformedEncoding { at: 9 });
    }

    #[test]
    fn dangling_longitude() {
        let err = decode_coords(b"_gayB_c`|@g^").unwrap_err();
        assert_eq!(err, MalformedEncoding { at: 12 });
    }

    #[test]
    fn byte_outside_alphabet() {
        let err = decode_coords(b"_gayB _c").unwrap_err();
        assert_eq!(err, MalformedEncoding { at: 5 });
    }

    #[test]
    fn thirteenth_chunk_with_bits_past_the_top() {
        // twelve continuation chunks fill 60 bits; a final chunk worth
        // more than four bits claims bits no i64 delta has
        let err = decode_coords(b"~~~~~~~~~~~~O?").unwrap_err();
        assert_eq!(err, MalformedEncoding { at: 12 });
    }

    #[test]
    fn thirteen_chunk_values_still_decode() {
        // all 64 value bits set is the transform of delta 0
        let coords = decode_coords(b"~~~~~~~~~~~~N?").unwrap();
        assert_coords_eq(&coords, &[(0.0, 0.0)]);
    }

    #[test]
    fn never_terminating_chunk_sequence() {
        let err = decode_coords(b"~~~~~~~~~~~~_?").unwrap_err();
        assert_eq!(err, MalformedEncoding { at: 13 });
    }

    #[test]
    fn precision_five_reference_vector() {
        let coords = decode_scaled(b"_p~iF~ps|U_ulLnnqC_mqNvxq`@", 100_000.0).unwrap();
        let expected = [(38.5, -120.2), (40.7, -120.95), (43.252, -126.453)];
        assert_eq!(coords.len(), 3);
        for (a, b) in coords.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(a.0, b.0, epsilon = 1e-5);
            assert_abs_diff_eq!(a.1, b.1, epsilon = 1e-5);
        }
    }
}
