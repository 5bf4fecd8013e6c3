use byteorder::{BigEndian, ByteOrder};
use bytes::Bytes;
use num_traits::{Bounded, NumCast, Zero};

/// Encodes a `u32` as its 4 big-endian bytes.
///
/// # Example
///
/// ```
/// use llsd::util::u32_to_bytes;
///
/// assert_eq!(&u32_to_bytes(0x0102_0304)[..], &[1, 2, 3, 4]);
/// ```
pub fn u32_to_bytes(num: u32) -> Bytes { Bytes::from(num.to_be_bytes().to_vec()) }

/// Encodes a `u64` as its 8 big-endian bytes.
pub fn u64_to_bytes(num: u64) -> Bytes { Bytes::from(num.to_be_bytes().to_vec()) }

/// Encodes an `f64` as the 8 big-endian bytes of its IEEE-754 representation.
pub fn f64_to_bytes(num: f64) -> Bytes { Bytes::from(num.to_bits().to_be_bytes().to_vec()) }

/// Reads a big-endian `u32` from the first 4 bytes, or 0 if there are fewer.
///
/// # Example
///
/// ```
/// use llsd::util::bytes_to_u32;
///
/// assert_eq!(bytes_to_u32(&[0, 0, 1, 0, 0xff]), 256);
/// assert_eq!(bytes_to_u32(&[1, 2]), 0);
/// ```
pub fn bytes_to_u32(bs: &[u8]) -> u32 {
    if bs.len() >= 4 {
        BigEndian::read_u32(bs)
    } else {
        0
    }
}

/// Reads a big-endian `u64` from the first 8 bytes, or 0 if there are fewer.
pub fn bytes_to_u64(bs: &[u8]) -> u64 {
    if bs.len() >= 8 {
        BigEndian::read_u64(bs)
    } else {
        0
    }
}

/// Converts a float to a bounded integer type, saturating at the type's bounds.
///
/// The value is expected to be integral already (rounded or floored by the caller).
/// NaN converts to zero.
pub fn saturate<T: Bounded + NumCast + Zero>(num: f64) -> T {
    if num.is_nan() {
        return T::zero();
    }
    match <T as NumCast>::from(num) {
        Some(n) => n,
        None if num > 0.0 => T::max_value(),
        None => T::min_value(),
    }
}

/// Converts a real to a bounded integer type: rounds half away from zero, clamps
/// out-of-range magnitudes to the bounds, and maps NaN to zero.
///
/// # Example
///
/// ```
/// use llsd::util::clamp_round;
///
/// assert_eq!(clamp_round::<i32>(2.5), 3);
/// assert_eq!(clamp_round::<i32>(-2.5), -3);
/// assert_eq!(clamp_round::<i32>(1e30), i32::max_value());
/// assert_eq!(clamp_round::<u32>(-7.0), 0);
/// assert_eq!(clamp_round::<i64>(std::f64::NAN), 0);
/// ```
pub fn clamp_round<T: Bounded + NumCast + Zero>(num: f64) -> T { saturate(num.round()) }

/// Parses text as a 64-bit float, ignoring surrounding whitespace.
pub fn parse_real(s: &str) -> Option<f64> { s.trim().parse::<f64>().ok() }

/// Parses text as a float and floors it into an integer type. Unparsable text is 0.
pub fn parse_floor<T: Bounded + NumCast + Zero>(s: &str) -> T {
    parse_real(s).map_or_else(T::zero, |f| saturate(f.floor()))
}

/// Renders a real as the shortest text that parses back to the same value.
///
/// Magnitudes of `1e15` and above, or below `1e-5`, use exponent notation, and
/// non-finite values are spelled out.
///
/// # Example
///
/// ```
/// use llsd::util::format_real;
///
/// assert_eq!(format_real(0.5), "0.5");
/// assert_eq!(format_real(1e300), "1e300");
/// assert_eq!(format_real(-2.5e-7), "-2.5e-7");
/// assert_eq!(format_real(std::f64::NEG_INFINITY), "-Infinity");
/// ```
pub fn format_real(r: f64) -> String {
    if r.is_nan() {
        "NaN".to_owned()
    } else if r.is_infinite() {
        if r > 0.0 { "Infinity" } else { "-Infinity" }.to_owned()
    } else if r != 0.0 && (r.abs() >= 1e15 || r.abs() < 1e-5) {
        format!("{:e}", r)
    } else {
        r.to_string()
    }
}

/// Renders bytes as uppercase hexadecimal pairs.
pub fn hex_string(bs: &[u8]) -> String {
    bs.iter().map(|b| format!("{:02X}", b)).collect()
}

#[macro_export]
/// Helper macro to make implementing `From` easier.
macro_rules! from_fn {
    ($to:ty, $from:ty, $fn:expr) => {
        impl From<$from> for $to {
            fn from(f: $from) -> $to { $fn(f) }
        }
    };
}

#[macro_export]
/// Helper macro to compose `From` implementations.
macro_rules! compose_from {
    ($to:tt, $mid:tt, $from:ty) => {
        impl From<$from> for $to {
            fn from(f: $from) -> Self { Self::from($mid::from(f)) }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn big_endian_layouts() {
        assert_eq!(&u32_to_bytes(1)[..], &[0, 0, 0, 1]);
        assert_eq!(&u64_to_bytes(1 << 32)[..], &[0, 0, 0, 1, 0, 0, 0, 0]);
        assert_eq!(
            &f64_to_bytes(1.0)[..],
            &[0x3f, 0xf0, 0, 0, 0, 0, 0, 0]
        );
        assert_eq!(bytes_to_u64(&u64_to_bytes(u64::max_value())), u64::max_value());
        assert_eq!(bytes_to_u64(&[1, 2, 3]), 0);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(clamp_round::<i32>(0.5), 1);
        assert_eq!(clamp_round::<i32>(-0.5), -1);
        assert_eq!(clamp_round::<i32>(1.49), 1);
        assert_eq!(clamp_round::<u64>(1e300), u64::max_value());
        assert_eq!(clamp_round::<i64>(-1e300), i64::min_value());
    }

    #[test]
    fn parse_floor_floors() {
        assert_eq!(parse_floor::<i32>("2.9"), 2);
        assert_eq!(parse_floor::<i32>("-2.1"), -3);
        assert_eq!(parse_floor::<i32>(" 12 "), 12);
        assert_eq!(parse_floor::<i32>("twelve"), 0);
        assert_eq!(parse_floor::<u32>("-4"), 0);
        assert_eq!(parse_floor::<i32>("1e12"), i32::max_value());
    }

    #[test]
    fn reals_are_compact() {
        assert_eq!(format_real(1e300), "1e300");
        assert_eq!(format_real(123_456.5), "123456.5");
        assert_eq!(format_real(1e15), "1e15");
        assert_eq!(format_real(0.0), "0");
        assert_eq!(format_real(std::f64::INFINITY), "Infinity");
        assert_eq!(format_real(std::f64::NAN), "NaN");

        for r in &[1e300, -3.25e-300, std::f64::MAX, std::f64::MIN_POSITIVE, 1e-5] {
            assert_eq!(parse_real(&format_real(*r)), Some(*r));
        }
        assert_eq!(parse_real("-Infinity"), Some(std::f64::NEG_INFINITY));
        assert!(parse_real("NaN").map_or(false, f64::is_nan));
    }

    #[test]
    fn hex() {
        assert_eq!(hex_string(&[0x0a, 0xff, 0x10]), "0AFF10");
        assert_eq!(hex_string(&[]), "");
    }
}
