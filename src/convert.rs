//! The total accessor set.
//!
//! Every accessor is defined for every kind. A request that makes no sense for a
//! node's kind yields the zero-equivalent of the requested type: `false`, `0`, `0.0`,
//! empty text, the nil identifier, the epoch, no URI, or empty bytes.

use crate::{date, math::*, util::*, Llsd, Llsd::*};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use url::Url;

const BIN_TRUE: &[u8] = b"1";
const BIN_FALSE: &[u8] = b"0";

/// A real is truthy when it is a number further than this from zero.
const REAL_EPSILON: f64 = 1e-7;

/// `false` only for empty text, `"0"` or any casing of `"false"`.
fn text_truthy(s: &str) -> bool { !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false")) }

impl Llsd {
    /// Truthiness of the node.
    ///
    /// # Example
    ///
    /// ```
    /// use llsd::Llsd;
    ///
    /// assert!(!Llsd::from_string("False").as_boolean());
    /// assert!(Llsd::from_string("FALSE2").as_boolean());
    /// assert!(!Llsd::from_real(1e-9).as_boolean());
    /// assert!(!Llsd::new_array().as_boolean());
    /// ```
    pub fn as_boolean(&self) -> bool {
        match self {
            Boolean(b) => *b,
            Integer(i) => *i != 0,
            Real(r) => !r.is_nan() && r.abs() > REAL_EPSILON,
            String(s) => text_truthy(s),
            Uuid(u) => !u.is_nil(),
            Map(m) => !m.is_empty(),
            Array(a) => !a.is_empty(),
            Unknown | Date(_) | Uri(_) | Binary(_) => false,
        }
    }

    /// The node as a 32-bit signed integer.
    ///
    /// Reals round half away from zero and saturate; text is parsed as a real and
    /// floored.
    ///
    /// # Example
    ///
    /// ```
    /// use llsd::Llsd;
    ///
    /// assert_eq!(Llsd::from_real(2.5).as_integer(), 3);
    /// assert_eq!(Llsd::from_real(-1e30).as_integer(), i32::min_value());
    /// assert_eq!(Llsd::from_string("2.9").as_integer(), 2);
    /// ```
    pub fn as_integer(&self) -> i32 {
        match self {
            Boolean(b) => *b as i32,
            Integer(i) => *i,
            Real(r) => clamp_round(*r),
            String(s) => parse_floor(s),
            Date(d) => saturate(d.timestamp() as f64),
            _ => 0,
        }
    }

    /// The node as a 32-bit unsigned integer.
    pub fn as_uinteger(&self) -> u32 {
        match self {
            Boolean(b) => *b as u32,
            Integer(i) => *i as u32,
            Real(r) => clamp_round(*r),
            String(s) => parse_floor(s),
            Date(d) => saturate(d.timestamp() as f64),
            Binary(b) => bytes_to_u32(b),
            Array(_) => bytes_to_u32(&self.as_binary()),
            _ => 0,
        }
    }

    /// The node as a 64-bit signed integer.
    pub fn as_long(&self) -> i64 {
        match self {
            Boolean(b) => *b as i64,
            Integer(i) => i64::from(*i),
            Real(r) => clamp_round(*r),
            String(s) => parse_floor(s),
            Date(d) => d.timestamp(),
            Binary(b) => bytes_to_u64(b) as i64,
            Array(_) => bytes_to_u64(&self.as_binary()) as i64,
            _ => 0,
        }
    }

    /// The node as a 64-bit unsigned integer.
    ///
    /// A [`Binary`] node is read as 8 big-endian bytes, which is how unsigned 64-bit
    /// values travel.
    ///
    /// # Example
    ///
    /// ```
    /// use llsd::Llsd;
    ///
    /// let big = 1u64 << 40;
    /// assert_eq!(Llsd::from_ulong(big).as_ulong(), big);
    /// ```
    pub fn as_ulong(&self) -> u64 {
        match self {
            Boolean(b) => *b as u64,
            Integer(i) => *i as u64,
            Real(r) => clamp_round(*r),
            String(s) => parse_floor(s),
            Date(d) => saturate(d.timestamp() as f64),
            Binary(b) => bytes_to_u64(b),
            Array(_) => bytes_to_u64(&self.as_binary()),
            _ => 0,
        }
    }

    /// The node as a 64-bit float.
    pub fn as_real(&self) -> f64 {
        match self {
            Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            Integer(i) => f64::from(*i),
            Real(r) => *r,
            String(s) => parse_real(s).unwrap_or(0.0),
            Date(d) => date::to_seconds(d),
            _ => 0.0,
        }
    }

    /// The text rendering of the node.
    ///
    /// Reals render in the shortest form that parses back to the same value, binary
    /// payloads render as base64, and containers have no text form.
    ///
    /// # Example
    ///
    /// ```
    /// use llsd::Llsd;
    ///
    /// assert_eq!(Llsd::from_boolean(true).as_string(), "1");
    /// assert_eq!(Llsd::from_real(0.1).as_string(), "0.1");
    /// assert_eq!(Llsd::from_binary(vec![1, 2, 3]).as_string(), "AQID");
    /// ```
    pub fn as_string(&self) -> std::string::String {
        match self {
            Boolean(b) => if *b { "1" } else { "0" }.to_owned(),
            Integer(i) => i.to_string(),
            Real(r) => format_real(*r),
            String(s) => s.clone(),
            Uuid(u) => u.to_string(),
            Date(d) => date::format_date(d),
            Uri(u) => u.as_ref().map(Url::to_string).unwrap_or_default(),
            Binary(b) => base64_encode(b),
            Unknown | Map(_) | Array(_) => std::string::String::new(),
        }
    }

    /// The node as an identifier. Text is parsed, anything else is nil.
    pub fn as_uuid(&self) -> uuid::Uuid {
        match self {
            Uuid(u) => *u,
            String(s) => uuid::Uuid::parse_str(s.trim()).unwrap_or_else(|_| uuid::Uuid::nil()),
            _ => uuid::Uuid::nil(),
        }
    }

    /// The node as a date. Text is parsed leniently, anything else is the epoch.
    pub fn as_date(&self) -> DateTime<Utc> {
        match self {
            Date(d) => *d,
            String(s) => date::parse_date(s).unwrap_or_else(date::epoch),
            _ => date::epoch(),
        }
    }

    /// The node as an absolute URI, if it holds or parses to one.
    pub fn as_uri(&self) -> Option<Url> {
        match self {
            Uri(u) => u.clone(),
            String(s) => Url::parse(s.trim()).ok(),
            _ => None,
        }
    }

    /// The binary layout of the node. Numbers are big-endian and fixed-width.
    ///
    /// An array flattens to one byte per element, taking the low byte of each
    /// element's integer value.
    ///
    /// # Example
    ///
    /// ```
    /// use llsd::Llsd;
    ///
    /// assert_eq!(&Llsd::from_integer(258).as_binary()[..], &[0, 0, 1, 2]);
    ///
    /// let arr = Llsd::Array(vec![Llsd::from_integer(0x1ff), Llsd::from_integer(7)]);
    /// assert_eq!(&arr.as_binary()[..], &[0xff, 7]);
    /// ```
    pub fn as_binary(&self) -> Bytes {
        match self {
            Boolean(b) => Bytes::from_static(if *b { BIN_TRUE } else { BIN_FALSE }),
            Integer(i) => u32_to_bytes(*i as u32),
            Real(r) => f64_to_bytes(*r),
            String(s) => Bytes::from(s.as_bytes()),
            Uuid(u) => Bytes::from(&u.as_bytes()[..]),
            Date(d) => f64_to_bytes(date::to_seconds(d)),
            Uri(_) => Bytes::from(self.as_string().into_bytes()),
            Binary(b) => b.clone(),
            Array(a) => a.iter().map(|el| el.as_integer() as u8).collect::<Vec<u8>>().into(),
            Unknown | Map(_) => Bytes::new(),
        }
    }

    /// Reads `N` reals from an array of exactly `N` elements.
    fn components(&self, n: usize) -> Option<Vec<f64>> {
        match self {
            Array(a) if a.len() == n => Some(a.iter().map(Llsd::as_real).collect()),
            _ => None,
        }
    }

    /// `[x, y]` as a [`Vector2`]; anything else is [`Vector2::ZERO`].
    pub fn as_vector2(&self) -> Vector2 {
        match self.components(2) {
            Some(c) => Vector2::new(c[0] as f32, c[1] as f32),
            None => Vector2::ZERO,
        }
    }

    /// `[x, y, z]` as a [`Vector3`]; anything else is [`Vector3::ZERO`].
    ///
    /// # Example
    ///
    /// ```
    /// use llsd::{math::Vector3, Llsd};
    ///
    /// let short = Llsd::Array(vec![Llsd::from_real(1.0), Llsd::from_real(2.0)]);
    /// assert_eq!(short.as_vector3(), Vector3::ZERO);
    /// ```
    pub fn as_vector3(&self) -> Vector3 {
        match self.components(3) {
            Some(c) => Vector3::new(c[0] as f32, c[1] as f32, c[2] as f32),
            None => Vector3::ZERO,
        }
    }

    /// `[x, y, z]` as a [`Vector3d`]; anything else is [`Vector3d::ZERO`].
    pub fn as_vector3d(&self) -> Vector3d {
        match self.components(3) {
            Some(c) => Vector3d::new(c[0], c[1], c[2]),
            None => Vector3d::ZERO,
        }
    }

    /// `[x, y, z, w]` as a [`Vector4`]; anything else is [`Vector4::ZERO`].
    pub fn as_vector4(&self) -> Vector4 {
        match self.components(4) {
            Some(c) => Vector4::new(c[0] as f32, c[1] as f32, c[2] as f32, c[3] as f32),
            None => Vector4::ZERO,
        }
    }

    /// `[x, y, z, w]` as a [`Quaternion`]; anything else is [`Quaternion::IDENTITY`].
    pub fn as_quaternion(&self) -> Quaternion {
        match self.components(4) {
            Some(c) => Quaternion::new(c[0] as f32, c[1] as f32, c[2] as f32, c[3] as f32),
            None => Quaternion::IDENTITY,
        }
    }

    /// `[r, g, b, a]` as a [`Color4`]; anything else is [`Color4::BLACK`].
    pub fn as_color4(&self) -> Color4 {
        match self.components(4) {
            Some(c) => Color4::new(c[0] as f32, c[1] as f32, c[2] as f32, c[3] as f32),
            None => Color4::BLACK,
        }
    }

    /// A deep copy. Containers are copied recursively.
    pub fn copy(&self) -> Llsd { self.clone() }
}

pub(crate) fn base64_encode(bs: &[u8]) -> std::string::String {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.encode(bs)
}

pub(crate) fn base64_decode(s: &str) -> Option<Vec<u8>> {
    use base64::Engine;
    let cleaned: std::string::String = s.chars().filter(|c| !c.is_whitespace()).collect();
    base64::engine::general_purpose::STANDARD.decode(cleaned).ok()
}
