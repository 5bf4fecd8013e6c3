//! # LLSD
//!
//! LLSD (Linden Lab Structured Data) is the structured value model spoken by virtual
//! world protocol clients and servers. A value is a tree of [`Llsd`] nodes that can be
//! written in three interchangeable wire formats:
//!
//! * a compact binary form, introduced by `<? llsd/binary ?>`,
//! * an XML form rooted at `<llsd>`,
//! * a JSON form.
//!
//! # Usage
//!
//! Trees are built with named factories and read with named accessors. Accessors never
//! fail: asking a node for a type it cannot provide returns that type's zero value.
//!
//! ```
//! use llsd::prelude::*;
//!
//! let mut root = Llsd::new_map();
//! {
//!     let map = root.to_map_mut().unwrap();
//!     map.insert("name".to_owned(), Llsd::from_string("Ahern"));
//!     map.insert("agents".to_owned(), Llsd::from_integer(12));
//!     map.insert("scale".to_owned(), Llsd::from_real(0.5));
//! }
//!
//! assert_eq!(root["agents"].as_integer(), 12);
//! assert_eq!(root["scale"].as_string(), "0.5");
//! assert_eq!(root["missing"].as_integer(), 0);
//! assert_eq!(root["name"].as_uuid(), Uuid::nil());
//! ```
//!
//! # Wire formats
//!
//! [`encoding::serialize`] writes a tree in a chosen [`encoding::Format`], and
//! [`encoding::deserialize`] inspects the start of its input to decide which codec to
//! read it with.
//!
//! ```
//! use llsd::prelude::*;
//!
//! let tree = Llsd::Array(vec![Llsd::from_boolean(true), Llsd::from_integer(42)]);
//!
//! for format in &[Format::Binary, Format::Xml, Format::Json] {
//!     let bytes = serialize(&tree, *format, false).unwrap();
//!     assert_eq!(detect_format(&bytes), *format);
//!     assert_eq!(deserialize(&bytes).unwrap(), tree);
//! }
//! ```
//!
//! # Kinds without a native representation
//!
//! Unsigned 32-bit and all 64-bit integers have no kind of their own. They travel as
//! [`Llsd::Binary`] holding their big-endian bytes, and [`Llsd::as_uinteger`],
//! [`Llsd::as_long`] and [`Llsd::as_ulong`] read them back. Vectors, quaternions and
//! colors travel as arrays of reals; see [`math`].
//!
//! # Marshaling structs
//!
//! Structs with named fields can derive [`members::Members`] and be converted to and
//! from map nodes with [`members::serialize_members`] and
//! [`members::deserialize_members`].

#![warn(
    deprecated_in_future,
    unsafe_code,
    unused_labels,
    keyword_idents,
    missing_debug_implementations,
    trivial_casts,
    unused_extern_crates,
    unused_import_braces
)]
#![allow(clippy::cast_lossless)]

extern crate self as llsd;

#[macro_use]
pub mod util;

pub mod convert;
pub mod date;
pub mod encoding;
pub mod error;
pub mod math;
pub mod members;
pub mod message;
pub mod native;
pub mod prelude;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use hashbrown::HashMap;
use std::ops::Index;
use url::Url;
use uuid::Uuid;

/// The contents of a map node. Iteration order is unspecified.
pub type LlsdMap = HashMap<String, Llsd>;

#[derive(Clone, Debug, PartialEq)]
/// [`Llsd`] and its variants.
///
/// Scalar variants are fixed once built. [`Llsd::Map`] and [`Llsd::Array`] own their
/// children outright and are edited in place.
///
/// # Example
///
/// ```
/// use llsd::Llsd;
///
/// let b = Llsd::Boolean(true);
///
/// let val = match b {
///     Llsd::Boolean(b) => b,
///     _ => panic!(),
/// };
///
/// assert!(val);
/// ```
pub enum Llsd {
    /// No value. Every accessor on it returns a zero value.
    Unknown,
    Boolean(bool),
    /// 32-bit signed integer.
    Integer(i32),
    /// 64-bit float.
    Real(f64),
    String(String),
    /// 128-bit identifier.
    Uuid(Uuid),
    Date(DateTime<Utc>),
    /// A URI. `None` is a URI node with no address, which renders as empty text.
    Uri(Option<Url>),
    Binary(Bytes),
    Map(LlsdMap),
    Array(Vec<Llsd>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// The kind of an [`Llsd`] node.
pub enum LlsdType {
    Unknown,
    Boolean,
    Integer,
    Real,
    String,
    Uuid,
    Date,
    Uri,
    Binary,
    Map,
    Array,
}

static UNKNOWN: Llsd = Llsd::Unknown;

impl Llsd {
    /// The kind of this node.
    ///
    /// # Example
    ///
    /// ```
    /// use llsd::{Llsd, LlsdType};
    ///
    /// assert_eq!(Llsd::from_uinteger(7).kind(), LlsdType::Binary);
    /// ```
    pub fn kind(&self) -> LlsdType {
        match self {
            Llsd::Unknown => LlsdType::Unknown,
            Llsd::Boolean(_) => LlsdType::Boolean,
            Llsd::Integer(_) => LlsdType::Integer,
            Llsd::Real(_) => LlsdType::Real,
            Llsd::String(_) => LlsdType::String,
            Llsd::Uuid(_) => LlsdType::Uuid,
            Llsd::Date(_) => LlsdType::Date,
            Llsd::Uri(_) => LlsdType::Uri,
            Llsd::Binary(_) => LlsdType::Binary,
            Llsd::Map(_) => LlsdType::Map,
            Llsd::Array(_) => LlsdType::Array,
        }
    }

    /// Indicates whether a value is [`Llsd::Unknown`].
    pub fn is_unknown(&self) -> bool {
        match self {
            Llsd::Unknown => true,
            _ => false,
        }
    }

    pub fn from_boolean(b: bool) -> Llsd { Llsd::Boolean(b) }

    pub fn from_integer(i: i32) -> Llsd { Llsd::Integer(i) }

    /// A `u32` as 4 big-endian bytes in a [`Llsd::Binary`] node.
    pub fn from_uinteger(u: u32) -> Llsd { Llsd::Binary(util::u32_to_bytes(u)) }

    /// An `i64` as 8 big-endian bytes in a [`Llsd::Binary`] node.
    pub fn from_long(l: i64) -> Llsd { Llsd::Binary(util::u64_to_bytes(l as u64)) }

    /// A `u64` as 8 big-endian bytes in a [`Llsd::Binary`] node.
    pub fn from_ulong(u: u64) -> Llsd { Llsd::Binary(util::u64_to_bytes(u)) }

    pub fn from_real(r: f64) -> Llsd { Llsd::Real(r) }

    pub fn from_string<S: Into<String>>(s: S) -> Llsd { Llsd::String(s.into()) }

    pub fn from_uuid(u: Uuid) -> Llsd { Llsd::Uuid(u) }

    pub fn from_date(d: DateTime<Utc>) -> Llsd { Llsd::Date(d) }

    pub fn from_uri(u: Option<Url>) -> Llsd { Llsd::Uri(u) }

    pub fn from_binary<B: Into<Bytes>>(b: B) -> Llsd { Llsd::Binary(b.into()) }

    /// An empty map node.
    pub fn new_map() -> Llsd { Llsd::Map(LlsdMap::new()) }

    /// An empty map node with room for `capacity` entries.
    pub fn map_with_capacity(capacity: usize) -> Llsd {
        Llsd::Map(LlsdMap::with_capacity(capacity))
    }

    /// An empty array node.
    pub fn new_array() -> Llsd { Llsd::Array(Vec::new()) }

    /// An empty array node with room for `capacity` elements.
    pub fn array_with_capacity(capacity: usize) -> Llsd {
        Llsd::Array(Vec::with_capacity(capacity))
    }

    /// The entries of a map node, or `None` for any other kind.
    pub fn to_map(&self) -> Option<&LlsdMap> {
        match self {
            Llsd::Map(m) => Some(m),
            _ => None,
        }
    }

    /// The entries of a map node, for editing in place.
    pub fn to_map_mut(&mut self) -> Option<&mut LlsdMap> {
        match self {
            Llsd::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Consumes a map node, returning its entries.
    pub fn into_map(self) -> Option<LlsdMap> {
        match self {
            Llsd::Map(m) => Some(m),
            _ => None,
        }
    }

    /// The elements of an array node, or `None` for any other kind.
    pub fn to_array(&self) -> Option<&Vec<Llsd>> {
        match self {
            Llsd::Array(a) => Some(a),
            _ => None,
        }
    }

    /// The elements of an array node, for editing in place.
    ///
    /// # Example
    ///
    /// ```
    /// use llsd::Llsd;
    ///
    /// let mut arr = Llsd::array_with_capacity(2);
    /// arr.to_array_mut().unwrap().push(Llsd::from_integer(1));
    /// arr.to_array_mut().unwrap()[0] = Llsd::from_integer(2);
    ///
    /// assert_eq!(arr[0].as_integer(), 2);
    /// ```
    pub fn to_array_mut(&mut self) -> Option<&mut Vec<Llsd>> {
        match self {
            Llsd::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Consumes an array node, returning its elements.
    pub fn into_array(self) -> Option<Vec<Llsd>> {
        match self {
            Llsd::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Looks up `key` in a map node.
    pub fn get(&self, key: &str) -> Option<&Llsd> { self.to_map().and_then(|m| m.get(key)) }

    /// The number of entries or elements of a container. Scalars have none.
    pub fn len(&self) -> usize {
        match self {
            Llsd::Map(m) => m.len(),
            Llsd::Array(a) => a.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Whether an array node holds a [`Llsd::String`] equal to `s`.
    ///
    /// # Example
    ///
    /// ```
    /// use llsd::Llsd;
    ///
    /// let caps = Llsd::Array(vec![Llsd::from_string("EventQueueGet"), Llsd::from_integer(1)]);
    ///
    /// assert!(caps.contains_str("EventQueueGet"));
    /// assert!(!caps.contains_str("1"));
    /// ```
    pub fn contains_str(&self, s: &str) -> bool {
        match self {
            Llsd::Array(a) => a.iter().any(|el| match el {
                Llsd::String(el) => el == s,
                _ => false,
            }),
            _ => false,
        }
    }
}

impl Default for Llsd {
    fn default() -> Llsd { Llsd::Unknown }
}

impl Index<&str> for Llsd {
    type Output = Llsd;

    /// The value under `key`, or [`Llsd::Unknown`] if there is none.
    fn index(&self, key: &str) -> &Llsd { self.get(key).unwrap_or(&UNKNOWN) }
}

impl Index<usize> for Llsd {
    type Output = Llsd;

    /// The element at `idx`, or [`Llsd::Unknown`] if there is none.
    fn index(&self, idx: usize) -> &Llsd {
        self.to_array().and_then(|a| a.get(idx)).unwrap_or(&UNKNOWN)
    }
}

impl std::fmt::Display for Llsd {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        fn fmt_map(m: &LlsdMap, indent: usize) -> String {
            let mut map_string: String = "{".to_owned();
            for (i, (k, v)) in m.iter().enumerate() {
                if i == 0 {
                    map_string.push_str(&format!("\n{:indent$}", "", indent = indent + 2));
                } else {
                    map_string.push_str(&format!(",\n{:indent$}", "", indent = indent + 2));
                }

                let value = fmt_nested(v, indent + 2);
                map_string.push_str(&format!("{key:?}: {value}", key = k, value = value));

                // check if we're at last element
                if i == m.len() - 1 {
                    map_string.push_str(&format!("\n{:indent$}", "", indent = indent));
                }
            }
            map_string.push('}');

            map_string
        }

        fn fmt_array(a: &[Llsd], indent: usize) -> String {
            let mut arr_string: String = "[".to_owned();
            for (i, el) in a.iter().enumerate() {
                if i != 0 {
                    arr_string.push_str(", ");
                }
                arr_string.push_str(&fmt_nested(el, indent));
            }
            arr_string.push(']');

            arr_string
        }

        // text-like values are quoted inside containers
        fn fmt_nested(ls: &Llsd, indent: usize) -> String {
            match ls {
                Llsd::String(_) | Llsd::Uuid(_) | Llsd::Date(_) | Llsd::Uri(_) => {
                    format!("{:?}", ls.as_string())
                }
                _ => fmt_helper(ls, indent),
            }
        }

        fn fmt_helper(ls: &Llsd, indent: usize) -> String {
            match ls {
                Llsd::Unknown => "undef".to_owned(),
                Llsd::Binary(b) => util::hex_string(b),
                Llsd::Map(m) => fmt_map(m, indent),
                Llsd::Array(a) => fmt_array(a, indent),
                scalar => scalar.as_string(),
            }
        }

        write!(f, "{}", fmt_helper(self, 0))
    }
}

from_fn!(Llsd, bool, Llsd::Boolean);
from_fn!(Llsd, i32, Llsd::Integer);
from_fn!(Llsd, f64, Llsd::Real);
from_fn!(Llsd, String, Llsd::String);
from_fn!(Llsd, &str, Llsd::from_string);
from_fn!(Llsd, Uuid, Llsd::Uuid);
from_fn!(Llsd, DateTime<Utc>, Llsd::Date);
from_fn!(Llsd, Url, |u| Llsd::Uri(Some(u)));
from_fn!(Llsd, Bytes, Llsd::Binary);
from_fn!(Llsd, Vec<u8>, Llsd::from_binary);
from_fn!(Llsd, Vec<Llsd>, Llsd::Array);
from_fn!(Llsd, LlsdMap, Llsd::Map);

// Integers
compose_from!(Llsd, i32, i8);
compose_from!(Llsd, i32, u8);
compose_from!(Llsd, i32, i16);
compose_from!(Llsd, i32, u16);

// Floats
compose_from!(Llsd, f64, f32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivial_tests() {
        assert!(Llsd::Unknown.is_unknown());
        assert!(Llsd::default().is_unknown());

        assert_eq!(Llsd::from(5u8), Llsd::Integer(5));
        assert_eq!(Llsd::from(0.5f32), Llsd::Real(0.5));
        assert_eq!(Llsd::from("word").kind(), LlsdType::String);
        assert_eq!(Llsd::from(vec![1u8, 2]).kind(), LlsdType::Binary);
    }

    #[test]
    fn wide_integer_factories() {
        assert_eq!(Llsd::from_uinteger(1), Llsd::Binary(Bytes::from(vec![0, 0, 0, 1])));
        assert_eq!(
            Llsd::from_long(-1),
            Llsd::Binary(Bytes::from(vec![0xff; 8]))
        );
        assert_eq!(Llsd::from_ulong(u64::max_value()).as_ulong(), u64::max_value());
        assert_eq!(Llsd::from_long(i64::min_value()).as_long(), i64::min_value());
    }

    #[test]
    fn indexing_is_total() {
        let mut map = Llsd::new_map();
        map.to_map_mut()
            .unwrap()
            .insert("a".to_owned(), Llsd::Array(vec![Llsd::from_integer(3)]));

        assert_eq!(map["a"][0].as_integer(), 3);
        assert!(map["a"][1].is_unknown());
        assert!(map["b"]["c"].is_unknown());
        assert!(Llsd::from_integer(1)[0].is_unknown());
        assert!(Llsd::from_integer(1)["x"].is_unknown());
    }

    #[test]
    fn containers() {
        let mut arr = Llsd::new_array();
        assert!(arr.is_empty());
        arr.to_array_mut().unwrap().push(Llsd::from_string("x"));
        assert_eq!(arr.len(), 1);
        assert!(arr.to_map().is_none());
        assert_eq!(arr.clone().into_array().unwrap().len(), 1);
        arr.to_array_mut().unwrap().clear();
        assert!(arr.is_empty());

        assert_eq!(Llsd::from_integer(4).len(), 0);
        assert!(Llsd::from_integer(4).into_map().is_none());
        assert!(Llsd::map_with_capacity(8).is_empty());
    }

    #[test]
    fn display() {
        assert_eq!(Llsd::Unknown.to_string(), "undef");
        assert_eq!(Llsd::from_binary(vec![0xde, 0xad]).to_string(), "DEAD");
        assert_eq!(Llsd::from_string("hi").to_string(), "hi");
        assert_eq!(
            Llsd::Array(vec![Llsd::from_string("hi"), Llsd::from_integer(1)]).to_string(),
            "[\"hi\", 1]"
        );

        let mut map = LlsdMap::new();
        map.insert("k".to_owned(), Llsd::from_boolean(true));
        assert_eq!(Llsd::Map(map).to_string(), "{\n  \"k\": 1\n}");
        assert_eq!(Llsd::new_map().to_string(), "{}");
    }
}
