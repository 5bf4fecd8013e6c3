//! Host values and their declared types.
//!
//! [`NativeValue`] is a dynamically typed host value, and [`FieldType`] describes the
//! type a host field is declared with. [`Llsd::from_native`] and [`Llsd::to_native`]
//! convert between these and trees. Neither direction can fail: an unsupported
//! pairing produces [`Llsd::Unknown`] or the declared type's default.
//!
//! The [`Native`] trait connects concrete Rust types to this machinery, and is what
//! `#[derive(Members)]` uses to build field tables.

use crate::{math::*, util::*, Llsd, LlsdMap, LlsdType};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use url::Url;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq)]
/// A host value with its runtime type attached.
pub enum NativeValue {
    /// No value. Converts to [`Llsd::Unknown`].
    Null,
    Bool(bool),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Uuid(Uuid),
    Date(DateTime<Utc>),
    Uri(Url),
    Binary(Bytes),
    Vector2(Vector2),
    Vector3(Vector3),
    Vector3d(Vector3d),
    Vector4(Vector4),
    Quaternion(Quaternion),
    Color4(Color4),
    Map(LlsdMap),
    Array(Vec<Llsd>),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
/// The declared type of a marshalable field.
pub enum FieldType {
    Bool,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    String,
    Uuid,
    Date,
    Uri,
    Binary,
    Vector2,
    Vector3,
    Vector3d,
    Vector4,
    Quaternion,
    Color4,
    Map,
    Array,
}

impl FieldType {
    /// Whether a field of this type is written even when its value is unknown.
    ///
    /// Text and raw bytes are always written, so that a receiver sees the key.
    pub const fn always_included(self) -> bool {
        match self {
            FieldType::String | FieldType::Binary => true,
            _ => false,
        }
    }
}

impl Llsd {
    /// Builds a node from a host value, dispatching on its runtime type.
    ///
    /// Small integers become [`Llsd::Integer`]. `u32`, `i64` and `u64` travel as
    /// big-endian [`Llsd::Binary`], which is the only lossless representation the
    /// wire formats share for them.
    ///
    /// # Example
    ///
    /// ```
    /// use llsd::{native::NativeValue, Llsd, LlsdType};
    ///
    /// assert_eq!(Llsd::from_native(NativeValue::U16(7)), Llsd::from_integer(7));
    /// assert_eq!(Llsd::from_native(NativeValue::U64(7)).kind(), LlsdType::Binary);
    /// assert!(Llsd::from_native(NativeValue::Null).is_unknown());
    /// ```
    pub fn from_native(value: NativeValue) -> Llsd {
        match value {
            NativeValue::Null => Llsd::Unknown,
            NativeValue::Bool(b) => Llsd::from_boolean(b),
            NativeValue::I8(n) => Llsd::from_integer(n.into()),
            NativeValue::U8(n) => Llsd::from_integer(n.into()),
            NativeValue::I16(n) => Llsd::from_integer(n.into()),
            NativeValue::U16(n) => Llsd::from_integer(n.into()),
            NativeValue::I32(n) => Llsd::from_integer(n),
            NativeValue::U32(n) => Llsd::from_uinteger(n),
            NativeValue::I64(n) => Llsd::from_long(n),
            NativeValue::U64(n) => Llsd::from_ulong(n),
            NativeValue::F32(f) => Llsd::from_real(f.into()),
            NativeValue::F64(f) => Llsd::from_real(f),
            NativeValue::String(s) => Llsd::from_string(s),
            NativeValue::Uuid(u) => Llsd::from_uuid(u),
            NativeValue::Date(d) => Llsd::from_date(d),
            NativeValue::Uri(u) => Llsd::from_uri(Some(u)),
            NativeValue::Binary(b) => Llsd::from_binary(b),
            NativeValue::Vector2(v) => Llsd::from_vector2(v),
            NativeValue::Vector3(v) => Llsd::from_vector3(v),
            NativeValue::Vector3d(v) => Llsd::from_vector3d(v),
            NativeValue::Vector4(v) => Llsd::from_vector4(v),
            NativeValue::Quaternion(q) => Llsd::from_quaternion(q),
            NativeValue::Color4(c) => Llsd::from_color4(c),
            NativeValue::Map(m) => Llsd::Map(m),
            NativeValue::Array(a) => Llsd::Array(a),
        }
    }

    /// Converts the node to a host value of the declared type.
    ///
    /// Unsigned 32 and 64-bit targets are read back from the big-endian layout when
    /// the node is [`Llsd::Binary`], and truncate the signed integer value otherwise.
    /// Vector targets need an array of the right length, and container targets get a
    /// deep copy of a container of the same kind. Anything else becomes the target's
    /// default.
    ///
    /// # Example
    ///
    /// ```
    /// use llsd::{native::{FieldType, NativeValue}, Llsd};
    ///
    /// let big = Llsd::from_ulong(5_000_000_000);
    /// assert_eq!(big.to_native(FieldType::U64), NativeValue::U64(5_000_000_000));
    ///
    /// let small = Llsd::from_integer(-1);
    /// assert_eq!(small.to_native(FieldType::U32), NativeValue::U32(u32::max_value()));
    /// ```
    pub fn to_native(&self, ty: FieldType) -> NativeValue {
        let is_binary = self.kind() == LlsdType::Binary;
        match ty {
            FieldType::Bool => NativeValue::Bool(self.as_boolean()),
            FieldType::I8 => NativeValue::I8(self.as_integer() as i8),
            FieldType::U8 => NativeValue::U8(self.as_integer() as u8),
            FieldType::I16 => NativeValue::I16(self.as_integer() as i16),
            FieldType::U16 => NativeValue::U16(self.as_integer() as u16),
            FieldType::I32 => NativeValue::I32(self.as_integer()),
            FieldType::U32 if is_binary => NativeValue::U32(bytes_to_u32(&self.as_binary())),
            FieldType::U32 => NativeValue::U32(self.as_integer() as u32),
            FieldType::I64 => NativeValue::I64(self.as_long()),
            FieldType::U64 if is_binary => NativeValue::U64(bytes_to_u64(&self.as_binary())),
            FieldType::U64 => NativeValue::U64(self.as_integer() as u64),
            FieldType::F32 => NativeValue::F32(self.as_real() as f32),
            FieldType::F64 => NativeValue::F64(self.as_real()),
            FieldType::String => NativeValue::String(self.as_string()),
            FieldType::Uuid => NativeValue::Uuid(self.as_uuid()),
            FieldType::Date => NativeValue::Date(self.as_date()),
            FieldType::Uri => self.as_uri().map_or(NativeValue::Null, NativeValue::Uri),
            FieldType::Binary => NativeValue::Binary(self.as_binary()),
            FieldType::Vector2 => NativeValue::Vector2(self.as_vector2()),
            FieldType::Vector3 => NativeValue::Vector3(self.as_vector3()),
            FieldType::Vector3d => NativeValue::Vector3d(self.as_vector3d()),
            FieldType::Vector4 => NativeValue::Vector4(self.as_vector4()),
            FieldType::Quaternion => NativeValue::Quaternion(self.as_quaternion()),
            FieldType::Color4 => NativeValue::Color4(self.as_color4()),
            FieldType::Map => NativeValue::Map(self.to_map().cloned().unwrap_or_default()),
            FieldType::Array => NativeValue::Array(self.to_array().cloned().unwrap_or_default()),
        }
    }

    /// Builds a node from any [`Native`] value.
    pub fn from_native_value<T: Native>(value: &T) -> Llsd { Llsd::from_native(value.to_native()) }

    /// Converts the node to `T` through its declared [`FieldType`].
    ///
    /// # Example
    ///
    /// ```
    /// use llsd::Llsd;
    ///
    /// let n: u16 = Llsd::from_string("512.7").to_rep();
    /// assert_eq!(n, 512);
    /// ```
    pub fn to_rep<T: Native>(&self) -> T { T::from_native(self.to_native(T::FIELD_TYPE)) }
}

/// A Rust type that can stand in a marshalable field.
pub trait Native: Sized {
    /// The declared type used when converting a tree back into `Self`.
    const FIELD_TYPE: FieldType;

    /// The value with its runtime type attached.
    fn to_native(&self) -> NativeValue;

    /// Recovers `Self`. A value of a different runtime type gives the default.
    fn from_native(value: NativeValue) -> Self;
}

macro_rules! native_rep {
    ($t:ty, $var:ident) => {
        impl Native for $t {
            const FIELD_TYPE: FieldType = FieldType::$var;

            fn to_native(&self) -> NativeValue { NativeValue::$var(self.clone()) }

            fn from_native(value: NativeValue) -> Self {
                match value {
                    NativeValue::$var(v) => v,
                    _ => Self::default(),
                }
            }
        }
    };
}

native_rep!(bool, Bool);
native_rep!(i8, I8);
native_rep!(u8, U8);
native_rep!(i16, I16);
native_rep!(u16, U16);
native_rep!(i32, I32);
native_rep!(u32, U32);
native_rep!(i64, I64);
native_rep!(u64, U64);
native_rep!(f32, F32);
native_rep!(f64, F64);
native_rep!(String, String);
native_rep!(Uuid, Uuid);
native_rep!(DateTime<Utc>, Date);
native_rep!(Bytes, Binary);
native_rep!(Vector2, Vector2);
native_rep!(Vector3, Vector3);
native_rep!(Vector3d, Vector3d);
native_rep!(Vector4, Vector4);
native_rep!(Quaternion, Quaternion);
native_rep!(Color4, Color4);
native_rep!(LlsdMap, Map);
native_rep!(Vec<Llsd>, Array);

impl Native for Vec<u8> {
    const FIELD_TYPE: FieldType = FieldType::Binary;

    fn to_native(&self) -> NativeValue { NativeValue::Binary(Bytes::from(self.as_slice())) }

    fn from_native(value: NativeValue) -> Self {
        match value {
            NativeValue::Binary(b) => b.to_vec(),
            _ => Vec::new(),
        }
    }
}

macro_rules! native_option {
    ($t:ty, $var:ident) => {
        impl Native for Option<$t> {
            const FIELD_TYPE: FieldType = FieldType::$var;

            fn to_native(&self) -> NativeValue {
                match self {
                    Some(v) => NativeValue::$var(v.clone()),
                    None => NativeValue::Null,
                }
            }

            fn from_native(value: NativeValue) -> Self {
                match value {
                    NativeValue::$var(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

native_option!(Url, Uri);
native_option!(String, String);
native_option!(Bytes, Binary);

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn wide_integers_travel_as_binary() {
        for value in &[
            NativeValue::U32(u32::max_value()),
            NativeValue::I64(-2),
            NativeValue::U64(u64::max_value()),
        ] {
            assert_eq!(Llsd::from_native(value.clone()).kind(), LlsdType::Binary);
        }

        let node = Llsd::from_native(NativeValue::I64(-2));
        assert_eq!(node.to_native(FieldType::I64), NativeValue::I64(-2));

        let node = Llsd::from_native(NativeValue::U32(3_000_000_000));
        assert_eq!(node.to_native(FieldType::U32), NativeValue::U32(3_000_000_000));
    }

    #[test]
    fn unsigned_falls_back_to_integer() {
        let node = Llsd::from_integer(42);
        assert_eq!(node.to_native(FieldType::U64), NativeValue::U64(42));
        assert_eq!(node.to_native(FieldType::U8), NativeValue::U8(42));
        assert_eq!(Llsd::from_integer(300).to_native(FieldType::U8), NativeValue::U8(44));

        // only a binary node is read with the big-endian layout
        let bytes = Llsd::Array((1..=4).map(Llsd::from_integer).collect());
        assert_eq!(bytes.as_integer(), 0);
        assert_eq!(bytes.to_native(FieldType::U32), NativeValue::U32(0));
        assert_eq!(bytes.to_native(FieldType::U64), NativeValue::U64(0));
    }

    #[test]
    fn vector_targets() {
        let node = Llsd::from_native(NativeValue::Vector3(Vector3::new(1.0, 2.0, 3.0)));
        assert_eq!(
            node.to_native(FieldType::Vector3),
            NativeValue::Vector3(Vector3::new(1.0, 2.0, 3.0))
        );
        assert_eq!(
            Llsd::from_integer(1).to_native(FieldType::Quaternion),
            NativeValue::Quaternion(Quaternion::IDENTITY)
        );
    }

    #[test]
    fn container_targets_copy() {
        let mut map = LlsdMap::new();
        map.insert("a".to_owned(), Llsd::from_integer(1));
        let node = Llsd::Map(map.clone());

        assert_eq!(node.to_native(FieldType::Map), NativeValue::Map(map));
        assert_eq!(node.to_native(FieldType::Array), NativeValue::Array(Vec::new()));
    }

    #[test]
    fn missing_uri_is_null() {
        assert_eq!(Llsd::Unknown.to_native(FieldType::Uri), NativeValue::Null);
        assert_eq!(Llsd::Unknown.to_rep::<Option<Url>>(), None);
    }

    #[test]
    fn typed_reps() {
        let dt = Utc.timestamp_opt(86_400, 0).unwrap();
        assert_eq!(Llsd::from_native_value(&dt).to_rep::<DateTime<Utc>>(), dt);
        assert_eq!(Llsd::from_native_value(&vec![1u8, 2]).to_rep::<Vec<u8>>(), vec![1, 2]);
        assert_eq!(Llsd::from_string("yes").to_rep::<bool>(), true);
        assert_eq!(Llsd::from_real(2.5).to_rep::<f32>(), 2.5);
        assert_eq!(Llsd::Unknown.to_rep::<Option<String>>(), Some(String::new()));
    }
}
