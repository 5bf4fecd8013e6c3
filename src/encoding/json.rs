//! The JSON codec.
//!
//! Unknown is `null`. Booleans, integers, reals, strings, arrays and maps are native
//! JSON values. Identifiers, dates and URIs are written as their text rendering, and
//! binary payloads as an array of byte values. Non-finite reals have no JSON form and
//! are written as `null`.
//!
//! When reading, a number that fits in 32 bits becomes an integer, a wider integer
//! becomes the 8 byte binary form used for 64-bit values, and anything with a fraction
//! or exponent becomes a real.

use super::*;
use serde_json::{Map as JsonMap, Number, Value};

#[derive(Clone, Copy, Debug, Default)]
/// The JSON codec. `pretty` indents nested values.
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode(&self, value: &Llsd, pretty: bool) -> Result<Vec<u8>, Error> {
        let json = to_json(value);
        let out = if pretty {
            serde_json::to_vec_pretty(&json)?
        } else {
            serde_json::to_vec(&json)?
        };
        Ok(out)
    }

    fn decode(&self, bs: &[u8]) -> Result<Llsd, Error> {
        let json: Value = serde_json::from_slice(bs)?;
        Ok(from_json(json))
    }
}

/// Converts a tree to a JSON value.
pub fn to_json(value: &Llsd) -> Value {
    match value {
        Llsd::Unknown => Value::Null,
        Llsd::Boolean(b) => Value::Bool(*b),
        Llsd::Integer(i) => Value::Number((*i).into()),
        Llsd::Real(r) => Number::from_f64(*r).map_or(Value::Null, Value::Number),
        Llsd::String(s) => Value::String(s.clone()),
        Llsd::Uuid(_) | Llsd::Date(_) | Llsd::Uri(_) => Value::String(value.as_string()),
        Llsd::Binary(b) => Value::Array(b.iter().map(|byte| Value::from(*byte)).collect()),
        Llsd::Map(m) => Value::Object(
            m.iter()
                .map(|(k, v)| (k.clone(), to_json(v)))
                .collect::<JsonMap<String, Value>>(),
        ),
        Llsd::Array(a) => Value::Array(a.iter().map(to_json).collect()),
    }
}

/// Converts a JSON value to a tree.
pub fn from_json(json: Value) -> Llsd {
    match json {
        Value::Null => Llsd::Unknown,
        Value::Bool(b) => Llsd::from_boolean(b),
        Value::Number(n) => from_number(&n),
        Value::String(s) => Llsd::from_string(s),
        Value::Array(a) => Llsd::Array(a.into_iter().map(from_json).collect()),
        Value::Object(o) => Llsd::Map(o.into_iter().map(|(k, v)| (k, from_json(v))).collect()),
    }
}

fn from_number(n: &Number) -> Llsd {
    if let Some(i) = n.as_i64() {
        if i >= i64::from(i32::min_value()) && i <= i64::from(i32::max_value()) {
            Llsd::from_integer(i as i32)
        } else {
            Llsd::from_long(i)
        }
    } else if let Some(u) = n.as_u64() {
        Llsd::from_ulong(u)
    } else {
        Llsd::from_real(n.as_f64().unwrap_or(0.0))
    }
}
