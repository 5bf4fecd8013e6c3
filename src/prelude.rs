pub use crate::{
    encoding::{
        deserialize, deserialize_str, deserialize_stream, detect_format, detect_format_str,
        serialize, Codec, Format,
    },
    error::LlsdError,
    math::*,
    members::{deserialize_members, serialize_members, Field, Members},
    message::{EventRegistry, Message},
    native::{FieldType, Native, NativeValue},
    Llsd, LlsdMap, LlsdType,
};
pub use bytes::Bytes;
pub use chrono::{DateTime, Utc};
pub use failure::Error;
pub use url::Url;
pub use uuid::Uuid;
