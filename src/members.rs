//! Marshaling between host structs and map nodes.
//!
//! A marshalable type lists its fields in a static table of [`Field`]s and exposes
//! them by name through the [`Members`] trait. [`serialize_members`] and
//! [`deserialize_members`] walk that table. The table and accessors are normally
//! generated with `#[derive(Members)]`:
//!
//! ```
//! use llsd::prelude::*;
//!
//! #[derive(Debug, Default, Members, PartialEq)]
//! struct AgentUpdate {
//!     agent_id: Uuid,
//!     #[llsd(rename = "Position")]
//!     position: Vector3,
//!     region_handle: u64,
//!     #[llsd(skip)]
//!     dirty: bool,
//! }
//!
//! let update = AgentUpdate {
//!     agent_id: Uuid::from_u128(1),
//!     position: Vector3::new(128.0, 128.0, 22.5),
//!     region_handle: 1_099_511_628_032_000,
//!     dirty: true,
//! };
//!
//! let map = serialize_members(&update);
//! assert!(map.contains_key("Position"));
//! assert!(!map.contains_key("dirty"));
//!
//! let mut decoded = AgentUpdate::default();
//! deserialize_members(&mut decoded, &map);
//! assert_eq!(decoded.region_handle, update.region_handle);
//! assert_eq!(decoded.position, update.position);
//! assert!(!decoded.dirty);
//! ```

use crate::{
    native::{FieldType, NativeValue},
    Llsd, LlsdMap,
};

pub use llsd_derive::Members;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// One entry of a type's field table.
pub struct Field {
    /// The key the field is stored under.
    pub name: &'static str,
    /// The declared type of the field.
    pub ty: FieldType,
    /// Write the field even when its value converts to [`Llsd::Unknown`].
    pub always_include: bool,
}

impl Field {
    pub const fn new(name: &'static str, ty: FieldType) -> Field {
        Field {
            name,
            ty,
            always_include: ty.always_included(),
        }
    }
}

/// A type whose fields can be marshaled by name.
pub trait Members {
    /// The marshalable fields, in declaration order.
    const FIELDS: &'static [Field];

    /// Reads the field called `name`.
    fn member(&self, name: &str) -> Option<NativeValue>;

    /// Writes the field called `name`. Returns `false` if there is no such field.
    fn set_member(&mut self, name: &str, value: NativeValue) -> bool;
}

/// Converts every marshalable field of `obj` into a map entry keyed by its name.
///
/// Fields that convert to [`Llsd::Unknown`] are left out, except text and raw-byte
/// fields, which are always present.
pub fn serialize_members<T: Members>(obj: &T) -> LlsdMap {
    let mut map = LlsdMap::with_capacity(T::FIELDS.len());
    for field in T::FIELDS {
        let value = match obj.member(field.name) {
            Some(v) => Llsd::from_native(v),
            None => continue,
        };
        if !value.is_unknown() || field.always_include {
            map.insert(field.name.to_owned(), value);
        }
    }
    map
}

/// Writes every marshalable field present in `map` back into `obj`, converting each
/// node to the field's declared type.
///
/// Keys missing from the map leave their fields untouched, and keys that are not
/// fields are ignored.
pub fn deserialize_members<T: Members>(obj: &mut T, map: &LlsdMap) {
    for field in T::FIELDS {
        if let Some(node) = map.get(field.name) {
            obj.set_member(field.name, node.to_native(field.ty));
        }
    }
}
