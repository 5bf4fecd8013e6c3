//! Typed messages decoded from named events.
//!
//! An event arrives as a name and a map. An [`EventRegistry`] maps the name to a
//! constructor for a concrete [`Message`], which then reads itself from the map.
//!
//! ```
//! use llsd::prelude::*;
//!
//! #[derive(Debug, Default, Members)]
//! struct TeleportFailed {
//!     reason: String,
//! }
//!
//! impl Message for TeleportFailed {
//!     fn serialize(&self) -> LlsdMap { serialize_members(self) }
//!
//!     fn deserialize(&mut self, map: &LlsdMap) -> Result<(), Error> {
//!         deserialize_members(self, map);
//!         Ok(())
//!     }
//! }
//!
//! let mut registry = EventRegistry::new();
//! registry.register::<TeleportFailed>("TeleportFailed");
//!
//! let mut map = LlsdMap::new();
//! map.insert("reason".to_owned(), Llsd::from_string("no landing point"));
//!
//! let msg = registry.decode_event("TeleportFailed", &map).unwrap();
//! assert_eq!(msg.serialize()["reason"].as_string(), "no landing point");
//! assert!(registry.decode_event("Unheard", &map).is_none());
//! ```

use crate::LlsdMap;
use failure::Error;
use hashbrown::HashMap;
use log::{debug, error};

/// A strongly typed message carried as a map.
pub trait Message {
    /// Writes the message as a map.
    fn serialize(&self) -> LlsdMap;

    /// Reads the message from a map.
    fn deserialize(&mut self, map: &LlsdMap) -> Result<(), Error>;
}

/// Builds an empty message for an event, possibly choosing the concrete type from the
/// event body.
pub type MessageFactory = fn(&LlsdMap) -> Box<dyn Message>;

fn default_factory<T: Message + Default + 'static>(_: &LlsdMap) -> Box<dyn Message> {
    Box::new(T::default())
}

#[derive(Default)]
/// Maps event names to message constructors.
pub struct EventRegistry {
    factories: HashMap<String, MessageFactory>,
}

impl EventRegistry {
    pub fn new() -> Self { Self::default() }

    /// Decodes events called `name` into a default `T`.
    pub fn register<T: Message + Default + 'static>(&mut self, name: &str) {
        self.register_with(name, default_factory::<T>);
    }

    /// Decodes events called `name` into whatever `factory` builds for the event body.
    /// Replaces any earlier registration for the same name.
    pub fn register_with(&mut self, name: &str, factory: MessageFactory) {
        self.factories.insert(name.to_owned(), factory);
    }

    pub fn contains(&self, name: &str) -> bool { self.factories.contains_key(name) }

    pub fn len(&self) -> usize { self.factories.len() }

    pub fn is_empty(&self) -> bool { self.factories.is_empty() }

    /// Builds and fills the message registered for `name`.
    ///
    /// Returns `None` when nothing is registered for the name, or when the message
    /// fails to read the map. The latter is logged.
    pub fn decode_event(&self, name: &str, map: &LlsdMap) -> Option<Box<dyn Message>> {
        let factory = match self.factories.get(name) {
            Some(f) => f,
            None => {
                debug!("no message registered for event {}", name);
                return None;
            }
        };

        let mut message = factory(map);
        match message.deserialize(map) {
            Ok(()) => Some(message),
            Err(e) => {
                error!("failed to deserialize event {}: {}", name, e);
                None
            }
        }
    }
}

impl std::fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("EventRegistry").field("events", &names).finish()
    }
}
