//! Specialized collection types

pub use slotmap::{SlotMap, DefaultKey, Key};

/// Handle-based map using slot map for stable references
pub type HandleMap<T> = SlotMap<DefaultKey, T>;

/// Handle type for stable references
pub type Handle = DefaultKey;

slotmap::new_key_type! {
    /// Generation-checked id of a queue slot
    ///
    /// The version of a slot changes every time the slot is reused, so an id
    /// kept past its removal never aliases the value that later takes its place.
    pub struct SlotId;
}
