//! Reactivity: typed properties with watchers and reflection, and the
//! broadcast registry that fans property changes out to dependent elements.

pub mod broadcast;
pub mod property;

pub use broadcast::{BroadcastRegistry, HolderRef, SubscribeError, Subscription};
pub use property::{
    PropertyChange, PropertyDescriptor, PropertyStore, PropertyValue, Reflection, Watcher,
};
