//! Reactive properties: typed values, change watchers, and DOM reflection.
//!
//! Widgets declare named properties through a [`PropertyStore`]. Setting a
//! property compares against the current value, runs the watcher on change,
//! and reports what the host UI tree should reflect (an attribute mirror
//! and/or a boolean class toggle). Unchanged writes are swallowed entirely.

use std::collections::HashMap;

// ---------------------------------------------------------------------------
// PropertyValue
// ---------------------------------------------------------------------------

/// A property value. The runtime is dynamically typed at this seam; widgets
/// interpret values by name.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl PropertyValue {
    /// Truthiness, used for boolean class reflection of non-bool values.
    pub fn is_truthy(&self) -> bool {
        match self {
            PropertyValue::Bool(b) => *b,
            PropertyValue::Int(i) => *i != 0,
            PropertyValue::Float(f) => *f != 0.0,
            PropertyValue::Text(s) => !s.is_empty(),
        }
    }

    /// Render the value as attribute text.
    pub fn as_attribute_text(&self) -> String {
        match self {
            PropertyValue::Bool(b) => b.to_string(),
            PropertyValue::Int(i) => i.to_string(),
            PropertyValue::Float(f) => f.to_string(),
            PropertyValue::Text(s) => s.clone(),
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(v: bool) -> Self {
        PropertyValue::Bool(v)
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Int(v)
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Float(v)
    }
}

impl From<&str> for PropertyValue {
    fn from(v: &str) -> Self {
        PropertyValue::Text(v.to_owned())
    }
}

impl From<String> for PropertyValue {
    fn from(v: String) -> Self {
        PropertyValue::Text(v)
    }
}

// ---------------------------------------------------------------------------
// Descriptors and change records
// ---------------------------------------------------------------------------

/// Watcher invoked with `(current, previous)` when a property changes.
pub type Watcher = Box<dyn FnMut(&PropertyValue, &PropertyValue)>;

/// Declaration of one named property.
pub struct PropertyDescriptor {
    pub name: String,
    pub default: PropertyValue,
    /// Mirror the value into this host attribute on change.
    pub attribute: Option<String>,
    /// Toggle this host class by the value's truthiness on change.
    pub class: Option<String>,
}

impl PropertyDescriptor {
    /// Declare a property with a default value and no reflection.
    pub fn new(name: &str, default: impl Into<PropertyValue>) -> Self {
        Self {
            name: name.to_owned(),
            default: default.into(),
            attribute: None,
            class: None,
        }
    }

    /// Mirror this property into a host attribute of the given name.
    pub fn reflect_attribute(mut self, attribute: &str) -> Self {
        self.attribute = Some(attribute.to_owned());
        self
    }

    /// Toggle a host class by this property's truthiness.
    pub fn reflect_class(mut self, class: &str) -> Self {
        self.class = Some(class.to_owned());
        self
    }
}

/// What the host UI tree should mirror after a change.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reflection {
    /// `(attribute name, new text value)`.
    pub attribute: Option<(String, String)>,
    /// `(class name, present?)`.
    pub class: Option<(String, bool)>,
}

impl Reflection {
    /// Whether there is anything to mirror.
    pub fn is_empty(&self) -> bool {
        self.attribute.is_none() && self.class.is_none()
    }
}

/// The outcome of a successful (value-changing) property set.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyChange {
    pub name: String,
    pub previous: PropertyValue,
    pub value: PropertyValue,
    pub reflection: Reflection,
}

// ---------------------------------------------------------------------------
// PropertyStore
// ---------------------------------------------------------------------------

struct PropertySlot {
    value: PropertyValue,
    attribute: Option<String>,
    class: Option<String>,
    watcher: Option<Watcher>,
}

/// Per-element property table.
#[derive(Default)]
pub struct PropertyStore {
    slots: HashMap<String, PropertySlot>,
}

impl PropertyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a property. Redeclaring resets the value to the default and
    /// replaces any reflection settings and watcher.
    pub fn declare(&mut self, descriptor: PropertyDescriptor) {
        self.slots.insert(
            descriptor.name,
            PropertySlot {
                value: descriptor.default,
                attribute: descriptor.attribute,
                class: descriptor.class,
                watcher: None,
            },
        );
    }

    /// Declare a property with a change watcher.
    pub fn declare_watched(&mut self, descriptor: PropertyDescriptor, watcher: Watcher) {
        self.slots.insert(
            descriptor.name,
            PropertySlot {
                value: descriptor.default,
                attribute: descriptor.attribute,
                class: descriptor.class,
                watcher: Some(watcher),
            },
        );
    }

    /// Whether a property of this name is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Current value of a declared property.
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.slots.get(name).map(|slot| &slot.value)
    }

    /// Set a declared property.
    ///
    /// Returns `None` when the property is undeclared or the value is equal
    /// to the current one — no watcher runs and nothing is reflected.
    /// Otherwise the watcher runs with `(current, previous)` and the change
    /// record carries the reflection the host tree should apply.
    pub fn set(&mut self, name: &str, value: PropertyValue) -> Option<PropertyChange> {
        let slot = self.slots.get_mut(name)?;
        if slot.value == value {
            return None;
        }
        let previous = std::mem::replace(&mut slot.value, value.clone());
        if let Some(watcher) = slot.watcher.as_mut() {
            watcher(&value, &previous);
        }
        let reflection = Reflection {
            attribute: slot
                .attribute
                .as_ref()
                .map(|attr| (attr.clone(), value.as_attribute_text())),
            class: slot
                .class
                .as_ref()
                .map(|class| (class.clone(), value.is_truthy())),
        };
        Some(PropertyChange {
            name: name.to_owned(),
            previous,
            value,
            reflection,
        })
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    // ── Values ───────────────────────────────────────────────────────

    #[test]
    fn truthiness() {
        assert!(PropertyValue::Bool(true).is_truthy());
        assert!(!PropertyValue::Bool(false).is_truthy());
        assert!(PropertyValue::Int(2).is_truthy());
        assert!(!PropertyValue::Int(0).is_truthy());
        assert!(PropertyValue::Text("x".into()).is_truthy());
        assert!(!PropertyValue::Text(String::new()).is_truthy());
    }

    #[test]
    fn attribute_text() {
        assert_eq!(PropertyValue::Bool(true).as_attribute_text(), "true");
        assert_eq!(PropertyValue::Int(-3).as_attribute_text(), "-3");
        assert_eq!(PropertyValue::Text("hi".into()).as_attribute_text(), "hi");
    }

    // ── Store ────────────────────────────────────────────────────────

    #[test]
    fn declare_sets_default() {
        let mut store = PropertyStore::new();
        store.declare(PropertyDescriptor::new("count", 0i64));
        assert_eq!(store.get("count"), Some(&PropertyValue::Int(0)));
    }

    #[test]
    fn set_changes_value_and_reports() {
        let mut store = PropertyStore::new();
        store.declare(PropertyDescriptor::new("count", 0i64));
        let change = store.set("count", PropertyValue::Int(5)).unwrap();
        assert_eq!(change.previous, PropertyValue::Int(0));
        assert_eq!(change.value, PropertyValue::Int(5));
        assert_eq!(store.get("count"), Some(&PropertyValue::Int(5)));
    }

    #[test]
    fn unchanged_set_is_swallowed() {
        let mut store = PropertyStore::new();
        store.declare(PropertyDescriptor::new("label", "hi"));
        assert!(store.set("label", PropertyValue::Text("hi".into())).is_none());
    }

    #[test]
    fn undeclared_set_is_none() {
        let mut store = PropertyStore::new();
        assert!(store.set("missing", PropertyValue::Bool(true)).is_none());
    }

    #[test]
    fn watcher_sees_current_and_previous() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut store = PropertyStore::new();
        store.declare_watched(
            PropertyDescriptor::new("count", 1i64),
            Box::new(move |cur, prev| {
                sink.borrow_mut().push((cur.clone(), prev.clone()));
            }),
        );
        store.set("count", PropertyValue::Int(2));
        store.set("count", PropertyValue::Int(2));
        store.set("count", PropertyValue::Int(3));
        assert_eq!(
            *seen.borrow(),
            vec![
                (PropertyValue::Int(2), PropertyValue::Int(1)),
                (PropertyValue::Int(3), PropertyValue::Int(2)),
            ]
        );
    }

    // ── Reflection ───────────────────────────────────────────────────

    #[test]
    fn attribute_reflection_mirrors_value() {
        let mut store = PropertyStore::new();
        store.declare(PropertyDescriptor::new("title", "").reflect_attribute("data-title"));
        let change = store.set("title", PropertyValue::Text("Hello".into())).unwrap();
        assert_eq!(
            change.reflection.attribute,
            Some(("data-title".into(), "Hello".into()))
        );
        assert!(change.reflection.class.is_none());
    }

    #[test]
    fn class_reflection_follows_truthiness() {
        let mut store = PropertyStore::new();
        store.declare(PropertyDescriptor::new("open", false).reflect_class("-open"));
        let change = store.set("open", PropertyValue::Bool(true)).unwrap();
        assert_eq!(change.reflection.class, Some(("-open".into(), true)));
        let change = store.set("open", PropertyValue::Bool(false)).unwrap();
        assert_eq!(change.reflection.class, Some(("-open".into(), false)));
    }

    #[test]
    fn no_reflection_when_undeclared() {
        let mut store = PropertyStore::new();
        store.declare(PropertyDescriptor::new("count", 0i64));
        let change = store.set("count", PropertyValue::Int(1)).unwrap();
        assert!(change.reflection.is_empty());
    }
}
