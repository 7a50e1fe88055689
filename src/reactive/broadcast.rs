//! Property broadcast registry: (holder, property) → dependent fan-out.
//!
//! Elements subscribe to properties held by other elements. The registry is a
//! pure bookkeeping map of raw element ids: it holds no ownership, performs no
//! liveness checks, and is never pruned. Stale dependents are filtered at
//! fan-out time by whoever consults the map, and generational ids make a
//! stale entry resolve to nothing rather than to a reused slot.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::element::ElementId;

// ---------------------------------------------------------------------------
// Subscription requests
// ---------------------------------------------------------------------------

/// How a subscription names its holder: directly by id, or by registered
/// element name resolved at subscription time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HolderRef {
    Id(ElementId),
    Path(String),
}

/// One holder plus the property names to watch on it.
#[derive(Debug, Clone)]
pub struct Subscription {
    pub holder: HolderRef,
    pub properties: Vec<String>,
}

impl Subscription {
    /// Watch properties on a holder named by id.
    pub fn to_id(holder: ElementId, properties: &[&str]) -> Self {
        Self {
            holder: HolderRef::Id(holder),
            properties: properties.iter().map(|p| (*p).to_owned()).collect(),
        }
    }

    /// Watch properties on a holder named by registered path.
    pub fn to_path(path: &str, properties: &[&str]) -> Self {
        Self {
            holder: HolderRef::Path(path.to_owned()),
            properties: properties.iter().map(|p| (*p).to_owned()).collect(),
        }
    }
}

/// Subscription failure. An unresolved holder path is a programming error in
/// the declaration, not a runtime condition to retry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubscribeError {
    #[error("cannot resolve watched element path {0:?}")]
    UnresolvedHolder(String),
}

// ---------------------------------------------------------------------------
// BroadcastRegistry
// ---------------------------------------------------------------------------

/// Non-owning fan-out map from `(holder, property)` to dependent elements.
#[derive(Debug, Default)]
pub struct BroadcastRegistry {
    entries: HashMap<(ElementId, String), HashSet<ElementId>>,
}

impl BroadcastRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `dependent` for every `(holder, property)` pair the
    /// subscriptions name. `names` resolves path holders.
    ///
    /// All paths are resolved before anything is recorded, so a failed call
    /// leaves the registry untouched. Re-subscribing an already-registered
    /// pair is a no-op.
    pub fn subscribe(
        &mut self,
        dependent: ElementId,
        subscriptions: &[Subscription],
        names: &HashMap<String, ElementId>,
    ) -> Result<(), SubscribeError> {
        let mut resolved = Vec::new();
        for sub in subscriptions {
            let holder = match &sub.holder {
                HolderRef::Id(id) => *id,
                HolderRef::Path(path) => *names
                    .get(path)
                    .ok_or_else(|| SubscribeError::UnresolvedHolder(path.clone()))?,
            };
            for property in &sub.properties {
                resolved.push((holder, property.clone()));
            }
        }
        for key in resolved {
            self.entries.entry(key).or_default().insert(dependent);
        }
        Ok(())
    }

    /// The dependents registered for `(holder, property)`, in no particular
    /// order. Ids of since-detached elements may appear; callers filter.
    pub fn dependents(&self, holder: ElementId, property: &str) -> Vec<ElementId> {
        self.entries
            .get(&(holder, property.to_owned()))
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Whether any dependent is registered for `(holder, property)`.
    pub fn has_dependents(&self, holder: ElementId, property: &str) -> bool {
        self.entries
            .get(&(holder, property.to_owned()))
            .is_some_and(|set| !set.is_empty())
    }

    /// Total number of `(holder, property)` keys ever registered.
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
