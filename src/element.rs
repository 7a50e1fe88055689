//! Element identity.
//!
//! Every widget attached to the runtime gets a generational [`ElementId`] from
//! a slotmap arena. Generational keys make stale handles harmless: an id held
//! across a detach simply stops resolving instead of aliasing a newer element.

use slotmap::new_key_type;

new_key_type! {
    /// Generational key identifying a widget in the runtime's element arena.
    pub struct ElementId;
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn ids_are_distinct() {
        let mut sm: SlotMap<ElementId, &str> = SlotMap::with_key();
        let a = sm.insert("a");
        let b = sm.insert("b");
        assert_ne!(a, b);
    }

    #[test]
    fn stale_id_misses_after_removal() {
        let mut sm: SlotMap<ElementId, &str> = SlotMap::with_key();
        let a = sm.insert("a");
        sm.remove(a);
        assert!(sm.get(a).is_none());
    }

    #[test]
    fn reused_slot_gets_fresh_generation() {
        let mut sm: SlotMap<ElementId, &str> = SlotMap::with_key();
        let a = sm.insert("a");
        sm.remove(a);
        let b = sm.insert("b");
        assert_ne!(a, b);
        assert!(sm.get(a).is_none());
        assert_eq!(sm.get(b), Some(&"b"));
    }
}
