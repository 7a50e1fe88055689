//! The `Renderable` trait: the contract between widgets and the scheduler.
//!
//! Widgets implement `Renderable` to take part in scheduling cycles. Every
//! lifecycle hook has a default, so a minimal widget only provides `kind`,
//! `template`, and the `Any` escape hatches for downcasting.

use std::any::Any;
use std::time::Instant;

use slotmap::SlotMap;

use crate::element::ElementId;
use crate::event::input::KeyEvent;
use crate::event::message::Message;
use crate::geometry::Size;
use crate::reactive::property::PropertyValue;
use crate::render::strip::Strip;

/// The arena holding every attached widget, keyed by [`ElementId`].
pub type ElementArena = SlotMap<ElementId, Box<dyn Renderable>>;

// ---------------------------------------------------------------------------
// RenderGate
// ---------------------------------------------------------------------------

/// Outcome of `before_render`: continue the cycle or abort it.
///
/// An aborted cycle consumes the pending request without committing; the
/// widget renders again only on a fresh request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderGate {
    Proceed,
    Abort,
}

// ---------------------------------------------------------------------------
// Renderable
// ---------------------------------------------------------------------------

/// A widget the scheduler can run cycles for.
///
/// Hook order within one cycle: `before_first_render` (first cycle only),
/// `before_render`, `template`, commit, `on_first_rendered` (first commit
/// only, followed by any deferred resize), `on_rendered`, deferred
/// `set_property`.
pub trait Renderable {
    /// Widget kind name, used in logs.
    fn kind(&self) -> &str;

    /// Whether this widget produces display output at all. Widgets without a
    /// template are skipped with a warning unless they are structural.
    fn has_template(&self) -> bool {
        true
    }

    /// Structural widgets (pure containers) have no template by design and
    /// are skipped silently.
    fn is_structural(&self) -> bool {
        false
    }

    /// Produce this widget's display output. `None` means "nothing to show
    /// yet": the cycle ends without a commit and without post-commit hooks.
    fn template(&self) -> Option<Vec<Strip>>;

    /// Called once when the widget is attached to the runtime.
    fn on_connected(&mut self) {}

    /// Called once, at the start of the widget's first scheduling cycle.
    fn before_first_render(&mut self) {}

    /// Called at the start of every cycle; may abort it.
    fn before_render(&mut self) -> RenderGate {
        RenderGate::Proceed
    }

    /// Called once, immediately after the first successful commit.
    fn on_first_rendered(&mut self) {}

    /// Called after every successful commit.
    fn on_rendered(&mut self) {}

    /// Called when the widget's area changes size.
    fn on_resized(&mut self, _size: Size) {}

    /// Apply a named property value.
    fn set_property(&mut self, _name: &str, _value: PropertyValue) {}

    /// Handle a key event; return a message to enqueue, if any.
    fn handle_key(&mut self, _key: &KeyEvent) -> Option<Box<dyn Message>> {
        None
    }

    /// Whether this widget accepts keyboard focus.
    fn can_focus(&self) -> bool {
        false
    }

    /// Called when the widget gains focus.
    fn on_focus(&mut self) {}

    /// Called when the widget loses focus.
    fn on_blur(&mut self) {}

    /// Whether focusing this widget should block automatic layout resizing.
    fn wants_resize_lock(&self) -> bool {
        false
    }

    /// Time-based housekeeping; called once per frame with the current time.
    fn tick(&mut self, _now: Instant) {}

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// ===========================================================================
// Tests
// ===========================================================================
