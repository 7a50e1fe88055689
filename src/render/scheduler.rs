//! Render scheduling: coalesced commits and lifecycle ordering.
//!
//! [`RenderScheduler`] keeps per-element [`RenderState`] and a pending queue.
//! `request_render` marks an element dirty; a second request inside the same
//! cycle is absorbed. The host loop calls `run_frame` once per frame tick —
//! the runtime's frame boundary — which executes one cycle per pending
//! element: first-cycle hook, abortable pre-render hook, template call,
//! display commit, post-commit hooks, deferred-resize replay, and deferred
//! property application, in that order.
//!
//! [`ResizeGuard`] is the shared flag gating automatic layout resizing while
//! a text-capable widget holds focus.

use std::time::{Duration, Instant};

use slotmap::SecondaryMap;

use crate::element::ElementId;
use crate::geometry::Size;
use crate::reactive::property::PropertyValue;
use crate::render::surface::Surface;
use crate::widget::traits::{ElementArena, RenderGate};

// ---------------------------------------------------------------------------
// RenderState
// ---------------------------------------------------------------------------

/// Per-element scheduler bookkeeping.
///
/// Created when an element attaches, destroyed when it detaches. Nothing in
/// here survives detachment.
#[derive(Debug, Default)]
pub struct RenderState {
    /// True for at most one scheduling cycle; absorbs re-entrant requests.
    pub needs_render: bool,
    /// Flips false→true exactly once, on the first successful commit.
    pub has_rendered_once: bool,
    /// Stored event-dispatch receiver for commits.
    pub event_context: Option<ElementId>,
    /// Whether `before_first_render` has run (first cycle ever).
    ran_first_cycle: bool,
    /// Resize that arrived before the first commit; latest wins.
    deferred_resize: Option<Size>,
    /// Property to apply after the next successful commit.
    deferred_set: Option<(String, PropertyValue)>,
}

// ---------------------------------------------------------------------------
// RenderScheduler
// ---------------------------------------------------------------------------

/// Coalesces render requests into one display commit per frame per element.
#[derive(Default)]
pub struct RenderScheduler {
    states: SecondaryMap<ElementId, RenderState>,
    /// Pending elements in request order, with an optional per-call context.
    queue: Vec<(ElementId, Option<ElementId>)>,
}

impl RenderScheduler {
    /// Create a new scheduler with no tracked elements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking an element. Called on attachment.
    pub fn attach(&mut self, id: ElementId) {
        self.states.insert(id, RenderState::default());
    }

    /// Stop tracking an element and drop its state. Called on detachment.
    pub fn detach(&mut self, id: ElementId) {
        self.states.remove(id);
    }

    /// Whether the scheduler tracks the given element.
    pub fn is_attached(&self, id: ElementId) -> bool {
        self.states.contains_key(id)
    }

    /// Request a render for `id`, optionally with a per-call event context.
    ///
    /// If a cycle is already pending for this element the call is absorbed:
    /// no duplicate cycle is created and the original context is kept.
    /// Requests for untracked elements are ignored.
    pub fn request_render(&mut self, id: ElementId, context: Option<ElementId>) {
        let Some(state) = self.states.get_mut(id) else {
            return;
        };
        if state.needs_render {
            return;
        }
        state.needs_render = true;
        self.queue.push((id, context));
    }

    /// Set the stored event-dispatch receiver for future commits.
    pub fn set_event_context(&mut self, id: ElementId, context: Option<ElementId>) {
        if let Some(state) = self.states.get_mut(id) {
            state.event_context = context;
        }
    }

    /// Deliver a resize to `id`.
    ///
    /// Elements that have committed at least once get `on_resized`
    /// immediately; otherwise the size is stored (latest wins) and replayed
    /// once, right after `on_first_rendered`.
    pub fn dispatch_resize(&mut self, id: ElementId, size: Size, elements: &mut ElementArena) {
        let Some(state) = self.states.get_mut(id) else {
            return;
        };
        if state.has_rendered_once {
            if let Some(widget) = elements.get_mut(id) {
                widget.on_resized(size);
            }
        } else {
            state.deferred_resize = Some(size);
        }
    }

    /// Record a property pair to apply after the next successful commit.
    pub fn schedule_set_property(&mut self, id: ElementId, name: &str, value: PropertyValue) {
        if let Some(state) = self.states.get_mut(id) {
            state.deferred_set = Some((name.to_owned(), value));
        }
    }

    /// Whether any element is pending a render.
    pub fn has_pending(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Whether the given element is pending a render.
    pub fn is_pending(&self, id: ElementId) -> bool {
        self.states.get(id).is_some_and(|s| s.needs_render)
    }

    /// Whether the given element has committed at least once.
    pub fn has_rendered_once(&self, id: ElementId) -> bool {
        self.states.get(id).is_some_and(|s| s.has_rendered_once)
    }

    /// Execute one scheduling cycle for every pending element, in request
    /// order, committing template output to `surface`.
    ///
    /// Renders requested from inside lifecycle hooks land in the queue for
    /// the *next* frame — a cycle never re-enters itself.
    pub fn run_frame(&mut self, elements: &mut ElementArena, surface: &mut dyn Surface) {
        let queue = std::mem::take(&mut self.queue);
        for (id, call_context) in queue {
            self.run_cycle(id, call_context, elements, surface);
        }
    }

    /// One scheduling cycle for one element.
    fn run_cycle(
        &mut self,
        id: ElementId,
        call_context: Option<ElementId>,
        elements: &mut ElementArena,
        surface: &mut dyn Surface,
    ) {
        let Some(widget) = elements.get_mut(id) else {
            // Detached between request and frame.
            self.states.remove(id);
            return;
        };
        let Some(state) = self.states.get_mut(id) else {
            return;
        };

        if !widget.has_template() {
            if !widget.is_structural() {
                log::warn!("render requested for {} element with no template", widget.kind());
            }
            state.needs_render = false;
            return;
        }

        if !state.ran_first_cycle {
            state.ran_first_cycle = true;
            widget.before_first_render();
        }

        if let RenderGate::Abort = widget.before_render() {
            state.needs_render = false;
            return;
        }

        state.needs_render = false;

        // A template yielding nothing is the normal "not ready" path: no
        // commit, no post-commit hooks.
        let Some(strips) = widget.template() else {
            return;
        };

        let context = call_context.or(state.event_context).unwrap_or(id);
        surface.commit(id, strips, context);

        if !state.has_rendered_once {
            // Set before the hook runs so a render requested from inside it
            // cannot re-enter the first-render path.
            state.has_rendered_once = true;
            widget.on_first_rendered();
            if let Some(size) = state.deferred_resize.take() {
                widget.on_resized(size);
            }
        }

        widget.on_rendered();

        if let Some((name, value)) = state.deferred_set.take() {
            widget.set_property(&name, value);
        }
    }
}

// ---------------------------------------------------------------------------
// ResizeGuard
// ---------------------------------------------------------------------------

/// Delay between a text field losing focus and automatic resizing resuming.
pub const RESIZE_RELEASE_DELAY: Duration = Duration::from_millis(200);

/// Shared flag gating automatic layout resizing.
///
/// Text-capable widgets block resizing while focused; on blur the release is
/// delayed by [`RESIZE_RELEASE_DELAY`]. Last writer wins — there is no
/// reference counting, so interleaved focus/blur across multiple inputs can
/// race (accepted limitation).
#[derive(Debug, Default)]
pub struct ResizeGuard {
    blocked: bool,
    release_at: Option<Instant>,
}

impl ResizeGuard {
    /// Create an unblocked guard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Block automatic resizing immediately, cancelling a pending release.
    pub fn block(&mut self) {
        self.blocked = true;
        self.release_at = None;
    }

    /// Arm a delayed release relative to `now`.
    pub fn schedule_release(&mut self, now: Instant) {
        self.release_at = Some(now + RESIZE_RELEASE_DELAY);
    }

    /// Release the guard if its delay has elapsed. Harmless when idle.
    pub fn tick(&mut self, now: Instant) {
        if let Some(at) = self.release_at {
            if now >= at {
                self.blocked = false;
                self.release_at = None;
            }
        }
    }

    /// Whether automatic resizing is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked
    }
}

// ===========================================================================
// Tests
// ===========================================================================
