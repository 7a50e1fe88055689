//! The widget runtime: element arena, properties, scheduling, broadcast
//! fan-out, focus, and message routing.
//!
//! One `Runtime` owns every attached widget. Property writes go through the
//! runtime so a single change can run the watcher, reflect into the host
//! tree, schedule the holder's re-render, and fan out to broadcast
//! dependents. Key input goes to an open dialog only when it claims the
//! key (Escape, or any key in input mode); everything else reaches the
//! focused element, so option buttons keep working under a choice dialog.

use std::collections::HashMap;
use std::time::Instant;

use slotmap::SecondaryMap;

use crate::element::ElementId;
use crate::event::handler::EventDispatcher;
use crate::event::input::{Key, KeyEvent};
use crate::event::message::{Envelope, Press};
use crate::geometry::Size;
use crate::reactive::broadcast::{BroadcastRegistry, SubscribeError, Subscription};
use crate::reactive::property::{PropertyChange, PropertyDescriptor, PropertyStore, PropertyValue, Watcher};
use crate::render::scheduler::{RenderScheduler, ResizeGuard};
use crate::render::surface::Surface;
use crate::widget::traits::{ElementArena, Renderable};
use crate::widgets::dialog::{Dialog, ModalMode};

// ---------------------------------------------------------------------------
// Runtime
// ---------------------------------------------------------------------------

/// Owns the widget tree and every cross-cutting service around it.
pub struct Runtime {
    elements: ElementArena,
    properties: SecondaryMap<ElementId, PropertyStore>,
    scheduler: RenderScheduler,
    registry: BroadcastRegistry,
    dispatcher: EventDispatcher,
    resize_guard: ResizeGuard,
    names: HashMap<String, ElementId>,
    focused: Option<ElementId>,
    size: Size,
}

impl Runtime {
    /// Create an empty runtime with the given viewport size.
    pub fn new(size: Size) -> Self {
        Self {
            elements: ElementArena::with_key(),
            properties: SecondaryMap::new(),
            scheduler: RenderScheduler::new(),
            registry: BroadcastRegistry::new(),
            dispatcher: EventDispatcher::new(),
            resize_guard: ResizeGuard::new(),
            names: HashMap::new(),
            focused: None,
            size,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    // ── Attachment ───────────────────────────────────────────────────

    /// Attach a widget. Runs `on_connected` and starts scheduler tracking;
    /// the first render still needs an explicit request.
    pub fn attach(&mut self, widget: Box<dyn Renderable>) -> ElementId {
        let id = self.elements.insert(widget);
        self.properties.insert(id, PropertyStore::new());
        self.scheduler.attach(id);
        self.elements[id].on_connected();
        id
    }

    /// Attach a widget under a name resolvable by broadcast subscriptions.
    pub fn attach_named(&mut self, name: &str, widget: Box<dyn Renderable>) -> ElementId {
        let id = self.attach(widget);
        self.names.insert(name.to_owned(), id);
        id
    }

    /// Detach a widget. Broadcast registry entries naming it remain; its
    /// generational id keeps them from ever resolving to a reused slot.
    pub fn detach(&mut self, id: ElementId) {
        self.elements.remove(id);
        self.properties.remove(id);
        self.scheduler.detach(id);
        self.names.retain(|_, named| *named != id);
        if self.focused == Some(id) {
            self.focused = None;
        }
    }

    /// Resolve a registered element name.
    pub fn lookup(&self, name: &str) -> Option<ElementId> {
        self.names.get(name).copied()
    }

    pub fn is_attached(&self, id: ElementId) -> bool {
        self.elements.contains_key(id)
    }

    // ── Properties ───────────────────────────────────────────────────

    /// Declare a property on an element.
    pub fn declare_property(&mut self, id: ElementId, descriptor: PropertyDescriptor) {
        if let Some(store) = self.properties.get_mut(id) {
            store.declare(descriptor);
        }
    }

    /// Declare a property with a change watcher.
    pub fn declare_watched(
        &mut self,
        id: ElementId,
        descriptor: PropertyDescriptor,
        watcher: Watcher,
    ) {
        if let Some(store) = self.properties.get_mut(id) {
            store.declare_watched(descriptor, watcher);
        }
    }

    /// Current value of a declared property.
    pub fn get_property(&self, id: ElementId, name: &str) -> Option<&PropertyValue> {
        self.properties.get(id)?.get(name)
    }

    /// Set a declared property on an element.
    ///
    /// On a value change: the watcher runs, the widget sees the new value,
    /// the holder is scheduled for re-render, and every live broadcast
    /// dependent of `(id, name)` is scheduled too. The returned change
    /// carries the reflection for the host tree. Unchanged writes return
    /// `None` and do none of that.
    pub fn set_property(
        &mut self,
        id: ElementId,
        name: &str,
        value: PropertyValue,
    ) -> Option<PropertyChange> {
        let store = self.properties.get_mut(id)?;
        let change = store.set(name, value)?;
        if let Some(widget) = self.elements.get_mut(id) {
            widget.set_property(name, change.value.clone());
        }
        self.scheduler.request_render(id, None);
        for dependent in self.registry.dependents(id, name) {
            if self.elements.contains_key(dependent) {
                self.scheduler.request_render(dependent, None);
            }
        }
        Some(change)
    }

    /// Defer a property write until after the element's next commit.
    pub fn set_property_after_render(&mut self, id: ElementId, name: &str, value: PropertyValue) {
        self.scheduler.schedule_set_property(id, name, value);
    }

    /// Register `dependent` for broadcast re-renders of the named holders'
    /// properties. Path holders resolve against registered names.
    pub fn subscribe(
        &mut self,
        dependent: ElementId,
        subscriptions: &[Subscription],
    ) -> Result<(), SubscribeError> {
        self.registry.subscribe(dependent, subscriptions, &self.names)
    }

    // ── Scheduling ───────────────────────────────────────────────────

    /// Request a render for an element.
    pub fn request_render(&mut self, id: ElementId) {
        self.scheduler.request_render(id, None);
    }

    /// Request a render for every attached element.
    pub fn refresh_all(&mut self) {
        let ids: Vec<ElementId> = self.elements.keys().collect();
        for id in ids {
            self.scheduler.request_render(id, None);
        }
    }

    /// Request a render with an explicit event context for the commit.
    pub fn request_render_in(&mut self, id: ElementId, context: ElementId) {
        self.scheduler.request_render(id, Some(context));
    }

    /// Set the stored event-dispatch receiver for an element's commits.
    pub fn set_event_context(&mut self, id: ElementId, context: Option<ElementId>) {
        self.scheduler.set_event_context(id, context);
    }

    pub fn is_render_pending(&self, id: ElementId) -> bool {
        self.scheduler.is_pending(id)
    }

    pub fn has_rendered_once(&self, id: ElementId) -> bool {
        self.scheduler.has_rendered_once(id)
    }

    /// Run one frame: execute every pending scheduling cycle.
    pub fn run_frame(&mut self, surface: &mut dyn Surface) {
        self.scheduler.run_frame(&mut self.elements, surface);
    }

    // ── Focus ────────────────────────────────────────────────────────

    /// Move keyboard focus. Blurring a widget that holds the resize lock
    /// schedules the delayed release; focusing one that wants it blocks
    /// resizing immediately.
    pub fn set_focus(&mut self, target: Option<ElementId>) {
        if self.focused == target {
            return;
        }
        if let Some(old) = self.focused.take() {
            if let Some(widget) = self.elements.get_mut(old) {
                widget.on_blur();
                if widget.wants_resize_lock() {
                    self.resize_guard.schedule_release(Instant::now());
                }
                self.scheduler.request_render(old, None);
            }
        }
        if let Some(new) = target {
            let Some(widget) = self.elements.get_mut(new) else {
                return;
            };
            if !widget.can_focus() {
                return;
            }
            widget.on_focus();
            if widget.wants_resize_lock() {
                self.resize_guard.block();
            }
            self.focused = Some(new);
            self.scheduler.request_render(new, None);
        }
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    // ── Input and messages ───────────────────────────────────────────

    /// Route a key event. An open dialog receives the key only when it
    /// claims keyboard input: Escape in any mode, or any key in input mode.
    /// Everything else goes to the focused element, so a focused option
    /// button can still emit `Press` while a choice dialog is open. The
    /// receiver is re-rendered; an emitted message is queued.
    pub fn dispatch_key(&mut self, key: KeyEvent) {
        let target = match self.open_dialog() {
            Some(dialog_id) if self.dialog_claims_key(dialog_id, &key) => Some(dialog_id),
            _ => self.focused,
        };
        let Some(id) = target else {
            return;
        };
        let Some(widget) = self.elements.get_mut(id) else {
            return;
        };
        let message = widget.handle_key(&key);
        self.scheduler.request_render(id, None);
        if let Some(message) = message {
            self.dispatcher.push(Envelope::from_boxed(message, id));
        }
    }

    /// Enqueue a message envelope.
    pub fn post(&mut self, envelope: Envelope) {
        self.dispatcher.push(envelope);
    }

    /// Drain the message queue, routing option presses to the open dialog.
    /// Envelopes the runtime did not handle are returned for the app shell.
    pub fn process_messages(&mut self) -> Vec<Envelope> {
        let pending = self.dispatcher.drain();
        let mut unhandled = Vec::new();
        for mut envelope in pending {
            if let Some(dialog_id) = self.open_dialog() {
                // An option press from anywhere answers the open dialog.
                if envelope.sender != dialog_id {
                    if let Some(press) = envelope.downcast_ref::<Press>() {
                        let label = press.label.clone();
                        if self.answer_dialog(dialog_id, &label) {
                            envelope.mark_handled();
                            continue;
                        }
                    }
                }
            }
            unhandled.push(envelope);
        }
        unhandled
    }

    /// Deliver a resize to every element. Skipped entirely while the resize
    /// guard is blocked.
    pub fn dispatch_resize(&mut self, size: Size) {
        if self.resize_guard.is_blocked() {
            return;
        }
        self.size = size;
        let ids: Vec<ElementId> = self.elements.keys().collect();
        for id in ids {
            self.scheduler.dispatch_resize(id, size, &mut self.elements);
            self.scheduler.request_render(id, None);
        }
    }

    /// Per-frame housekeeping: resize-guard release and element timers.
    pub fn tick(&mut self, now: Instant) {
        self.resize_guard.tick(now);
        for (_, widget) in self.elements.iter_mut() {
            widget.tick(now);
        }
    }

    pub fn resize_blocked(&self) -> bool {
        self.resize_guard.is_blocked()
    }

    // ── Access ───────────────────────────────────────────────────────

    pub fn element(&self, id: ElementId) -> Option<&dyn Renderable> {
        self.elements.get(id).map(|b| b.as_ref())
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut Box<dyn Renderable>> {
        self.elements.get_mut(id)
    }

    /// Typed access to a widget.
    pub fn widget<T: Renderable + 'static>(&self, id: ElementId) -> Option<&T> {
        self.elements.get(id)?.as_any().downcast_ref::<T>()
    }

    /// Typed mutable access to a widget.
    pub fn widget_mut<T: Renderable + 'static>(&mut self, id: ElementId) -> Option<&mut T> {
        self.elements.get_mut(id)?.as_any_mut().downcast_mut::<T>()
    }

    /// The open dialog, if any.
    pub fn open_dialog(&self) -> Option<ElementId> {
        self.elements.iter().find_map(|(id, widget)| {
            widget
                .as_any()
                .downcast_ref::<Dialog>()
                .filter(|d| d.is_open())
                .map(|_| id)
        })
    }

    fn dialog_claims_key(&self, dialog_id: ElementId, key: &KeyEvent) -> bool {
        let Some(dialog) = self.widget::<Dialog>(dialog_id) else {
            return false;
        };
        dialog.mode() == ModalMode::Input || key.code == Key::Escape
    }

    fn answer_dialog(&mut self, dialog_id: ElementId, label: &str) -> bool {
        let Some(dialog) = self.widget_mut::<Dialog>(dialog_id) else {
            return false;
        };
        if !dialog.option_labels().iter().any(|o| o == label) {
            return false;
        }
        dialog.on_answer(label);
        self.scheduler.request_render(dialog_id, None);
        true
    }
}

// ===========================================================================
// Tests
// ===========================================================================
