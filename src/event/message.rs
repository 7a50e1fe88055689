//! Message trait, envelope, and built-in messages.
//!
//! The [`Message`] trait is object-safe and supports downcasting via `Any`.
//! [`Envelope`] wraps a boxed message with routing metadata (sender, target).
//! Built-in messages: [`Quit`], [`Refresh`], [`Press`], [`Choice`], [`Custom`].

use std::any::Any;

use crate::element::ElementId;

// ---------------------------------------------------------------------------
// Message trait
// ---------------------------------------------------------------------------

/// Object-safe message trait.
///
/// All messages must implement `as_any` for downcasting and `message_name`
/// for debug/logging purposes.
pub trait Message: Send + 'static {
    /// Upcast to `&dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Human-readable name for this message type.
    fn message_name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Wraps a boxed message with routing metadata.
pub struct Envelope {
    /// The message payload.
    pub message: Box<dyn Message>,
    /// The element that sent this message.
    pub sender: ElementId,
    /// If `Some`, the message is targeted at a specific element.
    /// If `None`, the runtime routes it (open dialog, then app-level).
    pub target: Option<ElementId>,
    /// Whether this message has been handled (stops further routing).
    pub handled: bool,
}

impl Envelope {
    /// Create a new untargeted envelope.
    pub fn new(message: impl Message, sender: ElementId) -> Self {
        Self {
            message: Box::new(message),
            sender,
            target: None,
            handled: false,
        }
    }

    /// Create an envelope from an already-boxed message.
    pub fn from_boxed(message: Box<dyn Message>, sender: ElementId) -> Self {
        Self {
            message,
            sender,
            target: None,
            handled: false,
        }
    }

    /// Create a new envelope targeted at a specific element.
    pub fn targeted(message: impl Message, sender: ElementId, target: ElementId) -> Self {
        Self {
            message: Box::new(message),
            sender,
            target: Some(target),
            handled: false,
        }
    }

    /// Attempt to downcast the message to a concrete type.
    pub fn downcast_ref<T: Message + 'static>(&self) -> Option<&T> {
        self.message.as_any().downcast_ref::<T>()
    }

    /// Mark this envelope as handled, stopping further routing.
    pub fn mark_handled(&mut self) {
        self.handled = true;
    }
}

impl std::fmt::Debug for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Envelope")
            .field("message_name", &self.message.message_name())
            .field("sender", &self.sender)
            .field("target", &self.target)
            .field("handled", &self.handled)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Built-in messages
// ---------------------------------------------------------------------------

/// Request application shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quit;

impl Message for Quit {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn message_name(&self) -> &str {
        "Quit"
    }
}

/// Request a full re-render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Refresh;

impl Message for Refresh {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn message_name(&self) -> &str {
        "Refresh"
    }
}

/// A button (or button-like option) was activated.
///
/// Carries the activated label; the envelope's `sender` records which element
/// produced it. An open dialog matches the label against its option set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Press {
    pub label: String,
}

impl Press {
    /// Create a new press message for the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Message for Press {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn message_name(&self) -> &str {
        "Press"
    }
}

/// An item was chosen from a selectable list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub index: usize,
}

impl Choice {
    /// Create a new choice message for the given item index.
    pub fn new(index: usize) -> Self {
        Self { index }
    }
}

impl Message for Choice {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn message_name(&self) -> &str {
        "Choice"
    }
}

/// User-defined string message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Custom(pub String);

impl Custom {
    /// Create a new custom message.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl Message for Custom {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn message_name(&self) -> &str {
        "Custom"
    }
}

// ===========================================================================
// Tests
// ===========================================================================
