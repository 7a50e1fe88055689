//! A focusable push button.

use std::any::Any;

use crate::event::input::{Key, KeyEvent};
use crate::event::message::{Message, Press};
use crate::reactive::property::PropertyValue;
use crate::render::strip::{CellStyle, Strip};
use crate::widget::traits::Renderable;

// ---------------------------------------------------------------------------
// Button
// ---------------------------------------------------------------------------

/// A push button activated with Enter or Space.
///
/// Activation emits a [`Press`] message carrying the button's label.
pub struct Button {
    label: String,
    disabled: bool,
    focused: bool,
    width: Option<i32>,
}

impl Button {
    /// Create a button with the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            disabled: false,
            focused: false,
            width: None,
        }
    }

    /// Builder: start disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    /// Builder: fixed render width in cells.
    pub fn width(mut self, width: i32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }
}

impl Renderable for Button {
    fn kind(&self) -> &str {
        "Button"
    }

    fn template(&self) -> Option<Vec<Strip>> {
        let style = if self.disabled {
            CellStyle::dim()
        } else if self.focused {
            CellStyle::reverse()
        } else {
            CellStyle::new()
        };
        let mut strip = Strip::from_text(0, &format!("[ {} ]", self.label), style.clone());
        if let Some(width) = self.width {
            strip.fill(width, style);
        }
        Some(vec![strip])
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) {
        match (name, value) {
            ("label", PropertyValue::Text(label)) => self.label = label,
            ("disabled", PropertyValue::Bool(disabled)) => self.disabled = disabled,
            _ => {}
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Option<Box<dyn Message>> {
        if self.disabled || !key.modifiers.is_empty() {
            return None;
        }
        match key.code {
            Key::Enter | Key::Char(' ') => Some(Box::new(Press::new(self.label.clone()))),
            _ => None,
        }
    }

    fn can_focus(&self) -> bool {
        !self.disabled
    }

    fn on_focus(&mut self) {
        self.focused = true;
    }

    fn on_blur(&mut self) {
        self.focused = false;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ===========================================================================
// Tests
// ===========================================================================
