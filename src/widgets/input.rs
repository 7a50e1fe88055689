//! A single-line text input field.

use std::any::Any;

use crate::event::input::{Key, KeyEvent};
use crate::event::message::Message;
use crate::reactive::property::PropertyValue;
use crate::render::strip::{CellStyle, Strip};
use crate::widget::traits::Renderable;

// ---------------------------------------------------------------------------
// TextInput
// ---------------------------------------------------------------------------

/// A single-line editable text field.
///
/// The cursor is a byte offset kept on a char boundary. While focused, the
/// field blocks automatic layout resizing so the terminal keyboard/IME does
/// not fight the layout.
pub struct TextInput {
    value: String,
    placeholder: String,
    /// Byte offset of the cursor; always on a char boundary.
    cursor: usize,
    masked: bool,
    focused: bool,
    width: Option<i32>,
}

impl TextInput {
    /// Create an empty input field.
    pub fn new() -> Self {
        Self {
            value: String::new(),
            placeholder: String::new(),
            cursor: 0,
            masked: false,
            focused: false,
            width: None,
        }
    }

    /// Builder: placeholder text shown while empty.
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = text.into();
        self
    }

    /// Builder: mask typed characters (password entry).
    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    /// Builder: fixed render width in cells.
    pub fn width(mut self, width: i32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    fn insert(&mut self, ch: char) {
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    fn backspace(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.value.remove(prev);
            self.cursor = prev;
        }
    }

    fn delete(&mut self) {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
        }
    }

    fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    fn move_right(&mut self) {
        if let Some(ch) = self.value[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    /// Byte offset of the char boundary before the cursor, if any.
    fn prev_boundary(&self) -> Option<usize> {
        self.value[..self.cursor].char_indices().last().map(|(i, _)| i)
    }
}

impl Default for TextInput {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderable for TextInput {
    fn kind(&self) -> &str {
        "TextInput"
    }

    fn template(&self) -> Option<Vec<Strip>> {
        let mut strip = Strip::new(0, 0);
        if self.value.is_empty() && !self.placeholder.is_empty() {
            strip.push_str(&self.placeholder, CellStyle::dim());
        } else if self.masked {
            for _ in self.value.chars() {
                strip.push('•', CellStyle::new());
            }
        } else {
            strip.push_str(&self.value, CellStyle::new());
        }
        if let Some(width) = self.width {
            strip.fill(width, CellStyle::new());
        }
        Some(vec![strip])
    }

    fn set_property(&mut self, name: &str, value: PropertyValue) {
        match (name, value) {
            ("value", PropertyValue::Text(text)) => self.set_value(text),
            ("placeholder", PropertyValue::Text(text)) => self.placeholder = text,
            ("masked", PropertyValue::Bool(masked)) => self.masked = masked,
            _ => {}
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Option<Box<dyn Message>> {
        if !key.modifiers.is_empty() {
            return None;
        }
        match key.code {
            Key::Char(ch) => self.insert(ch),
            Key::Backspace => self.backspace(),
            Key::Delete => self.delete(),
            Key::Left => self.move_left(),
            Key::Right => self.move_right(),
            Key::Home => self.cursor = 0,
            Key::End => self.cursor = self.value.len(),
            _ => {}
        }
        None
    }

    fn can_focus(&self) -> bool {
        true
    }

    fn on_focus(&mut self) {
        self.focused = true;
    }

    fn on_blur(&mut self) {
        self.focused = false;
    }

    fn wants_resize_lock(&self) -> bool {
        true
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
