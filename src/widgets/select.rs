//! A vertical single-choice list.

use std::any::Any;

use thiserror::Error;

use crate::event::input::{Key, KeyEvent};
use crate::event::message::{Choice, Message};
use crate::render::strip::{CellStyle, Strip};
use crate::widget::traits::Renderable;

// ---------------------------------------------------------------------------
// SelectList
// ---------------------------------------------------------------------------

/// Construction failure for [`SelectList`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectError {
    #[error("a select list needs at least one item")]
    NoItems,
}

/// A vertical list with one highlighted item.
///
/// Up/Down move the highlight (clamped at the ends); Enter emits a [`Choice`]
/// with the highlighted index.
#[derive(Debug)]
pub struct SelectList {
    items: Vec<String>,
    highlighted: usize,
    focused: bool,
}

impl SelectList {
    /// Create a list from items. At least one item is required.
    pub fn new(items: Vec<String>) -> Result<Self, SelectError> {
        if items.is_empty() {
            return Err(SelectError::NoItems);
        }
        Ok(Self {
            items,
            highlighted: 0,
            focused: false,
        })
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn highlighted(&self) -> usize {
        self.highlighted
    }
}

impl Renderable for SelectList {
    fn kind(&self) -> &str {
        "SelectList"
    }

    fn template(&self) -> Option<Vec<Strip>> {
        let strips = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let style = if i == self.highlighted && self.focused {
                    CellStyle::reverse()
                } else {
                    CellStyle::new()
                };
                let marker = if i == self.highlighted { "> " } else { "  " };
                Strip::from_text(i as i32, &format!("{marker}{item}"), style)
            })
            .collect();
        Some(strips)
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Option<Box<dyn Message>> {
        if !key.modifiers.is_empty() {
            return None;
        }
        match key.code {
            Key::Up => {
                self.highlighted = self.highlighted.saturating_sub(1);
                None
            }
            Key::Down => {
                self.highlighted = (self.highlighted + 1).min(self.items.len() - 1);
                None
            }
            Key::Enter => Some(Box::new(Choice::new(self.highlighted))),
            _ => None,
        }
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

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> SelectList {
        SelectList::new(items.iter().map(|s| (*s).to_owned()).collect()).unwrap()
    }

    #[test]
    fn empty_items_is_an_error() {
        assert_eq!(SelectList::new(Vec::new()).unwrap_err(), SelectError::NoItems);
    }

    #[test]
    fn highlight_starts_at_first_item() {
        assert_eq!(list(&["a", "b"]).highlighted(), 0);
    }

    #[test]
    fn down_and_up_move_highlight() {
        let mut sel = list(&["a", "b", "c"]);
        sel.handle_key(&KeyEvent::plain(Key::Down));
        sel.handle_key(&KeyEvent::plain(Key::Down));
        assert_eq!(sel.highlighted(), 2);
        sel.handle_key(&KeyEvent::plain(Key::Up));
        assert_eq!(sel.highlighted(), 1);
    }

    #[test]
    fn highlight_clamps_at_ends() {
        let mut sel = list(&["a", "b"]);
        sel.handle_key(&KeyEvent::plain(Key::Up));
        assert_eq!(sel.highlighted(), 0);
        sel.handle_key(&KeyEvent::plain(Key::Down));
        sel.handle_key(&KeyEvent::plain(Key::Down));
        sel.handle_key(&KeyEvent::plain(Key::Down));
        assert_eq!(sel.highlighted(), 1);
    }

    #[test]
    fn enter_emits_highlighted_choice() {
        let mut sel = list(&["a", "b", "c"]);
        sel.handle_key(&KeyEvent::plain(Key::Down));
        let msg = sel.handle_key(&KeyEvent::plain(Key::Enter)).unwrap();
        assert_eq!(msg.as_any().downcast_ref::<Choice>().unwrap().index, 1);
    }

    #[test]
    fn template_marks_highlight() {
        let mut sel = list(&["first", "second"]);
        sel.handle_key(&KeyEvent::plain(Key::Down));
        let strips = sel.template().unwrap();
        assert_eq!(strips[0].text(), "  first");
        assert_eq!(strips[1].text(), "> second");
        assert_eq!(strips[1].y, 1);
    }
}
