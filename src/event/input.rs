//! Input event types wrapping crossterm for decoupling.
//!
//! Defines [`InputEvent`], [`KeyEvent`], [`MouseEvent`] and supporting types.
//! Crossterm events are converted via `From` impls so the rest of the
//! runtime never depends on crossterm event types directly.

use std::ops::{BitAnd, BitOr};

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key, decoupled from crossterm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    /// Check whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check whether no modifier bits are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitAnd for Modifiers {
    type Output = Modifiers;
    fn bitand(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

/// A keyboard event with key and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event.
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key event with no modifiers.
    pub fn plain(code: Key) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }
}

// ---------------------------------------------------------------------------
// MouseBtn / MouseAction / MouseEvent
// ---------------------------------------------------------------------------

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
    Middle,
}

/// Mouse action kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAction {
    Down(MouseBtn),
    Up(MouseBtn),
    Moved,
    ScrollUp,
    ScrollDown,
}

/// A mouse event with action, position, and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseAction,
    pub x: u16,
    pub y: u16,
    pub modifiers: Modifiers,
}

// ---------------------------------------------------------------------------
// InputEvent
// ---------------------------------------------------------------------------

/// Top-level input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize { width: u16, height: u16 },
    FocusGained,
    FocusLost,
    Paste(String),
}

// ---------------------------------------------------------------------------
// From<crossterm> conversions
// ---------------------------------------------------------------------------

fn convert_modifiers(m: crossterm::event::KeyModifiers) -> Modifiers {
    use crossterm::event::KeyModifiers as Cm;
    let mut out = Modifiers::NONE;
    if m.contains(Cm::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(Cm::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(Cm::ALT) {
        out = out | Modifiers::ALT;
    }
    out
}

fn convert_key(code: crossterm::event::KeyCode) -> Option<Key> {
    use crossterm::event::KeyCode as Cc;
    Some(match code {
        Cc::Char(c) => Key::Char(c),
        Cc::Enter => Key::Enter,
        Cc::Esc => Key::Escape,
        Cc::Tab => Key::Tab,
        Cc::BackTab => Key::BackTab,
        Cc::Backspace => Key::Backspace,
        Cc::Delete => Key::Delete,
        Cc::Left => Key::Left,
        Cc::Right => Key::Right,
        Cc::Up => Key::Up,
        Cc::Down => Key::Down,
        Cc::Home => Key::Home,
        Cc::End => Key::End,
        Cc::PageUp => Key::PageUp,
        Cc::PageDown => Key::PageDown,
        Cc::F(n) => Key::F(n),
        _ => return None,
    })
}

impl From<crossterm::event::KeyEvent> for KeyEvent {
    fn from(ev: crossterm::event::KeyEvent) -> Self {
        let code = convert_key(ev.code).unwrap_or(Key::Char('\0'));
        KeyEvent::new(code, convert_modifiers(ev.modifiers))
    }
}

impl From<crossterm::event::MouseEvent> for MouseEvent {
    fn from(ev: crossterm::event::MouseEvent) -> Self {
        use crossterm::event::MouseEventKind as Mk;
        let kind = match ev.kind {
            Mk::Down(b) => MouseAction::Down(convert_btn(b)),
            Mk::Up(b) => MouseAction::Up(convert_btn(b)),
            Mk::Drag(_) | Mk::Moved => MouseAction::Moved,
            Mk::ScrollUp => MouseAction::ScrollUp,
            _ => MouseAction::ScrollDown,
        };
        MouseEvent {
            kind,
            x: ev.column,
            y: ev.row,
            modifiers: convert_modifiers(ev.modifiers),
        }
    }
}

fn convert_btn(b: crossterm::event::MouseButton) -> MouseBtn {
    use crossterm::event::MouseButton as Mb;
    match b {
        Mb::Left => MouseBtn::Left,
        Mb::Right => MouseBtn::Right,
        Mb::Middle => MouseBtn::Middle,
    }
}

impl From<crossterm::event::Event> for InputEvent {
    fn from(ev: crossterm::event::Event) -> Self {
        use crossterm::event::Event as Ce;
        match ev {
            Ce::Key(k) => InputEvent::Key(k.into()),
            Ce::Mouse(m) => InputEvent::Mouse(m.into()),
            Ce::Resize(width, height) => InputEvent::Resize { width, height },
            Ce::FocusGained => InputEvent::FocusGained,
            Ce::FocusLost => InputEvent::FocusLost,
            Ce::Paste(s) => InputEvent::Paste(s),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
