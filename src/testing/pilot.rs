//! Pilot: programmatic interaction with a headless App.
//!
//! The `Pilot` wraps an [`App`](crate::app::App) in headless mode together
//! with a recording [`TestSurface`], and provides methods to simulate user
//! input, advance frames, and inspect committed output.

use crate::app::App;
use crate::element::ElementId;
use crate::event::input::{InputEvent, Key, KeyEvent, Modifiers};
use crate::event::message::{Envelope, Press};
use crate::render::surface::TestSurface;
use crate::runtime::Runtime;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless app driver for testing.
///
/// # Examples
///
/// ```
/// use cadence_tui::testing::Pilot;
/// use cadence_tui::widgets::Button;
///
/// let mut pilot = Pilot::new(80, 24);
/// let id = pilot.runtime_mut().attach(Box::new(Button::new("OK")));
/// pilot.runtime_mut().request_render(id);
/// pilot.frame();
/// assert_eq!(pilot.last_text(id).as_deref(), Some("[ OK ]"));
/// ```
pub struct Pilot {
    app: App,
    surface: TestSurface,
}

impl Pilot {
    /// Create a headless app with the given terminal size.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            app: App::new_headless(width, height),
            surface: TestSurface::new(),
        }
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Simulate a key press with no modifiers.
    pub fn press_key(&mut self, key: Key) {
        self.app
            .handle_input(InputEvent::Key(KeyEvent::new(key, Modifiers::NONE)));
    }

    /// Simulate a key press with the given modifiers.
    pub fn press_key_with(&mut self, key: Key, modifiers: Modifiers) {
        self.app
            .handle_input(InputEvent::Key(KeyEvent::new(key, modifiers)));
    }

    /// Simulate typing each character of `text` as individual key presses.
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.press_key(Key::Char(ch));
        }
    }

    /// Activate a dialog option by label, as a button press would.
    pub fn click_option(&mut self, label: &str, sender: ElementId) {
        self.app.runtime.post(Envelope::new(Press::new(label), sender));
    }

    /// Simulate a terminal resize to the given dimensions.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.app.handle_input(InputEvent::Resize { width, height });
    }

    // ── Processing ───────────────────────────────────────────────────

    /// Run one frame: timers, message routing, and every pending scheduling
    /// cycle. App-level messages the runtime did not consume are returned.
    pub fn frame(&mut self) -> Vec<Envelope> {
        self.app.frame_with(&mut self.surface)
    }

    // ── Query ────────────────────────────────────────────────────────

    /// Borrow the underlying app immutably.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Borrow the underlying app mutably.
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }

    /// Borrow the runtime immutably.
    pub fn runtime(&self) -> &Runtime {
        &self.app.runtime
    }

    /// Borrow the runtime mutably.
    pub fn runtime_mut(&mut self) -> &mut Runtime {
        &mut self.app.runtime
    }

    /// Borrow the recording surface.
    pub fn surface(&self) -> &TestSurface {
        &self.surface
    }

    /// Number of commits recorded for an element across all frames.
    pub fn commit_count(&self, id: ElementId) -> usize {
        self.surface.commit_count(id)
    }

    /// Plain text of an element's most recent commit.
    pub fn last_text(&self, id: ElementId) -> Option<String> {
        self.surface.last_text(id)
    }

    /// Whether the app is still running (has not quit).
    pub fn is_running(&self) -> bool {
        !self.app.should_quit()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::button::Button;
    use crate::widgets::input::TextInput;

    #[test]
    fn new_creates_headless_app() {
        let pilot = Pilot::new(80, 24);
        assert!(!pilot.app().has_driver());
        assert!(pilot.is_running());
    }

    #[test]
    fn frame_commits_pending_renders() {
        let mut pilot = Pilot::new(80, 24);
        let id = pilot.runtime_mut().attach(Box::new(Button::new("Go")));
        pilot.runtime_mut().request_render(id);
        pilot.frame();
        assert_eq!(pilot.commit_count(id), 1);
        assert_eq!(pilot.last_text(id).as_deref(), Some("[ Go ]"));
    }

    #[test]
    fn type_text_reaches_focused_field() {
        let mut pilot = Pilot::new(80, 24);
        let field = pilot.runtime_mut().attach(Box::new(TextInput::new()));
        pilot.runtime_mut().set_focus(Some(field));
        pilot.type_text("hi");
        assert_eq!(
            pilot.runtime().widget::<TextInput>(field).unwrap().value(),
            "hi"
        );
    }

    #[test]
    fn ctrl_c_stops_the_pilot() {
        let mut pilot = Pilot::new(80, 24);
        pilot.press_key_with(Key::Char('c'), Modifiers::CTRL);
        assert!(!pilot.is_running());
    }
}
