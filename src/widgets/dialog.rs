//! Modal dialog: question, option row, optional text field, and a
//! future-based answer channel.
//!
//! `setup` arms the dialog and returns a `oneshot::Receiver` that resolves
//! when the user answers. Re-arming an already-open dialog supersedes the
//! previous question: its sender is dropped and the stale receiver resolves
//! with `RecvError` instead of a fabricated answer.

use std::any::Any;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::oneshot;

use crate::event::input::{Key, KeyEvent};
use crate::event::message::Message;
use crate::render::strip::{CellStyle, Strip};
use crate::widget::traits::Renderable;
use crate::widgets::input::TextInput;

/// Delay between opening an input dialog and focusing its text field, so the
/// keystroke that opened the dialog cannot leak into the field.
pub const FOCUS_DELAY: Duration = Duration::from_millis(120);

/// Label of the implicit cancel option in input mode.
pub const CANCEL_LABEL: &str = "Cancel";

/// Label of the implicit confirm option in input mode.
pub const CONFIRM_LABEL: &str = "OK";

// ---------------------------------------------------------------------------
// Answer types
// ---------------------------------------------------------------------------

/// The question text shown above the options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalMessage {
    Plain(String),
    Titled { title: String, subtitle: String },
}

impl ModalMessage {
    pub fn plain(text: impl Into<String>) -> Self {
        ModalMessage::Plain(text.into())
    }

    pub fn titled(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        ModalMessage::Titled {
            title: title.into(),
            subtitle: subtitle.into(),
        }
    }
}

/// What kind of answer the dialog collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalMode {
    /// Pick one of the offered options.
    Choice,
    /// Enter free text, confirmed or cancelled via the option row.
    Input,
}

/// The resolved answer delivered through the receiver.
///
/// `Cancelled` is a distinct sentinel: dismissing a choice dialog is not the
/// same as picking option 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalAnswer {
    /// Index of the activated option.
    Choice(usize),
    /// Confirmed text field contents.
    Text(String),
    /// Dismissed without an answer.
    Cancelled,
}

/// Predicate gating confirmation of text input.
pub type Validator = Box<dyn Fn(&str) -> bool>;

/// Behavior switches for [`Dialog::setup`].
#[derive(Default)]
pub struct SetupOptions {
    /// Collect text instead of a choice.
    pub use_text_input: bool,
    /// Reject confirmation while the predicate returns false.
    pub validator: Option<Validator>,
    /// Remove the escape hatches: no cancel option, Escape ignored, and
    /// empty text cannot be confirmed.
    pub force_answer: bool,
}

/// Setup failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DialogError {
    #[error("a choice dialog needs at least one option")]
    MissingOptions,
}

// ---------------------------------------------------------------------------
// Dialog
// ---------------------------------------------------------------------------

/// A modal question with an option row and optional text field.
pub struct Dialog {
    message: ModalMessage,
    options: Vec<String>,
    mode: ModalMode,
    validator: Option<Validator>,
    force_answer: bool,
    open: bool,
    /// Armed answer channel; dropped (not sent) when superseded.
    pending: Option<oneshot::Sender<ModalAnswer>>,
    field: TextInput,
    /// When the text field should grab focus, armed by input-mode setup.
    focus_at: Option<Instant>,
    width: i32,
}

impl Dialog {
    /// Create a closed dialog.
    pub fn new() -> Self {
        Self {
            message: ModalMessage::plain(""),
            options: Vec::new(),
            mode: ModalMode::Choice,
            validator: None,
            force_answer: false,
            open: false,
            pending: None,
            field: TextInput::new(),
            focus_at: None,
            width: 40,
        }
    }

    /// Builder: render width in cells.
    pub fn width(mut self, width: i32) -> Self {
        self.width = width;
        self
    }

    /// Arm the dialog with a question and return the answer channel.
    ///
    /// In choice mode `options` must be non-empty. In input mode `options`
    /// is ignored: the row is `[Cancel] [OK]`, or just `[OK]` under
    /// `force_answer`. An already-armed question is superseded: its sender
    /// is dropped without an answer.
    pub fn setup(
        &mut self,
        message: ModalMessage,
        options: Vec<String>,
        opts: SetupOptions,
    ) -> Result<oneshot::Receiver<ModalAnswer>, DialogError> {
        let options = if opts.use_text_input {
            if opts.force_answer {
                vec![CONFIRM_LABEL.to_owned()]
            } else {
                vec![CANCEL_LABEL.to_owned(), CONFIRM_LABEL.to_owned()]
            }
        } else {
            if options.is_empty() {
                return Err(DialogError::MissingOptions);
            }
            options
        };

        let (tx, rx) = oneshot::channel();
        // Supersede: the previous sender drops here, resolving its receiver
        // with RecvError.
        self.pending = Some(tx);
        self.message = message;
        self.options = options;
        self.mode = if opts.use_text_input {
            ModalMode::Input
        } else {
            ModalMode::Choice
        };
        self.validator = opts.validator;
        self.force_answer = opts.force_answer;
        self.open = true;
        self.field.clear();
        self.field.on_blur();
        self.focus_at = if opts.use_text_input {
            Some(Instant::now() + FOCUS_DELAY)
        } else {
            None
        };
        Ok(rx)
    }

    /// Arm a free-text question. Convenience wrapper over [`Dialog::setup`].
    pub fn get_input(
        &mut self,
        message: ModalMessage,
        validator: Option<Validator>,
    ) -> oneshot::Receiver<ModalAnswer> {
        let opts = SetupOptions {
            use_text_input: true,
            validator,
            force_answer: false,
        };
        match self.setup(message, Vec::new(), opts) {
            Ok(rx) => rx,
            // Input mode builds its own option row; MissingOptions cannot
            // happen on this path.
            Err(DialogError::MissingOptions) => unreachable!(),
        }
    }

    /// Activate the option with the given label.
    ///
    /// Ignored while closed or when the label is not in the option row. In
    /// input mode the confirm option runs the emptiness and validator gates
    /// and stays open when they reject.
    pub fn on_answer(&mut self, label: &str) {
        if !self.open {
            return;
        }
        let Some(index) = self.options.iter().position(|o| o == label) else {
            return;
        };
        match self.mode {
            ModalMode::Choice => self.settle(ModalAnswer::Choice(index)),
            ModalMode::Input => {
                if index == 0 && !self.force_answer {
                    self.settle(ModalAnswer::Cancelled);
                } else {
                    self.confirm_input();
                }
            }
        }
    }

    /// Dismiss without an answer, resolving the channel with `Cancelled`.
    /// No-op while closed.
    pub fn dismiss(&mut self) {
        if self.open {
            self.settle(ModalAnswer::Cancelled);
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn mode(&self) -> ModalMode {
        self.mode
    }

    pub fn option_labels(&self) -> &[String] {
        &self.options
    }

    /// Current contents of the text field.
    pub fn field_value(&self) -> &str {
        self.field.value()
    }

    fn confirm_input(&mut self) {
        let value = self.field.value().to_owned();
        if self.force_answer && value.is_empty() {
            return;
        }
        if let Some(validator) = &self.validator {
            if !validator(&value) {
                return;
            }
        }
        self.settle(ModalAnswer::Text(value));
    }

    fn settle(&mut self, answer: ModalAnswer) {
        if let Some(tx) = self.pending.take() {
            // The caller may have dropped the receiver; nothing to do then.
            let _ = tx.send(answer);
        }
        self.open = false;
        self.mode = ModalMode::Choice;
        self.validator = None;
        self.force_answer = false;
        self.focus_at = None;
        self.field.on_blur();
    }
}

impl Default for Dialog {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderable for Dialog {
    fn kind(&self) -> &str {
        "Dialog"
    }

    fn template(&self) -> Option<Vec<Strip>> {
        if !self.open {
            return None;
        }
        let mut strips = Vec::new();
        let mut y = 0;
        match &self.message {
            ModalMessage::Plain(text) => {
                strips.push(Strip::from_text(y, text, CellStyle::new()));
                y += 1;
            }
            ModalMessage::Titled { title, subtitle } => {
                strips.push(Strip::from_text(y, title, CellStyle::bold()));
                y += 1;
                strips.push(Strip::from_text(y, subtitle, CellStyle::dim()));
                y += 1;
            }
        }
        if self.mode == ModalMode::Input {
            let mut line = match self.field.template() {
                Some(mut field_strips) => field_strips.remove(0),
                None => Strip::new(0, 0),
            };
            line.y = y;
            line.fill(self.width, CellStyle::new());
            strips.push(line);
            y += 1;
        }
        let mut row = Strip::new(y, 0);
        for (i, option) in self.options.iter().enumerate() {
            if i > 0 {
                row.push_str("  ", CellStyle::new());
            }
            row.push_str(&format!("[ {option} ]"), CellStyle::new());
        }
        strips.push(row);
        Some(strips)
    }

    /// Escape dismisses (unless forced). In input mode, Enter takes the
    /// confirm path and everything else edits the field. Choice mode has no
    /// Enter handling: option buttons deliver activation through their own
    /// `Press` messages.
    fn handle_key(&mut self, key: &KeyEvent) -> Option<Box<dyn Message>> {
        if !self.open || !key.modifiers.is_empty() {
            return None;
        }
        match key.code {
            Key::Escape => {
                if !self.force_answer {
                    self.dismiss();
                }
            }
            Key::Enter if self.mode == ModalMode::Input => self.confirm_input(),
            _ if self.mode == ModalMode::Input => {
                self.field.handle_key(key);
            }
            _ => {}
        }
        None
    }

    fn can_focus(&self) -> bool {
        self.open
    }

    fn wants_resize_lock(&self) -> bool {
        self.mode == ModalMode::Input && self.field.is_focused()
    }

    fn tick(&mut self, now: Instant) {
        // The timer may outlive the question it was armed for; only an open
        // input dialog acts on it.
        if let Some(at) = self.focus_at {
            if now >= at {
                self.focus_at = None;
                if self.open && self.mode == ModalMode::Input {
                    self.field.on_focus();
                }
            }
        }
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

    fn choice_dialog(options: &[&str]) -> (Dialog, oneshot::Receiver<ModalAnswer>) {
        let mut dialog = Dialog::new();
        let rx = dialog
            .setup(
                ModalMessage::plain("Pick one"),
                options.iter().map(|s| (*s).to_owned()).collect(),
                SetupOptions::default(),
            )
            .unwrap();
        (dialog, rx)
    }

    fn type_str(dialog: &mut Dialog, text: &str) {
        for ch in text.chars() {
            dialog.handle_key(&KeyEvent::plain(Key::Char(ch)));
        }
    }

    // ── Setup ────────────────────────────────────────────────────────

    #[test]
    fn choice_setup_requires_options() {
        let mut dialog = Dialog::new();
        let err = dialog
            .setup(ModalMessage::plain("?"), Vec::new(), SetupOptions::default())
            .unwrap_err();
        assert_eq!(err, DialogError::MissingOptions);
        assert!(!dialog.is_open());
    }

    #[test]
    fn setup_opens_with_given_options() {
        let (dialog, _rx) = choice_dialog(&["Yes", "No"]);
        assert!(dialog.is_open());
        assert_eq!(dialog.mode(), ModalMode::Choice);
        assert_eq!(dialog.option_labels(), ["Yes", "No"]);
    }

    #[test]
    fn input_setup_builds_cancel_confirm_row() {
        let mut dialog = Dialog::new();
        let _rx = dialog.get_input(ModalMessage::plain("Name?"), None);
        assert_eq!(dialog.mode(), ModalMode::Input);
        assert_eq!(dialog.option_labels(), [CANCEL_LABEL, CONFIRM_LABEL]);
    }

    #[test]
    fn forced_input_has_no_cancel_option() {
        let mut dialog = Dialog::new();
        let _rx = dialog
            .setup(
                ModalMessage::plain("Name?"),
                Vec::new(),
                SetupOptions {
                    use_text_input: true,
                    validator: None,
                    force_answer: true,
                },
            )
            .unwrap();
        assert_eq!(dialog.option_labels(), [CONFIRM_LABEL]);
    }

    // ── Choice answers ───────────────────────────────────────────────

    #[test]
    fn answer_resolves_choice_index_and_closes() {
        let (mut dialog, mut rx) = choice_dialog(&["Yes", "No"]);
        dialog.on_answer("No");
        assert!(!dialog.is_open());
        assert_eq!(rx.try_recv().unwrap(), ModalAnswer::Choice(1));
    }

    #[test]
    fn unknown_label_is_ignored() {
        let (mut dialog, mut rx) = choice_dialog(&["Yes", "No"]);
        dialog.on_answer("Maybe");
        assert!(dialog.is_open());
        assert!(rx.try_recv().is_err());
        // Still answerable afterwards.
        dialog.on_answer("Yes");
        assert_eq!(rx.try_recv().unwrap(), ModalAnswer::Choice(0));
    }

    #[test]
    fn answer_while_closed_is_ignored() {
        let mut dialog = Dialog::new();
        dialog.on_answer("Yes");
        assert!(!dialog.is_open());
    }

    #[test]
    fn enter_in_choice_mode_is_ignored() {
        // Choice activation belongs to the option buttons; the dialog itself
        // does nothing with Enter.
        let (mut dialog, mut rx) = choice_dialog(&["Yes", "No"]);
        dialog.handle_key(&KeyEvent::plain(Key::Enter));
        assert!(dialog.is_open());
        assert!(rx.try_recv().is_err());
    }

    // ── Dismissal ────────────────────────────────────────────────────

    #[test]
    fn dismiss_resolves_cancelled_sentinel() {
        let (mut dialog, mut rx) = choice_dialog(&["Yes"]);
        dialog.dismiss();
        assert!(!dialog.is_open());
        // Distinct from picking option 0.
        assert_eq!(rx.try_recv().unwrap(), ModalAnswer::Cancelled);
    }

    #[test]
    fn dismiss_while_closed_is_noop() {
        let mut dialog = Dialog::new();
        dialog.dismiss();
        let (mut dialog, mut rx) = choice_dialog(&["Yes"]);
        dialog.dismiss();
        dialog.dismiss();
        assert_eq!(rx.try_recv().unwrap(), ModalAnswer::Cancelled);
    }

    #[test]
    fn escape_dismisses() {
        let (mut dialog, mut rx) = choice_dialog(&["Yes"]);
        dialog.handle_key(&KeyEvent::plain(Key::Escape));
        assert_eq!(rx.try_recv().unwrap(), ModalAnswer::Cancelled);
    }

    #[test]
    fn escape_ignored_under_force_answer() {
        let mut dialog = Dialog::new();
        let mut rx = dialog
            .setup(
                ModalMessage::plain("Name?"),
                Vec::new(),
                SetupOptions {
                    use_text_input: true,
                    validator: None,
                    force_answer: true,
                },
            )
            .unwrap();
        dialog.handle_key(&KeyEvent::plain(Key::Escape));
        assert!(dialog.is_open());
        assert!(rx.try_recv().is_err());
    }

    // ── Text input answers ───────────────────────────────────────────

    #[test]
    fn typed_text_confirmed_with_enter() {
        let mut dialog = Dialog::new();
        let mut rx = dialog.get_input(ModalMessage::plain("Name?"), None);
        type_str(&mut dialog, "ada");
        dialog.handle_key(&KeyEvent::plain(Key::Enter));
        assert_eq!(rx.try_recv().unwrap(), ModalAnswer::Text("ada".into()));
    }

    #[test]
    fn confirm_option_submits_field() {
        let mut dialog = Dialog::new();
        let mut rx = dialog.get_input(ModalMessage::plain("Name?"), None);
        type_str(&mut dialog, "bob");
        dialog.on_answer(CONFIRM_LABEL);
        assert_eq!(rx.try_recv().unwrap(), ModalAnswer::Text("bob".into()));
    }

    #[test]
    fn cancel_option_resolves_cancelled() {
        let mut dialog = Dialog::new();
        let mut rx = dialog.get_input(ModalMessage::plain("Name?"), None);
        type_str(&mut dialog, "discarded");
        dialog.on_answer(CANCEL_LABEL);
        assert_eq!(rx.try_recv().unwrap(), ModalAnswer::Cancelled);
    }

    #[test]
    fn validator_rejects_and_dialog_stays_open() {
        let mut dialog = Dialog::new();
        let mut rx = dialog.get_input(
            ModalMessage::plain("Port?"),
            Some(Box::new(|s: &str| s.parse::<u16>().is_ok())),
        );
        type_str(&mut dialog, "abc");
        dialog.handle_key(&KeyEvent::plain(Key::Enter));
        assert!(dialog.is_open());
        assert!(rx.try_recv().is_err());
        // Fix the value and confirm.
        for _ in 0..3 {
            dialog.handle_key(&KeyEvent::plain(Key::Backspace));
        }
        type_str(&mut dialog, "8080");
        dialog.handle_key(&KeyEvent::plain(Key::Enter));
        assert_eq!(rx.try_recv().unwrap(), ModalAnswer::Text("8080".into()));
    }

    #[test]
    fn forced_answer_rejects_empty_field() {
        let mut dialog = Dialog::new();
        let mut rx = dialog
            .setup(
                ModalMessage::plain("Name?"),
                Vec::new(),
                SetupOptions {
                    use_text_input: true,
                    validator: None,
                    force_answer: true,
                },
            )
            .unwrap();
        dialog.handle_key(&KeyEvent::plain(Key::Enter));
        assert!(dialog.is_open());
        assert!(rx.try_recv().is_err());
        type_str(&mut dialog, "x");
        dialog.handle_key(&KeyEvent::plain(Key::Enter));
        assert_eq!(rx.try_recv().unwrap(), ModalAnswer::Text("x".into()));
    }

    // ── Superseding ──────────────────────────────────────────────────

    #[test]
    fn rearming_supersedes_previous_question() {
        let mut dialog = Dialog::new();
        let mut first = dialog
            .setup(
                ModalMessage::plain("First?"),
                vec!["A".into()],
                SetupOptions::default(),
            )
            .unwrap();
        let mut second = dialog
            .setup(
                ModalMessage::plain("Second?"),
                vec!["B".into()],
                SetupOptions::default(),
            )
            .unwrap();
        // The first sender was dropped, not answered.
        assert!(matches!(
            first.try_recv(),
            Err(oneshot::error::TryRecvError::Closed)
        ));
        dialog.on_answer("B");
        assert_eq!(second.try_recv().unwrap(), ModalAnswer::Choice(0));
    }

    // ── Focus timer ──────────────────────────────────────────────────

    #[test]
    fn field_focuses_after_delay() {
        let mut dialog = Dialog::new();
        let _rx = dialog.get_input(ModalMessage::plain("Name?"), None);
        let now = Instant::now();
        dialog.tick(now);
        assert!(!dialog.wants_resize_lock());
        dialog.tick(now + FOCUS_DELAY * 2);
        assert!(dialog.wants_resize_lock());
    }

    #[test]
    fn stale_focus_timer_is_harmless_after_close() {
        let mut dialog = Dialog::new();
        let mut rx = dialog.get_input(ModalMessage::plain("Name?"), None);
        dialog.on_answer(CANCEL_LABEL);
        assert_eq!(rx.try_recv().unwrap(), ModalAnswer::Cancelled);
        dialog.tick(Instant::now() + FOCUS_DELAY * 2);
        assert!(!dialog.is_open());
        assert!(!dialog.wants_resize_lock());
    }

    // ── Rendering ────────────────────────────────────────────────────

    #[test]
    fn closed_dialog_has_no_template() {
        assert!(Dialog::new().template().is_none());
    }

    #[test]
    fn open_dialog_renders_message_and_options() {
        let (dialog, _rx) = choice_dialog(&["Yes", "No"]);
        let strips = dialog.template().unwrap();
        assert_eq!(strips[0].text(), "Pick one");
        assert_eq!(strips[1].text(), "[ Yes ]  [ No ]");
    }

    #[test]
    fn titled_message_renders_two_lines() {
        let mut dialog = Dialog::new();
        let _rx = dialog
            .setup(
                ModalMessage::titled("Delete file", "This cannot be undone"),
                vec!["OK".into()],
                SetupOptions::default(),
            )
            .unwrap();
        let strips = dialog.template().unwrap();
        assert!(strips[0].cells[0].style.bold);
        assert!(strips[1].cells[0].style.dim);
        assert_eq!(strips[2].text(), "[ OK ]");
    }

    #[test]
    fn input_dialog_renders_field_line() {
        let mut dialog = Dialog::new();
        let _rx = dialog.get_input(ModalMessage::plain("Name?"), None);
        type_str(&mut dialog, "ada");
        let strips = dialog.template().unwrap();
        assert!(strips[1].text().starts_with("ada"));
        assert_eq!(strips[2].text(), "[ Cancel ]  [ OK ]");
    }
}
