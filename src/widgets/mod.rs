//! Built-in widgets: button, text input, select list, and the modal dialog.

pub mod button;
pub mod dialog;
pub mod input;
pub mod select;

pub use button::Button;
pub use dialog::{
    Dialog, DialogError, ModalAnswer, ModalMessage, ModalMode, SetupOptions, Validator,
    CANCEL_LABEL, CONFIRM_LABEL, FOCUS_DELAY,
};
pub use input::TextInput;
pub use select::{SelectError, SelectList};
