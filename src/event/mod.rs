//! Event system: input decoupling, messages, and the dispatch queue.

pub mod handler;
pub mod input;
pub mod message;

pub use handler::EventDispatcher;
pub use input::{InputEvent, Key, KeyEvent, Modifiers, MouseAction, MouseBtn, MouseEvent};
pub use message::{Choice, Custom, Envelope, Message, Press, Quit, Refresh};
