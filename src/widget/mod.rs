//! Widget contract: the `Renderable` trait and the element arena.

pub mod traits;

pub use traits::{ElementArena, RenderGate, Renderable};
