//! Headless testing utilities: the [`Pilot`] app driver and snapshot
//! rendering helpers.

pub mod pilot;
pub mod snapshot;

pub use pilot::Pilot;
pub use snapshot::{render_to_string, strips_to_string};
