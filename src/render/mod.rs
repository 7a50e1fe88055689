//! Rendering: strips, the commit surface, the scheduler, and the terminal
//! driver.

pub mod driver;
pub mod scheduler;
pub mod strip;
pub mod surface;

pub use scheduler::{RenderScheduler, RenderState, ResizeGuard, RESIZE_RELEASE_DELAY};
pub use strip::{CellStyle, Strip, StyledCell};
pub use surface::{CommitRecord, Surface, TestSurface};
