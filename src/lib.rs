//! # cadence-tui
//!
//! A frame-coalesced, reactive widget runtime for terminal UIs.
//!
//! cadence-tui schedules widget renders the way a browser schedules paints:
//! any number of render requests inside one frame collapse into a single
//! display commit, lifecycle hooks fire in a guaranteed order around it, and
//! property changes fan out to dependent widgets through a broadcast
//! registry. A future-based modal dialog turns "ask the user" into an
//! awaitable call.
//!
//! ## Core Systems
//!
//! - **[`render`]** — Strips, the commit surface, the coalescing scheduler,
//!   and the crossterm driver
//! - **[`reactive`]** — Typed properties with watchers/reflection and the
//!   broadcast registry
//! - **[`widget`]** — The `Renderable` lifecycle trait and element arena
//! - **[`widgets`]** — Built-in widgets: Button, TextInput, SelectList, Dialog
//! - **[`event`]** — Input decoupling, messages, and the dispatch queue
//! - **[`runtime`]** — The runtime tying elements, scheduling, properties,
//!   focus, and routing together
//! - **[`app`]** — Application shell with terminal and headless modes
//! - **[`testing`]** — Headless `Pilot` driver and snapshot helpers
//! - **[`geometry`]** — The cell-grid `Size` primitive
//! - **[`element`]** — Generational element ids

// Foundation
pub mod element;
pub mod geometry;

// Widget system
pub mod widget;
pub mod widgets;

// Events and reactivity
pub mod event;
pub mod reactive;

// Rendering
pub mod render;

// Application
pub mod app;
pub mod runtime;

// Test support
pub mod testing;
