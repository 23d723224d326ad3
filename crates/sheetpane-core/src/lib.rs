#![forbid(unsafe_code)]

//! Core: geometry, spring settling, and drag input for sliding panels.
//!
//! # Role in sheetpane
//! `sheetpane-core` holds the platform-independent pieces the panel
//! controller is built from. Nothing here knows about panel states or
//! layout; it deals in points, springs and raw drag events.
//!
//! # Primary responsibilities
//! - **geometry**: `Point`, `Vector`, `Size` and `Rect` in `f64` points.
//! - **animation**: the damped attachment spring, bounded settling processes
//!   and the reentrant `SpringSolver`.
//! - **gesture**: `DragAdapter`, which turns pan events into vetoable
//!   vertical motion.
//! - **logging**: `tracing` macros that compile to nothing without the
//!   `tracing` feature.
//!
//! # How it fits in the system
//! `sheetpane-panel` composes these into the state machine, layout
//! coordinator and controller. The `sheetpane` facade re-exports both.

pub mod animation;
pub mod geometry;
pub mod gesture;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, info, info_span, trace, trace_span, warn};
