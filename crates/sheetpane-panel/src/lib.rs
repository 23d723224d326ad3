#![forbid(unsafe_code)]

//! Panel: state machine, layout coordinator and controller for a
//! draggable multi-state sliding panel.
//!
//! # Role in sheetpane
//! `sheetpane-panel` turns the primitives of `sheetpane-core` into a
//! bottom sheet with `Closed`, `Mid` and `Open` rest states.
//!
//! # Primary responsibilities
//! - **state**: `PanelStateMachine`, the transition table, tap gating and
//!   velocity synthesis for explicit requests.
//! - **layout**: pure geometry for the pane, content view, drag handle,
//!   floating header and darkening overlay.
//! - **controller**: `PanelController`, which routes input, runs the spring
//!   settle and notifies the host.
//! - **config**: `PanelConfig` with defaults, validation and TOML/JSON
//!   loading (feature `config`).
//!
//! # How it fits in the system
//! The host forwards pan and tap events plus frame callbacks to a
//! `PanelController` and renders what its `PanelObserver` receives.

pub mod config;
pub mod controller;
pub mod error;
pub mod host;
pub mod layout;
pub mod state;

#[cfg(feature = "test-helpers")]
pub mod testing;

pub use config::PanelConfig;
pub use controller::PanelController;
pub use error::ConfigError;
pub use host::{FrameScheduler, NoopObserver, PanelObserver};
pub use layout::{LayoutInput, PanelLayout};
pub use state::{Direction, PanelState, PanelStateMachine, Transition, TransitionCause};
