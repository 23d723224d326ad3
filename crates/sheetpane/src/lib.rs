#![forbid(unsafe_code)]

//! sheetpane public facade crate.
//!
//! Re-exports the panel controller, its configuration and the geometry and
//! motion types hosts need, plus a prelude for day-to-day usage.
//!
//! ```ignore
//! use sheetpane::prelude::*;
//!
//! let mut panel = PanelController::new(PanelConfig::default())
//!     .with_viewport(Size::new(375.0, 800.0));
//! panel.on_drag_began();
//! panel.on_drag_changed(-120.0, 610.0);
//! panel.on_drag_ended(-900.0);
//! while panel.on_frame(std::time::Duration::from_millis(16)) {}
//! assert_eq!(panel.state(), PanelState::Mid);
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use sheetpane_core::animation::{
    MotionParameters, PaneSpring, SettleOutcome, SettleTick, SettlingProcess, SpringSolver,
    presets,
};
pub use sheetpane_core::geometry::{Point, Rect, Size, Vector};
pub use sheetpane_core::gesture::{DragAdapter, DragEvent, DragUpdate};

// --- Panel re-exports ------------------------------------------------------

pub use sheetpane_panel::{
    ConfigError, Direction, FrameScheduler, LayoutInput, NoopObserver, PanelConfig,
    PanelController, PanelLayout, PanelObserver, PanelState, PanelStateMachine, Transition,
    TransitionCause,
};

#[cfg(feature = "test-helpers")]
pub use sheetpane_panel::testing;

// --- Errors ---------------------------------------------------------------

/// Top-level error type for sheetpane hosts.
#[derive(Debug)]
pub enum Error {
    /// Loading or validating a panel configuration failed.
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Standard result type for sheetpane APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Build a controller from a TOML config file, rejecting configs that fail
/// validation.
#[cfg(feature = "config")]
pub fn controller_from_toml_file(
    path: impl AsRef<std::path::Path>,
    viewport: Size,
) -> Result<PanelController> {
    let config = PanelConfig::from_toml_file(path)?.validated()?;
    Ok(PanelController::new(config).with_viewport(viewport))
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        DragEvent, DragUpdate, Error, FrameScheduler, MotionParameters, PanelConfig,
        PanelController, PanelLayout, PanelObserver, PanelState, Point, Rect, Result, Size, Vector,
    };

    pub use crate::{core, panel};
}

pub use sheetpane_core as core;
pub use sheetpane_panel as panel;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_wraps() {
        let err: Error = ConfigError::Validation(vec!["closed_height must be >= 0".into()]).into();
        assert!(err.to_string().contains("closed_height"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn prelude_builds_a_panel() {
        use crate::prelude::*;

        let mut panel =
            PanelController::new(PanelConfig::default()).with_viewport(Size::new(375.0, 800.0));
        panel.on_drag_began();
        panel.on_drag_changed(-120.0, 610.0);
        panel.on_drag_ended(-900.0);
        let mut frames = 0;
        while panel.on_frame(std::time::Duration::from_millis(16)) {
            frames += 1;
            assert!(frames < 1000);
        }
        assert_eq!(panel.state(), PanelState::Mid);
        assert_eq!(panel.panel_top_y(), 340.0);
    }
}
