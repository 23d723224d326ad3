#![forbid(unsafe_code)]

//! Panel configuration.
//!
//! [`PanelConfig`] carries every geometric margin, feature flag and the
//! spring parameters of a panel. All fields have defaults, and the loaders
//! accept partial files.
//!
//! # Loading
//!
//! ```toml
//! # panel.toml
//! closed_height = 72
//! mid_top_margin = 420
//! shows_mid_state = true
//! starting_state = "mid"
//!
//! [motion]
//! frequency = 4.0
//! damping = 0.5
//! ```
//!
//! ```rust,ignore
//! let config = PanelConfig::from_toml_file("panel.toml")?;
//! let config = PanelConfig::from_json_str(json)?.validated()?;
//! ```
//!
//! Validation never blocks construction of a controller. Values that look
//! wrong are reported by [`PanelConfig::validate`], and the panel does the
//! best it can with them.

#[cfg(feature = "config")]
use std::path::Path;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use sheetpane_core::animation::MotionParameters;
use sheetpane_core::animation::params::MIN_FREQUENCY;

use crate::error::ConfigError;
use crate::state::PanelState;

/// Geometry, flags and motion parameters for one panel.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct PanelConfig {
    /// Height of the drag handle strip that stays visible when closed.
    pub closed_height: f64,

    /// Gap between the closed panel and the bottom of the viewport.
    pub closed_bottom_margin: f64,

    /// Distance from the viewport top to the open panel. Drags cannot lift
    /// the panel above this line.
    pub open_top_margin: f64,

    /// Line the mid-state handle rests under. Half the viewport height when
    /// absent.
    pub mid_top_margin: Option<f64>,

    /// Whether `Mid` is a reachable state.
    pub shows_mid_state: bool,

    /// Height of the floating header above the handle. No header when absent.
    pub floating_header_height: Option<f64>,

    /// Ceiling the floating header sticks under as the panel rises. Half the
    /// viewport height when absent.
    pub floating_header_min_y: Option<f64>,

    /// Panel top at or below which the overlay is fully transparent. Half
    /// the first usable viewport height when absent.
    pub darkening_min_y: Option<f64>,

    /// Overlay opacity with the panel top at `y = 0`.
    pub max_overlay_opacity: f64,

    /// Whether a tap may move the panel up.
    pub can_tap_to_open: bool,

    /// Whether a tap may move the panel down.
    pub can_tap_to_close: bool,

    /// State at construction.
    pub starting_state: PanelState,

    /// Spring parameters for settling.
    pub motion: MotionParameters,
}

impl PanelConfig {
    pub const DEFAULT_CLOSED_HEIGHT: f64 = 60.0;
    pub const DEFAULT_CLOSED_BOTTOM_MARGIN: f64 = 0.0;
    pub const DEFAULT_OPEN_TOP_MARGIN: f64 = 90.0;
    pub const DEFAULT_MAX_OVERLAY_OPACITY: f64 = 0.85;
    /// Extra pane height below the viewport so a bouncing pane never shows
    /// its bottom edge.
    pub const PANE_OVERSCROLL_ALLOWANCE: f64 = 88.0;

    /// Set the closed height (builder pattern).
    #[must_use]
    pub fn with_closed_height(mut self, height: f64) -> Self {
        self.closed_height = height;
        self
    }

    /// Set the closed bottom margin (builder pattern).
    #[must_use]
    pub fn with_closed_bottom_margin(mut self, margin: f64) -> Self {
        self.closed_bottom_margin = margin;
        self
    }

    /// Set the open top margin (builder pattern).
    #[must_use]
    pub fn with_open_top_margin(mut self, margin: f64) -> Self {
        self.open_top_margin = margin;
        self
    }

    /// Set the mid top margin (builder pattern).
    #[must_use]
    pub fn with_mid_top_margin(mut self, margin: f64) -> Self {
        self.mid_top_margin = Some(margin);
        self
    }

    /// Enable or disable the mid state (builder pattern).
    #[must_use]
    pub fn with_shows_mid_state(mut self, shows: bool) -> Self {
        self.shows_mid_state = shows;
        self
    }

    /// Add a floating header of `height` (builder pattern).
    #[must_use]
    pub fn with_floating_header(mut self, height: f64) -> Self {
        self.floating_header_height = Some(height);
        self
    }

    /// Set the floating header ceiling (builder pattern).
    #[must_use]
    pub fn with_floating_header_min_y(mut self, min_y: f64) -> Self {
        self.floating_header_min_y = Some(min_y);
        self
    }

    /// Fix the darkening line instead of deriving it (builder pattern).
    #[must_use]
    pub fn with_darkening_min_y(mut self, min_y: f64) -> Self {
        self.darkening_min_y = Some(min_y);
        self
    }

    /// Set the maximum overlay opacity (builder pattern).
    #[must_use]
    pub fn with_max_overlay_opacity(mut self, opacity: f64) -> Self {
        self.max_overlay_opacity = opacity;
        self
    }

    /// Allow or forbid opening taps (builder pattern).
    #[must_use]
    pub fn with_tap_to_open(mut self, allowed: bool) -> Self {
        self.can_tap_to_open = allowed;
        self
    }

    /// Allow or forbid closing taps (builder pattern).
    #[must_use]
    pub fn with_tap_to_close(mut self, allowed: bool) -> Self {
        self.can_tap_to_close = allowed;
        self
    }

    /// Set the starting state (builder pattern).
    #[must_use]
    pub fn with_starting_state(mut self, state: PanelState) -> Self {
        self.starting_state = state;
        self
    }

    /// Set the spring parameters (builder pattern).
    #[must_use]
    pub fn with_motion(mut self, motion: MotionParameters) -> Self {
        self.motion = motion;
        self
    }

    /// Floating header height, `0` without a header.
    #[inline]
    #[must_use]
    pub fn header_height(&self) -> f64 {
        self.floating_header_height.unwrap_or(0.0)
    }

    /// Distance from the pane top to the top of the content view.
    #[inline]
    #[must_use]
    pub fn content_top_inset(&self) -> f64 {
        self.closed_height + self.header_height()
    }

    /// Load from a TOML string.
    #[cfg(feature = "config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Serialize to a TOML string.
    #[cfg(feature = "config")]
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Check every field for values the panel can only handle oddly.
    ///
    /// Returns a list of findings. An empty list means the config is clean.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let non_negative = [
            ("closed_height", self.closed_height),
            ("closed_bottom_margin", self.closed_bottom_margin),
            ("open_top_margin", self.open_top_margin),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                errors.push(format!("{name} must be finite and >= 0, got {value}"));
            }
        }

        if let Some(mid) = self.mid_top_margin {
            if !mid.is_finite() {
                errors.push(format!("mid_top_margin must be finite, got {mid}"));
            } else if mid < self.open_top_margin {
                errors.push(format!(
                    "mid_top_margin ({mid}) must be >= open_top_margin ({})",
                    self.open_top_margin
                ));
            }
        }

        if let Some(height) = self.floating_header_height
            && !(height.is_finite() && height >= 0.0)
        {
            errors.push(format!(
                "floating_header_height must be finite and >= 0, got {height}"
            ));
        }

        if let Some(min_y) = self.floating_header_min_y
            && !min_y.is_finite()
        {
            errors.push(format!("floating_header_min_y must be finite, got {min_y}"));
        }

        if let Some(min_y) = self.darkening_min_y
            && !(min_y.is_finite() && min_y > 0.0)
        {
            errors.push(format!("darkening_min_y must be finite and > 0, got {min_y}"));
        }

        if !(0.0..=1.0).contains(&self.max_overlay_opacity) {
            errors.push(format!(
                "max_overlay_opacity must be in [0, 1], got {}",
                self.max_overlay_opacity
            ));
        }

        if self.starting_state == PanelState::Mid && !self.shows_mid_state {
            errors.push("starting_state mid requires shows_mid_state".to_string());
        }

        let motion = &self.motion;
        for (name, value) in [
            ("motion.length", motion.length),
            ("motion.resistance", motion.resistance),
            ("motion.damping", motion.damping),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                errors.push(format!("{name} must be finite and >= 0, got {value}"));
            }
        }
        if !(motion.frequency.is_finite() && motion.frequency >= MIN_FREQUENCY) {
            errors.push(format!(
                "motion.frequency must be finite and >= {MIN_FREQUENCY}, got {}",
                motion.frequency
            ));
        }
        if !(motion.max_duration_secs.is_finite() && motion.max_duration_secs > 0.0) {
            errors.push(format!(
                "motion.max_duration_secs must be finite and > 0, got {}",
                motion.max_duration_secs
            ));
        }

        errors
    }

    /// Return `self` if [`validate`](Self::validate) finds nothing.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            closed_height: Self::DEFAULT_CLOSED_HEIGHT,
            closed_bottom_margin: Self::DEFAULT_CLOSED_BOTTOM_MARGIN,
            open_top_margin: Self::DEFAULT_OPEN_TOP_MARGIN,
            mid_top_margin: None,
            shows_mid_state: true,
            floating_header_height: None,
            floating_header_min_y: None,
            darkening_min_y: None,
            max_overlay_opacity: Self::DEFAULT_MAX_OVERLAY_OPACITY,
            can_tap_to_open: true,
            can_tap_to_close: true,
            starting_state: PanelState::Closed,
            motion: MotionParameters::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
