#![forbid(unsafe_code)]

//! Tunable spring parameters.
//!
//! The model is an attachment spring between the moving point and its target,
//! plus linear air resistance on the point:
//!
//!   a = ω² × (|d| − length) × d̂ − (2ζω + resistance) × v
//!
//! where `ω = 2π × frequency`, `ζ = damping` and `d = target − position`.
//!
//! - `damping < 1`: underdamped, overshoots the target before settling.
//! - `damping == 1`: critically damped (ignoring resistance).
//! - `damping > 1`: overdamped, creeps toward the target.
//!
//! Resistance adds velocity drag on top of the spring's own damping, so an
//! underdamped spring with non-zero resistance overshoots less than its
//! damping ratio alone suggests.

use std::time::Duration;

/// Lowest accepted oscillation frequency (Hz). Anything below never settles
/// within a reasonable time.
pub const MIN_FREQUENCY: f64 = 0.1;

/// Default upper bound on a single settle, in seconds.
pub const DEFAULT_MAX_DURATION_SECS: f64 = 4.0;

/// Spring length, resistance, damping ratio and frequency for a settle.
///
/// Read once when a settle starts. Changing the parameters of a running
/// controller affects the next settle, not the one in flight.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionParameters {
    /// Rest length of the attachment in points. `0` pulls the point exactly
    /// onto the target.
    pub length: f64,
    /// Linear velocity drag (1/s).
    pub resistance: f64,
    /// Damping ratio ζ of the attachment spring.
    pub damping: f64,
    /// Oscillation frequency of the attachment spring (Hz).
    pub frequency: f64,
    /// Hard cap on a single settle, in seconds. When reached, the point snaps
    /// to the target.
    pub max_duration_secs: f64,
}

impl MotionParameters {
    /// Attachment frequency tuned to match the native sheet feel.
    pub const DEFAULT_FREQUENCY: f64 = 3.5;
    /// Attachment damping ratio tuned to match the native sheet feel.
    pub const DEFAULT_DAMPING: f64 = 0.4;
    /// Linear resistance tuned to match the native sheet feel.
    pub const DEFAULT_RESISTANCE: f64 = 10.0;

    /// Set the rest length (builder pattern). Clamped to minimum 0.
    #[must_use]
    pub fn with_length(mut self, length: f64) -> Self {
        self.length = length.max(0.0);
        self
    }

    /// Set resistance (builder pattern). Clamped to minimum 0.
    #[must_use]
    pub fn with_resistance(mut self, resistance: f64) -> Self {
        self.resistance = resistance.max(0.0);
        self
    }

    /// Set the damping ratio (builder pattern). Clamped to minimum 0.
    #[must_use]
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping.max(0.0);
        self
    }

    /// Set frequency (builder pattern). Clamped to [`MIN_FREQUENCY`].
    #[must_use]
    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = frequency.max(MIN_FREQUENCY);
        self
    }

    /// Set the settle cap (builder pattern).
    #[must_use]
    pub fn with_max_duration(mut self, max: Duration) -> Self {
        self.max_duration_secs = max.as_secs_f64();
        self
    }

    /// Angular frequency ω in rad/s.
    #[inline]
    #[must_use]
    pub fn angular_frequency(&self) -> f64 {
        std::f64::consts::TAU * self.frequency
    }

    /// Combined velocity drag coefficient `2ζω + resistance`.
    #[inline]
    #[must_use]
    pub fn drag_coefficient(&self) -> f64 {
        2.0 * self.damping * self.angular_frequency() + self.resistance
    }

    /// Settle cap as a `Duration`.
    #[must_use]
    pub fn max_duration(&self) -> Duration {
        let fallback = Duration::from_secs_f64(DEFAULT_MAX_DURATION_SECS);
        if self.max_duration_secs > 0.0 {
            Duration::try_from_secs_f64(self.max_duration_secs).unwrap_or(fallback)
        } else {
            fallback
        }
    }

    /// Copy with every field forced into its usable range. Non-finite values
    /// fall back to the defaults.
    #[must_use]
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();
        let pick = |v: f64, d: f64| if v.is_finite() { v } else { d };
        Self {
            length: pick(self.length, defaults.length).max(0.0),
            resistance: pick(self.resistance, defaults.resistance).max(0.0),
            damping: pick(self.damping, defaults.damping).max(0.0),
            frequency: pick(self.frequency, defaults.frequency).max(MIN_FREQUENCY),
            max_duration_secs: self.max_duration().as_secs_f64(),
        }
    }
}

impl Default for MotionParameters {
    fn default() -> Self {
        Self {
            length: 0.0,
            resistance: Self::DEFAULT_RESISTANCE,
            damping: Self::DEFAULT_DAMPING,
            frequency: Self::DEFAULT_FREQUENCY,
            max_duration_secs: DEFAULT_MAX_DURATION_SECS,
        }
    }
}

/// Common parameter sets.
pub mod presets {
    use super::MotionParameters;

    /// The default sheet feel: slight bounce, quick settle.
    #[must_use]
    pub fn native() -> MotionParameters {
        MotionParameters::default()
    }

    /// Stiffer and more damped than [`native`]; no visible bounce.
    #[must_use]
    pub fn snappy() -> MotionParameters {
        MotionParameters::default()
            .with_frequency(5.0)
            .with_damping(0.8)
    }

    /// Low frequency, heavy resistance. Slow and smooth.
    #[must_use]
    pub fn gentle() -> MotionParameters {
        MotionParameters::default()
            .with_frequency(1.8)
            .with_damping(0.9)
            .with_resistance(4.0)
    }

    /// Critically damped with no extra resistance.
    #[must_use]
    pub fn critical() -> MotionParameters {
        MotionParameters::default()
            .with_damping(1.0)
            .with_resistance(0.0)
    }
}
