#![forbid(unsafe_code)]

//! Damped attachment spring acting on a 2D point.
//!
//! Provides the physically-based motion behind panel settling. The point is
//! attached to its target by a spring of configurable rest length and is
//! slowed by linear resistance; see [`MotionParameters`] for the force model.
//!
//! # Integration
//!
//! Uses semi-implicit Euler integration for stability. [`PaneSpring::advance`]
//! accepts a `Duration` and subdivides it into steps of at most 4ms.
//!
//! # Invariants
//!
//! 1. `position()` and `velocity()` are always finite. A step that would
//!    produce a non-finite value is discarded, the point stays at its last
//!    finite position and the spring comes to rest there.
//! 2. A spring at rest (`is_at_rest() == true`) does not move until
//!    `set_target()`, `set_velocity()` or `impulse()` wakes it.
//! 3. With `length == 0`, coming to rest snaps the point exactly onto the
//!    target and zeroes the velocity.
//!
//! # Failure Modes
//!
//! - Zero damping and zero resistance: oscillates forever; the owning
//!   [`SettlingProcess`](super::SettlingProcess) enforces the time bound.
//! - Non-finite target: ignored, the previous target is kept.

use std::time::Duration;

use super::params::MotionParameters;
use crate::geometry::{Point, Vector};

/// Maximum dt per integration step (4ms). Larger deltas are subdivided
/// for numerical stability at high frequencies.
const MAX_STEP_SECS: f64 = 0.004;

/// Default rest threshold: distance (points) below which the spring may rest.
pub const DEFAULT_REST_DISTANCE: f64 = 0.1;

/// Default velocity threshold (points/s) below which, combined with the
/// distance threshold, the spring is considered at rest.
pub const DEFAULT_REST_SPEED: f64 = 1.0;

/// A damped spring pulling a point toward a target point.
#[derive(Debug, Clone)]
pub struct PaneSpring {
    position: Point,
    velocity: Vector,
    target: Point,
    params: MotionParameters,
    rest_distance: f64,
    rest_speed: f64,
    at_rest: bool,
    degenerate: bool,
}

impl PaneSpring {
    /// Create a spring at `from`, pulled toward `to`, moving at `velocity`.
    ///
    /// Non-finite inputs are replaced: `from` falls back to `to` (or the
    /// origin), `to` falls back to `from`, `velocity` to zero.
    #[must_use]
    pub fn new(from: Point, to: Point, velocity: Vector, params: MotionParameters) -> Self {
        let position = match (from.is_finite(), to.is_finite()) {
            (true, _) => from,
            (false, true) => to,
            (false, false) => Point::ZERO,
        };
        let target = if to.is_finite() { to } else { position };
        let velocity = if velocity.is_finite() {
            velocity
        } else {
            Vector::ZERO
        };
        Self {
            position,
            velocity,
            target,
            params: params.sanitized(),
            rest_distance: DEFAULT_REST_DISTANCE,
            rest_speed: DEFAULT_REST_SPEED,
            at_rest: false,
            degenerate: false,
        }
    }

    /// Current position.
    #[inline]
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Current velocity (points/s).
    #[inline]
    #[must_use]
    pub fn velocity(&self) -> Vector {
        self.velocity
    }

    /// Current target.
    #[inline]
    #[must_use]
    pub fn target(&self) -> Point {
        self.target
    }

    /// Parameters in effect.
    #[inline]
    #[must_use]
    pub fn params(&self) -> &MotionParameters {
        &self.params
    }

    /// Whether the spring has settled.
    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Whether the last integration produced non-finite values and was
    /// discarded.
    #[inline]
    #[must_use]
    pub fn hit_degenerate_step(&self) -> bool {
        self.degenerate
    }

    /// Change the target, keeping position and velocity. Wakes the spring if
    /// the target moved by more than the rest distance.
    pub fn set_target(&mut self, target: Point) {
        if !target.is_finite() {
            return;
        }
        if self.target.distance(target) > self.rest_distance {
            self.at_rest = false;
        }
        self.target = target;
    }

    /// Replace the velocity. Wakes the spring.
    pub fn set_velocity(&mut self, velocity: Vector) {
        if !velocity.is_finite() {
            return;
        }
        self.velocity = velocity;
        self.at_rest = false;
    }

    /// Apply an impulse (add to velocity). Wakes the spring.
    pub fn impulse(&mut self, velocity_delta: Vector) {
        self.set_velocity(self.velocity + velocity_delta);
    }

    /// Jump to the target and stop.
    pub fn snap_to_target(&mut self) {
        self.position = self.target;
        self.velocity = Vector::ZERO;
        self.at_rest = true;
    }

    /// Spring plus drag acceleration at the current state.
    fn acceleration(&self) -> Vector {
        let omega = self.params.angular_frequency();
        let to_target = self.target - self.position;
        let distance = to_target.length();

        let spring = if self.params.length > 0.0 && distance > f64::EPSILON {
            let stretch = distance - self.params.length;
            to_target * (omega * omega * stretch / distance)
        } else {
            to_target * (omega * omega)
        };
        let drag = self.velocity * -self.params.drag_coefficient();
        spring + drag
    }

    /// Perform a single integration step of `dt` seconds.
    fn step(&mut self, dt: f64) {
        // Semi-implicit Euler: velocity first, then position from the new
        // velocity.
        let velocity = self.velocity + self.acceleration() * dt;
        let position = self.position + velocity * dt;

        if !(velocity.is_finite() && position.is_finite()) {
            self.velocity = Vector::ZERO;
            self.degenerate = true;
            self.at_rest = true;
            return;
        }
        self.velocity = velocity;
        self.position = position;
    }

    /// Advance the spring by `dt`, subdividing if necessary for stability.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }

        let total_secs = dt.as_secs_f64();
        if total_secs <= 0.0 {
            return;
        }

        self.degenerate = false;
        let mut remaining = total_secs;
        while remaining > 0.0 && !self.at_rest {
            let step_dt = remaining.min(MAX_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }
        if self.degenerate {
            return;
        }

        let offset = (self.target.distance(self.position) - self.params.length).abs();
        if offset < self.rest_distance && self.velocity.length() < self.rest_speed {
            if self.params.length <= self.rest_distance {
                self.position = self.target;
            }
            self.velocity = Vector::ZERO;
            self.at_rest = true;
        }
    }
}
