#![forbid(unsafe_code)]

//! Spring settling.
//!
//! - [`params`]: [`MotionParameters`] and presets.
//! - [`spring`]: [`PaneSpring`], the 2D damped attachment spring.
//! - [`settle`]: [`SettlingProcess`] and the reentrant [`SpringSolver`].

pub mod params;
pub mod settle;
pub mod spring;

pub use params::{MotionParameters, presets};
pub use settle::{SettleOutcome, SettleTick, SettlingProcess, SpringSolver};
pub use spring::PaneSpring;

use crate::geometry::{Point, Vector};

/// Start a settle from `from` toward `to`.
///
/// Shorthand for [`SettlingProcess::new`].
#[must_use]
pub fn animate(
    from: Point,
    to: Point,
    initial_velocity: Vector,
    params: MotionParameters,
) -> SettlingProcess {
    SettlingProcess::new(from, to, initial_velocity, params)
}
