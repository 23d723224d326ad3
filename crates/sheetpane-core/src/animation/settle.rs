#![forbid(unsafe_code)]

//! Settling processes: a bounded, retargetable run of a [`PaneSpring`].
//!
//! [`SettlingProcess`] owns one spring from the moment a settle starts until
//! the point comes to rest (or the time cap is reached). [`SpringSolver`] is
//! the reentrant entry point: it holds at most one process, and starting a
//! new one replaces whatever was in flight before the next tick can run.
//!
//! # Usage
//!
//! ```ignore
//! use std::time::Duration;
//! use sheetpane_core::animation::{MotionParameters, SpringSolver};
//! use sheetpane_core::geometry::{Point, Vector};
//!
//! let mut solver = SpringSolver::new();
//! solver.animate(
//!     Point::new(187.5, 1140.0),
//!     Point::new(187.5, 834.0),
//!     Vector::vertical(-1200.0),
//!     MotionParameters::default(),
//! );
//! while let Some(tick) = solver.tick(Duration::from_millis(16)) {
//!     // move the view to tick.position
//!     if tick.settled {
//!         break;
//!     }
//! }
//! ```
//!
//! # Invariants
//!
//! 1. Every [`SettleTick`] carries a finite position.
//! 2. A process never runs longer than its `max_duration`; on expiry it
//!    reports the target position with `settled == true`.
//! 3. Retargeting keeps the current position, so the reported motion is
//!    continuous across retargets.

use std::time::Duration;

use super::params::MotionParameters;
use super::spring::PaneSpring;
use crate::geometry::{Point, Vector};
use crate::{trace, warn};

/// Result of advancing a settle by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SettleTick {
    /// Instantaneous position after the frame.
    pub position: Point,
    /// Instantaneous velocity after the frame (points/s).
    pub velocity: Vector,
    /// Whether the settle has finished with this frame.
    pub settled: bool,
}

/// Why a settle finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    /// Still running.
    Running,
    /// The spring came to rest on its own.
    AtRest,
    /// The time cap elapsed and the point was snapped to the target.
    TimedOut,
    /// A non-finite step was discarded; the point stopped at its last
    /// finite position.
    Degenerate,
}

/// A single in-flight settle toward a target point.
#[derive(Debug, Clone)]
pub struct SettlingProcess {
    spring: PaneSpring,
    elapsed: Duration,
    max_duration: Duration,
    outcome: SettleOutcome,
}

impl SettlingProcess {
    /// Start settling from `from` toward `to` with `initial_velocity`.
    #[must_use]
    pub fn new(from: Point, to: Point, initial_velocity: Vector, params: MotionParameters) -> Self {
        let spring = PaneSpring::new(from, to, initial_velocity, params);
        let max_duration = spring.params().max_duration();
        Self {
            spring,
            elapsed: Duration::ZERO,
            max_duration,
            outcome: SettleOutcome::Running,
        }
    }

    /// Current position.
    #[inline]
    #[must_use]
    pub fn position(&self) -> Point {
        self.spring.position()
    }

    /// Current velocity.
    #[inline]
    #[must_use]
    pub fn velocity(&self) -> Vector {
        self.spring.velocity()
    }

    /// Current target.
    #[inline]
    #[must_use]
    pub fn target(&self) -> Point {
        self.spring.target()
    }

    /// Time spent since the settle started or was last retargeted.
    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Whether the settle has finished.
    #[inline]
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.outcome != SettleOutcome::Running
    }

    /// How the settle finished, or [`SettleOutcome::Running`].
    #[inline]
    #[must_use]
    pub fn outcome(&self) -> SettleOutcome {
        self.outcome
    }

    /// Move the target without disturbing position or velocity.
    ///
    /// Restarts the time cap and revives a finished process.
    pub fn retarget(&mut self, to: Point) {
        if !to.is_finite() {
            warn!(x = to.x, y = to.y, "ignoring non-finite settle target");
            return;
        }
        self.spring.set_target(to);
        self.elapsed = Duration::ZERO;
        if self.spring.is_at_rest() {
            self.outcome = SettleOutcome::AtRest;
        } else {
            self.outcome = SettleOutcome::Running;
        }
    }

    /// Move the target and replace the velocity.
    pub fn retarget_with_velocity(&mut self, to: Point, velocity: Vector) {
        self.spring.set_velocity(velocity);
        self.retarget(to);
    }

    /// Jump to the target and finish.
    pub fn finish(&mut self) -> Point {
        self.spring.snap_to_target();
        self.outcome = SettleOutcome::AtRest;
        self.spring.position()
    }

    /// Advance by `dt` and report the instantaneous position.
    pub fn tick(&mut self, dt: Duration) -> SettleTick {
        if self.outcome == SettleOutcome::Running {
            self.spring.advance(dt);
            self.elapsed = self.elapsed.saturating_add(dt);

            if self.spring.hit_degenerate_step() {
                warn!(
                    x = self.spring.position().x,
                    y = self.spring.position().y,
                    "settle produced non-finite values; holding last valid position"
                );
                self.outcome = SettleOutcome::Degenerate;
            } else if self.spring.is_at_rest() {
                self.outcome = SettleOutcome::AtRest;
            } else if self.elapsed >= self.max_duration {
                self.spring.snap_to_target();
                self.outcome = SettleOutcome::TimedOut;
            }
            trace!(
                y = self.spring.position().y,
                vy = self.spring.velocity().dy,
                outcome = ?self.outcome,
                "settle tick"
            );
        }

        SettleTick {
            position: self.spring.position(),
            velocity: self.spring.velocity(),
            settled: self.is_finished(),
        }
    }
}

/// Reentrant driver that owns at most one [`SettlingProcess`].
#[derive(Debug, Clone, Default)]
pub struct SpringSolver {
    process: Option<SettlingProcess>,
}

impl SpringSolver {
    /// Create an idle solver.
    #[must_use]
    pub fn new() -> Self {
        Self { process: None }
    }

    /// Start a settle, superseding any settle already in flight.
    pub fn animate(&mut self, from: Point, to: Point, initial_velocity: Vector, params: MotionParameters) {
        self.process = Some(SettlingProcess::new(from, to, initial_velocity, params));
    }

    /// Retarget the running settle, keeping its position and momentum.
    ///
    /// Returns `false` (and does nothing) when idle.
    pub fn retarget(&mut self, to: Point) -> bool {
        match self.process.as_mut() {
            Some(process) => {
                process.retarget(to);
                true
            }
            None => false,
        }
    }

    /// Stop the running settle where it is. Returns its last position.
    pub fn cancel(&mut self) -> Option<Point> {
        self.process.take().map(|p| p.position())
    }

    /// Whether a settle is in flight.
    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.process.is_some()
    }

    /// The settle in flight, if any.
    #[inline]
    #[must_use]
    pub fn process(&self) -> Option<&SettlingProcess> {
        self.process.as_ref()
    }

    /// Advance the settle in flight. The process is dropped once it reports
    /// `settled`. Returns `None` when idle.
    pub fn tick(&mut self, dt: Duration) -> Option<SettleTick> {
        let tick = self.process.as_mut()?.tick(dt);
        if tick.settled {
            self.process = None;
        }
        Some(tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_16: Duration = Duration::from_millis(16);

    fn process(from: f64, to: f64) -> SettlingProcess {
        SettlingProcess::new(
            Point::new(0.0, from),
            Point::new(0.0, to),
            Vector::ZERO,
            MotionParameters::default(),
        )
    }

    #[test]
    fn settles_and_reports_every_frame() {
        let mut p = process(740.0, 90.0);
        let mut frames = 0;
        let mut last = p.position();
        loop {
            let tick = p.tick(MS_16);
            frames += 1;
            assert!(tick.position.is_finite());
            last = tick.position;
            if tick.settled {
                break;
            }
            assert!(frames < 1000, "never settled");
        }
        assert!(frames > 1, "settle should take several frames");
        assert_eq!(last, Point::new(0.0, 90.0));
        assert_eq!(p.outcome(), SettleOutcome::AtRest);
    }

    #[test]
    fn tick_after_finish_is_stable() {
        let mut p = process(10.0, 10.0);
        assert!(p.tick(MS_16).settled);
        let again = p.tick(MS_16);
        assert!(again.settled);
        assert_eq!(again.position, Point::new(0.0, 10.0));
    }

    #[test]
    fn retarget_is_continuous() {
        let mut p = process(740.0, 90.0);
        for _ in 0..5 {
            p.tick(MS_16);
        }
        let before = p.position();
        p.retarget(Point::new(0.0, 340.0));
        assert_eq!(p.position(), before);
        assert_eq!(p.elapsed(), Duration::ZERO);
        assert!(!p.is_finished());
    }

    #[test]
    fn retarget_revives_finished_process() {
        let mut p = process(10.0, 10.0);
        p.tick(MS_16);
        assert!(p.is_finished());
        p.retarget(Point::new(0.0, 200.0));
        assert!(!p.is_finished());
    }

    #[test]
    fn retarget_non_finite_is_ignored() {
        let mut p = process(100.0, 50.0);
        p.retarget(Point::new(f64::NAN, 0.0));
        assert_eq!(p.target(), Point::new(0.0, 50.0));
    }

    #[test]
    fn retarget_with_velocity_replaces_momentum() {
        let mut p = process(500.0, 100.0);
        p.tick(MS_16);
        p.retarget_with_velocity(Point::new(0.0, 600.0), Vector::vertical(250.0));
        assert_eq!(p.velocity(), Vector::vertical(250.0));
    }

    #[test]
    fn undamped_spring_times_out_on_target() {
        let params = MotionParameters::default()
            .with_damping(0.0)
            .with_resistance(0.0)
            .with_max_duration(Duration::from_millis(500));
        let mut p = SettlingProcess::new(
            Point::new(0.0, 0.0),
            Point::new(0.0, 100.0),
            Vector::ZERO,
            params,
        );
        let mut last = None;
        for _ in 0..40 {
            let tick = p.tick(MS_16);
            if tick.settled {
                last = Some(tick);
                break;
            }
        }
        let tick = last.expect("time cap should end the settle");
        assert_eq!(tick.position, Point::new(0.0, 100.0));
        assert_eq!(p.outcome(), SettleOutcome::TimedOut);
    }

    #[test]
    fn degenerate_target_holds_last_position() {
        let mut p = SettlingProcess::new(
            Point::new(0.0, 20.0),
            Point::new(0.0, f64::MAX),
            Vector::ZERO,
            MotionParameters::default(),
        );
        let tick = p.tick(MS_16);
        assert!(tick.settled);
        assert!(tick.position.is_finite());
        assert_eq!(p.outcome(), SettleOutcome::Degenerate);
    }

    #[test]
    fn finish_snaps() {
        let mut p = process(700.0, 90.0);
        p.tick(MS_16);
        assert_eq!(p.finish(), Point::new(0.0, 90.0));
        assert!(p.is_finished());
    }

    #[test]
    fn solver_idle_by_default() {
        let mut solver = SpringSolver::new();
        assert!(!solver.is_running());
        assert!(solver.tick(MS_16).is_none());
        assert!(!solver.retarget(Point::ZERO));
        assert!(solver.cancel().is_none());
    }

    #[test]
    fn solver_animate_supersedes_previous() {
        let mut solver = SpringSolver::new();
        solver.animate(
            Point::new(0.0, 700.0),
            Point::new(0.0, 90.0),
            Vector::ZERO,
            MotionParameters::default(),
        );
        solver.tick(MS_16);
        solver.animate(
            Point::new(0.0, 300.0),
            Point::new(0.0, 740.0),
            Vector::ZERO,
            MotionParameters::default(),
        );
        let process = solver.process().expect("running");
        assert_eq!(process.target(), Point::new(0.0, 740.0));
        assert_eq!(process.position(), Point::new(0.0, 300.0));
    }

    #[test]
    fn solver_drops_process_when_settled() {
        let mut solver = SpringSolver::new();
        solver.animate(
            Point::new(0.0, 100.0),
            Point::new(0.0, 110.0),
            Vector::ZERO,
            MotionParameters::default(),
        );
        let mut settled = false;
        for _ in 0..500 {
            match solver.tick(MS_16) {
                Some(tick) if tick.settled => {
                    settled = true;
                    break;
                }
                Some(_) => {}
                None => break,
            }
        }
        assert!(settled);
        assert!(!solver.is_running());
    }

    #[test]
    fn solver_cancel_returns_position() {
        let mut solver = SpringSolver::new();
        solver.animate(
            Point::new(0.0, 500.0),
            Point::new(0.0, 90.0),
            Vector::ZERO,
            MotionParameters::default(),
        );
        solver.tick(MS_16);
        let pos = solver.process().map(SettlingProcess::position);
        assert_eq!(solver.cancel(), pos);
        assert!(!solver.is_running());
    }
}
