#![forbid(unsafe_code)]

//! Drag input adapter: turns raw vertical drag events into panel motion.
//!
//! [`DragAdapter`] consumes the host's pan-gesture stream ([`DragEvent`]) and
//! produces [`DragUpdate`]s that the panel controller applies. Motion is
//! locked to the vertical axis; horizontal translation and velocity are
//! discarded on entry.
//!
//! # State Machine
//!
//! ```text
//!            Began                 Ended / Cancelled
//!   Idle ───────────────▶ Dragging ───────────────────▶ Idle
//!                         │    ▲
//!                         └────┘ Changed (Moved | Vetoed)
//! ```
//!
//! # Invariants
//!
//! 1. The tracked pane top never moves above the configured boundary while a
//!    drag is active. A `Changed` event that would cross it is vetoed for
//!    that tick: the top stays where it was, and the pending translation is
//!    discarded rather than carried into the next tick.
//! 2. `Released` always carries a purely vertical velocity.
//! 3. Events arriving while idle (other than `Began`) are ignored.
//! 4. After `reset()`, the adapter is idle and holds no pending translation.
//!
//! # Failure Modes
//!
//! - Non-finite translation: the tick is ignored.
//! - Non-finite release velocity: reported as zero, which the panel treats
//!   as a closing release.

use crate::debug;
use crate::geometry::{Point, Vector};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Raw drag events delivered by the host's gesture recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    /// The pan gesture was recognized.
    Began,
    /// The finger moved by `translation` since the previous event and is now
    /// at `location` (viewport coordinates).
    Changed { translation: Vector, location: Point },
    /// The finger lifted while moving at `velocity` (points/s).
    Ended { velocity: Vector },
    /// The system interrupted the gesture.
    Cancelled,
}

/// What the adapter decided for one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragUpdate {
    /// A drag session started with the pane top at `top`.
    Started { top: f64 },
    /// The pane top moved to `top` (by `delta`).
    Moved { top: f64, delta: f64 },
    /// The move would have crossed the boundary and was dropped. The pane
    /// top stays at `top`.
    Vetoed { top: f64, attempted: f64 },
    /// The finger lifted. `velocity` is vertical only.
    Released { top: f64, velocity: Vector },
    /// The gesture was interrupted at `top`.
    Cancelled { top: f64 },
    /// The event did not apply (no active drag, or unusable values).
    Ignored,
}

// ---------------------------------------------------------------------------
// Internal state
// ---------------------------------------------------------------------------

/// Tracks an active drag.
#[derive(Debug, Clone, Copy)]
struct DragTracker {
    start_top: f64,
    top: f64,
    pending: f64,
    last_location: Option<Point>,
}

// ---------------------------------------------------------------------------
// DragAdapter
// ---------------------------------------------------------------------------

/// Stateful adapter from raw drag events to vertical pane motion.
pub struct DragAdapter {
    boundary: f64,
    drag: Option<DragTracker>,
}

impl std::fmt::Debug for DragAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragAdapter")
            .field("boundary", &self.boundary)
            .field("dragging", &self.is_dragging())
            .finish()
    }
}

impl DragAdapter {
    /// Create an adapter that refuses to move the pane top above `boundary`.
    #[must_use]
    pub fn new(boundary: f64) -> Self {
        Self {
            boundary,
            drag: None,
        }
    }

    /// The "cannot drag past" line.
    #[inline]
    #[must_use]
    pub fn boundary(&self) -> f64 {
        self.boundary
    }

    /// Move the "cannot drag past" line.
    pub fn set_boundary(&mut self, boundary: f64) {
        self.boundary = boundary;
    }

    /// Whether a drag is currently in progress.
    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Pane top tracked by the active drag.
    #[inline]
    #[must_use]
    pub fn current_top(&self) -> Option<f64> {
        self.drag.map(|d| d.top)
    }

    /// Total vertical distance covered by the active drag.
    #[must_use]
    pub fn total_offset(&self) -> Option<f64> {
        self.drag.map(|d| d.top - d.start_top)
    }

    /// Last pointer location seen by the active drag.
    #[must_use]
    pub fn last_location(&self) -> Option<Point> {
        self.drag.and_then(|d| d.last_location)
    }

    /// Dispatch a raw event. `pane_top` is only read for `Began`.
    pub fn process(&mut self, event: &DragEvent, pane_top: f64) -> DragUpdate {
        match *event {
            DragEvent::Began => self.begin(pane_top),
            DragEvent::Changed {
                translation,
                location,
            } => self.change(translation.dy, location.y),
            DragEvent::Ended { velocity } => self.end(velocity),
            DragEvent::Cancelled => self.cancel(),
        }
    }

    /// Start tracking a drag with the pane top at `pane_top`. Restarts any
    /// drag already in progress.
    pub fn begin(&mut self, pane_top: f64) -> DragUpdate {
        self.drag = Some(DragTracker {
            start_top: pane_top,
            top: pane_top,
            pending: 0.0,
            last_location: None,
        });
        DragUpdate::Started { top: pane_top }
    }

    /// Apply a vertical translation of `delta_y`; `location_y` is the
    /// pointer's absolute position.
    pub fn change(&mut self, delta_y: f64, location_y: f64) -> DragUpdate {
        let boundary = self.boundary;
        let Some(ref mut drag) = self.drag else {
            return DragUpdate::Ignored;
        };
        if !delta_y.is_finite() {
            return DragUpdate::Ignored;
        }
        if location_y.is_finite() {
            drag.last_location = Some(Point::new(0.0, location_y));
        }

        drag.pending += delta_y;
        let attempted = drag.top + drag.pending;
        let pointer_past = location_y.is_finite() && location_y < boundary;
        if attempted < boundary || pointer_past {
            drag.pending = 0.0;
            debug!(top = drag.top, attempted, boundary, "drag tick vetoed at boundary");
            return DragUpdate::Vetoed {
                top: drag.top,
                attempted,
            };
        }

        let delta = drag.pending;
        drag.top = attempted;
        drag.pending = 0.0;
        DragUpdate::Moved {
            top: drag.top,
            delta,
        }
    }

    /// Finish the drag with the host-measured release `velocity`.
    pub fn end(&mut self, velocity: Vector) -> DragUpdate {
        let Some(drag) = self.drag.take() else {
            return DragUpdate::Ignored;
        };
        let velocity = if velocity.dy.is_finite() {
            velocity.vertical_only()
        } else {
            Vector::ZERO
        };
        DragUpdate::Released {
            top: drag.top,
            velocity,
        }
    }

    /// Abandon the drag without a release velocity.
    pub fn cancel(&mut self) -> DragUpdate {
        match self.drag.take() {
            Some(drag) => DragUpdate::Cancelled { top: drag.top },
            None => DragUpdate::Ignored,
        }
    }

    /// Return to idle without reporting anything.
    pub fn reset(&mut self) {
        self.drag = None;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
