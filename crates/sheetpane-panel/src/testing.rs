#![forbid(unsafe_code)]

//! Deterministic drivers for exercising a panel without a host.
//!
//! [`PanelDriver`] pumps frames at a fixed 60 Hz step and scripts drags.
//! [`RecordingObserver`] captures every notification the controller emits
//! so tests can assert on the sequence.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::controller::PanelController;
use crate::host::PanelObserver;
use crate::layout::PanelLayout;
use crate::state::{PanelState, Transition};

/// Fixed frame step used by [`PanelDriver`].
pub const FRAME_STEP: Duration = Duration::from_micros(16_667);

/// Upper bound on frames [`PanelDriver::settle`] will pump.
pub const MAX_SETTLE_FRAMES: usize = 600;

/// One notification seen by a [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    Layout(PanelLayout),
    StateChanged(Transition),
    Settled(PanelState),
}

/// Shared log of [`PanelEvent`]s.
#[derive(Debug, Clone, Default)]
pub struct Recording(Rc<RefCell<Vec<PanelEvent>>>);

impl Recording {
    /// Copy of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<PanelEvent> {
        self.0.borrow().clone()
    }

    /// Every state change, in order.
    #[must_use]
    pub fn transitions(&self) -> Vec<Transition> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                PanelEvent::StateChanged(t) => Some(*t),
                _ => None,
            })
            .collect()
    }

    /// Every layout, in order.
    #[must_use]
    pub fn layouts(&self) -> Vec<PanelLayout> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                PanelEvent::Layout(l) => Some(*l),
                _ => None,
            })
            .collect()
    }

    /// Number of settle notifications.
    #[must_use]
    pub fn settled_count(&self) -> usize {
        self.0
            .borrow()
            .iter()
            .filter(|e| matches!(e, PanelEvent::Settled(_)))
            .count()
    }

    /// Drop everything recorded so far.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// [`PanelObserver`] that appends to a [`Recording`].
#[derive(Debug, Default)]
pub struct RecordingObserver {
    recording: Recording,
}

impl RecordingObserver {
    /// Create an observer and the handle to read what it records.
    #[must_use]
    pub fn new() -> (Self, Recording) {
        let recording = Recording::default();
        (
            Self {
                recording: recording.clone(),
            },
            recording,
        )
    }
}

impl PanelObserver for RecordingObserver {
    fn on_layout(&mut self, layout: &PanelLayout) {
        self.recording.0.borrow_mut().push(PanelEvent::Layout(*layout));
    }

    fn on_state_changed(&mut self, transition: &Transition) {
        self.recording
            .0
            .borrow_mut()
            .push(PanelEvent::StateChanged(*transition));
    }

    fn on_settled(&mut self, state: PanelState) {
        self.recording.0.borrow_mut().push(PanelEvent::Settled(state));
    }
}

/// Fixed-step frame pump around a [`PanelController`].
#[derive(Debug)]
pub struct PanelDriver {
    panel: PanelController,
    frames: usize,
}

impl PanelDriver {
    #[must_use]
    pub fn new(panel: PanelController) -> Self {
        Self { panel, frames: 0 }
    }

    #[must_use]
    pub fn panel(&self) -> &PanelController {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut PanelController {
        &mut self.panel
    }

    /// Total frames pumped.
    #[must_use]
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Pump up to `n` frames. Stops early once the panel is idle. Returns
    /// the number of frames pumped.
    pub fn step(&mut self, n: usize) -> usize {
        let mut pumped = 0;
        while pumped < n {
            let more = self.panel.on_frame(FRAME_STEP);
            pumped += 1;
            if !more {
                break;
            }
        }
        self.frames += pumped;
        pumped
    }

    /// Pump frames until the settle finishes. Returns the number pumped,
    /// or `None` if it was still running after [`MAX_SETTLE_FRAMES`].
    pub fn settle(&mut self) -> Option<usize> {
        if !self.panel.is_animating() {
            return Some(0);
        }
        let pumped = self.step(MAX_SETTLE_FRAMES);
        (!self.panel.is_animating()).then_some(pumped)
    }

    /// Drag by `total_dy` in `steps` equal moves, then release with
    /// `velocity_y`. The pointer tracks the pane top.
    pub fn drag(&mut self, total_dy: f64, steps: usize, velocity_y: f64) {
        let steps = steps.max(1);
        let delta = total_dy / steps as f64;
        self.panel.on_drag_began();
        for _ in 0..steps {
            let location = self.panel.panel_top_y() + delta + 1.0;
            self.panel.on_drag_changed(delta, location);
        }
        self.panel.on_drag_ended(velocity_y);
    }

    /// [`drag`](Self::drag), then [`settle`](Self::settle).
    pub fn fling(&mut self, total_dy: f64, velocity_y: f64) -> Option<usize> {
        self.drag(total_dy, 8, velocity_y);
        self.settle()
    }
}
