#![forbid(unsafe_code)]

//! Capabilities the host environment provides to a panel.
//!
//! The host owns the view tree and the display clock. The controller tells
//! it what changed through [`PanelObserver`] and asks for frame callbacks
//! through [`FrameScheduler`]; the host answers by calling
//! [`PanelController::on_frame`](crate::PanelController::on_frame).

use crate::layout::PanelLayout;
use crate::state::{PanelState, Transition};

/// Receives derived geometry and state changes.
///
/// All methods default to no-ops so hosts only implement what they render.
pub trait PanelObserver {
    /// New geometry for the pane, its subviews and the overlay. Called on
    /// every drag tick, settle tick and resize.
    fn on_layout(&mut self, layout: &PanelLayout) {
        let _ = layout;
    }

    /// The discrete state changed.
    fn on_state_changed(&mut self, transition: &Transition) {
        let _ = transition;
    }

    /// A settle finished with the panel resting in `state`.
    fn on_settled(&mut self, state: PanelState) {
        let _ = state;
    }
}

/// Schedules per-frame callbacks on the host's display clock.
pub trait FrameScheduler {
    /// Start delivering frames. Called when a settle begins; may be called
    /// again while frames are already flowing.
    fn request_frames(&mut self);

    /// Stop delivering frames.
    fn cancel_frames(&mut self);
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl PanelObserver for NoopObserver {}
