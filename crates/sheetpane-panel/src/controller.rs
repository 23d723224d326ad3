#![forbid(unsafe_code)]

//! The panel controller.
//!
//! [`PanelController`] wires drag and tap input through the
//! [`PanelStateMachine`], derives geometry with [`PanelLayout`] and drives a
//! [`SpringSolver`] to settle the pane. It is the only writer of the panel
//! state, the live pane top and the drag session.
//!
//! # Event flow
//!
//! ```text
//!   drag/tap ──▶ DragAdapter ──▶ PanelStateMachine ──▶ SpringSolver
//!                    │                                    │ on_frame
//!                    └──────────────▶ PanelLayout ◀───────┘
//!                                         │
//!                                         ▼
//!                                   PanelObserver
//! ```
//!
//! # Invariants
//!
//! 1. At most one settle is in flight. Any drag begin cancels it; any new
//!    request either retargets it or replaces it before the next frame.
//! 2. While a settle or drag is active the content view uses its extended
//!    height; once the settle finishes it returns to the resting height.
//! 3. Observable geometry is always finite. A degenerate frame is dropped
//!    and the previous layout stays in effect.
//! 4. Resizing recomputes geometry but never changes `state()`.

use std::time::Duration;

use sheetpane_core::animation::{MotionParameters, SpringSolver};
use sheetpane_core::geometry::{Point, Rect, Size, Vector};
use sheetpane_core::gesture::{DragAdapter, DragEvent, DragUpdate};
use tracing::{debug, debug_span, trace, warn};
use web_time::Instant;

use crate::config::PanelConfig;
use crate::host::{FrameScheduler, PanelObserver};
use crate::layout::{self, LayoutInput, PanelLayout};
use crate::state::{
    Direction, PanelState, PanelStateMachine, TransitionCause, synthesized_velocity,
};

/// How a new settle relates to one already in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettleMode {
    /// Retarget a running settle and keep its momentum.
    Continue,
    /// Start over from the current position with the given velocity.
    Fresh,
}

/// Drives one sliding panel.
pub struct PanelController {
    config: PanelConfig,
    motion: MotionParameters,
    machine: PanelStateMachine,
    viewport: Size,
    darkening_min_y: Option<f64>,
    top: f64,
    layout: PanelLayout,
    solver: SpringSolver,
    drag: DragAdapter,
    last_frame_at: Option<Instant>,
    observer: Option<Box<dyn PanelObserver>>,
    scheduler: Option<Box<dyn FrameScheduler>>,
}

impl std::fmt::Debug for PanelController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PanelController")
            .field("state", &self.machine.state())
            .field("previous_state", &self.machine.previous_state())
            .field("viewport", &self.viewport)
            .field("top", &self.top)
            .field("animating", &self.is_animating())
            .field("dragging", &self.is_dragging())
            .finish()
    }
}

impl PanelController {
    /// Create a controller from `config`.
    ///
    /// Suspicious configuration values are logged and used as given. The
    /// panel has no geometry until a viewport is supplied.
    #[must_use]
    pub fn new(config: PanelConfig) -> Self {
        for finding in config.validate() {
            warn!(%finding, "questionable panel configuration");
        }
        let machine = PanelStateMachine::new(config.starting_state, config.shows_mid_state)
            .with_tap_gating(config.can_tap_to_open, config.can_tap_to_close);
        Self {
            motion: config.motion,
            drag: DragAdapter::new(config.open_top_margin),
            darkening_min_y: config.darkening_min_y,
            machine,
            config,
            viewport: Size::ZERO,
            top: 0.0,
            layout: PanelLayout::default(),
            solver: SpringSolver::new(),
            last_frame_at: None,
            observer: None,
            scheduler: None,
        }
    }

    /// Set the initial viewport (builder pattern).
    #[must_use]
    pub fn with_viewport(mut self, viewport: Size) -> Self {
        self.on_viewport_resized(viewport);
        self
    }

    /// Attach an observer (builder pattern).
    #[must_use]
    pub fn with_observer(mut self, observer: Box<dyn PanelObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Attach a frame scheduler (builder pattern).
    #[must_use]
    pub fn with_frame_scheduler(mut self, scheduler: Box<dyn FrameScheduler>) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    // -----------------------------------------------------------------------
    // Observers
    // -----------------------------------------------------------------------

    #[inline]
    #[must_use]
    pub fn state(&self) -> PanelState {
        self.machine.state()
    }

    #[inline]
    #[must_use]
    pub fn previous_state(&self) -> PanelState {
        self.machine.previous_state()
    }

    #[must_use]
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Live pane top in viewport coordinates.
    #[inline]
    #[must_use]
    pub fn panel_top_y(&self) -> f64 {
        self.layout.panel_top_y
    }

    #[inline]
    #[must_use]
    pub fn floating_header_offset_y(&self) -> f64 {
        self.layout.floating_header_offset_y
    }

    #[inline]
    #[must_use]
    pub fn overlay_opacity(&self) -> f64 {
        self.layout.overlay_opacity
    }

    #[inline]
    #[must_use]
    pub fn content_view_frame(&self) -> Rect {
        self.layout.content_view_frame
    }

    #[inline]
    #[must_use]
    pub fn pane_frame(&self) -> Rect {
        self.layout.pane_frame
    }

    #[inline]
    #[must_use]
    pub fn floating_header_frame(&self) -> Option<Rect> {
        self.layout.floating_header_frame
    }

    #[inline]
    #[must_use]
    pub fn drag_handle_frame(&self) -> Rect {
        self.layout.drag_handle_frame
    }

    /// Last good layout.
    #[inline]
    #[must_use]
    pub fn layout(&self) -> PanelLayout {
        self.layout
    }

    /// Whether a settle is in flight.
    #[inline]
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.solver.is_running()
    }

    #[inline]
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Pane center the current state settles onto.
    #[must_use]
    pub fn target_point(&self) -> Point {
        layout::target_point(self.state(), &self.config, self.viewport)
    }

    /// Pane top the current state settles onto.
    #[must_use]
    pub fn target_top(&self) -> f64 {
        layout::target_top(self.state(), &self.config, self.viewport)
    }

    /// Darkening line in effect, once known.
    #[must_use]
    pub fn darkening_min_y(&self) -> Option<f64> {
        self.darkening_min_y
    }

    #[must_use]
    pub fn motion_parameters(&self) -> MotionParameters {
        self.motion
    }

    /// Replace the spring parameters. Takes effect on the next settle.
    pub fn set_motion_parameters(&mut self, params: MotionParameters) {
        self.motion = params;
    }

    // -----------------------------------------------------------------------
    // Requests
    // -----------------------------------------------------------------------

    /// Move to `to`. Requests for an unreachable state are ignored.
    ///
    /// With `animated`, the panel settles with a unit velocity in the
    /// direction of the move, continuing any settle already in flight.
    /// Without it, the panel jumps to the target.
    pub fn change_state(&mut self, to: PanelState, animated: bool) {
        let Some(to) = self.machine.request_target(to) else {
            debug!(requested = %to, "ignoring request for disabled state");
            return;
        };
        if self.drag.is_dragging() {
            debug!("state request ends the active drag");
            self.drag.reset();
        }
        let from = self.machine.state();
        self.transition(to, TransitionCause::Request);
        if animated {
            self.settle(synthesized_velocity(from, to), SettleMode::Continue);
        } else {
            self.snap_to_target();
        }
    }

    /// Move one step up. Returns `false` at the top.
    pub fn step_up(&mut self) -> bool {
        self.step(Direction::Up)
    }

    /// Move one step down. Returns `false` at the bottom.
    pub fn step_down(&mut self) -> bool {
        self.step(Direction::Down)
    }

    fn step(&mut self, direction: Direction) -> bool {
        let to = self.machine.step_target(direction);
        let from = self.machine.state();
        if to == from {
            return false;
        }
        self.drag.reset();
        self.transition(to, TransitionCause::Step);
        self.settle(synthesized_velocity(from, to), SettleMode::Continue);
        true
    }

    /// Tap on the drag handle. Returns whether the tap moved the panel.
    pub fn on_tap(&mut self) -> bool {
        if self.drag.is_dragging() {
            return false;
        }
        let Some(to) = self.machine.tap_target() else {
            debug!(state = %self.state(), "tap ignored");
            return false;
        };
        let from = self.machine.state();
        self.transition(to, TransitionCause::Tap);
        self.settle(synthesized_velocity(from, to), SettleMode::Continue);
        true
    }

    // -----------------------------------------------------------------------
    // Drag input
    // -----------------------------------------------------------------------

    /// A pan gesture started on the panel.
    pub fn on_drag_began(&mut self) {
        self.handle_drag(DragEvent::Began);
    }

    /// The finger moved by `delta_y` and is now at `location_y`.
    pub fn on_drag_changed(&mut self, delta_y: f64, location_y: f64) -> DragUpdate {
        self.handle_drag(DragEvent::Changed {
            translation: Vector::vertical(delta_y),
            location: Point::new(0.0, location_y),
        })
    }

    /// The finger lifted with vertical velocity `velocity_y` (points/s).
    pub fn on_drag_ended(&mut self, velocity_y: f64) {
        self.handle_drag(DragEvent::Ended {
            velocity: Vector::vertical(velocity_y),
        });
    }

    /// The system interrupted the gesture. The panel settles back to its
    /// current state.
    pub fn on_drag_cancelled(&mut self) {
        self.handle_drag(DragEvent::Cancelled);
    }

    /// Feed a raw drag event. Horizontal components are discarded.
    pub fn handle_drag(&mut self, event: DragEvent) -> DragUpdate {
        if event == DragEvent::Began {
            self.interrupt_settle();
        }
        let update = self.drag.process(&event, self.top);
        match update {
            DragUpdate::Started { .. } => self.relayout(),
            DragUpdate::Moved { top, .. } => {
                self.top = top;
                self.relayout();
            }
            DragUpdate::Released { velocity, .. } => {
                let to = self.machine.gesture_target(velocity.dy);
                self.transition(to, TransitionCause::Gesture);
                self.settle(velocity, SettleMode::Fresh);
            }
            DragUpdate::Cancelled { .. } => self.settle(Vector::ZERO, SettleMode::Fresh),
            DragUpdate::Vetoed { .. } | DragUpdate::Ignored => {}
        }
        update
    }

    // -----------------------------------------------------------------------
    // Host hooks
    // -----------------------------------------------------------------------

    /// The viewport changed size.
    ///
    /// A resting panel jumps to its new target and a settling panel is
    /// retargeted. A panel being dragged stays under the finger. The state
    /// never changes. Degenerate sizes are ignored.
    pub fn on_viewport_resized(&mut self, viewport: Size) {
        if viewport.is_degenerate() {
            warn!(
                width = viewport.width,
                height = viewport.height,
                "ignoring degenerate viewport"
            );
            return;
        }
        let old = self.viewport;
        self.viewport = viewport;
        if self.darkening_min_y.is_none() {
            self.darkening_min_y = Some(viewport.height / 2.0);
        }
        debug!(
            width = viewport.width,
            height = viewport.height,
            state = %self.state(),
            "viewport resized"
        );

        if self.drag.is_dragging() {
            self.relayout();
        } else if let Some(process) = self.solver.process() {
            let velocity = process.velocity();
            let top = if old.is_degenerate() {
                self.top
            } else {
                layout::top_for_center(process.position(), old)
            };
            self.top = top;
            let from = layout::center_for_top(top, viewport);
            let target = self.target_point();
            self.solver.animate(from, target, velocity, self.motion);
            self.relayout();
        } else {
            self.top = self.target_top();
            self.relayout();
        }
    }

    /// Advance a running settle by `dt`. Returns whether more frames are
    /// needed.
    pub fn on_frame(&mut self, dt: Duration) -> bool {
        let settle_target = self.solver.process().map(|p| p.target());
        let Some(tick) = self.solver.tick(dt) else {
            return false;
        };
        let top = if tick.settled && settle_target == Some(tick.position) {
            // Landed on the target: use the exact rest top.
            self.target_top()
        } else {
            layout::top_for_center(tick.position, self.viewport)
        };
        if top.is_finite() {
            self.top = top;
        }
        trace!(top = self.top, vy = tick.velocity.dy, settled = tick.settled, "panel frame");

        if tick.settled {
            self.last_frame_at = None;
            self.relayout();
            if let Some(scheduler) = self.scheduler.as_mut() {
                scheduler.cancel_frames();
            }
            let state = self.state();
            debug!(%state, top = self.top, "panel settled");
            if let Some(observer) = self.observer.as_mut() {
                observer.on_settled(state);
            }
            false
        } else {
            self.relayout();
            true
        }
    }

    /// Advance a running settle to the frame timestamp `now`.
    ///
    /// The first frame of a settle only records the timestamp.
    pub fn on_frame_at(&mut self, now: Instant) -> bool {
        if !self.solver.is_running() {
            self.last_frame_at = None;
            return false;
        }
        let dt = self
            .last_frame_at
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last_frame_at = Some(now);
        self.on_frame(dt)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn transition(&mut self, to: PanelState, cause: TransitionCause) {
        let Some(transition) = self.machine.apply(to, cause) else {
            return;
        };
        debug!(
            from = %transition.from,
            to = %transition.to,
            cause = ?transition.cause,
            "panel state changed"
        );
        if let Some(observer) = self.observer.as_mut() {
            observer.on_state_changed(&transition);
        }
    }

    fn interrupt_settle(&mut self) {
        if self.solver.cancel().is_some() {
            trace!(top = self.top, "settle interrupted");
            self.last_frame_at = None;
            if let Some(scheduler) = self.scheduler.as_mut() {
                scheduler.cancel_frames();
            }
        }
    }

    fn settle(&mut self, velocity: Vector, mode: SettleMode) {
        if self.viewport.is_degenerate() {
            debug!(state = %self.state(), "no viewport yet; settle deferred");
            return;
        }
        let target = self.target_point();
        let _span = debug_span!("settle", state = %self.state(), target_y = target.y).entered();

        let retargeted = mode == SettleMode::Continue && self.solver.retarget(target);
        if !retargeted {
            let from = layout::center_for_top(self.top, self.viewport);
            self.solver.animate(from, target, velocity, self.motion);
            self.last_frame_at = None;
        }
        debug!(retargeted, vy = velocity.dy, "settle started");
        if let Some(scheduler) = self.scheduler.as_mut() {
            scheduler.request_frames();
        }
        self.relayout();
    }

    fn snap_to_target(&mut self) {
        self.interrupt_settle();
        if self.viewport.is_degenerate() {
            return;
        }
        self.top = self.target_top();
        self.relayout();
        let state = self.state();
        if let Some(observer) = self.observer.as_mut() {
            observer.on_settled(state);
        }
    }

    fn relayout(&mut self) {
        let Some(darkening_min_y) = self.darkening_min_y else {
            return;
        };
        let input = LayoutInput {
            top: self.top,
            viewport: self.viewport,
            extended: self.drag.is_dragging() || self.solver.is_running(),
            darkening_min_y,
        };
        match PanelLayout::compute(&self.config, input) {
            Some(layout) => {
                self.layout = layout;
                if let Some(observer) = self.observer.as_mut() {
                    observer.on_layout(&layout);
                }
            }
            None => warn!(
                top = self.top,
                width = self.viewport.width,
                height = self.viewport.height,
                "discarding degenerate layout"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const PHONE: Size = Size {
        width: 375.0,
        height: 800.0,
    };
    const FRAME: Duration = Duration::from_millis(16);

    fn controller(config: PanelConfig) -> PanelController {
        PanelController::new(config).with_viewport(PHONE)
    }

    fn settle(panel: &mut PanelController) -> usize {
        let mut frames = 0;
        while panel.on_frame(FRAME) {
            frames += 1;
            assert!(frames < 1000, "never settled");
        }
        frames
    }

    #[derive(Default)]
    struct Frames {
        requested: u32,
        cancelled: u32,
    }

    struct SharedFrames(Rc<RefCell<Frames>>);

    impl FrameScheduler for SharedFrames {
        fn request_frames(&mut self) {
            self.0.borrow_mut().requested += 1;
        }

        fn cancel_frames(&mut self) {
            self.0.borrow_mut().cancelled += 1;
        }
    }

    #[test]
    fn rests_at_starting_state_target() {
        let panel = controller(PanelConfig::default());
        assert_eq!(panel.state(), PanelState::Closed);
        assert_eq!(panel.panel_top_y(), 740.0);
        assert!(!panel.is_animating());
        assert_eq!(panel.overlay_opacity(), 0.0);
        assert_eq!(panel.darkening_min_y(), Some(400.0));
    }

    #[test]
    fn starting_mid_coerced_when_disabled() {
        let config = PanelConfig::default()
            .with_shows_mid_state(false)
            .with_starting_state(PanelState::Mid);
        let panel = controller(config);
        assert_eq!(panel.state(), PanelState::Closed);
    }

    #[test]
    fn unanimated_change_jumps() {
        let mut panel = controller(PanelConfig::default());
        panel.change_state(PanelState::Open, false);
        assert_eq!(panel.state(), PanelState::Open);
        assert_eq!(panel.panel_top_y(), 90.0);
        assert!(!panel.is_animating());
        assert_eq!(panel.overlay_opacity(), 0.85 * (1.0 - 90.0 / 400.0));
        assert_eq!(panel.content_view_frame().height, 800.0 - 90.0 - 60.0);
    }

    #[test]
    fn animated_change_settles_on_target() {
        let mut panel = controller(PanelConfig::default());
        panel.change_state(PanelState::Open, true);
        assert!(panel.is_animating());
        assert_eq!(panel.content_view_frame().height, 800.0 - 60.0);
        settle(&mut panel);
        assert!(!panel.is_animating());
        assert_eq!(panel.panel_top_y(), 90.0);
        assert_eq!(panel.content_view_frame().height, 800.0 - 90.0 - 60.0);
    }

    #[test]
    fn mid_request_ignored_when_disabled() {
        let mut panel = controller(PanelConfig::default().with_shows_mid_state(false));
        panel.change_state(PanelState::Mid, true);
        assert_eq!(panel.state(), PanelState::Closed);
        assert!(!panel.is_animating());
    }

    #[test]
    fn zero_darkening_line_still_lays_out() {
        let mut panel = controller(PanelConfig::default().with_darkening_min_y(0.0));
        panel.change_state(PanelState::Open, false);
        assert_eq!(panel.state(), PanelState::Open);
        assert_eq!(panel.panel_top_y(), 90.0);
        assert_eq!(panel.overlay_opacity(), 0.0);
        assert_eq!(panel.content_view_frame().height, 800.0 - 90.0 - 60.0);
        assert_eq!(panel.pane_frame().y, 90.0);
    }

    #[test]
    fn same_state_request_has_no_net_displacement() {
        let mut panel = controller(PanelConfig::default().with_starting_state(PanelState::Mid));
        let before = panel.panel_top_y();
        panel.change_state(PanelState::Mid, true);
        settle(&mut panel);
        assert_eq!(panel.panel_top_y(), before);
        assert_eq!(panel.state(), PanelState::Mid);
    }

    #[test]
    fn drag_moves_pane_and_release_steps() {
        let mut panel = controller(PanelConfig::default());
        panel.on_drag_began();
        assert!(panel.is_dragging());
        let update = panel.on_drag_changed(-100.0, 650.0);
        assert_eq!(
            update,
            DragUpdate::Moved {
                top: 640.0,
                delta: -100.0
            }
        );
        assert_eq!(panel.panel_top_y(), 640.0);
        assert_eq!(panel.content_view_frame().height, 740.0);

        panel.on_drag_ended(-5.0);
        assert!(!panel.is_dragging());
        assert_eq!(panel.state(), PanelState::Mid);
        assert_eq!(panel.previous_state(), PanelState::Closed);
        settle(&mut panel);
        assert_eq!(panel.panel_top_y(), 340.0);
    }

    #[test]
    fn drag_is_vetoed_at_open_margin() {
        let mut panel = controller(PanelConfig::default().with_starting_state(PanelState::Open));
        panel.on_drag_began();
        let update = panel.on_drag_changed(-30.0, 120.0);
        assert!(matches!(update, DragUpdate::Vetoed { .. }));
        assert_eq!(panel.panel_top_y(), 90.0);
    }

    #[test]
    fn drag_begin_interrupts_settle() {
        let mut panel = controller(PanelConfig::default());
        panel.change_state(PanelState::Open, true);
        for _ in 0..5 {
            panel.on_frame(FRAME);
        }
        let mid_flight = panel.panel_top_y();
        panel.on_drag_began();
        assert!(!panel.is_animating());
        assert_eq!(panel.panel_top_y(), mid_flight);
        assert!(!panel.on_frame(FRAME));
    }

    #[test]
    fn drag_cancel_settles_back() {
        let mut panel = controller(PanelConfig::default().with_starting_state(PanelState::Mid));
        panel.on_drag_began();
        panel.on_drag_changed(120.0, 500.0);
        panel.on_drag_cancelled();
        assert_eq!(panel.state(), PanelState::Mid);
        assert!(panel.is_animating());
        settle(&mut panel);
        assert_eq!(panel.panel_top_y(), 340.0);
    }

    #[test]
    fn request_during_drag_ends_drag() {
        let mut panel = controller(PanelConfig::default());
        panel.on_drag_began();
        panel.on_drag_changed(-50.0, 700.0);
        panel.change_state(PanelState::Open, true);
        assert!(!panel.is_dragging());
        assert_eq!(panel.on_drag_changed(-10.0, 600.0), DragUpdate::Ignored);
        settle(&mut panel);
        assert_eq!(panel.panel_top_y(), 90.0);
    }

    #[test]
    fn tap_steps_and_respects_gating() {
        let mut panel = controller(PanelConfig::default().with_tap_to_open(false));
        assert!(!panel.on_tap());
        assert_eq!(panel.state(), PanelState::Closed);

        let mut panel = controller(PanelConfig::default());
        assert!(panel.on_tap());
        assert_eq!(panel.state(), PanelState::Mid);
        assert!(panel.on_tap());
        assert_eq!(panel.state(), PanelState::Open);
        settle(&mut panel);
        assert_eq!(panel.panel_top_y(), 90.0);
    }

    #[test]
    fn retarget_in_flight_keeps_position() {
        let mut panel = controller(PanelConfig::default());
        panel.change_state(PanelState::Open, true);
        for _ in 0..4 {
            panel.on_frame(FRAME);
        }
        let top = panel.panel_top_y();
        panel.change_state(PanelState::Closed, true);
        assert_eq!(panel.panel_top_y(), top);
        assert!(panel.is_animating());
        settle(&mut panel);
        assert_eq!(panel.panel_top_y(), 740.0);
    }

    #[test]
    fn step_up_and_down() {
        let mut panel = controller(PanelConfig::default());
        assert!(!panel.step_down());
        assert!(panel.step_up());
        assert!(panel.step_up());
        assert!(!panel.step_up());
        assert_eq!(panel.state(), PanelState::Open);
        assert!(panel.step_down());
        assert_eq!(panel.state(), PanelState::Mid);
    }

    #[test]
    fn resize_at_rest_recomputes_without_state_change() {
        let mut panel = controller(PanelConfig::default().with_starting_state(PanelState::Mid));
        assert_eq!(panel.panel_top_y(), 340.0);
        panel.on_viewport_resized(Size::new(375.0, 1200.0));
        assert_eq!(panel.state(), PanelState::Mid);
        assert_eq!(panel.panel_top_y(), 540.0);
        // The darkening line stays where the first viewport put it.
        assert_eq!(panel.darkening_min_y(), Some(400.0));
    }

    #[test]
    fn resize_while_settling_retargets() {
        let mut panel = controller(PanelConfig::default());
        panel.change_state(PanelState::Mid, true);
        panel.on_frame(FRAME);
        panel.on_viewport_resized(Size::new(375.0, 1200.0));
        assert!(panel.is_animating());
        settle(&mut panel);
        assert_eq!(panel.panel_top_y(), 540.0);
    }

    #[test]
    fn resize_while_dragging_keeps_finger_position() {
        let mut panel = controller(PanelConfig::default());
        panel.on_drag_began();
        panel.on_drag_changed(-200.0, 550.0);
        panel.on_viewport_resized(Size::new(375.0, 1200.0));
        assert_eq!(panel.panel_top_y(), 540.0);
        assert!(panel.is_dragging());
    }

    #[test]
    fn degenerate_viewport_keeps_last_layout() {
        let mut panel = controller(PanelConfig::default());
        let before = panel.layout();
        panel.on_viewport_resized(Size::ZERO);
        panel.on_viewport_resized(Size::new(f64::NAN, 800.0));
        assert_eq!(panel.layout(), before);
        assert_eq!(panel.viewport(), PHONE);
    }

    #[test]
    fn no_viewport_defers_geometry() {
        let mut panel = PanelController::new(PanelConfig::default());
        panel.change_state(PanelState::Open, true);
        assert_eq!(panel.state(), PanelState::Open);
        assert!(!panel.is_animating());
        panel.on_viewport_resized(PHONE);
        assert_eq!(panel.panel_top_y(), 90.0);
    }

    #[test]
    fn scheduler_is_told_about_settles() {
        let frames = Rc::new(RefCell::new(Frames::default()));
        let mut panel = controller(PanelConfig::default())
            .with_frame_scheduler(Box::new(SharedFrames(Rc::clone(&frames))));
        panel.change_state(PanelState::Open, true);
        assert_eq!(frames.borrow().requested, 1);
        settle(&mut panel);
        assert_eq!(frames.borrow().cancelled, 1);
    }

    #[test]
    fn frame_at_derives_dt() {
        let mut panel = controller(PanelConfig::default());
        panel.change_state(PanelState::Open, true);
        let start = Instant::now();
        assert!(panel.on_frame_at(start));
        assert_eq!(panel.panel_top_y(), 740.0);
        assert!(panel.on_frame_at(start + FRAME));
        assert!(panel.panel_top_y() < 740.0);
    }

    #[test]
    fn motion_parameters_apply_to_next_settle() {
        let mut panel = controller(PanelConfig::default());
        let slow = MotionParameters::default()
            .with_frequency(1.0)
            .with_damping(1.0);
        panel.set_motion_parameters(slow);
        assert_eq!(panel.motion_parameters(), slow);
        panel.change_state(PanelState::Open, true);
        let slow_frames = settle(&mut panel);

        panel.set_motion_parameters(MotionParameters::default());
        panel.change_state(PanelState::Closed, true);
        let fast_frames = settle(&mut panel);
        assert!(slow_frames > fast_frames);
    }

    #[test]
    fn debug_format() {
        let panel = controller(PanelConfig::default());
        let dbg = format!("{panel:?}");
        assert!(dbg.contains("PanelController"));
        assert!(dbg.contains("Closed"));
    }
}
