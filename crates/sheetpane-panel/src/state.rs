#![forbid(unsafe_code)]

//! Discrete panel states and the transition rules between them.
//!
//! [`PanelStateMachine`] owns the current and previous [`PanelState`] and
//! answers "where would this input take the panel?" without touching any
//! geometry. Decisions are split from mutation: the `*_target` methods are
//! pure, and [`PanelStateMachine::apply`] records the outcome.
//!
//! # Transition table
//!
//! With the mid state enabled, gestures and steps move exactly one rank:
//!
//! ```text
//!              down (vy >= 0)            up (vy < 0)
//!   Open   ──────────────────▶ Mid   Closed ──────────▶ Mid
//!   Mid    ──────────────────▶ Closed  Mid  ──────────▶ Open
//!   Closed ──▶ Closed                  Open ──────────▶ Open
//! ```
//!
//! Without it, the table collapses to `Closed ↔ Open`: a downward release
//! closes, an upward release opens, and `Mid` can never become the current
//! state. The release velocity still decides, so an upward release from
//! `Open` (or a downward one from `Closed`) leaves the state unchanged
//! rather than toggling. A tap in that mode simply flips between the two.
//!
//! # Invariants
//!
//! 1. `state()` is `Mid` only if the mid state is enabled.
//! 2. A tap that would open while tap-to-open is disabled, or close while
//!    tap-to-close is disabled, yields no target.
//! 3. `previous_state()` is the state before the last applied target. A
//!    request for the current state records that state as previous without
//!    counting as a transition.

use sheetpane_core::geometry::Vector;

/// Discrete rest state of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "snake_case"))]
pub enum PanelState {
    /// Only the drag handle (and floating header) is visible.
    #[default]
    Closed,
    /// Partially raised.
    Mid,
    /// Fully raised to the open top margin.
    Open,
}

impl PanelState {
    /// Ordering from lowest (`Closed`) to highest (`Open`).
    #[inline]
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Closed => 0,
            Self::Mid => 1,
            Self::Open => 2,
        }
    }

    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Mid => "mid",
            Self::Open => "open",
        }
    }
}

impl std::fmt::Display for PanelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vertical travel direction. `Up` opens, `Down` closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Direction implied by a release velocity. Zero counts as `Down`.
    #[inline]
    #[must_use]
    pub fn from_velocity(velocity_y: f64) -> Self {
        if velocity_y < 0.0 { Self::Up } else { Self::Down }
    }

    /// Direction of a move between two states, `None` if they are equal.
    #[must_use]
    pub fn of_move(from: PanelState, to: PanelState) -> Option<Self> {
        match to.rank().cmp(&from.rank()) {
            std::cmp::Ordering::Greater => Some(Self::Up),
            std::cmp::Ordering::Less => Some(Self::Down),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Unit velocity used when no real gesture supplied one.
    #[inline]
    #[must_use]
    pub fn unit_velocity(self) -> Vector {
        match self {
            Self::Up => Vector::vertical(-1.0),
            Self::Down => Vector::vertical(1.0),
        }
    }
}

/// What caused a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionCause {
    /// `change_state` from the host.
    Request,
    /// A drag release.
    Gesture,
    /// A tap on the handle.
    Tap,
    /// `step_up` / `step_down`.
    Step,
}

/// A recorded state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: PanelState,
    pub to: PanelState,
    pub cause: TransitionCause,
}

/// Unit velocity for an explicit move from `from` to `to`: closing moves
/// push down (`+1`), opening moves push up (`-1`). A move to the same state
/// counts as closing.
#[must_use]
pub fn synthesized_velocity(from: PanelState, to: PanelState) -> Vector {
    Direction::of_move(from, to)
        .unwrap_or(Direction::Down)
        .unit_velocity()
}

/// Owns the discrete panel state.
#[derive(Debug, Clone)]
pub struct PanelStateMachine {
    state: PanelState,
    previous: PanelState,
    shows_mid_state: bool,
    can_tap_to_open: bool,
    can_tap_to_close: bool,
}

impl PanelStateMachine {
    /// Start in `starting`. `Mid` is coerced to `Closed` when the mid state
    /// is disabled.
    #[must_use]
    pub fn new(starting: PanelState, shows_mid_state: bool) -> Self {
        let state = if !shows_mid_state && starting == PanelState::Mid {
            PanelState::Closed
        } else {
            starting
        };
        Self {
            state,
            previous: state,
            shows_mid_state,
            can_tap_to_open: true,
            can_tap_to_close: true,
        }
    }

    /// Set tap gating (builder pattern).
    #[must_use]
    pub fn with_tap_gating(mut self, can_tap_to_open: bool, can_tap_to_close: bool) -> Self {
        self.can_tap_to_open = can_tap_to_open;
        self.can_tap_to_close = can_tap_to_close;
        self
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> PanelState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn previous_state(&self) -> PanelState {
        self.previous
    }

    #[inline]
    #[must_use]
    pub fn shows_mid_state(&self) -> bool {
        self.shows_mid_state
    }

    #[inline]
    #[must_use]
    pub fn can_tap_to_open(&self) -> bool {
        self.can_tap_to_open
    }

    #[inline]
    #[must_use]
    pub fn can_tap_to_close(&self) -> bool {
        self.can_tap_to_close
    }

    /// Whether `state` may become the current state.
    #[inline]
    #[must_use]
    pub fn is_reachable(&self, state: PanelState) -> bool {
        state != PanelState::Mid || self.shows_mid_state
    }

    /// Target of an explicit request, or `None` if the request is ignored.
    #[must_use]
    pub fn request_target(&self, to: PanelState) -> Option<PanelState> {
        self.is_reachable(to).then_some(to)
    }

    /// Target one step in `direction`, saturating at either end.
    #[must_use]
    pub fn step_target(&self, direction: Direction) -> PanelState {
        use PanelState::{Closed, Mid, Open};

        if !self.shows_mid_state {
            return match direction {
                Direction::Up => Open,
                Direction::Down => Closed,
            };
        }
        match (self.state, direction) {
            (Closed, Direction::Up) => Mid,
            (Mid, Direction::Up) | (Open, Direction::Up) => Open,
            (Open, Direction::Down) => Mid,
            (Mid, Direction::Down) | (Closed, Direction::Down) => Closed,
        }
    }

    /// Target of a drag release with vertical velocity `velocity_y`.
    #[must_use]
    pub fn gesture_target(&self, velocity_y: f64) -> PanelState {
        self.step_target(Direction::from_velocity(velocity_y))
    }

    /// Direction a tap would move the panel, inferred from the last
    /// transition. At either end it points back toward the other end. At
    /// `Mid` with no move into it on record (a fresh start, or a repeated
    /// request for `Mid`) it points down, matching the closing unit
    /// velocity of a same-state request.
    #[must_use]
    pub fn tap_direction(&self) -> Direction {
        match self.state {
            PanelState::Closed => Direction::Up,
            PanelState::Open => Direction::Down,
            PanelState::Mid => {
                Direction::of_move(self.previous, self.state).unwrap_or(Direction::Down)
            }
        }
    }

    /// Target of a tap on the handle, or `None` when tap gating forbids it.
    #[must_use]
    pub fn tap_target(&self) -> Option<PanelState> {
        let to = if self.shows_mid_state {
            self.step_target(self.tap_direction())
        } else {
            self.flipped()
        };
        match Direction::of_move(self.state, to) {
            Some(Direction::Up) if !self.can_tap_to_open => None,
            Some(Direction::Down) if !self.can_tap_to_close => None,
            None => None,
            Some(_) => Some(to),
        }
    }

    fn flipped(&self) -> PanelState {
        match self.state {
            PanelState::Open => PanelState::Closed,
            PanelState::Closed | PanelState::Mid => PanelState::Open,
        }
    }

    /// Make `to` the current state. Returns the transition, or `None` if
    /// `to` is unreachable or already current. In the latter case the
    /// current state is also recorded as previous.
    pub fn apply(&mut self, to: PanelState, cause: TransitionCause) -> Option<Transition> {
        if !self.is_reachable(to) {
            return None;
        }
        if to == self.state {
            self.previous = to;
            return None;
        }
        let from = self.state;
        self.previous = from;
        self.state = to;
        Some(Transition { from, to, cause })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PanelState::{Closed, Mid, Open};

    fn machine(state: PanelState) -> PanelStateMachine {
        PanelStateMachine::new(state, true)
    }

    #[test]
    fn starting_mid_coerced_when_disabled() {
        let m = PanelStateMachine::new(Mid, false);
        assert_eq!(m.state(), Closed);
        assert_eq!(m.previous_state(), Closed);
    }

    #[test]
    fn starting_mid_kept_when_enabled() {
        assert_eq!(machine(Mid).state(), Mid);
    }

    #[test]
    fn gesture_table_with_mid() {
        let cases = [
            (Open, 1.0, Mid),
            (Mid, 1.0, Closed),
            (Closed, 1.0, Closed),
            (Closed, -1.0, Mid),
            (Mid, -1.0, Open),
            (Open, -1.0, Open),
        ];
        for (from, vy, expected) in cases {
            assert_eq!(machine(from).gesture_target(vy), expected, "{from} vy={vy}");
        }
    }

    #[test]
    fn zero_velocity_counts_as_closing() {
        assert_eq!(machine(Open).gesture_target(0.0), Mid);
        assert_eq!(machine(Mid).gesture_target(-0.0), Closed);
    }

    #[test]
    fn gesture_without_mid_uses_two_state_table() {
        let closed = PanelStateMachine::new(Closed, false);
        assert_eq!(closed.gesture_target(3.0), Closed);
        assert_eq!(closed.gesture_target(-3.0), Open);
        let open = PanelStateMachine::new(Open, false);
        assert_eq!(open.gesture_target(3.0), Closed);
        // Upward release at the top stays put instead of toggling.
        assert_eq!(open.gesture_target(-3.0), Open);
    }

    #[test]
    fn request_mid_ignored_when_disabled() {
        let m = PanelStateMachine::new(Open, false);
        assert_eq!(m.request_target(Mid), None);
        assert_eq!(m.request_target(Closed), Some(Closed));
    }

    #[test]
    fn apply_tracks_previous() {
        let mut m = machine(Closed);
        let t = m.apply(Mid, TransitionCause::Gesture).expect("changed");
        assert_eq!((t.from, t.to), (Closed, Mid));
        assert_eq!(m.previous_state(), Closed);
        m.apply(Open, TransitionCause::Tap);
        assert_eq!(m.previous_state(), Mid);
        assert_eq!(m.state(), Open);
    }

    #[test]
    fn apply_same_state_is_not_a_transition() {
        let mut m = machine(Open);
        m.apply(Mid, TransitionCause::Request);
        assert!(m.apply(Mid, TransitionCause::Request).is_none());
        assert_eq!(m.state(), Mid);
        assert_eq!(m.previous_state(), Mid);
    }

    #[test]
    fn repeated_mid_request_turns_next_tap_down() {
        let mut m = machine(Closed);
        m.apply(Mid, TransitionCause::Request);
        assert_eq!(m.tap_target(), Some(Open));
        m.apply(Mid, TransitionCause::Request);
        assert_eq!(m.tap_direction(), Direction::Down);
        assert_eq!(m.tap_target(), Some(Closed));
    }

    #[test]
    fn apply_unreachable_is_refused() {
        let mut m = PanelStateMachine::new(Closed, false);
        assert!(m.apply(Mid, TransitionCause::Request).is_none());
        assert_eq!(m.state(), Closed);
    }

    #[test]
    fn tap_ping_pongs_through_mid() {
        let mut m = machine(Closed);
        let mut seen = Vec::new();
        for _ in 0..6 {
            let to = m.tap_target().expect("tap allowed");
            m.apply(to, TransitionCause::Tap);
            seen.push(m.state());
        }
        assert_eq!(seen, vec![Mid, Open, Mid, Closed, Mid, Open]);
    }

    #[test]
    fn tap_from_initial_mid_goes_down() {
        assert_eq!(machine(Mid).tap_direction(), Direction::Down);
        assert_eq!(machine(Mid).tap_target(), Some(Closed));
    }

    #[test]
    fn tap_without_mid_flips() {
        let mut m = PanelStateMachine::new(Closed, false);
        assert_eq!(m.tap_target(), Some(Open));
        m.apply(Open, TransitionCause::Tap);
        assert_eq!(m.tap_target(), Some(Closed));
    }

    #[test]
    fn tap_gating_blocks_opening() {
        let m = machine(Closed).with_tap_gating(false, true);
        assert_eq!(m.tap_target(), None);
        let m = machine(Open).with_tap_gating(false, true);
        assert_eq!(m.tap_target(), Some(Mid));
    }

    #[test]
    fn tap_gating_blocks_closing() {
        let m = machine(Open).with_tap_gating(true, false);
        assert_eq!(m.tap_target(), None);
        let m = machine(Closed).with_tap_gating(true, false);
        assert_eq!(m.tap_target(), Some(Mid));
    }

    #[test]
    fn tap_gating_at_mid_follows_direction() {
        let mut m = machine(Open).with_tap_gating(true, false);
        m.apply(Mid, TransitionCause::Request);
        // Came down from Open, so the next tap would close.
        assert_eq!(m.tap_target(), None);
    }

    #[test]
    fn step_targets() {
        assert_eq!(machine(Closed).step_target(Direction::Up), Mid);
        assert_eq!(machine(Open).step_target(Direction::Up), Open);
        assert_eq!(machine(Open).step_target(Direction::Down), Mid);
        assert_eq!(machine(Closed).step_target(Direction::Down), Closed);
        let two = PanelStateMachine::new(Closed, false);
        assert_eq!(two.step_target(Direction::Up), Open);
        assert_eq!(two.step_target(Direction::Down), Closed);
    }

    #[test]
    fn velocity_synthesis() {
        assert_eq!(synthesized_velocity(Open, Mid), Vector::vertical(1.0));
        assert_eq!(synthesized_velocity(Mid, Closed), Vector::vertical(1.0));
        assert_eq!(synthesized_velocity(Open, Closed), Vector::vertical(1.0));
        assert_eq!(synthesized_velocity(Closed, Mid), Vector::vertical(-1.0));
        assert_eq!(synthesized_velocity(Closed, Open), Vector::vertical(-1.0));
        assert_eq!(synthesized_velocity(Mid, Mid), Vector::vertical(1.0));
    }

    #[test]
    fn direction_from_velocity() {
        assert_eq!(Direction::from_velocity(-0.01), Direction::Up);
        assert_eq!(Direction::from_velocity(0.0), Direction::Down);
        assert_eq!(Direction::from_velocity(f64::NAN), Direction::Down);
    }

    #[test]
    fn state_display() {
        assert_eq!(Open.to_string(), "open");
        assert_eq!(Mid.as_str(), "mid");
        assert!(Closed.rank() < Mid.rank() && Mid.rank() < Open.rank());
    }
}
