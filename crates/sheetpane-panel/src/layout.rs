#![forbid(unsafe_code)]

//! Derived panel geometry.
//!
//! Everything here is a pure function of the panel state (or live pane top),
//! the [`PanelConfig`] and the viewport size. The controller calls
//! [`PanelLayout::compute`] on every drag tick, settle tick and resize.
//!
//! Coordinates are viewport coordinates with `y` growing downward. The pane
//! frame is viewport-relative; the content view, drag handle and floating
//! header frames are pane-relative.
//!
//! ```text
//!   y = 0  ┌──────────────────────┐
//!          │ back content         │
//!   top ─▶ ├──────────────────────┤  pane
//!          │ floating header      │  header_height (optional)
//!          ├──────────────────────┤
//!          │ drag handle          │  closed_height
//!          ├──────────────────────┤
//!          │ content view         │
//!          │                      │
//!   h  ─▶  └──────────────────────┘  (+ overscroll allowance below)
//! ```

use sheetpane_core::geometry::{Point, Rect, Size};

use crate::config::PanelConfig;
use crate::state::PanelState;

/// Top of the pane when resting in `state`.
#[must_use]
pub fn target_top(state: PanelState, config: &PanelConfig, viewport: Size) -> f64 {
    let height = viewport.height;
    match state {
        PanelState::Closed => {
            height - config.closed_height - config.closed_bottom_margin - config.header_height()
        }
        PanelState::Mid => {
            config.mid_top_margin.unwrap_or(height / 2.0)
                - config.closed_height
                - config.header_height()
        }
        PanelState::Open => config.open_top_margin,
    }
}

/// Full pane height, including the allowance hidden below the viewport.
#[inline]
#[must_use]
pub fn pane_height(viewport: Size) -> f64 {
    viewport.height + PanelConfig::PANE_OVERSCROLL_ALLOWANCE
}

/// Center of the pane when its top is at `top`.
#[inline]
#[must_use]
pub fn center_for_top(top: f64, viewport: Size) -> Point {
    Point::new(viewport.width / 2.0, top + pane_height(viewport) / 2.0)
}

/// Pane top for a pane centered at `center`.
#[inline]
#[must_use]
pub fn top_for_center(center: Point, viewport: Size) -> f64 {
    center.y - pane_height(viewport) / 2.0
}

/// Point the motion solver settles the pane's center onto for `state`.
#[must_use]
pub fn target_point(state: PanelState, config: &PanelConfig, viewport: Size) -> Point {
    center_for_top(target_top(state, config, viewport), viewport)
}

/// Pane frame in viewport coordinates.
#[must_use]
pub fn pane_frame(top: f64, viewport: Size) -> Rect {
    Rect::new(0.0, top, viewport.width, pane_height(viewport))
}

/// Content view frame relative to the pane.
///
/// While `extended` (dragging or settling) the view assumes full extension
/// so it never clips during fast motion. At rest it fills exactly the part
/// of the viewport below the handle.
#[must_use]
pub fn content_view_frame(top: f64, config: &PanelConfig, viewport: Size, extended: bool) -> Rect {
    let inset = config.content_top_inset();
    let height = if extended {
        viewport.height - config.closed_height
    } else {
        viewport.height - top - inset
    };
    Rect::new(0.0, inset, viewport.width, height.max(0.0))
}

/// Ceiling the floating header sticks under.
#[inline]
#[must_use]
pub fn floating_header_min_y(config: &PanelConfig, viewport: Size) -> f64 {
    config.floating_header_min_y.unwrap_or(viewport.height / 2.0)
}

/// How far the header is pushed down inside the pane so it stays at or
/// below `min_y`. Zero while the pane top is at or below the ceiling.
#[inline]
#[must_use]
pub fn floating_header_offset(top: f64, min_y: f64) -> f64 {
    if top < min_y { min_y - top } else { 0.0 }
}

/// Floating header frame relative to the pane, if a header is configured.
#[must_use]
pub fn floating_header_frame(offset: f64, config: &PanelConfig, viewport: Size) -> Option<Rect> {
    config
        .floating_header_height
        .map(|height| Rect::new(0.0, offset, viewport.width, height))
}

/// Drag handle frame relative to the pane.
#[must_use]
pub fn drag_handle_frame(config: &PanelConfig, viewport: Size) -> Rect {
    Rect::new(
        0.0,
        config.header_height(),
        viewport.width,
        config.closed_height,
    )
}

/// Overlay opacity with the pane top at `top`.
///
/// Linear from `max_opacity` at `top = 0` down to `0` at
/// `top = darkening_min_y`, and `0` below that line. `None` when
/// `darkening_min_y` is unusable or the inputs are not finite.
#[must_use]
pub fn overlay_opacity(top: f64, darkening_min_y: f64, max_opacity: f64) -> Option<f64> {
    if !(top.is_finite() && darkening_min_y.is_finite() && darkening_min_y > 0.0) {
        return None;
    }
    let max_opacity = if max_opacity.is_finite() {
        max_opacity.clamp(0.0, 1.0)
    } else {
        PanelConfig::DEFAULT_MAX_OVERLAY_OPACITY
    };
    if top > darkening_min_y {
        return Some(0.0);
    }
    let opacity = max_opacity * (1.0 - top / darkening_min_y);
    Some(opacity.clamp(0.0, max_opacity))
}

/// Inputs to [`PanelLayout::compute`] that vary between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutInput {
    /// Live pane top.
    pub top: f64,
    /// Viewport size.
    pub viewport: Size,
    /// Whether the content view should use its extended height.
    pub extended: bool,
    /// Darkening line in effect.
    pub darkening_min_y: f64,
}

/// Every derived metric for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanelLayout {
    /// Live pane top in viewport coordinates.
    pub panel_top_y: f64,
    /// Pane frame in viewport coordinates.
    pub pane_frame: Rect,
    /// Content view frame, pane-relative.
    pub content_view_frame: Rect,
    /// Drag handle frame, pane-relative.
    pub drag_handle_frame: Rect,
    /// Floating header frame, pane-relative.
    pub floating_header_frame: Option<Rect>,
    /// Downward push applied to the floating header.
    pub floating_header_offset_y: f64,
    /// Darkening overlay opacity.
    pub overlay_opacity: f64,
}

impl PanelLayout {
    /// Derive the layout for one frame, or `None` if the geometry is
    /// degenerate (empty viewport or non-finite results). A darkening line
    /// that is not positive and finite yields zero opacity.
    #[must_use]
    pub fn compute(config: &PanelConfig, input: LayoutInput) -> Option<Self> {
        let LayoutInput {
            top,
            viewport,
            extended,
            darkening_min_y,
        } = input;
        if viewport.is_degenerate() || !top.is_finite() {
            return None;
        }

        let header_offset = floating_header_offset(top, floating_header_min_y(config, viewport));
        let layout = Self {
            panel_top_y: top,
            pane_frame: pane_frame(top, viewport),
            content_view_frame: content_view_frame(top, config, viewport, extended),
            drag_handle_frame: drag_handle_frame(config, viewport),
            floating_header_frame: floating_header_frame(header_offset, config, viewport),
            floating_header_offset_y: header_offset,
            // An unusable darkening line only turns the overlay off.
            overlay_opacity: overlay_opacity(top, darkening_min_y, config.max_overlay_opacity)
                .unwrap_or(0.0),
        };
        layout.is_finite().then_some(layout)
    }

    /// Whether every value is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.panel_top_y.is_finite()
            && self.pane_frame.is_finite()
            && self.content_view_frame.is_finite()
            && self.drag_handle_frame.is_finite()
            && self.floating_header_frame.is_none_or(|r| r.is_finite())
            && self.floating_header_offset_y.is_finite()
            && self.overlay_opacity.is_finite()
    }
}
