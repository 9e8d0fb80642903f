//! Overlay scrollbar geometry
//!
//! Bars hug the right and bottom edges of the viewport. Every rect here is a
//! pure function of the store and viewport size, recomputed on demand.

use rebound_core::{Axis, Point, Rect, Size};

use crate::config::ScrollbarConfig;
use crate::store::{ScrollAxis, ScrollStore};

// ============================================================================
// Thumb
// ============================================================================

/// Slider extent along its track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThumbSpan {
    /// Distance from the start of the track
    pub offset: f64,
    pub length: f64,
}

/// Slider length and position for one axis
///
/// `None` when the whole content fits (`page_size / (upper - lower) >= 1`).
pub fn thumb_span(axis: &ScrollAxis, track_length: f64, min_thumb_length: f64) -> Option<ThumbSpan> {
    let ratio = axis.ratio();
    if ratio >= 1.0 || track_length <= 0.0 {
        return None;
    }

    let length = (ratio * track_length)
        .max(min_thumb_length)
        .min(track_length);

    let range = axis.upper - axis.page_size - axis.lower;
    let progress = if range > 0.0 {
        ((axis.value - axis.lower) / range).clamp(0.0, 1.0)
    } else {
        0.0
    };

    Some(ThumbSpan {
        offset: progress * (track_length - length),
        length,
    })
}

/// Value for a slider dragged to `position` along its track
pub fn value_for_thumb_position(
    axis: &ScrollAxis,
    track_length: f64,
    thumb_length: f64,
    position: f64,
) -> f64 {
    let travel = track_length - thumb_length;
    if travel <= 0.0 {
        return axis.lower;
    }
    let range = axis.upper - axis.page_size - axis.lower;
    axis.lower + range * position.clamp(0.0, travel) / travel
}

// ============================================================================
// Hit Rects
// ============================================================================

/// Where a point landed on the overlay scrollbars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollbarHitResult {
    None,
    VerticalThumb,
    VerticalTrack,
    HorizontalThumb,
    HorizontalTrack,
}

impl ScrollbarHitResult {
    pub fn axis(&self) -> Option<Axis> {
        match self {
            ScrollbarHitResult::None => None,
            ScrollbarHitResult::VerticalThumb | ScrollbarHitResult::VerticalTrack => {
                Some(Axis::Vertical)
            }
            ScrollbarHitResult::HorizontalThumb | ScrollbarHitResult::HorizontalTrack => {
                Some(Axis::Horizontal)
            }
        }
    }

    pub fn is_thumb(&self) -> bool {
        matches!(
            self,
            ScrollbarHitResult::VerticalThumb | ScrollbarHitResult::HorizontalThumb
        )
    }
}

/// Bar and slider rects in viewport coordinates
///
/// Rects of an axis with nothing to scroll are empty.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollbarRects {
    pub vertical_bar: Rect,
    pub vertical_slider: Rect,
    pub horizontal_bar: Rect,
    pub horizontal_slider: Rect,
}

impl ScrollbarRects {
    pub fn compute(store: &ScrollStore, viewport: Size, config: &ScrollbarConfig) -> Self {
        let mut rects = ScrollbarRects::default();
        let padding = config.padding;
        let thickness = config.thickness;
        let extent = config.bar_extent();

        let track = viewport.height - 2.0 * padding;
        if let Some(span) = thumb_span(store.axis(Axis::Vertical), track, config.min_thumb_length) {
            rects.vertical_bar = Rect::new(viewport.width - extent, 0.0, extent, viewport.height);
            rects.vertical_slider = Rect::new(
                viewport.width - thickness - padding,
                padding + span.offset,
                thickness,
                span.length,
            );
        }

        let track = viewport.width - 2.0 * padding;
        if let Some(span) =
            thumb_span(store.axis(Axis::Horizontal), track, config.min_thumb_length)
        {
            rects.horizontal_bar = Rect::new(0.0, viewport.height - extent, viewport.width, extent);
            rects.horizontal_slider = Rect::new(
                padding + span.offset,
                viewport.height - thickness - padding,
                span.length,
                thickness,
            );
        }

        rects
    }

    pub fn slider(&self, axis: Axis) -> Rect {
        match axis {
            Axis::Horizontal => self.horizontal_slider,
            Axis::Vertical => self.vertical_slider,
        }
    }

    /// Classify a point; the vertical bar wins where the bars cross
    ///
    /// The slider counts as hit across the full thickness of its bar.
    pub fn hit_test(&self, point: Point) -> ScrollbarHitResult {
        if self.vertical_bar.contains(point) {
            let slider = self.vertical_slider;
            if point.y >= slider.y() && point.y < slider.y() + slider.height() {
                return ScrollbarHitResult::VerticalThumb;
            }
            return ScrollbarHitResult::VerticalTrack;
        }

        if self.horizontal_bar.contains(point) {
            let slider = self.horizontal_slider;
            if point.x >= slider.x() && point.x < slider.x() + slider.width() {
                return ScrollbarHitResult::HorizontalThumb;
            }
            return ScrollbarHitResult::HorizontalTrack;
        }

        ScrollbarHitResult::None
    }
}

// ============================================================================
// Scrollbar Grab
// ============================================================================

/// Pointer grab held by a scrollbar press
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollbarGrab {
    /// Dragging the slider; `grab_offset` is the pointer's distance from the slider start
    Thumb { axis: Axis, grab_offset: f64 },
    /// Paging toward the pointer, `direction` is -1 or +1
    Track { axis: Axis, direction: f64 },
}

/// Value for a thumb drag with the pointer at `pointer` (viewport coordinates)
pub fn thumb_drag_value(
    store: &ScrollStore,
    viewport: Size,
    config: &ScrollbarConfig,
    axis: Axis,
    grab_offset: f64,
    pointer: Point,
) -> f64 {
    let state = store.axis(axis);
    let track = viewport.along(axis) - 2.0 * config.padding;
    let Some(span) = thumb_span(state, track, config.min_thumb_length) else {
        return state.value;
    };
    let position = pointer.along(axis) - grab_offset - config.padding;
    value_for_thumb_position(state, track, span.length, position)
}
