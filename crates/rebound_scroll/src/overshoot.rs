//! Overshoot window placement
//!
//! While overscrolled, content is drawn displaced into the viewport and the
//! uncovered strip is left to the host to paint as background.

use rebound_core::{Rect, Vec2};

/// Where content and the uncovered gaps sit inside the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OvershootWindow {
    /// Content placement, shrunk by the overshoot on each axis
    pub content: Rect,
    /// Strip uncovered by horizontal overshoot
    pub gap_x: Option<Rect>,
    /// Strip uncovered by vertical overshoot
    pub gap_y: Option<Rect>,
}

impl OvershootWindow {
    /// Negative overshoot (past the start) pushes content right/down; positive
    /// overshoot (past the end) leaves the gap at the far edge.
    pub fn compute(viewport: Rect, overshoot: Vec2) -> Self {
        let (x, y) = (viewport.x(), viewport.y());
        let (w, h) = (viewport.width(), viewport.height());
        let ox = overshoot.x.abs().min(w);
        let oy = overshoot.y.abs().min(h);

        let content = Rect::new(
            x + if overshoot.x < 0.0 { ox } else { 0.0 },
            y + if overshoot.y < 0.0 { oy } else { 0.0 },
            w - ox,
            h - oy,
        );

        let gap_x = (ox > 0.0).then(|| {
            let gx = if overshoot.x > 0.0 { x + w - ox } else { x };
            Rect::new(gx, y, ox, h)
        });
        let gap_y = (oy > 0.0).then(|| {
            let gy = if overshoot.y > 0.0 { y + h - oy } else { y };
            Rect::new(x, gy, w, oy)
        });

        Self {
            content,
            gap_x,
            gap_y,
        }
    }

    /// No displacement
    pub fn is_identity(&self) -> bool {
        self.gap_x.is_none() && self.gap_y.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_overshoot() {
        let viewport = Rect::new(0.0, 0.0, 300.0, 200.0);
        let window = OvershootWindow::compute(viewport, Vec2::ZERO);
        assert_eq!(window.content, viewport);
        assert!(window.is_identity());
    }

    #[test]
    fn test_overshoot_past_end() {
        let window = OvershootWindow::compute(
            Rect::new(0.0, 0.0, 300.0, 200.0),
            Vec2::new(0.0, 30.0),
        );
        assert_eq!(window.content, Rect::new(0.0, 0.0, 300.0, 170.0));
        assert_eq!(window.gap_y, Some(Rect::new(0.0, 170.0, 300.0, 30.0)));
        assert_eq!(window.gap_x, None);
    }

    #[test]
    fn test_overshoot_past_start_both_axes() {
        let window = OvershootWindow::compute(
            Rect::new(10.0, 20.0, 300.0, 200.0),
            Vec2::new(-15.0, -40.0),
        );
        assert_eq!(window.content, Rect::new(25.0, 60.0, 285.0, 160.0));
        assert_eq!(window.gap_x, Some(Rect::new(10.0, 20.0, 15.0, 200.0)));
        assert_eq!(window.gap_y, Some(Rect::new(10.0, 20.0, 300.0, 40.0)));
    }

    #[test]
    fn test_overshoot_larger_than_viewport() {
        let window = OvershootWindow::compute(
            Rect::new(0.0, 0.0, 100.0, 100.0),
            Vec2::new(0.0, 500.0),
        );
        assert_eq!(window.content.height(), 0.0);
        assert_eq!(window.gap_y, Some(Rect::new(0.0, 0.0, 100.0, 100.0)));
    }
}
