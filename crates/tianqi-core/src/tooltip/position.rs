use serde::{Deserialize, Serialize};

/// Horizontal gap between the anchor and the tooltip.
pub const ANCHOR_OFFSET: f64 = 15.0;
/// Minimum distance from any viewport edge.
pub const EDGE_MARGIN: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub left: f64,
    pub top: f64,
}

/// Places the tooltip right of the anchor, flipping left on right-edge overflow,
/// pulling up on bottom overflow, then clamping to the top/left margins.
pub fn place(anchor: Rect, tooltip: Size, viewport: Size) -> Point {
    let mut left = anchor.right() + ANCHOR_OFFSET;
    let mut top = anchor.top;

    if left + tooltip.width > viewport.width {
        left = anchor.left - tooltip.width - ANCHOR_OFFSET;
    }
    if top + tooltip.height > viewport.height {
        top = viewport.height - tooltip.height - EDGE_MARGIN;
    }
    if top < EDGE_MARGIN {
        top = EDGE_MARGIN;
    }
    if left < EDGE_MARGIN {
        left = EDGE_MARGIN;
    }
    Point { left, top }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIP: Size = Size { width: 280.0, height: 250.0 };
    const VIEW: Size = Size { width: 1200.0, height: 800.0 };

    #[test]
    fn default_is_right_of_anchor() {
        let anchor = Rect { left: 100.0, top: 200.0, width: 50.0, height: 30.0 };
        assert_eq!(place(anchor, TIP, VIEW), Point { left: 165.0, top: 200.0 });
    }

    #[test]
    fn flips_left_near_right_edge() {
        let anchor = Rect { left: 950.0, top: 100.0, width: 40.0, height: 30.0 };
        let p = place(anchor, TIP, VIEW);
        assert_eq!(p.left, 950.0 - 280.0 - 15.0);
        assert_eq!(p.top, 100.0);
    }

    #[test]
    fn flipped_position_clamps_to_left_margin() {
        let narrow = Size { width: 320.0, height: 800.0 };
        let anchor = Rect { left: 60.0, top: 100.0, width: 40.0, height: 30.0 };
        assert_eq!(place(anchor, TIP, narrow).left, EDGE_MARGIN);
    }

    #[test]
    fn bottom_overflow_pulls_up() {
        let anchor = Rect { left: 100.0, top: 700.0, width: 40.0, height: 30.0 };
        assert_eq!(place(anchor, TIP, VIEW).top, 800.0 - 250.0 - 20.0);
    }

    #[test]
    fn top_is_floored_at_margin() {
        let anchor = Rect { left: 100.0, top: 5.0, width: 40.0, height: 30.0 };
        assert_eq!(place(anchor, TIP, VIEW).top, EDGE_MARGIN);
        let short = Size { width: 1200.0, height: 200.0 };
        assert_eq!(place(anchor, TIP, short).top, EDGE_MARGIN);
    }
}
