//! Hover highlight that grows out of the key center.

use kurbo::{Point, Rect, Size};

/// Smallest highlight edge once fully retracted.
pub const MIN_HIGHLIGHT: f64 = 1.0;

/// An inset rectangle drawn over a key while it is hovered.
///
/// Grows linearly toward the key's full size while hovered and shrinks back
/// to a single point otherwise. Always centered on, and contained by, the
/// key's current bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverHighlight {
    pub size: Size,
    pub position: Point,
}

impl HoverHighlight {
    /// Create a fully retracted highlight centered in `bounds`.
    pub fn new(bounds: Rect) -> Self {
        let mut highlight = Self {
            size: Size::new(MIN_HIGHLIGHT, MIN_HIGHLIGHT),
            position: Point::ZERO,
        };
        highlight.fit(bounds, bounds.size());
        highlight
    }

    /// Advance the highlight by `delta` size units, growing when `grow` is set.
    ///
    /// `original` is the key's reference size; `bounds` is its current rect.
    pub fn step(&mut self, bounds: Rect, original: Size, grow: bool, delta: f64) {
        let delta = if grow { delta } else { -delta };
        self.size = Size::new(self.size.width + delta, self.size.height + delta);
        self.fit(bounds, original);
    }

    /// Clamp the size into `[1, original]` and the current bounds, then recenter.
    pub fn fit(&mut self, bounds: Rect, original: Size) {
        let max_w = original.width.min(bounds.width()).max(0.0);
        let max_h = original.height.min(bounds.height()).max(0.0);
        self.size = Size::new(
            self.size.width.clamp(MIN_HIGHLIGHT.min(max_w), max_w),
            self.size.height.clamp(MIN_HIGHLIGHT.min(max_h), max_h),
        );
        let center = bounds.center();
        self.position = Point::new(
            center.x - self.size.width * 0.5,
            center.y - self.size.height * 0.5,
        );
    }

    /// The highlight rectangle in virtual coordinates.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    /// Whether the highlight has grown past a single point.
    pub fn is_visible(&self) -> bool {
        self.size.width > MIN_HIGHLIGHT && self.size.height > MIN_HIGHLIGHT
    }
}
