//! Letterbox transform between the virtual canvas and the physical window.

use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Maps the fixed-size virtual canvas into a physical window.
///
/// The canvas is scaled uniformly so it fits the window on both axes and is
/// centered, leaving letterbox (or pillarbox) bars on the remaining axis.
/// Rebuilt every frame from the current window size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    /// Size of the virtual canvas.
    pub virtual_size: Size,
    /// Uniform virtual-to-physical scale factor.
    pub scale: f64,
    /// Physical position of the canvas origin.
    pub offset: Vec2,
}

impl ViewportTransform {
    /// Compute the transform for a window of the given physical size.
    ///
    /// A window with no area (e.g. minimized) produces a zero scale.
    pub fn new(virtual_size: Size, window_size: Size) -> Self {
        let usable = window_size.width > 0.0
            && window_size.height > 0.0
            && window_size.width.is_finite()
            && window_size.height.is_finite();
        if !usable {
            return Self {
                virtual_size,
                scale: 0.0,
                offset: Vec2::ZERO,
            };
        }

        let scale = (window_size.width / virtual_size.width)
            .min(window_size.height / virtual_size.height);
        let offset = Vec2::new(
            (window_size.width - virtual_size.width * scale) * 0.5,
            (window_size.height - virtual_size.height * scale) * 0.5,
        );

        Self {
            virtual_size,
            scale,
            offset,
        }
    }

    /// Affine transform from virtual to physical coordinates (for rendering).
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    /// Convert a virtual point to physical window coordinates.
    pub fn to_physical(&self, point: Point) -> Point {
        Point::new(
            point.x * self.scale + self.offset.x,
            point.y * self.scale + self.offset.y,
        )
    }

    /// Convert a physical pointer position to virtual coordinates.
    ///
    /// Positions inside the letterbox bars or outside the window are
    /// clamped onto the nearest edge of the virtual canvas.
    pub fn to_virtual(&self, point: Point) -> Point {
        if self.scale <= 0.0 {
            return Point::ZERO;
        }
        let x = (point.x - self.offset.x) / self.scale;
        let y = (point.y - self.offset.y) / self.scale;
        Point::new(
            x.clamp(0.0, self.virtual_size.width),
            y.clamp(0.0, self.virtual_size.height),
        )
    }

    /// Physical rectangle covered by the scaled canvas.
    pub fn canvas_rect(&self) -> Rect {
        Rect::from_origin_size(
            self.offset.to_point(),
            Size::new(
                self.virtual_size.width * self.scale,
                self.virtual_size.height * self.scale,
            ),
        )
    }
}
