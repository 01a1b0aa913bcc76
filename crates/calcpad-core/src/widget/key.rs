//! A single keypad key.

use kurbo::{Point, Rect, Size};

use super::highlight::HoverHighlight;
use super::state::{KeyId, WidgetState};
use crate::draw::FontId;
use crate::layout::{KeyAction, WidgetSpec};

/// A rectangular, labeled key with hover/press animation state.
///
/// `origin` and `original_size` are fixed at construction. The page
/// transition animates `size.width` between zero and the original width
/// and keeps the key centered on its original column while doing so.
#[derive(Debug, Clone)]
pub struct Widget {
    key: KeyId,
    /// Text drawn centered on the key.
    pub label: String,
    /// Font the label is drawn with (owned by the renderer).
    pub font: FontId,
    /// Label size in virtual units.
    pub label_size: f64,
    /// Corner roundness in `[0, 1]`.
    pub corner_roundness: f64,
    /// What a click on this key means.
    pub action: KeyAction,

    origin: Point,
    original_size: Size,
    position: Point,
    size: Size,

    highlight: HoverHighlight,
    hovered: bool,
    pressed: bool,
    active: bool,
}

impl Widget {
    /// Create a key at `origin` with its full size.
    pub fn new(key: impl Into<KeyId>, label: impl Into<String>, origin: Point, size: Size) -> Self {
        let bounds = Rect::from_origin_size(origin, size);
        Self {
            key: key.into(),
            label: label.into(),
            font: FontId::default(),
            label_size: 70.0,
            corner_roundness: 0.5,
            action: KeyAction::Inert,
            origin,
            original_size: size,
            position: origin,
            size,
            highlight: HoverHighlight::new(bounds),
            hovered: false,
            pressed: false,
            active: false,
        }
    }

    /// Build a key from a layout table entry.
    pub fn from_spec(spec: &WidgetSpec) -> Self {
        let mut widget = Self::new(spec.key.clone(), spec.label.clone(), spec.position, spec.size);
        widget.font = spec.font;
        widget.label_size = spec.label_size;
        widget.corner_roundness = spec.corner_roundness.clamp(0.0, 1.0);
        widget.action = spec.action.clone();
        widget.active = spec.active;
        widget
    }

    pub fn key(&self) -> &KeyId {
        &self.key
    }

    /// Current top-left corner.
    pub fn position(&self) -> Point {
        self.position
    }

    /// Current animated size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Top-left corner at full size.
    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn original_size(&self) -> Size {
        self.original_size
    }

    /// Current bounds in virtual coordinates.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(self.position, self.size)
    }

    pub fn highlight(&self) -> &HoverHighlight {
        &self.highlight
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Derived visual state.
    pub fn state(&self) -> WidgetState {
        if self.active {
            WidgetState::Active
        } else if self.pressed {
            WidgetState::Pressed
        } else if self.hovered {
            WidgetState::Hovered
        } else {
            WidgetState::Normal
        }
    }

    /// Whether the key has any area to hit or label.
    pub fn has_area(&self) -> bool {
        self.size.width > 0.0 && self.size.height > 0.0
    }

    /// Whether `point` lies on the key at its current size.
    pub fn hit_test(&self, point: Point) -> bool {
        self.has_area() && self.bounds().contains(point)
    }

    /// A click is the frame the pointer goes down while over the key.
    pub fn is_clicked(pointer_down: bool, was_down: bool, hovered: bool) -> bool {
        pointer_down && !was_down && hovered
    }

    /// Advance hover/press state by one frame.
    pub fn update(&mut self, pointer_down: bool, hovered: bool, dt: f64, highlight_rate: f64) {
        self.hovered = hovered;
        self.pressed = pointer_down && hovered;
        let bounds = self.bounds();
        self.highlight
            .step(bounds, self.original_size, hovered, highlight_rate * dt);
    }

    /// Rect to draw, inset by `press_inset` on each side while pressed or active.
    pub fn render_rect(&self, press_inset: f64) -> Rect {
        let bounds = self.bounds();
        if !self.state().shows_press() {
            return bounds;
        }
        let dx = press_inset.min(bounds.width() * 0.5);
        let dy = press_inset.min(bounds.height() * 0.5);
        Rect::new(bounds.x0 + dx, bounds.y0 + dy, bounds.x1 - dx, bounds.y1 - dy)
    }

    /// Label size, scaled down while pressed or active.
    pub fn render_label_size(&self, press_scale: f64) -> f64 {
        if self.state().shows_press() {
            self.label_size * press_scale
        } else {
            self.label_size
        }
    }

    /// Corner radius for a rect drawn with this key's roundness.
    pub fn corner_radius(&self, rect: Rect) -> f64 {
        self.corner_roundness * rect.width().min(rect.height()) * 0.5
    }

    /// Set the animated width, keeping the key centered on its column.
    pub(crate) fn set_width(&mut self, width: f64) {
        let width = width.clamp(0.0, self.original_size.width);
        self.size.width = width;
        self.position.x = self.origin.x + (self.original_size.width - width) * 0.5;
        let bounds = self.bounds();
        self.highlight.fit(bounds, self.original_size);
    }

    /// Whether the page transition has fully collapsed this key.
    pub fn is_collapsed(&self) -> bool {
        self.size.width <= 0.0
    }

    /// Whether this key is back at its original width.
    pub fn is_expanded(&self) -> bool {
        self.size.width >= self.original_size.width
    }
}
