//! Pointer input state, accumulated between frames.

use kurbo::{Point, Size};
use std::collections::HashSet;

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event type for unified mouse/touch handling.
///
/// Positions are in physical window coordinates.
#[derive(Debug, Clone)]
pub enum PointerEvent {
    Down {
        position: Point,
        button: MouseButton,
    },
    Up {
        position: Point,
        button: MouseButton,
    },
    Move {
        position: Point,
    },
    /// Pointer left the window.
    Left,
}

/// Everything the keypad needs to run one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Physical window size.
    pub window_size: Size,
    /// Pointer position in physical window coordinates.
    pub pointer: Point,
    /// Whether the primary button is held.
    pub pointer_down: bool,
    /// Seconds since the previous frame.
    pub dt: f64,
}

impl FrameInput {
    pub fn new(window_size: Size, pointer: Point, pointer_down: bool, dt: f64) -> Self {
        Self {
            window_size,
            pointer,
            pointer_down,
            dt,
        }
    }
}

/// Tracks pointer state across events so a [`FrameInput`] can be sampled
/// once per redraw.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current pointer position in physical coordinates.
    pub pointer_position: Point,
    /// Current window size in physical pixels.
    pub window_size: Size,
    /// Currently pressed mouse buttons.
    pressed_buttons: HashSet<MouseButton>,
    /// Left button went down since the last sample.
    left_pressed: bool,
}

impl InputState {
    pub fn new(window_size: Size) -> Self {
        Self {
            window_size,
            ..Self::default()
        }
    }

    /// Process a pointer event.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { position, button } => {
                self.pointer_position = position;
                self.pressed_buttons.insert(button);
                if button == MouseButton::Left {
                    self.left_pressed = true;
                }
            }
            PointerEvent::Up { position, button } => {
                self.pointer_position = position;
                self.pressed_buttons.remove(&button);
            }
            PointerEvent::Move { position } => {
                self.pointer_position = position;
            }
            PointerEvent::Left => {
                // Far outside any key; the viewport clamps it to the canvas edge.
                self.pointer_position = Point::new(-1.0, -1.0);
                self.pressed_buttons.clear();
                self.left_pressed = false;
            }
        }
    }

    pub fn set_window_size(&mut self, size: Size) {
        self.window_size = size;
    }

    /// Check if a mouse button is currently pressed.
    pub fn is_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    /// Sample the current state for a frame of length `dt`.
    ///
    /// A press that was released before this sample still reports the
    /// button down once, so the next sample sees the release.
    pub fn frame(&mut self, dt: f64) -> FrameInput {
        let pointer_down = self.is_button_pressed(MouseButton::Left) || self.left_pressed;
        self.left_pressed = false;
        FrameInput::new(self.window_size, self.pointer_position, pointer_down, dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_press_release() {
        let mut input = InputState::new(Size::new(500.0, 800.0));
        let pos = Point::new(100.0, 200.0);

        input.handle_pointer_event(PointerEvent::Down {
            position: pos,
            button: MouseButton::Left,
        });
        let frame = input.frame(0.016);
        assert!(frame.pointer_down);
        assert_eq!(frame.pointer, pos);
        assert_eq!(frame.window_size, Size::new(500.0, 800.0));

        input.handle_pointer_event(PointerEvent::Up {
            position: pos,
            button: MouseButton::Left,
        });
        assert!(!input.frame(0.016).pointer_down);
    }

    #[test]
    fn test_only_left_button_counts() {
        let mut input = InputState::default();
        input.handle_pointer_event(PointerEvent::Down {
            position: Point::ZERO,
            button: MouseButton::Right,
        });
        assert!(input.is_button_pressed(MouseButton::Right));
        assert!(!input.frame(0.0).pointer_down);
    }

    #[test]
    fn test_pointer_left_releases_buttons() {
        let mut input = InputState::default();
        input.handle_pointer_event(PointerEvent::Down {
            position: Point::new(10.0, 10.0),
            button: MouseButton::Left,
        });
        input.frame(0.0);
        input.handle_pointer_event(PointerEvent::Left);
        assert!(!input.frame(0.0).pointer_down);
        assert_eq!(input.pointer_position, Point::new(-1.0, -1.0));
    }

    #[test]
    fn test_tap_between_samples_is_reported_once() {
        let mut input = InputState::new(Size::new(500.0, 800.0));
        let pos = Point::new(100.0, 200.0);
        assert!(!input.frame(0.016).pointer_down);

        input.handle_pointer_event(PointerEvent::Down {
            position: pos,
            button: MouseButton::Left,
        });
        input.handle_pointer_event(PointerEvent::Up {
            position: pos,
            button: MouseButton::Left,
        });
        assert!(input.frame(0.016).pointer_down);
        assert!(!input.frame(0.016).pointer_down);
    }
}
