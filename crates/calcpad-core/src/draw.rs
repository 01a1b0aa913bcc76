//! Backend-agnostic draw commands in virtual coordinates.

use kurbo::Rect;
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Opaque handle to a font owned by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontId(pub u16);

/// A single primitive for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Filled rectangle with rounded corners.
    RoundedRect { rect: Rect, radius: f64, color: Color },
    /// Single-line text centered in `bounds`.
    Text {
        text: String,
        bounds: Rect,
        font: FontId,
        size: f64,
        color: Color,
    },
}

/// Ordered draw commands for one frame. Later commands paint over earlier ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn rounded_rect(&mut self, rect: Rect, radius: f64, color: Color) {
        self.push(DrawCommand::RoundedRect {
            rect,
            radius,
            color,
        });
    }

    pub fn text(&mut self, text: impl Into<String>, bounds: Rect, font: FontId, size: f64, color: Color) {
        self.push(DrawCommand::Text {
            text: text.into(),
            bounds,
            font,
            size,
            color,
        });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Text commands only, in draw order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            DrawCommand::RoundedRect { .. } => None,
        })
    }
}
