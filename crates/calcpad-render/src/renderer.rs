//! Renderer trait abstraction.

use calcpad_core::{DrawList, Palette, ViewportTransform};
use kurbo::Size;
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Font error: {0}")]
    Font(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// Commands to draw, in virtual coordinates.
    pub draw_list: &'a DrawList,
    /// Letterbox transform for this frame.
    pub viewport: &'a ViewportTransform,
    /// Window size in physical pixels.
    pub window_size: Size,
    /// Color of the letterbox bars.
    pub background_color: Color,
    /// Backdrop of the virtual canvas.
    pub canvas_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context with the default palette colors.
    pub fn new(draw_list: &'a DrawList, viewport: &'a ViewportTransform, window_size: Size) -> Self {
        let palette = Palette::default();
        Self {
            draw_list,
            viewport,
            window_size,
            background_color: palette.background.into(),
            canvas_color: palette.canvas.into(),
        }
    }

    /// Take background and canvas colors from `palette`.
    pub fn with_palette(mut self, palette: &Palette) -> Self {
        self.background_color = palette.background.into();
        self.canvas_color = palette.canvas.into();
        self
    }
}

/// Trait for rendering backends.
pub trait Renderer {
    /// Build the scene for a frame from the context's draw list.
    fn build_scene(&mut self, ctx: &RenderContext);

    /// Get the background color (for clearing).
    fn background_color(&self, ctx: &RenderContext) -> Color {
        ctx.background_color
    }
}
