//! Vello-based renderer implementation.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::renderer::{RenderContext, RenderResult, Renderer, RendererError};
use calcpad_core::{DrawCommand, FontId};
use kurbo::{Affine, Rect, RoundedRect};
use parley::layout::PositionedLayoutItem;
use parley::{FontContext, LayoutContext, StyleProperty};
use peniko::{Brush, Color, Fill};
use vello::Scene;

/// Vello-based renderer for the keypad draw list.
pub struct VelloRenderer {
    /// The Vello scene being built.
    scene: Scene,
    /// Font context for text rendering (cached to avoid re-registering fonts).
    font_cx: FontContext,
    /// Layout context for text rendering.
    layout_cx: LayoutContext<Brush>,
    /// Named font family per label font. Unmapped fonts use the system sans-serif.
    families: HashMap<FontId, String>,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    /// Create a new Vello renderer.
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            font_cx: FontContext::new(),
            layout_cx: LayoutContext::new(),
            families: HashMap::new(),
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    /// Register font data and return the family name it provides.
    pub fn register_font(&mut self, data: Vec<u8>) -> RenderResult<String> {
        let registered = self
            .font_cx
            .collection
            .register_fonts(vello::peniko::Blob::new(Arc::new(data)), None);
        let (family_id, _) = registered
            .into_iter()
            .next()
            .ok_or_else(|| RendererError::Font("no usable font in data".to_string()))?;
        let name = self
            .font_cx
            .collection
            .family_name(family_id)
            .ok_or_else(|| RendererError::Font("registered font has no family name".to_string()))?
            .to_string();
        log::info!("Registered font family {}", name);
        Ok(name)
    }

    /// Read a font file and register it. See [`VelloRenderer::register_font`].
    pub fn register_font_file(&mut self, path: impl AsRef<Path>) -> RenderResult<String> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .map_err(|e| RendererError::Font(format!("Failed to read {}: {}", path.display(), e)))?;
        self.register_font(data)
    }

    /// Draw labels using `font` with the named family.
    pub fn set_font_family(&mut self, font: FontId, family: impl Into<String>) {
        self.families.insert(font, family.into());
    }

    /// Family used for `font`, if one was assigned.
    pub fn font_family(&self, font: FontId) -> Option<&str> {
        self.families.get(&font).map(String::as_str)
    }

    fn render_rounded_rect(&mut self, rect: Rect, radius: f64, color: Color, transform: Affine) {
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }
        let shape = RoundedRect::from_rect(rect, radius);
        self.scene.fill(Fill::NonZero, transform, color, None, &shape);
    }

    /// Lay out `text` on a single line and draw it centered in `bounds`.
    fn render_text(&mut self, text: &str, bounds: Rect, font: FontId, size: f64, color: Color, transform: Affine) {
        if text.is_empty() || size <= 0.0 {
            return;
        }

        let brush = Brush::Solid(color);
        let family = match self.families.get(&font) {
            Some(name) => parley::FontFamily::Named(name.clone().into()),
            None => parley::FontFamily::Generic(parley::GenericFamily::SansSerif),
        };

        let mut builder = self.layout_cx.ranged_builder(&mut self.font_cx, text, 1.0, false);
        builder.push_default(StyleProperty::FontSize(size as f32));
        builder.push_default(StyleProperty::Brush(brush.clone()));
        builder.push_default(StyleProperty::FontStack(parley::FontStack::Single(family)));
        let mut layout = builder.build(text);

        layout.break_all_lines(None);
        layout.align(None, parley::Alignment::Start, parley::AlignmentOptions::default());

        let center = bounds.center();
        let origin = (
            center.x - layout.width() as f64 * 0.5,
            center.y - layout.height() as f64 * 0.5,
        );
        let text_transform = transform * Affine::translate(origin);

        for line in layout.lines() {
            for item in line.items() {
                let PositionedLayoutItem::GlyphRun(glyph_run) = item else {
                    continue;
                };
                let mut x = glyph_run.offset();
                let y = glyph_run.baseline();
                let run = glyph_run.run();
                let font = run.font();
                let font_size = run.font_size();
                let synthesis = run.synthesis();
                let glyph_xform = synthesis
                    .skew()
                    .map(|angle| Affine::skew(angle.to_radians().tan() as f64, 0.0));

                let glyphs: Vec<vello::Glyph> = glyph_run
                    .glyphs()
                    .map(|glyph| {
                        let gx = x + glyph.x;
                        let gy = y - glyph.y;
                        x += glyph.advance;
                        vello::Glyph {
                            id: glyph.id,
                            x: gx,
                            y: gy,
                        }
                    })
                    .collect();

                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(font)
                        .brush(&brush)
                        .hint(true)
                        .transform(text_transform)
                        .glyph_transform(glyph_xform)
                        .font_size(font_size)
                        .normalized_coords(run.normalized_coords())
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
            }
        }
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &RenderContext) {
        self.scene.reset();

        // Letterbox bars are the clear color; only the canvas itself is filled.
        let canvas = ctx.viewport.canvas_rect();
        if canvas.width() <= 0.0 || canvas.height() <= 0.0 {
            return;
        }
        self.scene
            .fill(Fill::NonZero, Affine::IDENTITY, ctx.canvas_color, None, &canvas);

        let transform = ctx.viewport.transform();
        for command in ctx.draw_list.iter() {
            match command {
                DrawCommand::RoundedRect { rect, radius, color } => {
                    self.render_rounded_rect(*rect, *radius, *color, transform);
                }
                DrawCommand::Text {
                    text,
                    bounds,
                    font,
                    size,
                    color,
                } => {
                    self.render_text(text, *bounds, *font, *size, *color, transform);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calcpad_core::{DrawList, Keypad, KeypadConfig, Palette, Rgba8, ViewportTransform};
    use kurbo::Size;

    #[test]
    fn test_renderer_creation() {
        let renderer = VelloRenderer::new();
        assert!(renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_build_empty_scene() {
        let mut renderer = VelloRenderer::new();
        let list = DrawList::new();
        let viewport = ViewportTransform::new(Size::new(750.0, 1200.0), Size::new(500.0, 800.0));
        let ctx = RenderContext::new(&list, &viewport, Size::new(500.0, 800.0));

        renderer.build_scene(&ctx);
        // Canvas backdrop only.
        assert!(!renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_background_color_follows_palette() {
        let renderer = VelloRenderer::new();
        let list = DrawList::new();
        let viewport = ViewportTransform::new(Size::new(750.0, 1200.0), Size::new(500.0, 800.0));
        let mut palette = Palette::default();
        palette.background = Rgba8::new(10, 20, 30, 255);
        let ctx = RenderContext::new(&list, &viewport, Size::new(500.0, 800.0)).with_palette(&palette);

        assert_eq!(renderer.background_color(&ctx), Color::from(palette.background));
    }

    #[test]
    fn test_build_scene_with_keypad() {
        let mut renderer = VelloRenderer::new();
        let keypad = Keypad::calculator(KeypadConfig::default()).unwrap();
        let list = keypad.draw_list();
        let viewport = ViewportTransform::new(Size::new(750.0, 1200.0), Size::new(1280.0, 720.0));
        let ctx = RenderContext::new(&list, &viewport, Size::new(1280.0, 720.0))
            .with_palette(&keypad.config().palette);

        renderer.build_scene(&ctx);
        assert!(!renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_minimized_window_draws_nothing() {
        let mut renderer = VelloRenderer::new();
        let keypad = Keypad::calculator(KeypadConfig::default()).unwrap();
        let list = keypad.draw_list();
        let viewport = ViewportTransform::new(Size::new(750.0, 1200.0), Size::ZERO);
        let ctx = RenderContext::new(&list, &viewport, Size::ZERO);

        renderer.build_scene(&ctx);
        assert!(renderer.scene().encoding().is_empty());
    }

    #[test]
    fn test_font_family_mapping() {
        let mut renderer = VelloRenderer::new();
        assert_eq!(renderer.font_family(FontId(0)), None);
        renderer.set_font_family(FontId(0), "Roboto");
        assert_eq!(renderer.font_family(FontId(0)), Some("Roboto"));
        assert_eq!(renderer.font_family(FontId(1)), None);
    }

    #[test]
    fn test_missing_font_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = VelloRenderer::new();
        let err = renderer.register_font_file(dir.path().join("missing.ttf")).unwrap_err();
        assert!(matches!(err, RendererError::Font(_)));
    }

    #[test]
    fn test_garbage_font_data() {
        let mut renderer = VelloRenderer::new();
        assert!(renderer.register_font(b"not a font".to_vec()).is_err());
    }
}
