//! Core application state and lifecycle.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use calcpad_core::layout::{DISPLAY_RECT, KEY_FONT, TRIG_GROUP};
use calcpad_core::{
    InputState, Keypad, KeypadConfig, KeypadResult, MouseButton as KeyMouseButton, PointerEvent,
};
use calcpad_render::{RenderContext, Renderer, RendererError, VelloRenderer};
use kurbo::{Point, Size};
use vello::util::RenderSurface;
use vello::wgpu::PresentMode;
use vello::{AaConfig, RenderParams, RendererOptions};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

use crate::expression::Expression;

/// Characters of the expression that fit in the display.
const DISPLAY_CHARS: usize = 14;
/// Label size of the expression display.
const DISPLAY_TEXT_SIZE: f64 = 64.0;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Keypad config file (JSON). Defaults are used when absent or unreadable.
    pub keypad_config_path: Option<PathBuf>,
    /// Font file used for every label.
    pub font_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "CalcPad".to_string(),
            width: 500,
            height: 800,
            keypad_config_path: None,
            font_path: None,
        }
    }
}

impl AppConfig {
    /// Build from command line arguments (without the program name):
    /// `[keypad-config.json] [font.ttf]`.
    pub fn from_args(mut args: impl Iterator<Item = String>) -> Self {
        Self {
            keypad_config_path: args.next().map(PathBuf::from),
            font_path: args.next().map(PathBuf::from),
            ..Self::default()
        }
    }

    /// Load the keypad config, falling back to defaults on any error.
    pub fn load_keypad_config(&self) -> KeypadConfig {
        let Some(path) = &self.keypad_config_path else {
            return KeypadConfig::default();
        };
        match KeypadConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Using default keypad config: {}", e);
                KeypadConfig::default()
            }
        }
    }
}

/// Runtime state for the application.
struct AppState {
    // Windowing
    window: Arc<Window>,
    surface: RenderSurface<'static>,

    // Rendering
    vello_renderer: vello::Renderer,
    keypad_renderer: VelloRenderer,
    /// Texture blitter for RGBA->surface format conversion
    texture_blitter: vello::wgpu::util::TextureBlitter,

    // State
    input: InputState,
    last_frame: Instant,
}

/// Main application struct.
pub struct App {
    config: AppConfig,
    keypad: Keypad,
    expression: Expression,
    state: Option<AppState>,
    render_cx: Option<vello::util::RenderContext>,
}

impl App {
    /// Create an application and build its keypad.
    pub fn with_config(config: AppConfig) -> KeypadResult<Self> {
        let keypad = Keypad::calculator(config.load_keypad_config())?;
        Ok(Self {
            config,
            keypad,
            expression: Expression::new(),
            state: None,
            render_cx: None,
        })
    }

    /// Run the application.
    pub async fn run(config: AppConfig) {
        let mut app = match App::with_config(config) {
            Ok(app) => app,
            Err(e) => {
                log::error!("Failed to build keypad: {}", e);
                return;
            }
        };
        let event_loop = EventLoop::new().expect("Failed to create event loop");
        event_loop.run_app(&mut app).expect("Event loop error");
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    /// Finish initialization after surface is created.
    fn finish_init(&mut self, window: Arc<Window>, surface: RenderSurface<'static>) {
        let Some(render_cx) = self.render_cx.as_ref() else {
            return;
        };
        let device = &render_cx.devices[surface.dev_id].device;

        let vello_renderer = vello::Renderer::new(device, RendererOptions::default())
            .expect("Failed to create Vello renderer");

        // Vello renders to Rgba8Unorm; the surface format may differ.
        let texture_blitter = vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        let mut keypad_renderer = VelloRenderer::new();
        if let Some(path) = &self.config.font_path {
            match keypad_renderer.register_font_file(path) {
                Ok(family) => {
                    for font in self.keypad_fonts() {
                        keypad_renderer.set_font_family(font, family.clone());
                    }
                }
                Err(e) => log::warn!("Falling back to the system font: {}", e),
            }
        }

        let size = Size::new(surface.config.width as f64, surface.config.height as f64);
        log::info!("CalcPad initialized - {}x{}", surface.config.width, surface.config.height);

        self.state = Some(AppState {
            window: window.clone(),
            surface,
            vello_renderer,
            keypad_renderer,
            texture_blitter,
            input: InputState::new(size),
            last_frame: Instant::now(),
        });

        window.request_redraw();
    }

    /// Every font id referenced by the keypad, plus the display font.
    fn keypad_fonts(&self) -> Vec<calcpad_core::FontId> {
        let mut fonts = vec![KEY_FONT];
        let pages = self.keypad.pages();
        for widget in pages.base.iter().chain(pages.extended.iter()).chain(self.keypad.fixed().iter()) {
            if !fonts.contains(&widget.font) {
                fonts.push(widget.font);
            }
        }
        fonts
    }

    /// Run a keypad frame, apply its commands and draw it.
    fn redraw(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        let now = Instant::now();
        let dt = now.duration_since(state.last_frame).as_secs_f64();
        state.last_frame = now;

        let mut output = self.keypad.frame(&state.input.frame(dt));
        for command in &output.commands {
            let trig = self.keypad.active_mode(TRIG_GROUP).map(|k| k.as_str());
            self.expression.apply(command, trig);
        }

        let palette = self.keypad.config().palette;
        output.draw.text(
            self.expression.tail(DISPLAY_CHARS),
            DISPLAY_RECT,
            KEY_FONT,
            DISPLAY_TEXT_SIZE,
            palette.label.into(),
        );

        let ctx = RenderContext::new(&output.draw, self.keypad.viewport(), state.input.window_size)
            .with_palette(&palette);
        state.keypad_renderer.build_scene(&ctx);
        let base_color = state.keypad_renderer.background_color(&ctx);
        let scene = state.keypad_renderer.take_scene();

        let Some(render_cx) = self.render_cx.as_ref() else {
            return;
        };
        let device_handle = &render_cx.devices[state.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = match state.surface.surface.get_current_texture() {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Failed to get surface texture: {:?}", e);
                return;
            }
        };

        let width = state.surface.config.width;
        let height = state.surface.config.height;

        let params = RenderParams {
            base_color,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Vello's compute shaders need a StorageBinding Rgba8Unorm target.
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("vello render texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let render_texture_view =
            render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        if let Err(e) = state.vello_renderer.render_to_texture(
            device,
            queue,
            &scene,
            &render_texture_view,
            &params,
        ) {
            log::error!("{}", RendererError::RenderFailed(format!("{e:?}")));
            return;
        }

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        let mut blit_encoder = device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
            label: Some("blit encoder"),
        });
        state
            .texture_blitter
            .copy(device, &mut blit_encoder, &render_texture_view, &surface_view);
        queue.submit(std::iter::once(blit_encoder.finish()));

        surface_texture.present();
        state.window.request_redraw();
    }
}

fn pointer_button(button: MouseButton) -> Option<KeyMouseButton> {
    match button {
        MouseButton::Left => Some(KeyMouseButton::Left),
        MouseButton::Right => Some(KeyMouseButton::Right),
        MouseButton::Middle => Some(KeyMouseButton::Middle),
        _ => None,
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        log::info!("Creating window...");
        let window_attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        let size = window.inner_size();
        let (width, height) = if size.width == 0 || size.height == 0 {
            (self.config.width, self.config.height)
        } else {
            (size.width, size.height)
        };
        log::info!("Surface size: {}x{}", width, height);

        let render_cx = self.render_cx.get_or_insert_with(vello::util::RenderContext::new);
        let surface = pollster::block_on(render_cx.create_surface(
            window.clone(),
            width,
            height,
            PresentMode::AutoVsync,
        ))
        .expect("Failed to create surface");

        self.finish_init(window, surface);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(state) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                state
                    .input
                    .set_window_size(Size::new(size.width as f64, size.height as f64));
                // A minimized window keeps its old surface; the keypad sees a zero-size window.
                if size.width == 0 || size.height == 0 {
                    return;
                }
                if let Some(render_cx) = self.render_cx.as_mut() {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }
                state.window.request_redraw();
            }

            WindowEvent::CursorMoved { position, .. } => {
                state.input.handle_pointer_event(PointerEvent::Move {
                    position: Point::new(position.x, position.y),
                });
            }

            WindowEvent::CursorLeft { .. } => {
                state.input.handle_pointer_event(PointerEvent::Left);
            }

            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => {
                let Some(button) = pointer_button(button) else {
                    return;
                };
                let position = state.input.pointer_position;
                let event = match button_state {
                    ElementState::Pressed => PointerEvent::Down { position, button },
                    ElementState::Released => PointerEvent::Up { position, button },
                };
                state.input.handle_pointer_event(event);
            }

            WindowEvent::RedrawRequested => {
                self.redraw();
            }

            _ => {}
        }
    }
}
