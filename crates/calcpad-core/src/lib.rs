//! CalcPad Core Library
//!
//! Platform-agnostic keypad model for the CalcPad calculator: letterbox
//! viewport, animated keys, mode groups, page transitions and input routing.
//! Produces key commands and a draw list each frame; rendering and windowing
//! live in other crates.

pub mod config;
pub mod draw;
pub mod error;
pub mod group;
pub mod input;
pub mod keypad;
pub mod layout;
pub mod page;
pub mod router;
pub mod transition;
pub mod viewport;
pub mod widget;

pub use config::{ConfigError, ConfigResult, KeypadConfig, Palette, Rgba8, VIRTUAL_HEIGHT, VIRTUAL_WIDTH};
pub use draw::{DrawCommand, DrawList, FontId};
pub use error::{KeypadError, KeypadResult};
pub use group::{ModeGroup, ModeGroups};
pub use input::{FrameInput, InputState, MouseButton, PointerEvent};
pub use keypad::{FrameOutput, Keypad};
pub use layout::{KeyAction, LayoutSpec, Placement, WidgetSpec};
pub use page::{Page, PageId, PageSet};
pub use router::{InputRouter, KeyCommand};
pub use transition::{PageTransition, TransitionState};
pub use viewport::ViewportTransform;
pub use widget::{HoverHighlight, KeyId, Widget, WidgetState};
