//! Keypad keys and their per-key animation state.
//!
//! Every key is the same data-driven [`Widget`] type, configured from a
//! layout table entry. A widget owns:
//! - its animated geometry (driven by the page transition)
//! - a hover highlight that grows and retracts with the pointer
//! - press and sticky `active` flags used for visual feedback

mod highlight;
mod key;
mod state;

pub use highlight::{HoverHighlight, MIN_HIGHLIGHT};
pub use key::Widget;
pub use state::{KeyId, WidgetState};
