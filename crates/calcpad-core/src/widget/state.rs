//! Widget state definitions.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Stable identifier of a key on the keypad (e.g. `"7"`, `"sin"`, `"more"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyId(String);

impl KeyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for KeyId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Borrow<str> for KeyId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The visual state of a key, derived from hover/press/active flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidgetState {
    /// Pointer is elsewhere.
    #[default]
    Normal,
    /// Pointer is over the key.
    Hovered,
    /// Pointer is held down over the key.
    Pressed,
    /// Key is pinned active (mode selection, persistent styling).
    Active,
}

impl WidgetState {
    /// Whether the key renders with press feedback (inset rect, smaller label).
    pub fn shows_press(&self) -> bool {
        matches!(self, Self::Pressed | Self::Active)
    }

    /// Whether the key should use the hovered fill.
    pub fn is_hovered(&self) -> bool {
        matches!(self, Self::Hovered | Self::Pressed)
    }
}
