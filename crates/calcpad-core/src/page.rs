//! Pages of keys.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{KeypadError, KeypadResult};
use crate::widget::{KeyId, Widget};

/// Which of the two switchable pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PageId {
    /// Digits and basic operators.
    #[default]
    Base,
    /// Functions and constants.
    Extended,
}

impl PageId {
    /// The other page.
    pub fn flipped(self) -> Self {
        match self {
            PageId::Base => PageId::Extended,
            PageId::Extended => PageId::Base,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PageId::Base => "base",
            PageId::Extended => "extended",
        }
    }
}

/// An ordered set of keys. Insertion order is draw order.
#[derive(Debug, Clone, Default)]
pub struct Page {
    widgets: IndexMap<KeyId, Widget>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key. Keys must be unique within the page.
    pub fn insert(&mut self, widget: Widget) -> KeypadResult<()> {
        if self.widgets.contains_key(widget.key()) {
            return Err(KeypadError::DuplicateKey(widget.key().to_string()));
        }
        self.widgets.insert(widget.key().clone(), widget);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&Widget> {
        self.widgets.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Widget> {
        self.widgets.get_mut(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.widgets.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Keys in draw order.
    pub fn iter(&self) -> impl Iterator<Item = &Widget> {
        self.widgets.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Widget> {
        self.widgets.values_mut()
    }

    /// True when every key has collapsed to zero width (vacuously for an empty page).
    pub fn all_collapsed(&self) -> bool {
        self.iter().all(Widget::is_collapsed)
    }

    /// True when every key is back at full width (vacuously for an empty page).
    pub fn all_expanded(&self) -> bool {
        self.iter().all(Widget::is_expanded)
    }

    /// Collapse every key to zero width around its center.
    pub(crate) fn collapse_all(&mut self) {
        for widget in self.iter_mut() {
            widget.set_width(0.0);
        }
    }
}

/// The two switchable pages.
#[derive(Debug, Clone, Default)]
pub struct PageSet {
    pub base: Page,
    pub extended: Page,
}

impl PageSet {
    pub fn get(&self, id: PageId) -> &Page {
        match id {
            PageId::Base => &self.base,
            PageId::Extended => &self.extended,
        }
    }

    pub fn get_mut(&mut self, id: PageId) -> &mut Page {
        match id {
            PageId::Base => &mut self.base,
            PageId::Extended => &mut self.extended,
        }
    }
}
