//! Mutually exclusive mode groups (e.g. `BASE/INV/HYP`).

use indexmap::IndexMap;

use crate::error::{KeypadError, KeypadResult};
use crate::page::Page;
use crate::widget::{KeyId, Widget};

/// A named set of keys of which at most one is active.
///
/// The group only stores key identifiers; the `active` flag itself lives on
/// the widgets, which sit in the always-visible page.
#[derive(Debug, Clone, PartialEq)]
pub struct ModeGroup {
    name: String,
    members: Vec<KeyId>,
}

impl ModeGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[KeyId] {
        &self.members
    }

    pub fn add_member(&mut self, key: impl Into<KeyId>) {
        let key = key.into();
        if !self.members.contains(&key) {
            self.members.push(key);
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.members.iter().any(|m| m.as_str() == key)
    }

    /// Make `key` the active member and clear all others in a single pass.
    ///
    /// Fails without touching any widget if `key` is not a member or a
    /// member is missing from `page`.
    pub fn activate(&self, key: &str, page: &mut Page) -> KeypadResult<()> {
        if !self.contains(key) {
            return Err(KeypadError::NotInGroup {
                group: self.name.clone(),
                key: key.to_string(),
            });
        }
        self.validate(page)?;

        for member in &self.members {
            if let Some(widget) = page.get_mut(member.as_str()) {
                widget.set_active(member.as_str() == key);
            }
        }
        log::debug!("Mode group {} -> {}", self.name, key);
        Ok(())
    }

    /// The currently active member, if any.
    pub fn active_key<'a>(&'a self, page: &Page) -> Option<&'a KeyId> {
        self.members
            .iter()
            .find(|m| page.get(m.as_str()).is_some_and(Widget::is_active))
    }

    /// Check every member exists in `page`.
    pub fn validate(&self, page: &Page) -> KeypadResult<()> {
        match self.members.iter().find(|m| !page.contains(m.as_str())) {
            Some(missing) => Err(KeypadError::UnknownKey(missing.to_string())),
            None => Ok(()),
        }
    }
}

/// Independent mode groups, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ModeGroups {
    groups: IndexMap<String, ModeGroup>,
}

impl ModeGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the group named `name`, creating it if needed.
    pub fn entry(&mut self, name: &str) -> &mut ModeGroup {
        self.groups
            .entry(name.to_string())
            .or_insert_with(|| ModeGroup::new(name))
    }

    pub fn get(&self, name: &str) -> Option<&ModeGroup> {
        self.groups.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModeGroup> {
        self.groups.values()
    }

    /// Activate `key` within the group `name`. Other groups are untouched.
    pub fn activate(&self, name: &str, key: &str, page: &mut Page) -> KeypadResult<()> {
        let group = self
            .groups
            .get(name)
            .ok_or_else(|| KeypadError::UnknownGroup(name.to_string()))?;
        group.activate(key, page)
    }

    /// The active key of group `name`, if the group exists and has one.
    pub fn active_key<'a>(&'a self, name: &str, page: &Page) -> Option<&'a KeyId> {
        self.groups.get(name).and_then(|g| g.active_key(page))
    }
}
