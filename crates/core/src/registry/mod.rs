//! Component registry keyed by tag name.
//!
//! `define` fails on a second definition of the same tag. `register_once` is
//! the guarded form for initialisation code that may run more than once.

use std::{collections::BTreeMap, fmt, sync::Arc};

use crate::{
    component::{Component, PianoRoll, PIANO_ROLL_TAG},
    PianoRollError, Result, TimelineGrid,
};

/// Constructor stored for a tag.
pub type ComponentFactory = Arc<dyn Fn() -> Box<dyn Component> + Send + Sync>;

#[derive(Default, Clone)]
pub struct ComponentRegistry {
    factories: BTreeMap<String, ComponentFactory>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines `tag`, failing if it is malformed or already defined.
    pub fn define<F>(&mut self, tag: &str, factory: F) -> Result<()>
    where
        F: Fn() -> Box<dyn Component> + Send + Sync + 'static,
    {
        validate_tag_name(tag)?;
        if self.is_defined(tag) {
            return Err(PianoRollError::AlreadyDefined(tag.to_string()));
        }
        self.factories.insert(tag.to_string(), Arc::new(factory));
        tracing::info!(tag, "component defined");
        Ok(())
    }

    /// Defines `tag` unless it already exists. Returns whether a definition
    /// happened; the existing factory is kept otherwise.
    pub fn register_once<F>(&mut self, tag: &str, factory: F) -> Result<bool>
    where
        F: Fn() -> Box<dyn Component> + Send + Sync + 'static,
    {
        if self.is_defined(tag) {
            tracing::debug!(tag, "component already defined, skipping");
            return Ok(false);
        }
        self.define(tag, factory)?;
        Ok(true)
    }

    pub fn is_defined(&self, tag: &str) -> bool {
        self.factories.contains_key(tag)
    }

    pub fn get(&self, tag: &str) -> Option<&ComponentFactory> {
        self.factories.get(tag)
    }

    /// Instantiates the component registered under `tag`.
    pub fn create(&self, tag: &str) -> Result<Box<dyn Component>> {
        let factory = self
            .get(tag)
            .ok_or_else(|| PianoRollError::NotDefined(tag.to_string()))?;
        Ok(factory())
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("tags", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Registers the piano roll under [`PIANO_ROLL_TAG`] with a default grid.
pub fn register_piano_roll(registry: &mut ComponentRegistry) -> Result<bool> {
    register_piano_roll_as(registry, PIANO_ROLL_TAG, TimelineGrid::default())
}

/// Registers the piano roll under a custom tag, building each instance on
/// `grid`.
pub fn register_piano_roll_as(
    registry: &mut ComponentRegistry,
    tag: &str,
    grid: TimelineGrid,
) -> Result<bool> {
    registry.register_once(tag, move || Box::new(PianoRoll::new(grid.clone())))
}

/// Component names start with a lowercase ASCII letter, contain a hyphen and
/// use only lowercase letters, digits, `-`, `.` and `_`.
pub fn validate_tag_name(tag: &str) -> Result<()> {
    let starts_lower = tag.chars().next().is_some_and(|c| c.is_ascii_lowercase());
    let allowed = tag
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '.' | '_'));

    if starts_lower && allowed && tag.contains('-') {
        Ok(())
    } else {
        Err(PianoRollError::InvalidTagName(tag.to_string()))
    }
}
