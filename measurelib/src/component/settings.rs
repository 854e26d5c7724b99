//! Key/value settings scoped to a component.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::tree::Component;

/// Read-only settings visible from one component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    properties: HashMap<String, String>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set a property.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.properties.contains_key(key)
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Value split on `,`, each item trimmed, empty items dropped.
    /// Unknown keys give an empty list.
    pub fn get_string_array(&self, key: &str) -> Vec<String> {
        self.get_string(key)
            .into_iter()
            .flat_map(|value| value.split(','))
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// `None` when the key is unset or not `true`/`false`.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get_string(key)?.trim().parse().ok()
    }

    /// `None` when the key is unset or not an integer.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get_string(key)?.trim().parse().ok()
    }

    /// Copy of these settings with `other` taking precedence.
    pub fn overlaid_with(&self, other: &Settings) -> Settings {
        let mut properties = self.properties.clone();
        properties.extend(
            other
                .properties
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        Settings { properties }
    }
}

/// Source of the settings a component sees.
pub trait SettingsRepository {
    fn settings(&self, component: &Component) -> Settings;
}

/// Global settings overlaid with per-component overrides keyed by component key.
#[derive(Debug, Clone, Default)]
pub struct MapSettingsRepository {
    global: Settings,
    by_component: HashMap<String, Settings>,
}

impl MapSettingsRepository {
    pub fn new(global: Settings) -> Self {
        Self {
            global,
            by_component: HashMap::new(),
        }
    }

    /// Builder: override settings for one component.
    pub fn component(mut self, key: impl Into<String>, settings: Settings) -> Self {
        self.by_component.insert(key.into(), settings);
        self
    }
}

impl SettingsRepository for MapSettingsRepository {
    fn settings(&self, component: &Component) -> Settings {
        match self.by_component.get(component.key()) {
            Some(overrides) => self.global.overlaid_with(overrides),
            None => self.global.clone(),
        }
    }
}
