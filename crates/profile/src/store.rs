//! Profile registry with JSON-file-backed custom entries.
//!
//! Lookups resolve built-in catalog profiles first, then custom profiles
//! persisted in a JSON file, and fall back to `arena_basic` for unknown
//! keys. Registration merges an override fragment over a base profile and
//! writes the store file through on every change; nothing is cached in
//! memory, so external edits to the file are picked up on the next lookup.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{catalog, EnvProfile};

/// Lightweight catalog entry for listings.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    pub key: String,
    pub label: String,
    pub description: String,
    pub width: f32,
    pub height: f32,
    pub obstacle_count: usize,
    pub has_goal: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CustomStore {
    #[serde(default)]
    environment_profiles: serde_json::Map<String, Value>,
}

#[derive(Debug, Clone)]
pub struct ProfileStore {
    custom_path: PathBuf,
}

impl ProfileStore {
    #[must_use]
    pub fn new(custom_path: impl Into<PathBuf>) -> Self {
        Self {
            custom_path: custom_path.into(),
        }
    }

    /// Resolve a profile key to a fully materialized configuration. Unknown
    /// keys resolve to the default profile rather than failing, so callers
    /// always get something runnable.
    #[must_use]
    pub fn get(&self, key: &str) -> EnvProfile {
        if let Some(profile) = catalog::builtin(key) {
            return profile;
        }
        if let Some(value) = self.load_custom().environment_profiles.get(key) {
            match serde_json::from_value::<EnvProfile>(value.clone()) {
                Ok(profile) => return profile,
                Err(err) => {
                    tracing::warn!("custom profile `{key}` is malformed: {err}");
                }
            }
        }
        tracing::debug!(
            "profile `{key}` not found, using `{}`",
            catalog::DEFAULT_PROFILE
        );
        catalog::default_profile()
    }

    /// Merge `overrides` over `base_profile`, validate the result and persist
    /// it under `key`. Returns the registered profile.
    ///
    /// # Errors
    ///
    /// Fails on an empty key, an override fragment that does not merge into a
    /// valid profile, or a store file that cannot be written.
    pub fn register(
        &self,
        key: &str,
        label: &str,
        description: &str,
        overrides: Value,
        base_profile: &str,
    ) -> Result<EnvProfile> {
        if key.is_empty() {
            bail!("environment profile key is required");
        }
        let base = serde_json::to_value(self.get(base_profile))?;
        let mut merged = deep_merge(base, overrides);
        if let Value::Object(map) = &mut merged {
            map.insert("label".into(), Value::String(label.to_owned()));
            map.insert("description".into(), Value::String(description.to_owned()));
        }
        let profile: EnvProfile = serde_json::from_value(merged.clone())
            .context("override fragment does not merge into a valid environment profile")?;

        let mut store = self.load_custom();
        store.environment_profiles.insert(key.to_owned(), merged);
        self.save_custom(&store)?;
        tracing::info!("registered custom environment profile `{key}`");
        Ok(profile)
    }

    /// Built-in profiles in catalog order followed by custom entries.
    /// Malformed custom entries are skipped.
    #[must_use]
    pub fn list(&self) -> Vec<ProfileSummary> {
        let mut entries: Vec<ProfileSummary> = catalog::NAMES
            .iter()
            .filter_map(|name| catalog::builtin(name).map(|p| summarize(name, &p)))
            .collect();
        for (key, value) in &self.load_custom().environment_profiles {
            match serde_json::from_value::<EnvProfile>(value.clone()) {
                Ok(profile) => entries.push(summarize(key, &profile)),
                Err(err) => {
                    tracing::warn!("skipping malformed custom profile `{key}`: {err}");
                }
            }
        }
        entries
    }

    fn load_custom(&self) -> CustomStore {
        if !self.custom_path.exists() {
            return CustomStore::default();
        }
        let parsed = fs::read_to_string(&self.custom_path)
            .map_err(anyhow::Error::from)
            .and_then(|content| serde_json::from_str(&content).map_err(anyhow::Error::from));
        match parsed {
            Ok(store) => store,
            Err(err) => {
                tracing::warn!(
                    "custom profile store {} is unreadable: {err}",
                    self.custom_path.display()
                );
                CustomStore::default()
            }
        }
    }

    fn save_custom(&self, store: &CustomStore) -> Result<()> {
        if let Some(parent) = self.custom_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.custom_path, serde_json::to_string_pretty(store)?)?;
        Ok(())
    }
}

fn summarize(key: &str, profile: &EnvProfile) -> ProfileSummary {
    ProfileSummary {
        key: key.to_owned(),
        label: profile.label.clone(),
        description: profile.description.clone(),
        width: profile.world.width,
        height: profile.world.height,
        obstacle_count: profile.world.obstacles.len(),
        has_goal: profile.world.goal.is_some(),
    }
}

/// Recursive merge: objects merge key by key, anything else in the override
/// replaces the base value.
fn deep_merge(base: Value, overrides: Value) -> Value {
    match (base, overrides) {
        (Value::Object(mut base_map), Value::Object(override_map)) => {
            for (key, value) in override_map {
                let merged = match base_map.remove(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, replacement) => replacement,
    }
}
