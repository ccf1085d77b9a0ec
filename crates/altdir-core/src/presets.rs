use std::sync::Arc;

use altdir_cache::KeyValueStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{filter::FilterSettings, Error, Result};

/// Storage key holding the JSON array of presets
pub const PRESETS_KEY: &str = "filterPresets";

/// A named snapshot of filter settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterPreset {
    pub id: String,
    pub name: String,
    pub filters: FilterSettings,
    pub created_at: DateTime<Utc>,
}

/// Saved filter presets on top of the injected key-value store
///
/// Names don't have to be unique; the generated id is the key.
pub struct PresetStore {
    store: Arc<dyn KeyValueStore>,
}

impl PresetStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn save(&self, name: &str, filters: &FilterSettings) -> Result<FilterPreset> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("preset name must not be empty".into()));
        }

        let preset = FilterPreset {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            filters: filters.clone(),
            created_at: Utc::now(),
        };

        let mut presets = self.list()?;
        presets.push(preset.clone());
        self.write(&presets)?;

        info!("Saved preset '{}' ({})", preset.name, preset.id);
        Ok(preset)
    }

    /// All presets, oldest first
    ///
    /// A corrupt stored list is logged and treated as empty rather than
    /// locking the user out of saving new ones.
    pub fn list(&self) -> Result<Vec<FilterPreset>> {
        let Some(raw) = self.store.get(PRESETS_KEY)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str(&raw) {
            Ok(presets) => Ok(presets),
            Err(e) => {
                warn!("Ignoring unreadable preset list: {}", e);
                Ok(Vec::new())
            }
        }
    }

    pub fn get(&self, id: &str) -> Result<FilterPreset> {
        self.list()?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::NotFound(format!("preset {}", id)))
    }

    pub fn load(&self, id: &str) -> Result<FilterSettings> {
        self.get(id).map(|preset| preset.filters)
    }

    /// Deleting an unknown id is not an error
    pub fn delete(&self, id: &str) -> Result<()> {
        let mut presets = self.list()?;
        let before = presets.len();
        presets.retain(|p| p.id != id);

        if presets.len() != before {
            self.write(&presets)?;
            info!("Deleted preset {}", id);
        }
        Ok(())
    }

    fn write(&self, presets: &[FilterPreset]) -> Result<()> {
        let raw = serde_json::to_string(presets)?;
        self.store.set(PRESETS_KEY, &raw)?;
        Ok(())
    }
}
