//! Browser `localStorage` helpers for view settings that survive a reload.
//!
//! SYSTEM CONTEXT
//! ==============
//! The viewer has no config file: the mission directory, layer toggles,
//! filter list and background reference are read here at mount and written
//! back whenever the engine reports a change.

#[cfg(test)]
#[path = "persistence_test.rs"]
mod persistence_test;

use mapview::filter::FilterSpec;
use mapview::settings::{BackgroundRef, Layers};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub const MISSION_DIR_KEY: &str = "map_viewer_missionDir";
pub const SETTINGS_KEY: &str = "map_viewer_settings";
pub const FILTERS_KEY: &str = "map_viewer_filters";
pub const BACKGROUND_KEY: &str = "map_viewer_background";

/// Everything restored at startup.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Persisted {
    pub mission_dir: String,
    pub layers: Layers,
    pub filters: Vec<FilterSpec>,
    pub background: Option<BackgroundRef>,
}

impl Persisted {
    /// Read every key, falling back to defaults for missing or corrupt values.
    pub fn load() -> Self {
        Self {
            mission_dir: load_text(MISSION_DIR_KEY).unwrap_or_default(),
            layers: load_json(SETTINGS_KEY).unwrap_or_default(),
            filters: load_json(FILTERS_KEY).unwrap_or_default(),
            background: load_json::<BackgroundRef>(BACKGROUND_KEY).filter(BackgroundRef::is_valid),
        }
    }
}

/// The mission directory is stored as plain text.
pub fn save_mission_dir(dir: &str) {
    save_text(MISSION_DIR_KEY, dir);
}

pub fn save_layers(layers: &Layers) {
    save_json(SETTINGS_KEY, layers);
}

pub fn save_filters(filters: &[FilterSpec]) {
    save_json(FILTERS_KEY, filters);
}

/// Store the background reference, or forget it.
pub fn save_background(background: Option<&BackgroundRef>) {
    match background {
        Some(reference) => save_json(BACKGROUND_KEY, reference),
        None => remove(BACKGROUND_KEY),
    }
}

#[cfg(feature = "hydrate")]
fn storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

/// Load the raw string stored for `key`.
pub fn load_text(key: &str) -> Option<String> {
    #[cfg(feature = "hydrate")]
    {
        storage()?.get_item(key).ok().flatten()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = key;
        None
    }
}

/// Load a JSON value from `localStorage` for `key`.
pub fn load_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    decode(key, &load_text(key)?)
}

/// Decode a stored value. Corrupt entries are logged and treated as absent.
fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Option<T> {
    match serde_json::from_str(raw) {
        Ok(value) => Some(value),
        Err(err) => {
            #[cfg(feature = "hydrate")]
            log::warn!("persistence: ignoring corrupt {key}: {err}");
            #[cfg(not(feature = "hydrate"))]
            let _ = (key, err);
            None
        }
    }
}

/// Store a raw string for `key`.
pub fn save_text(key: &str, value: &str) {
    #[cfg(feature = "hydrate")]
    {
        let Some(storage) = storage() else {
            return;
        };
        if let Err(err) = storage.set_item(key, value) {
            log::warn!("persistence: could not store {key}: {err:?}");
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (key, value);
    }
}

/// Save a JSON value to `localStorage` for `key`.
pub fn save_json<T: Serialize + ?Sized>(key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => save_text(key, &raw),
        Err(err) => {
            #[cfg(feature = "hydrate")]
            log::warn!("persistence: could not encode {key}: {err}");
            #[cfg(not(feature = "hydrate"))]
            let _ = err;
        }
    }
}

fn remove(key: &str) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(Err(err)) = storage().map(|s| s.remove_item(key)) {
            log::warn!("persistence: could not remove {key}: {err:?}");
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = key;
    }
}
