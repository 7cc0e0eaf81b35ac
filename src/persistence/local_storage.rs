//! Browser LocalStorage backend (wasm32)

use serde_json::Value;
use web_sys::Storage;

use super::KeyValueStore;

/// Prefix applied to every key
const KEY_PREFIX: &str = "rocket_duel.";

/// Each key is stored as its own JSON-encoded LocalStorage item
pub struct LocalStorageStore {
    storage: Option<Storage>,
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalStorageStore {
    pub fn new() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - preferences will not persist");
        }
        Self { storage }
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<Value> {
        let storage = self.storage.as_ref()?;
        let json = storage.get_item(&format!("{KEY_PREFIX}{key}")).ok()??;
        serde_json::from_str(&json).ok()
    }

    fn set(&mut self, key: &str, value: Value) {
        let Some(storage) = &self.storage else { return };
        if storage
            .set_item(&format!("{KEY_PREFIX}{key}"), &value.to_string())
            .is_err()
        {
            log::warn!("Failed to save {key} to LocalStorage");
        }
    }
}
