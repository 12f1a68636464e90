//! `localStorage` backend for the session and token stores.

use gloo_storage::{LocalStorage, Storage};
use medscore::session::KeyValueStore;

/// Raw string access through gloo's handle. Values are stored as written,
/// not JSON-encoded, so the token entry stays a plain string.
#[derive(Clone, Copy, Default)]
pub struct BrowserStorage;

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        LocalStorage::raw().set_item(key, value).is_ok()
    }

    fn remove(&self, key: &str) {
        LocalStorage::delete(key);
    }
}
