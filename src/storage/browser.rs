//! `window.localStorage` backend. Requires a browser environment.

use wasm_bindgen::{JsCast, JsValue};

use super::{KeyValueStore, StorageError};

/// Handle to the origin's `localStorage`.
#[derive(Clone, Debug)]
pub struct BrowserStorage {
    inner: web_sys::Storage,
}

impl BrowserStorage {
    /// Resolve `window.localStorage`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] outside a window context or when
    /// the browser blocks storage access.
    pub fn local() -> Result<Self, StorageError> {
        let window = web_sys::window().ok_or(StorageError::Unavailable)?;
        match window.local_storage() {
            Ok(Some(inner)) => Ok(Self { inner }),
            Ok(None) | Err(_) => Err(StorageError::Unavailable),
        }
    }
}

fn js_error(err: JsValue, key: &str, bytes: usize) -> StorageError {
    if let Some(dom) = err.dyn_ref::<web_sys::DomException>() {
        if dom.name() == "QuotaExceededError" {
            return StorageError::QuotaExceeded { key: key.to_owned(), bytes };
        }
        return StorageError::Backend(dom.message());
    }
    StorageError::Backend(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_item(key).map_err(|e| js_error(e, key, 0))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner
            .set_item(key, value)
            .map_err(|e| js_error(e, key, key.len() + value.len()))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.inner.remove_item(key).map_err(|e| js_error(e, key, 0))
    }
}
