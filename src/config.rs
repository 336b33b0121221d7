//! Session store configuration.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// `localStorage` key holding the serialized current user.
pub const DEFAULT_STORAGE_KEY: &str = "currentUser";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("storage key must not be blank")]
    EmptyStorageKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    storage_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { storage_key: DEFAULT_STORAGE_KEY.to_owned() }
    }
}

impl SessionConfig {
    /// Build a config persisting under `key` instead of [`DEFAULT_STORAGE_KEY`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyStorageKey`] when `key` is empty or whitespace.
    pub fn with_storage_key(key: impl Into<String>) -> Result<Self, ConfigError> {
        let storage_key = key.into();
        if storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        Ok(Self { storage_key })
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }
}
