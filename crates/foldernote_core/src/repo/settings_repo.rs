//! Single-value settings key file.
//!
//! # Responsibility
//! - Read and write the API key kept in a flat file at the notes root.
//!
//! # Invariants
//! - The key file lives directly in the root, never nested.
//! - An absent key file reads as an empty key.

use crate::config::NotesConfig;
use crate::model::location::{Location, NameError};
use crate::repo::storage::{StorageAccessor, StorageResult};
use log::info;

/// Settings repository borrowing one storage accessor.
pub struct SettingsStore<'s, S: StorageAccessor + ?Sized> {
    storage: &'s S,
    key_file: Location,
}

impl<'s, S: StorageAccessor + ?Sized> SettingsStore<'s, S> {
    /// Creates a store for `config.settings_file_name`.
    pub fn new(storage: &'s S, config: &NotesConfig) -> Result<Self, NameError> {
        let key_file = Location::root().child(config.settings_file_name.as_str())?;
        Ok(Self { storage, key_file })
    }

    /// Location of the key file.
    pub fn key_file(&self) -> &Location {
        &self.key_file
    }

    /// Reads the stored API key; trailing newlines are dropped.
    pub async fn read_api_key(&self) -> StorageResult<String> {
        let raw = self.storage.read_text(&self.key_file).await?;
        Ok(raw.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Replaces the stored API key.
    pub async fn write_api_key(&self, key: &str) -> StorageResult<()> {
        self.storage.write_text(&self.key_file, key.trim()).await?;
        info!(
            "event=settings_write module=settings status=ok empty={}",
            key.trim().is_empty()
        );
        Ok(())
    }
}
