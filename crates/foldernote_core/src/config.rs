//! Explicit configuration for one notes store.
//!
//! # Responsibility
//! - Describe where the notes root lives and which names are reserved.
//! - Replace process-wide root constants with a value injected at startup.
//!
//! # Invariants
//! - `documents_dir` is absolute.
//! - `root_folder_name` and `settings_file_name` are single path segments.

use crate::model::entry::NoteFormat;
use crate::model::location::{validate_name, NameError};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Default name of the notes root folder.
pub const DEFAULT_ROOT_FOLDER_NAME: &str = "notes";
/// Default name of the single-value settings key file.
pub const DEFAULT_SETTINGS_FILE_NAME: &str = "apiKey.txt";

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `documents_dir` is empty.
    EmptyDocumentsDir,
    /// `documents_dir` is not absolute.
    RelativeDocumentsDir(PathBuf),
    /// A configured file/folder name is not a single segment.
    InvalidName {
        field: &'static str,
        source: NameError,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDocumentsDir => write!(f, "documents_dir cannot be empty"),
            Self::RelativeDocumentsDir(path) => write!(
                f,
                "documents_dir must be an absolute path, got `{}`",
                path.display()
            ),
            Self::InvalidName { field, source } => write!(f, "invalid {field}: {source}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidName { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Notes store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesConfig {
    /// Platform private document storage.
    pub documents_dir: PathBuf,
    /// Folder under `documents_dir` holding the notes tree.
    pub root_folder_name: String,
    /// Flat key file stored directly in the notes root.
    pub settings_file_name: String,
    /// Extension used when a note is created without one.
    pub default_extension: NoteFormat,
}

impl NotesConfig {
    /// Builds a validated configuration with default names.
    ///
    /// # Errors
    /// - Returns an error when `documents_dir` is empty or relative.
    pub fn new(documents_dir: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self {
            documents_dir: documents_dir.as_ref().to_path_buf(),
            root_folder_name: DEFAULT_ROOT_FOLDER_NAME.to_string(),
            settings_file_name: DEFAULT_SETTINGS_FILE_NAME.to_string(),
            default_extension: NoteFormat::Markdown,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks invariants of a possibly deserialized configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.documents_dir.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDocumentsDir);
        }
        if !self.documents_dir.is_absolute() {
            return Err(ConfigError::RelativeDocumentsDir(self.documents_dir.clone()));
        }
        validate_name(&self.root_folder_name).map_err(|source| ConfigError::InvalidName {
            field: "root_folder_name",
            source,
        })?;
        validate_name(&self.settings_file_name).map_err(|source| ConfigError::InvalidName {
            field: "settings_file_name",
            source,
        })?;
        Ok(())
    }

    /// Absolute path of the notes root.
    pub fn notes_root(&self) -> PathBuf {
        self.documents_dir.join(&self.root_folder_name)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, NotesConfig, DEFAULT_ROOT_FOLDER_NAME};
    use crate::model::entry::NoteFormat;

    #[test]
    fn new_fills_defaults() {
        let base = std::env::temp_dir();
        let config = NotesConfig::new(&base).unwrap();
        assert_eq!(config.root_folder_name, DEFAULT_ROOT_FOLDER_NAME);
        assert_eq!(config.default_extension, NoteFormat::Markdown);
        assert_eq!(config.notes_root(), base.join("notes"));
    }

    #[test]
    fn rejects_relative_and_empty_dirs() {
        assert_eq!(NotesConfig::new(""), Err(ConfigError::EmptyDocumentsDir));
        assert!(matches!(
            NotesConfig::new("docs/local"),
            Err(ConfigError::RelativeDocumentsDir(_))
        ));
    }

    #[test]
    fn validate_rejects_nested_root_name() {
        let mut config = NotesConfig::new(std::env::temp_dir()).unwrap();
        config.root_folder_name = "a/b".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidName {
                field: "root_folder_name",
                ..
            })
        ));
    }
}
