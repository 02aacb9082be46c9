//! Storage accessor contract and filesystem implementation.
//!
//! # Responsibility
//! - Wrap the host's persistent-storage primitives behind one async trait.
//! - Be the only component that touches physical storage.
//!
//! # Invariants
//! - `read_text` on an absent target returns empty text, not an error.
//! - `remove` is idempotent: an absent target is success.
//! - `write_text` and `ensure_folder` create missing ancestors.
//! - There is no rename primitive; callers synthesize it.

use crate::config::NotesConfig;
use crate::model::entry::{DirectoryEntry, EntryKind};
use crate::model::location::Location;
use async_trait::async_trait;
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;

/// Result type used by storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage primitive that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOp {
    Exists,
    EnsureFolder,
    List,
    Read,
    Write,
    Remove,
}

impl StorageOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exists => "exists",
            Self::EnsureFolder => "ensure_folder",
            Self::List => "list",
            Self::Read => "read",
            Self::Write => "write",
            Self::Remove => "remove",
        }
    }
}

/// Errors from storage primitives.
#[derive(Debug)]
pub enum StorageError {
    /// Underlying I/O failure (permissions, disk full, missing parent...).
    Io {
        op: StorageOp,
        path: PathBuf,
        source: std::io::Error,
    },
    /// Listing target exists but is not a folder.
    NotAFolder(PathBuf),
}

impl StorageError {
    fn io(op: StorageOp, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            op,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Returns whether the underlying cause is a missing target.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == ErrorKind::NotFound)
    }
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { op, path, source } => write!(
                f,
                "storage {} failed for `{}`: {source}",
                op.as_str(),
                path.display()
            ),
            Self::NotAFolder(path) => write!(f, "not a folder: `{}`", path.display()),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::NotAFolder(_) => None,
        }
    }
}

/// Presence probe result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryStatus {
    pub present: bool,
    pub is_folder: bool,
}

/// Async storage primitives over one notes root.
///
/// Implementations must be `Send + Sync`; the core issues calls from one
/// logical actor and awaits each before the next dependent step.
#[async_trait]
pub trait StorageAccessor: Send + Sync {
    /// Probes a location without side effects.
    async fn exists(&self, location: &Location) -> StorageResult<EntryStatus>;

    /// Creates a folder and all missing ancestors. Idempotent.
    async fn ensure_folder(&self, location: &Location) -> StorageResult<()>;

    /// Lists direct children, tagged by kind.
    ///
    /// # Errors
    /// - `location` is absent or not a folder.
    async fn list(&self, location: &Location) -> StorageResult<Vec<DirectoryEntry>>;

    /// Reads text content; an absent target yields `""`.
    async fn read_text(&self, location: &Location) -> StorageResult<String>;

    /// Writes text content, creating ancestors and overwriting.
    async fn write_text(&self, location: &Location, text: &str) -> StorageResult<()>;

    /// Deletes a file, or a folder recursively. Absent targets are success.
    async fn remove(&self, location: &Location) -> StorageResult<()>;
}

/// `tokio::fs` backed storage rooted at the configured notes folder.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Creates storage rooted at `config.notes_root()`.
    pub fn new(config: &NotesConfig) -> Self {
        Self::with_root(config.notes_root())
    }

    /// Creates storage rooted at an explicit absolute path.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path for `location`.
    pub fn path_of(&self, location: &Location) -> PathBuf {
        location.resolve(&self.root)
    }
}

#[async_trait]
impl StorageAccessor for FsStorage {
    async fn exists(&self, location: &Location) -> StorageResult<EntryStatus> {
        let path = self.path_of(location);
        match fs::metadata(&path).await {
            Ok(metadata) => Ok(EntryStatus {
                present: true,
                is_folder: metadata.is_dir(),
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(EntryStatus::default()),
            Err(err) => Err(StorageError::io(StorageOp::Exists, &path, err)),
        }
    }

    async fn ensure_folder(&self, location: &Location) -> StorageResult<()> {
        let path = self.path_of(location);
        fs::create_dir_all(&path)
            .await
            .map_err(|err| StorageError::io(StorageOp::EnsureFolder, &path, err))
    }

    async fn list(&self, location: &Location) -> StorageResult<Vec<DirectoryEntry>> {
        let path = self.path_of(location);
        let metadata = fs::metadata(&path)
            .await
            .map_err(|err| StorageError::io(StorageOp::List, &path, err))?;
        if !metadata.is_dir() {
            return Err(StorageError::NotAFolder(path));
        }

        let mut dir = fs::read_dir(&path)
            .await
            .map_err(|err| StorageError::io(StorageOp::List, &path, err))?;
        let mut entries = Vec::new();
        while let Some(item) = dir
            .next_entry()
            .await
            .map_err(|err| StorageError::io(StorageOp::List, &path, err))?
        {
            let Ok(name) = item.file_name().into_string() else {
                warn!("event=storage_list module=storage status=skipped reason=non_utf8_name");
                continue;
            };
            // Follows symlinks so a linked folder lists as a folder.
            let metadata = match fs::metadata(item.path()).await {
                Ok(metadata) => metadata,
                Err(err) => {
                    warn!(
                        "event=storage_list module=storage status=skipped reason=metadata_failed error={}",
                        err
                    );
                    continue;
                }
            };
            let kind = if metadata.is_dir() {
                EntryKind::Folder
            } else {
                EntryKind::Note
            };
            entries.push(DirectoryEntry {
                name,
                kind,
                modified_at: metadata.modified().ok().and_then(epoch_ms),
            });
        }
        Ok(entries)
    }

    async fn read_text(&self, location: &Location) -> StorageResult<String> {
        let path = self.path_of(location);
        match fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("event=storage_read module=storage status=ok absent=true");
                Ok(String::new())
            }
            Err(err) => Err(StorageError::io(StorageOp::Read, &path, err)),
        }
    }

    async fn write_text(&self, location: &Location, text: &str) -> StorageResult<()> {
        let path = self.path_of(location);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|err| StorageError::io(StorageOp::Write, parent, err))?;
        }
        fs::write(&path, text)
            .await
            .map_err(|err| StorageError::io(StorageOp::Write, &path, err))
    }

    async fn remove(&self, location: &Location) -> StorageResult<()> {
        let path = self.path_of(location);
        let metadata = match fs::symlink_metadata(&path).await {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("event=storage_remove module=storage status=skipped reason=absent");
                return Ok(());
            }
            Err(err) => return Err(StorageError::io(StorageOp::Remove, &path, err)),
        };

        let result = if metadata.is_dir() {
            fs::remove_dir_all(&path).await
        } else {
            fs::remove_file(&path).await
        };
        match result {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::io(StorageOp::Remove, &path, err)),
        }
    }
}

fn epoch_ms(time: SystemTime) -> Option<i64> {
    time.duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|duration| i64::try_from(duration.as_millis()).ok())
}
