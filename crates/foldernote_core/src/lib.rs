//! Core logic for the Foldernote local notes store.
//! This crate owns the folder-tree model and every storage invariant.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, NotesConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::entry::{
    DirectoryContent, DirectoryEntry, EntryKind, NoteFormat, PendingCreation, PendingDeletion,
    SortOrder,
};
pub use model::location::{Location, NameError};
pub use repo::settings_repo::SettingsStore;
pub use repo::storage::{
    EntryStatus, FsStorage, StorageAccessor, StorageError, StorageOp, StorageResult,
};
pub use service::directory_cache::{DirectoryCache, RefreshOutcome, RefreshTicket};
pub use service::explorer_service::{Explorer, ExplorerAction, ExplorerError, RenameOutcome};
pub use service::navigator::Navigator;
pub use service::note_session::{EditMode, NoteSession};

/// Macro for implementing [`StorageAccessor`] outside this crate.
pub use async_trait::async_trait;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
