//! Notes explorer use-case service.
//!
//! # Responsibility
//! - Sequence multi-step mutations (create with duplicate check, rename via
//!   read/delete/write, confirmed delete) over the storage accessor.
//! - Keep navigation, the directory snapshot and the open note consistent
//!   after every mutation.
//!
//! # Invariants
//! - Every successful mutation is followed by a full refresh.
//! - Creates never touch storage when the name collides with a sibling.
//! - Deletes require a staged `PendingDeletion` and are irreversible.
//! - No open-note session may point at a deleted location.
//! - Rename is not atomic: a failure after the old file is removed and
//!   before the new one is written loses the note. Callers get the error.

use crate::config::NotesConfig;
use crate::model::entry::{
    DirectoryContent, DirectoryEntry, EntryKind, NoteFormat, PendingCreation, PendingDeletion,
};
use crate::model::location::{Location, NameError};
use crate::repo::settings_repo::SettingsStore;
use crate::repo::storage::{StorageAccessor, StorageError};
use crate::service::directory_cache::DirectoryCache;
use crate::service::navigator::Navigator;
use crate::service::note_session::{EditMode, NoteSession};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// User-level action named in failure messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplorerAction {
    ListDirectory,
    CreateFolder,
    CreateNote,
    DeleteFolder,
    DeleteNote,
    RenameNote,
    OpenNote,
    SaveNote,
    ReadSettings,
    WriteSettings,
}

impl ExplorerAction {
    /// Verb phrase used in user-visible messages.
    pub fn describe(self) -> &'static str {
        match self {
            Self::ListDirectory => "read directory contents of",
            Self::CreateFolder => "create folder",
            Self::CreateNote => "create note",
            Self::DeleteFolder => "delete folder",
            Self::DeleteNote => "delete note",
            Self::RenameNote => "rename note",
            Self::OpenNote => "open note",
            Self::SaveNote => "save note",
            Self::ReadSettings => "load settings from",
            Self::WriteSettings => "save settings to",
        }
    }

    fn delete(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Folder => Self::DeleteFolder,
            EntryKind::Note => Self::DeleteNote,
        }
    }
}

/// Errors from explorer operations.
#[derive(Debug)]
pub enum ExplorerError {
    /// Entry name is empty or not a single path segment.
    InvalidName(NameError),
    /// A sibling with this exact name already exists.
    DuplicateName { kind: EntryKind, name: String },
    /// Underlying storage call failed.
    Storage {
        action: ExplorerAction,
        target: String,
        source: StorageError,
    },
    /// Confirm was called with nothing staged.
    NoPendingAction,
    /// Operation needs an open note.
    NoOpenNote,
    /// Content edits are only accepted in editing mode.
    NotEditing,
}

impl ExplorerError {
    fn storage(action: ExplorerAction, target: impl Into<String>, source: StorageError) -> Self {
        Self::Storage {
            action,
            target: target.into(),
            source,
        }
    }

    /// Blocking acknowledgment text naming the attempted action.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidName(err) => format!("Invalid name: {err}."),
            Self::DuplicateName { kind, name } => {
                format!("A {kind} named \"{name}\" already exists.")
            }
            Self::Storage {
                action,
                target,
                source,
            } => format!("Failed to {} \"{target}\": {source}", action.describe()),
            Self::NoPendingAction => "There is nothing to confirm.".to_string(),
            Self::NoOpenNote => "No note is open.".to_string(),
            Self::NotEditing => "The note is not in edit mode.".to_string(),
        }
    }
}

impl Display for ExplorerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(err) => write!(f, "{err}"),
            Self::DuplicateName { kind, name } => write!(f, "duplicate {kind} name: `{name}`"),
            Self::Storage {
                action,
                target,
                source,
            } => write!(f, "{} `{target}` failed: {source}", action.describe()),
            Self::NoPendingAction => write!(f, "no pending action to confirm"),
            Self::NoOpenNote => write!(f, "no open note"),
            Self::NotEditing => write!(f, "open note is not in editing mode"),
        }
    }
}

impl Error for ExplorerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidName(err) => Some(err),
            Self::Storage { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<NameError> for ExplorerError {
    fn from(value: NameError) -> Self {
        Self::InvalidName(value)
    }
}

/// Result of a rename request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// Note now lives at the returned location.
    Renamed(Location),
    /// New name was blank or equal to the old one; nothing happened.
    Unchanged,
}

/// Notes explorer facade over one storage accessor.
pub struct Explorer<S: StorageAccessor> {
    config: NotesConfig,
    storage: S,
    navigator: Navigator,
    cache: DirectoryCache,
    session: Option<NoteSession>,
    pending_creation: Option<PendingCreation>,
    pending_deletion: Option<PendingDeletion>,
}

impl<S: StorageAccessor> Explorer<S> {
    /// Creates an explorer at the root without touching storage.
    pub fn new(config: NotesConfig, storage: S) -> Self {
        let cache = DirectoryCache::new(Location::root())
            .hide_root_file(config.settings_file_name.clone());
        Self {
            config,
            storage,
            navigator: Navigator::new(),
            cache,
            session: None,
            pending_creation: None,
            pending_deletion: None,
        }
    }

    /// Creates an explorer and lists the root, creating it if absent.
    pub async fn open(config: NotesConfig, storage: S) -> Result<Self, ExplorerError> {
        let mut explorer = Self::new(config, storage);
        explorer.list_root().await?;
        Ok(explorer)
    }

    pub fn config(&self) -> &NotesConfig {
        &self.config
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn current_location(&self) -> &Location {
        self.navigator.current()
    }

    pub fn is_at_root(&self) -> bool {
        self.navigator.is_at_root()
    }

    /// Latest snapshot of the current location.
    pub fn content(&self) -> &DirectoryContent {
        self.cache.content()
    }

    /// Settings key file repository over the same storage.
    pub fn settings(&self) -> Result<SettingsStore<'_, S>, ExplorerError> {
        SettingsStore::new(&self.storage, &self.config).map_err(Into::into)
    }

    /// Reads the API key, surfacing failures like other operations.
    pub async fn read_api_key(&self) -> Result<String, ExplorerError> {
        let settings = self.settings()?;
        settings.read_api_key().await.map_err(|source| {
            ExplorerError::storage(
                ExplorerAction::ReadSettings,
                self.config.settings_file_name.as_str(),
                source,
            )
        })
    }

    /// Replaces the API key.
    pub async fn write_api_key(&self, key: &str) -> Result<(), ExplorerError> {
        let settings = self.settings()?;
        settings.write_api_key(key).await.map_err(|source| {
            ExplorerError::storage(
                ExplorerAction::WriteSettings,
                self.config.settings_file_name.as_str(),
                source,
            )
        })
    }

    /// Rebuilds the snapshot of the current location.
    pub async fn refresh(&mut self) -> Result<&DirectoryContent, ExplorerError> {
        let location = self.navigator.current().clone();
        self.cache
            .refresh(&self.storage, &location)
            .await
            .map_err(|source| {
                ExplorerError::storage(ExplorerAction::ListDirectory, location.title(), source)
            })
    }

    /// Returns to the root and lists it.
    pub async fn list_root(&mut self) -> Result<&DirectoryContent, ExplorerError> {
        self.navigator.reset();
        self.refresh().await
    }

    /// Enters a child folder and lists it.
    ///
    /// Navigation is kept even when the refresh fails; the error is returned
    /// and the snapshot is the empty pair.
    pub async fn enter(&mut self, folder_name: &str) -> Result<&DirectoryContent, ExplorerError> {
        self.navigator.enter(folder_name)?;
        debug!(
            "event=navigate_enter module=explorer status=ok depth={}",
            self.navigator.current().depth()
        );
        self.refresh().await
    }

    /// Goes to the parent folder. Returns `false` at the root, where nothing
    /// changes and no refresh happens.
    pub async fn back(&mut self) -> Result<bool, ExplorerError> {
        if !self.navigator.back() {
            debug!("event=navigate_back module=explorer status=skipped reason=at_root");
            return Ok(false);
        }
        debug!(
            "event=navigate_back module=explorer status=ok depth={}",
            self.navigator.current().depth()
        );
        self.refresh().await?;
        Ok(true)
    }

    /// Creates a folder under the current location.
    pub async fn create_folder(&mut self, name: &str) -> Result<Location, ExplorerError> {
        let started_at = Instant::now();
        let name = name.trim();
        let location = self.visible_child(name)?;
        self.ensure_name_free(name, ExplorerAction::CreateFolder).await?;

        if let Err(source) = self.storage.ensure_folder(&location).await {
            log_failure("folder_create", started_at, &source);
            return Err(ExplorerError::storage(ExplorerAction::CreateFolder, name, source));
        }
        info!(
            "event=folder_create module=explorer status=ok depth={} duration_ms={}",
            location.depth(),
            started_at.elapsed().as_millis()
        );

        self.refresh().await?;
        Ok(location)
    }

    /// Creates an empty note under the current location and opens it.
    ///
    /// `name` gets `.{extension}` appended unless it already ends with it.
    /// `None` uses the configured default extension.
    pub async fn create_note(
        &mut self,
        name: &str,
        extension: Option<NoteFormat>,
    ) -> Result<Location, ExplorerError> {
        let started_at = Instant::now();
        let format = extension.unwrap_or(self.config.default_extension);
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(NameError::Empty.into());
        }
        let file_name = format.apply_to(trimmed);
        let location = self.visible_child(file_name.as_str())?;
        self.ensure_name_free(&file_name, ExplorerAction::CreateNote).await?;

        if let Err(source) = self.storage.write_text(&location, "").await {
            log_failure("note_create", started_at, &source);
            return Err(ExplorerError::storage(ExplorerAction::CreateNote, file_name, source));
        }
        info!(
            "event=note_create module=explorer status=ok format={} depth={} duration_ms={}",
            format.extension(),
            location.depth(),
            started_at.elapsed().as_millis()
        );

        self.session = Some(NoteSession::open(location.clone(), String::new()));
        self.refresh().await?;
        Ok(location)
    }

    /// Stages a creation awaiting confirmation, replacing any earlier one.
    pub fn stage_creation(&mut self, pending: PendingCreation) -> &PendingCreation {
        self.pending_creation.insert(pending)
    }

    pub fn pending_creation(&self) -> Option<&PendingCreation> {
        self.pending_creation.as_ref()
    }

    /// Drops the staged creation.
    pub fn cancel_creation(&mut self) -> Option<PendingCreation> {
        self.pending_creation.take()
    }

    /// Executes the staged creation. The intent is consumed either way.
    pub async fn confirm_creation(&mut self) -> Result<Location, ExplorerError> {
        let pending = self
            .pending_creation
            .take()
            .ok_or(ExplorerError::NoPendingAction)?;
        match pending.kind {
            EntryKind::Folder => self.create_folder(&pending.name).await,
            EntryKind::Note => self.create_note(&pending.name, pending.extension).await,
        }
    }

    /// Stages deletion of a direct child, replacing any earlier intent.
    pub fn request_deletion(&mut self, name: &str, kind: EntryKind) -> &PendingDeletion {
        self.pending_deletion.insert(PendingDeletion {
            name: name.to_string(),
            kind,
        })
    }

    pub fn pending_deletion(&self) -> Option<&PendingDeletion> {
        self.pending_deletion.as_ref()
    }

    /// Drops the staged deletion without touching storage.
    pub fn cancel_deletion(&mut self) -> Option<PendingDeletion> {
        self.pending_deletion.take()
    }

    /// Deletes the staged entry. The intent is consumed either way.
    ///
    /// Closes the open note when it is the deleted note or lies inside the
    /// deleted folder.
    pub async fn confirm_deletion(&mut self) -> Result<PendingDeletion, ExplorerError> {
        let pending = self
            .pending_deletion
            .take()
            .ok_or(ExplorerError::NoPendingAction)?;
        let started_at = Instant::now();
        let action = ExplorerAction::delete(pending.kind);
        let location = self.visible_child(pending.name.as_str())?;

        if let Err(source) = self.storage.remove(&location).await {
            log_failure("entry_delete", started_at, &source);
            return Err(ExplorerError::storage(action, pending.name, source));
        }
        info!(
            "event=entry_delete module=explorer status=ok kind={} depth={} duration_ms={}",
            pending.kind,
            location.depth(),
            started_at.elapsed().as_millis()
        );

        if self
            .session
            .as_ref()
            .is_some_and(|session| session.location().is_within(&location))
        {
            self.session = None;
        }
        self.refresh().await?;
        Ok(pending)
    }

    /// Renames a note in the current location via read, delete, write.
    ///
    /// Blank names and names equal to `old_name` are ignored. The open note
    /// follows the rename on success and stays on `old_name` on failure.
    pub async fn rename_note(
        &mut self,
        old_name: &str,
        new_name: &str,
    ) -> Result<RenameOutcome, ExplorerError> {
        let new_name = new_name.trim();
        if new_name.is_empty() || new_name == old_name {
            debug!("event=note_rename module=explorer status=skipped reason=unchanged");
            return Ok(RenameOutcome::Unchanged);
        }
        let started_at = Instant::now();
        let old_location = self.visible_child(old_name)?;
        let new_location = self.visible_child(new_name)?;
        self.ensure_name_free(new_name, ExplorerAction::RenameNote).await?;

        match self.move_note(&old_location, &new_location).await {
            Ok(content) => {
                info!(
                    "event=note_rename module=explorer status=ok depth={} duration_ms={}",
                    new_location.depth(),
                    started_at.elapsed().as_millis()
                );
                if let Some(session) = self
                    .session
                    .as_mut()
                    .filter(|session| *session.location() == old_location)
                {
                    session.retarget(new_location.clone());
                    session.set_content(content);
                }
                self.refresh().await?;
                Ok(RenameOutcome::Renamed(new_location))
            }
            Err(source) => {
                log_failure("note_rename", started_at, &source);
                // Storage may have changed before the failing step.
                if let Err(refresh_err) = self.refresh().await {
                    warn!(
                        "event=note_rename module=explorer status=error step=refresh error={}",
                        refresh_err
                    );
                }
                Err(ExplorerError::storage(ExplorerAction::RenameNote, old_name, source))
            }
        }
    }

    /// Overwrites a note in the current location with `text` and refreshes.
    pub async fn save_note_content(&mut self, name: &str, text: &str) -> Result<(), ExplorerError> {
        let location = self.visible_child(name)?;
        self.storage
            .write_text(&location, text)
            .await
            .map_err(|source| ExplorerError::storage(ExplorerAction::SaveNote, name, source))?;
        debug!("event=note_save module=explorer status=ok bytes={}", text.len());
        if let Some(session) = self
            .session
            .as_mut()
            .filter(|session| *session.location() == location)
        {
            session.set_content(text.to_string());
        }
        self.refresh().await?;
        Ok(())
    }

    /// Loads a note from the current location into a viewing session.
    pub async fn open_note(&mut self, name: &str) -> Result<&NoteSession, ExplorerError> {
        let location = self.visible_child(name)?;
        let content = self
            .storage
            .read_text(&location)
            .await
            .map_err(|source| ExplorerError::storage(ExplorerAction::OpenNote, name, source))?;
        Ok(&*self.session.insert(NoteSession::open(location, content)))
    }

    pub fn note_session(&self) -> Option<&NoteSession> {
        self.session.as_ref()
    }

    /// Switches the open note between viewing and editing.
    pub fn toggle_edit_mode(&mut self) -> Result<EditMode, ExplorerError> {
        self.session
            .as_mut()
            .map(NoteSession::toggle_mode)
            .ok_or(ExplorerError::NoOpenNote)
    }

    /// Writes an edit of the open note through to storage and refreshes.
    pub async fn edit_open_note(&mut self, text: &str) -> Result<(), ExplorerError> {
        let session = self.session.as_mut().ok_or(ExplorerError::NoOpenNote)?;
        if !session.is_editing() {
            return Err(ExplorerError::NotEditing);
        }
        self.storage
            .write_text(session.location(), text)
            .await
            .map_err(|source| {
                ExplorerError::storage(ExplorerAction::SaveNote, session.name(), source)
            })?;
        session.set_content(text.to_string());
        self.refresh().await?;
        Ok(())
    }

    /// Closes the open note, if any.
    pub fn close_note(&mut self) -> Option<NoteSession> {
        self.session.take()
    }

    /// Resolves a direct child of the current location, rejecting names
    /// hidden from the listing.
    fn visible_child(&self, name: &str) -> Result<Location, ExplorerError> {
        let current = self.navigator.current();
        if current.is_root() && name == self.config.settings_file_name {
            return Err(NameError::Reserved(name.to_string()).into());
        }
        Ok(current.child(name)?)
    }

    async fn ensure_name_free(
        &self,
        name: &str,
        action: ExplorerAction,
    ) -> Result<(), ExplorerError> {
        let current = self.navigator.current();
        let siblings = self
            .list_siblings(current)
            .await
            .map_err(|source| ExplorerError::storage(action, name, source))?;
        let content = DirectoryContent::from_entries(current.clone(), siblings);
        if let Some(existing) = content.find(name) {
            info!(
                "event=name_check module=explorer status=error error_code=duplicate kind={}",
                existing.kind
            );
            return Err(ExplorerError::DuplicateName {
                kind: existing.kind,
                name: name.to_string(),
            });
        }
        Ok(())
    }

    async fn list_siblings(&self, parent: &Location) -> Result<Vec<DirectoryEntry>, StorageError> {
        self.storage.ensure_folder(parent).await?;
        self.storage.list(parent).await
    }

    async fn move_note(&self, from: &Location, to: &Location) -> Result<String, StorageError> {
        let content = self.storage.read_text(from).await?;
        self.storage.remove(from).await?;
        if let Err(err) = self.storage.write_text(to, &content).await {
            error!(
                "event=note_rename module=explorer status=error step=write content_lost=true bytes={}",
                content.len()
            );
            return Err(err);
        }
        Ok(content)
    }
}

fn log_failure(event: &str, started_at: Instant, err: &StorageError) {
    error!(
        "event={} module=explorer status=error duration_ms={} error={}",
        event,
        started_at.elapsed().as_millis(),
        err
    );
}
