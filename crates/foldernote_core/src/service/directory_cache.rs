//! In-memory projection of the current folder's children.
//!
//! # Responsibility
//! - Rebuild `DirectoryContent` for one location from storage on demand.
//! - Drop refresh results that belong to a superseded location.
//!
//! # Invariants
//! - Content is replaced wholesale, never patched.
//! - A failed refresh leaves the empty pair for the target location.
//! - Only the most recently started refresh may apply its result.

use crate::model::entry::{DirectoryContent, DirectoryEntry, EntryKind};
use crate::model::location::Location;
use crate::repo::storage::{StorageAccessor, StorageError, StorageResult};
use log::{error, info};
use std::time::Instant;

/// Handle for one in-flight refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTicket {
    generation: u64,
    location: Location,
}

/// Result of completing a refresh ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Snapshot replaced with the listed entries.
    Applied,
    /// A newer refresh was started; result discarded.
    Stale,
}

/// Directory content cache for the current location.
#[derive(Debug, Clone)]
pub struct DirectoryCache {
    content: DirectoryContent,
    generation: u64,
    target: Location,
    hidden_root_files: Vec<String>,
}

impl DirectoryCache {
    /// Creates an empty cache targeting `location`.
    pub fn new(location: Location) -> Self {
        Self {
            content: DirectoryContent::empty(location.clone()),
            generation: 0,
            target: location,
            hidden_root_files: Vec::new(),
        }
    }

    /// Hides a flat file at the root from listings.
    pub fn hide_root_file(mut self, name: impl Into<String>) -> Self {
        self.hidden_root_files.push(name.into());
        self
    }

    pub fn content(&self) -> &DirectoryContent {
        &self.content
    }

    /// Starts a refresh for `location`, superseding any in-flight one.
    pub fn begin(&mut self, location: Location) -> RefreshTicket {
        self.generation += 1;
        self.target = location.clone();
        RefreshTicket {
            generation: self.generation,
            location,
        }
    }

    /// Applies a listing result if `ticket` is still current.
    ///
    /// # Errors
    /// - Returns the storage error of a current ticket after resetting the
    ///   snapshot to the empty pair. Errors of stale tickets are dropped.
    pub fn complete(
        &mut self,
        ticket: RefreshTicket,
        result: StorageResult<Vec<DirectoryEntry>>,
    ) -> Result<RefreshOutcome, StorageError> {
        if ticket.generation != self.generation || ticket.location != self.target {
            info!(
                "event=directory_refresh module=cache status=skipped reason=stale depth={}",
                ticket.location.depth()
            );
            return Ok(RefreshOutcome::Stale);
        }

        match result {
            Ok(entries) => {
                let visible = entries
                    .into_iter()
                    .filter(|entry| !self.is_hidden(&ticket.location, entry))
                    .collect();
                self.content = DirectoryContent::from_entries(ticket.location, visible);
                Ok(RefreshOutcome::Applied)
            }
            Err(err) => {
                self.content = DirectoryContent::empty(ticket.location);
                Err(err)
            }
        }
    }

    /// Ensures `location` exists, lists it and replaces the snapshot.
    pub async fn refresh<S>(
        &mut self,
        storage: &S,
        location: &Location,
    ) -> Result<&DirectoryContent, StorageError>
    where
        S: StorageAccessor + ?Sized,
    {
        let started_at = Instant::now();
        let ticket = self.begin(location.clone());
        let result = load(storage, location).await;
        match self.complete(ticket, result) {
            Ok(_) => {
                info!(
                    "event=directory_refresh module=cache status=ok depth={} folders={} files={} duration_ms={}",
                    location.depth(),
                    self.content.folders.len(),
                    self.content.files.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(&self.content)
            }
            Err(err) => {
                error!(
                    "event=directory_refresh module=cache status=error depth={} not_found={} duration_ms={} error={}",
                    location.depth(),
                    err.is_not_found(),
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn is_hidden(&self, location: &Location, entry: &DirectoryEntry) -> bool {
        location.is_root()
            && entry.kind == EntryKind::Note
            && self.hidden_root_files.iter().any(|name| *name == entry.name)
    }
}

async fn load<S>(storage: &S, location: &Location) -> StorageResult<Vec<DirectoryEntry>>
where
    S: StorageAccessor + ?Sized,
{
    storage.ensure_folder(location).await?;
    storage.list(location).await
}
