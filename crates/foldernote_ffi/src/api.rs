//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose explorer use cases (navigate, create, delete, rename, edit) to Dart via FRB.
//! - Translate core errors into user-visible envelope messages.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One explorer instance per process; `explorer_init` replaces it.
//! - Core futures run to completion on a private current-thread runtime.

use foldernote_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, EntryKind, Explorer,
    ExplorerError, FsStorage, NoteFormat, NotesConfig, RenameOutcome, SortOrder,
};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::runtime::{Builder, Runtime};

static RUNTIME: OnceCell<Runtime> = OnceCell::new();
static EXPLORER: Mutex<Option<Explorer<FsStorage>>> = Mutex::new(None);

const NOT_INITIALIZED: &str = "Notes explorer is not initialized.";

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Listing envelope for the current location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Human-readable response message for UI.
    pub message: String,
    /// Title of the current location (`My Notes` at root).
    pub title: String,
    /// Whether the current location is the notes root.
    pub is_root: bool,
    /// Folder names in display order.
    pub folders: Vec<String>,
    /// Note file names in display order.
    pub files: Vec<String>,
}

impl ExplorerResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            title: String::new(),
            is_root: true,
            folders: Vec::new(),
            files: Vec::new(),
        }
    }
}

/// Note content envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteResponse {
    pub ok: bool,
    pub message: String,
    /// File name of the note, extension included.
    pub name: String,
    pub content: String,
    /// `md`, `html`, or empty for plain text.
    pub format: String,
}

impl NoteResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            name: String::new(),
            content: String::new(),
            format: String::new(),
        }
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Settings key envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyResponse {
    pub ok: bool,
    pub message: String,
    /// Stored key, empty when none was saved.
    pub api_key: String,
}

/// Opens the notes store under `documents_dir` and lists its root.
///
/// # FFI contract
/// - Sync call; creates the notes root folder when missing.
/// - Replaces any previously initialized explorer.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn explorer_init(documents_dir: String) -> ExplorerResponse {
    let config = match NotesConfig::new(documents_dir.trim()) {
        Ok(config) => config,
        Err(err) => return ExplorerResponse::failure(format!("Invalid notes location: {err}")),
    };
    let storage = FsStorage::new(&config);
    let opened = match block_on(Explorer::open(config, storage)) {
        Ok(Ok(explorer)) => explorer,
        Ok(Err(err)) => return ExplorerResponse::failure(err.user_message()),
        Err(message) => return ExplorerResponse::failure(message),
    };
    info!("event=ffi_explorer_init module=ffi status=ok");
    let response = listing_response(&opened, SortOrder::default(), "", "Notes loaded.");
    *lock_explorer() = Some(opened);
    response
}

/// Returns to the notes root and re-lists it.
#[flutter_rust_bridge::frb(sync)]
pub fn explorer_list_root() -> ExplorerResponse {
    let mut guard = lock_explorer();
    let Some(explorer) = guard.as_mut() else {
        return ExplorerResponse::failure(NOT_INITIALIZED);
    };
    let outcome = block_on(async { explorer.list_root().await.map(|_| "Notes loaded.") });
    listing_outcome(explorer, outcome)
}

/// Descends into `folder_name` under the current location.
///
/// # FFI contract
/// - On a listing failure the location still changes and the listing is empty.
#[flutter_rust_bridge::frb(sync)]
pub fn explorer_enter(folder_name: String) -> ExplorerResponse {
    let mut guard = lock_explorer();
    let Some(explorer) = guard.as_mut() else {
        return ExplorerResponse::failure(NOT_INITIALIZED);
    };
    let outcome = block_on(async {
        explorer
            .enter(folder_name.as_str())
            .await
            .map(|_| "Folder opened.")
    });
    listing_outcome(explorer, outcome)
}

/// Ascends one level; no-op at the notes root.
#[flutter_rust_bridge::frb(sync)]
pub fn explorer_back() -> ExplorerResponse {
    let mut guard = lock_explorer();
    let Some(explorer) = guard.as_mut() else {
        return ExplorerResponse::failure(NOT_INITIALIZED);
    };
    let outcome = block_on(async {
        explorer.back().await.map(|moved| {
            if moved {
                "Moved up."
            } else {
                "Already at notes root."
            }
        })
    });
    listing_outcome(explorer, outcome)
}

/// Presents the cached listing without touching storage.
///
/// Input semantics:
/// - `sort`: `asc|desc` (case-insensitive); unknown values sort ascending.
/// - `folder_query`: case-insensitive substring filter on folder names.
#[flutter_rust_bridge::frb(sync)]
pub fn explorer_listing(sort: String, folder_query: String) -> ExplorerResponse {
    let order = SortOrder::parse(sort.as_str()).unwrap_or_default();
    match lock_explorer().as_ref() {
        Some(explorer) => listing_response(explorer, order, folder_query.as_str(), ""),
        None => ExplorerResponse::failure(NOT_INITIALIZED),
    }
}

/// Creates a folder in the current location.
#[flutter_rust_bridge::frb(sync)]
pub fn explorer_create_folder(name: String) -> ExplorerResponse {
    let mut guard = lock_explorer();
    let Some(explorer) = guard.as_mut() else {
        return ExplorerResponse::failure(NOT_INITIALIZED);
    };
    let outcome = block_on(async {
        explorer
            .create_folder(name.as_str())
            .await
            .map(|_| "Folder created.")
    });
    listing_outcome(explorer, outcome)
}

/// Creates an empty note in the current location.
///
/// Input semantics:
/// - `extension`: `md|html`; `None` or empty uses the configured default.
#[flutter_rust_bridge::frb(sync)]
pub fn explorer_create_note(name: String, extension: Option<String>) -> ExplorerResponse {
    let format = match extension.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match NoteFormat::from_extension(raw) {
            Some(format) => Some(format),
            None => {
                return ExplorerResponse::failure(format!("Unsupported note format \"{raw}\"."));
            }
        },
    };
    let mut guard = lock_explorer();
    let Some(explorer) = guard.as_mut() else {
        return ExplorerResponse::failure(NOT_INITIALIZED);
    };
    let outcome = block_on(async {
        explorer
            .create_note(name.as_str(), format)
            .await
            .map(|_| "Note created.")
    });
    listing_outcome(explorer, outcome)
}

/// Stages deletion of `name`; nothing is removed until confirmed.
///
/// Input semantics:
/// - `kind`: `folder|note` (`file` accepted as an alias of `note`).
#[flutter_rust_bridge::frb(sync)]
pub fn explorer_request_delete(name: String, kind: String) -> ActionResponse {
    let Some(entry_kind) = EntryKind::parse(kind.as_str()) else {
        return ActionResponse::failure(format!("Unknown entry kind \"{kind}\"."));
    };
    match lock_explorer().as_mut() {
        Some(explorer) => {
            let pending = explorer.request_deletion(name.as_str(), entry_kind);
            ActionResponse::success(format!(
                "Delete {} \"{}\"? This cannot be undone.",
                pending.kind, pending.name
            ))
        }
        None => ActionResponse::failure(NOT_INITIALIZED),
    }
}

/// Removes the staged entry and re-lists the current location.
#[flutter_rust_bridge::frb(sync)]
pub fn explorer_confirm_delete() -> ExplorerResponse {
    let mut guard = lock_explorer();
    let Some(explorer) = guard.as_mut() else {
        return ExplorerResponse::failure(NOT_INITIALIZED);
    };
    let outcome = block_on(async { explorer.confirm_deletion().await.map(|_| "Deleted.") });
    listing_outcome(explorer, outcome)
}

/// Drops the staged deletion, if any.
#[flutter_rust_bridge::frb(sync)]
pub fn explorer_cancel_delete() -> ActionResponse {
    match lock_explorer().as_mut() {
        Some(explorer) => match explorer.cancel_deletion() {
            Some(_) => ActionResponse::success("Deletion cancelled."),
            None => ActionResponse::success("Nothing to cancel."),
        },
        None => ActionResponse::failure(NOT_INITIALIZED),
    }
}

/// Renames a note in the current location.
///
/// # FFI contract
/// - Blank or unchanged names succeed without touching storage.
/// - The listing is reported whether or not the rename succeeded.
#[flutter_rust_bridge::frb(sync)]
pub fn explorer_rename_note(old_name: String, new_name: String) -> ExplorerResponse {
    let mut guard = lock_explorer();
    let Some(explorer) = guard.as_mut() else {
        return ExplorerResponse::failure(NOT_INITIALIZED);
    };
    let outcome = block_on(async {
        explorer
            .rename_note(old_name.as_str(), new_name.as_str())
            .await
            .map(|outcome| match outcome {
                RenameOutcome::Renamed(_) => "Note renamed.",
                RenameOutcome::Unchanged => "Name unchanged.",
            })
    });
    listing_outcome(explorer, outcome)
}

/// Loads a note from the current location.
#[flutter_rust_bridge::frb(sync)]
pub fn explorer_open_note(name: String) -> NoteResponse {
    let mut guard = lock_explorer();
    let Some(explorer) = guard.as_mut() else {
        return NoteResponse::failure(NOT_INITIALIZED);
    };
    match block_on(explorer.open_note(name.as_str())) {
        Ok(Ok(session)) => NoteResponse {
            ok: true,
            message: String::new(),
            name: session.name().to_string(),
            content: session.content().to_string(),
            format: session
                .format()
                .map(NoteFormat::extension)
                .unwrap_or_default()
                .to_string(),
        },
        Ok(Err(err)) => NoteResponse::failure(err.user_message()),
        Err(message) => NoteResponse::failure(message),
    }
}

/// Overwrites a note in the current location with `content`.
#[flutter_rust_bridge::frb(sync)]
pub fn explorer_save_note(name: String, content: String) -> ActionResponse {
    let mut guard = lock_explorer();
    let Some(explorer) = guard.as_mut() else {
        return ActionResponse::failure(NOT_INITIALIZED);
    };
    match block_on(explorer.save_note_content(name.as_str(), content.as_str())) {
        Ok(Ok(())) => ActionResponse::success("Note saved."),
        Ok(Err(err)) => ActionResponse::failure(err.user_message()),
        Err(message) => ActionResponse::failure(message),
    }
}

/// Reads the stored API key; an absent key file yields an empty key.
#[flutter_rust_bridge::frb(sync)]
pub fn settings_read_api_key() -> ApiKeyResponse {
    let guard = lock_explorer();
    let outcome = match guard.as_ref() {
        Some(explorer) => match block_on(explorer.read_api_key()) {
            Ok(Ok(api_key)) => Ok(api_key),
            Ok(Err(err)) => Err(err.user_message()),
            Err(message) => Err(message),
        },
        None => Err(NOT_INITIALIZED.to_string()),
    };
    match outcome {
        Ok(api_key) => ApiKeyResponse {
            ok: true,
            message: String::new(),
            api_key,
        },
        Err(message) => ApiKeyResponse {
            ok: false,
            message,
            api_key: String::new(),
        },
    }
}

/// Stores the API key in the settings key file.
#[flutter_rust_bridge::frb(sync)]
pub fn settings_write_api_key(api_key: String) -> ActionResponse {
    let guard = lock_explorer();
    let Some(explorer) = guard.as_ref() else {
        return ActionResponse::failure(NOT_INITIALIZED);
    };
    match block_on(explorer.write_api_key(api_key.as_str())) {
        Ok(Ok(())) => ActionResponse::success("API key saved."),
        Ok(Err(err)) => ActionResponse::failure(err.user_message()),
        Err(message) => ActionResponse::failure(message),
    }
}

fn runtime() -> Result<&'static Runtime, String> {
    RUNTIME
        .get_or_try_init(|| Builder::new_current_thread().build())
        .map_err(|err| {
            error!("event=ffi_runtime_init module=ffi status=error error={err}");
            format!("Async runtime unavailable: {err}")
        })
}

fn block_on<F: Future>(future: F) -> Result<F::Output, String> {
    Ok(runtime()?.block_on(future))
}

fn lock_explorer() -> MutexGuard<'static, Option<Explorer<FsStorage>>> {
    EXPLORER.lock().unwrap_or_else(PoisonError::into_inner)
}

fn listing_outcome(
    explorer: &Explorer<FsStorage>,
    outcome: Result<Result<&'static str, ExplorerError>, String>,
) -> ExplorerResponse {
    let (ok, message) = match outcome {
        Ok(Ok(message)) => (true, message.to_string()),
        Ok(Err(err)) => (false, err.user_message()),
        Err(message) => (false, message),
    };
    let mut response = listing_response(explorer, SortOrder::default(), "", message);
    response.ok = ok;
    response
}

fn listing_response(
    explorer: &Explorer<FsStorage>,
    order: SortOrder,
    folder_query: &str,
    message: impl Into<String>,
) -> ExplorerResponse {
    let content = explorer.content();
    let location = explorer.current_location();
    ExplorerResponse {
        ok: true,
        message: message.into(),
        title: location.title().to_string(),
        is_root: location.is_root(),
        folders: content
            .filter_folders(folder_query, order)
            .into_iter()
            .map(|entry| entry.name.clone())
            .collect(),
        files: content
            .sorted_files(order)
            .into_iter()
            .map(|entry| entry.name.clone())
            .collect(),
    }
}
