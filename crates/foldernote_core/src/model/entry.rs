//! Directory entry and listing snapshot models.
//!
//! # Responsibility
//! - Tag every child of a location as `Folder` or `Note` once, at
//!   enumeration time.
//! - Provide presentation-ready ordering and filtering over one snapshot.
//!
//! # Invariants
//! - `DirectoryContent` describes exactly one location and is replaced
//!   wholesale, never patched.
//! - Note format is derived from the trailing dot-segment of the name.

use crate::model::location::Location;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// Entry kind decided at enumeration time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Folder,
    Note,
}

impl EntryKind {
    /// Stable lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::Note => "note",
        }
    }

    /// Parses a label produced by `as_str` (case-insensitive). `file` is
    /// accepted as an alias of `note`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "folder" => Some(Self::Folder),
            "note" | "file" => Some(Self::Note),
            _ => None,
        }
    }
}

impl Display for EntryKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renderer/editor family for a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteFormat {
    Markdown,
    Html,
}

impl NoteFormat {
    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Html => "html",
        }
    }

    /// Parses a bare extension (`md`, `html`), case-insensitive.
    pub fn from_extension(value: &str) -> Option<Self> {
        match value.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "md" => Some(Self::Markdown),
            "html" => Some(Self::Html),
            _ => None,
        }
    }

    /// Derives the format from a file name's trailing dot-segment.
    pub fn from_name(name: &str) -> Option<Self> {
        let (_, extension) = name.rsplit_once('.')?;
        Self::from_extension(extension)
    }

    /// Returns `name` with `.{extension}` appended unless already present.
    pub fn apply_to(self, name: &str) -> String {
        let suffix = format!(".{}", self.extension());
        if name.ends_with(&suffix) {
            name.to_string()
        } else {
            format!("{name}{suffix}")
        }
    }
}

/// Named child of one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: String,
    pub kind: EntryKind,
    /// Epoch ms modification time, when storage reports one.
    pub modified_at: Option<i64>,
}

impl DirectoryEntry {
    pub fn folder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Folder,
            modified_at: None,
        }
    }

    pub fn note(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Note,
            modified_at: None,
        }
    }

    /// Note format, `None` for folders and unknown suffixes.
    pub fn format(&self) -> Option<NoteFormat> {
        match self.kind {
            EntryKind::Folder => None,
            EntryKind::Note => NoteFormat::from_name(&self.name),
        }
    }

    /// Name without its trailing extension. Folders and dot-less names are
    /// returned as-is.
    pub fn stem(&self) -> &str {
        if self.kind == EntryKind::Folder {
            return &self.name;
        }
        match self.name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.name,
        }
    }
}

/// Listing order toggled by the user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn toggle(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ascending => "A-Z",
            Self::Descending => "Z-A",
        }
    }

    /// Parses `asc|desc` or the `A-Z|Z-A` labels.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" | "a-z" => Some(Self::Ascending),
            "desc" | "descending" | "z-a" => Some(Self::Descending),
            _ => None,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Folders and notes directly under one location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryContent {
    pub location: Location,
    pub folders: Vec<DirectoryEntry>,
    pub files: Vec<DirectoryEntry>,
}

impl DirectoryContent {
    /// The empty pair for `location`.
    pub fn empty(location: Location) -> Self {
        Self {
            location,
            folders: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Partitions raw entries by kind.
    pub fn from_entries(location: Location, entries: Vec<DirectoryEntry>) -> Self {
        let (folders, files) = entries
            .into_iter()
            .partition(|entry| entry.kind == EntryKind::Folder);
        Self {
            location,
            folders,
            files,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.files.is_empty()
    }

    /// Finds a sibling with exactly `name`, in either partition.
    pub fn find(&self, name: &str) -> Option<&DirectoryEntry> {
        self.folders
            .iter()
            .chain(self.files.iter())
            .find(|entry| entry.name == name)
    }

    pub fn folder_names(&self) -> Vec<&str> {
        self.folders.iter().map(|entry| entry.name.as_str()).collect()
    }

    pub fn file_names(&self) -> Vec<&str> {
        self.files.iter().map(|entry| entry.name.as_str()).collect()
    }

    pub fn sorted_folders(&self, order: SortOrder) -> Vec<&DirectoryEntry> {
        sorted(self.folders.iter(), order)
    }

    pub fn sorted_files(&self, order: SortOrder) -> Vec<&DirectoryEntry> {
        sorted(self.files.iter(), order)
    }

    /// Folders whose name contains `query` case-insensitively, sorted.
    /// A blank query keeps every folder.
    pub fn filter_folders(&self, query: &str, order: SortOrder) -> Vec<&DirectoryEntry> {
        let needle = query.trim().to_lowercase();
        sorted(
            self.folders
                .iter()
                .filter(|entry| needle.is_empty() || entry.name.to_lowercase().contains(&needle)),
            order,
        )
    }
}

fn sorted<'a>(
    entries: impl Iterator<Item = &'a DirectoryEntry>,
    order: SortOrder,
) -> Vec<&'a DirectoryEntry> {
    let mut items = entries.collect::<Vec<_>>();
    items.sort_by(|a, b| order.apply(compare_names(&a.name, &b.name)));
    items
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Deletion intent awaiting user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeletion {
    pub name: String,
    pub kind: EntryKind,
}

/// Creation intent awaiting user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCreation {
    pub name: String,
    pub kind: EntryKind,
    /// Only meaningful for notes; `None` falls back to the configured default.
    pub extension: Option<NoteFormat>,
}

#[cfg(test)]
mod tests {
    use super::{DirectoryContent, DirectoryEntry, NoteFormat, SortOrder};
    use crate::model::location::Location;

    fn content() -> DirectoryContent {
        DirectoryContent::from_entries(
            Location::root(),
            vec![
                DirectoryEntry::folder("B"),
                DirectoryEntry::note("b.md"),
                DirectoryEntry::folder("A"),
                DirectoryEntry::note("a.html"),
            ],
        )
    }

    #[test]
    fn sort_toggle_reverses_folder_order() {
        let content = content();
        let names = |order| {
            content
                .sorted_folders(order)
                .into_iter()
                .map(|entry| entry.name.clone())
                .collect::<Vec<_>>()
        };
        let order = SortOrder::default();
        assert_eq!(names(order), vec!["A", "B"]);
        assert_eq!(names(order.toggle()), vec!["B", "A"]);
    }

    #[test]
    fn sorting_ignores_case_first() {
        let content = DirectoryContent::from_entries(
            Location::root(),
            vec![
                DirectoryEntry::folder("beta"),
                DirectoryEntry::folder("Alpha"),
                DirectoryEntry::folder("alpha"),
            ],
        );
        let names = content
            .sorted_folders(SortOrder::Ascending)
            .into_iter()
            .map(|entry| entry.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Alpha", "alpha", "beta"]);
    }

    #[test]
    fn filter_folders_is_case_insensitive() {
        let content = DirectoryContent::from_entries(
            Location::root(),
            vec![
                DirectoryEntry::folder("Work"),
                DirectoryEntry::folder("homework"),
                DirectoryEntry::folder("Travel"),
            ],
        );
        let names = content
            .filter_folders("WORK", SortOrder::Ascending)
            .into_iter()
            .map(|entry| entry.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["homework", "Work"]);
        assert_eq!(content.filter_folders("  ", SortOrder::Ascending).len(), 3);
    }

    #[test]
    fn note_format_and_stem() {
        let note = DirectoryEntry::note("plan.v2.md");
        assert_eq!(note.format(), Some(NoteFormat::Markdown));
        assert_eq!(note.stem(), "plan.v2");
        assert_eq!(DirectoryEntry::note("page.HTML").format(), Some(NoteFormat::Html));
        assert_eq!(DirectoryEntry::note("todo.txt").format(), None);
        assert_eq!(DirectoryEntry::folder("a.md").format(), None);
        assert_eq!(NoteFormat::Markdown.apply_to("idea"), "idea.md");
        assert_eq!(NoteFormat::Html.apply_to("page.html"), "page.html");
    }
}
