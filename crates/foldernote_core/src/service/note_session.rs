//! Editing session for the single open note.
//!
//! `Closed` is the absence of a session. An open session moves between
//! `Viewing` and `Editing`; toggling never persists, edits write through.

use crate::model::entry::NoteFormat;
use crate::model::location::Location;

/// Mode of an open note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditMode {
    #[default]
    Viewing,
    Editing,
}

/// The open note and its loaded content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSession {
    location: Location,
    content: String,
    mode: EditMode,
}

impl NoteSession {
    /// Opens a session in `Viewing` mode.
    pub fn open(location: Location, content: String) -> Self {
        Self {
            location,
            content,
            mode: EditMode::Viewing,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// File name of the open note.
    pub fn name(&self) -> &str {
        self.location.name().unwrap_or_default()
    }

    /// Renderer family, `None` means plain text editing.
    pub fn format(&self) -> Option<NoteFormat> {
        NoteFormat::from_name(self.name())
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == EditMode::Editing
    }

    /// Switches between viewing and editing; returns the new mode.
    pub fn toggle_mode(&mut self) -> EditMode {
        self.mode = match self.mode {
            EditMode::Viewing => EditMode::Editing,
            EditMode::Editing => EditMode::Viewing,
        };
        self.mode
    }

    pub(crate) fn set_content(&mut self, content: String) {
        self.content = content;
    }

    pub(crate) fn retarget(&mut self, location: Location) {
        self.location = location;
    }
}
