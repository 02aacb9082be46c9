//! Location model for the notes folder hierarchy.
//!
//! # Responsibility
//! - Compose and decompose positions in the tree from symbolic names.
//! - Validate child names before they reach storage.
//!
//! # Invariants
//! - A `Location` is a segment sequence relative to the fixed notes root.
//! - Every non-root location has exactly one parent: itself minus the last
//!   segment.
//! - Two locations are equal iff they resolve to the same absolute path under
//!   one root, which is segment equality.
//! - No I/O happens here.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Header shown for the root location.
pub const ROOT_TITLE: &str = "My Notes";

static SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[/\\]").expect("valid separator regex"));
static CONTROL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x00-\x1f\x7f]").expect("valid control char regex"));

/// Errors for illegal entry names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// Name is empty.
    Empty,
    /// Name contains `/` or `\`.
    ContainsSeparator(String),
    /// Name is `.` or `..`.
    Reserved(String),
    /// Name contains a control character.
    ControlCharacter(String),
}

impl Display for NameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "name must not be empty"),
            Self::ContainsSeparator(name) => {
                write!(f, "name must not contain a path separator: `{name}`")
            }
            Self::Reserved(name) => write!(f, "name is reserved: `{name}`"),
            Self::ControlCharacter(name) => {
                write!(f, "name must not contain control characters: `{name:?}`")
            }
        }
    }
}

impl Error for NameError {}

/// Position in the notes hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    segments: Vec<String>,
}

impl Location {
    /// Returns the fixed notes root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Builds a location from already-validated segments.
    ///
    /// # Errors
    /// - Returns the first `NameError` found in `segments`.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, NameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut location = Self::root();
        for segment in segments {
            location = location.child(segment)?;
        }
        Ok(location)
    }

    /// Returns the location of `name` directly under `self`.
    ///
    /// # Errors
    /// - `NameError` when `name` is empty or not a single path segment.
    pub fn child(&self, name: impl Into<String>) -> Result<Self, NameError> {
        let name = name.into();
        validate_name(&name)?;
        let mut segments = self.segments.clone();
        segments.push(name);
        Ok(Self { segments })
    }

    /// Returns the parent location, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            segments: rest.to_vec(),
        })
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments below the root.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Last segment, `None` at the root.
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Header label for this location.
    pub fn title(&self) -> &str {
        self.name().unwrap_or(ROOT_TITLE)
    }

    /// Returns whether `self` equals `ancestor` or lies below it.
    pub fn is_within(&self, ancestor: &Location) -> bool {
        self.segments.starts_with(&ancestor.segments)
    }

    /// Resolves this location to an absolute path under `root`.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        path.extend(self.segments.iter());
        path
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}

/// Validates one entry name as a single path segment.
pub fn validate_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::Empty);
    }
    if name == "." || name == ".." {
        return Err(NameError::Reserved(name.to_string()));
    }
    if SEPARATOR_RE.is_match(name) {
        return Err(NameError::ContainsSeparator(name.to_string()));
    }
    if CONTROL_RE.is_match(name) {
        return Err(NameError::ControlCharacter(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Location, NameError, ROOT_TITLE};
    use std::path::Path;

    #[test]
    fn parent_of_child_is_original() {
        let root = Location::root();
        let sub = root.child("sub").unwrap();
        assert_eq!(sub.parent(), Some(root.clone()));
        assert_eq!(root.parent(), None);
    }

    #[test]
    fn child_rejects_separators_and_reserved_names() {
        let root = Location::root();
        assert_eq!(root.child(""), Err(NameError::Empty));
        assert!(matches!(
            root.child("a/b"),
            Err(NameError::ContainsSeparator(_))
        ));
        assert!(matches!(
            root.child("a\\b"),
            Err(NameError::ContainsSeparator(_))
        ));
        assert!(matches!(root.child(".."), Err(NameError::Reserved(_))));
        assert!(matches!(
            root.child("bad\nname"),
            Err(NameError::ControlCharacter(_))
        ));
    }

    #[test]
    fn resolve_joins_segments_under_root() {
        let location = Location::from_segments(["a", "b.md"]).unwrap();
        assert_eq!(
            location.resolve(Path::new("/docs/notes")),
            Path::new("/docs/notes/a/b.md")
        );
        assert_eq!(location.to_string(), "/a/b.md");
    }

    #[test]
    fn title_and_ancestry() {
        let root = Location::root();
        let deep = Location::from_segments(["work", "2024"]).unwrap();
        assert_eq!(root.title(), ROOT_TITLE);
        assert_eq!(deep.title(), "2024");
        assert!(deep.is_within(&root));
        assert!(deep.is_within(&root.child("work").unwrap()));
        assert!(!deep.is_within(&root.child("home").unwrap()));
        assert_eq!(deep.depth(), 2);
    }
}
