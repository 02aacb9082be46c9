//! Domain model for the notes folder hierarchy.
//!
//! # Responsibility
//! - Define locations, directory entries and listing snapshots.
//! - Keep every type free of I/O so it can be shared by storage and services.
//!
//! # Invariants
//! - Entry kind is decided once, when storage enumerates a folder.
//! - Locations are values; navigation produces new ones.

pub mod entry;
pub mod location;
