//! Storage layer abstractions and implementations.
//!
//! # Responsibility
//! - Define the async storage contract used by services.
//! - Isolate `tokio::fs` details from navigation and mutation logic.
//!
//! # Invariants
//! - Storage APIs take `Location` values, never raw user paths.
//! - Absent targets are lenient on read and remove, errors elsewhere.

pub mod settings_repo;
pub mod storage;
