//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate storage calls into navigation and mutation use-cases.
//! - Keep the UI/FFI layer decoupled from storage details.

pub mod directory_cache;
pub mod explorer_service;
pub mod navigator;
pub mod note_session;
