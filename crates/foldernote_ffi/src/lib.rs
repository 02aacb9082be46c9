//! Flutter bridge over the Foldernote core explorer.

pub mod api;
