//! Script file storage for Meteorz.
//!
//! - Flat storage directory keyed by the original filename
//! - Name validation against path traversal
//! - Atomic replace-on-upload

mod name;
mod storage;

pub use name::{validate_name, NameError, MAX_NAME_LENGTH};
pub use storage::{ScriptStorage, StoredScript};
