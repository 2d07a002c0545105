//! API handlers for the Meteorz web server.

pub mod page;
pub mod script;

pub use page::*;
pub use script::*;

use crate::file::ScriptStorage;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Script storage.
    pub storage: ScriptStorage,
}

impl AppState {
    /// Create a new application state.
    pub fn new(storage: ScriptStorage) -> Self {
        Self { storage }
    }
}
