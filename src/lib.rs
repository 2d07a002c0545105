//! Meteorz Script Library
//!
//! A small file store: upload a script through a form, list what is stored,
//! and download it again over HTTP.

pub mod config;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use config::Config;
pub use error::{MeteorzError, Result};
pub use file::{validate_name, ScriptStorage, StoredScript};
pub use web::WebServer;
