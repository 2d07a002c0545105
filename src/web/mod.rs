//! Web module for Meteorz.
//!
//! Serves the upload page and the JSON/file endpoints behind it.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use router::create_router;
pub use server::WebServer;
