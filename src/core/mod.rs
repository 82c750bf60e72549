//! Core module: field resolution and the portal data shaping built on it

pub mod config;
pub mod error;
pub mod models;
pub mod profile;
pub mod providers;
pub mod resolver;
pub mod search_form;
pub mod taxonomy;

pub use error::{FieldError, Result};

/// Returns the current version of the `PortalFields` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
