//! Shared library for `PortalFields`
//! Field resolution for schema-driven portal forms, used by the CLI and by embedding UI layers.

pub mod core;
pub mod logger;

pub use self::core::{config, get_version};
