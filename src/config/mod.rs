//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions and loading
//! - [`defaults`]: serde default value functions
//! - [`validation`]: sanity checks run before a client is built

pub mod defaults;
mod types;
mod validation;

pub use types::{ClientConfig, ConfigError, ConnectionConfig, EventsConfig};
pub use validation::{ValidationError, validate};
