//! # Crashtrend Config
//!
//! Type-safe configuration management for crashtrend.
//!
//! This crate provides the run configuration schema (API endpoint,
//! storage locations, backlog windows, and the product/channel map),
//! defaults matching the standard deployment, validation, and TOML
//! loading with atomic saves.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;

pub use defaults::*;
pub use loader::*;
pub use schema::*;
