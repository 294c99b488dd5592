//! # Crashtrend CLI
//!
//! Command-line entry point for crashtrend.
//!
//! This is the binary crate that wires configuration, the API client,
//! and the aggregation engine into the sequential run loops over
//! products, channels, and days.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod error;
pub mod runner;

pub use cli::*;
pub use error::*;
pub use runner::*;
