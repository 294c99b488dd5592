//! # Crashtrend API
//!
//! Typed client for the Socorro crash-stats API.
//!
//! This crate wraps the remote statistics endpoints (`Platforms`,
//! `ProductVersions`, `CurrentVersions`, `ADI`, `SuperSearch`,
//! `CrashesPerAdu`) behind the [`CrashDataSource`] trait so the
//! aggregation engine can be driven by canned fixtures in tests.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod error;
pub mod models;
pub mod traits;

#[cfg(any(test, feature = "testing"))]
pub mod test_source;

pub use client::*;
pub use error::*;
pub use models::*;
pub use traits::*;
