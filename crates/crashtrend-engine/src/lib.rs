//! # Crashtrend Engine
//!
//! The daily crash aggregation core: planning which days need
//! (re)processing, resolving the product versions valid on each day,
//! folding crash facets into weighted per-category and per-process-type
//! buckets, and merging the results into incrementally growing,
//! chronologically sorted stores.
//!
//! Everything here is deterministic over a [`CrashDataSource`]
//! implementation; network mechanics live in `crashtrend-api`.
//!
//! [`CrashDataSource`]: crashtrend_api::CrashDataSource

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregate;
pub mod resolver;
pub mod rules;
pub mod store;
pub mod window;

pub use aggregate::*;
pub use resolver::*;
pub use rules::*;
pub use store::*;
pub use window::*;
