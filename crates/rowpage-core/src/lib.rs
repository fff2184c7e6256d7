#![forbid(unsafe_code)]
//! rowpage-core: values, rows, batches, schema, ids, config, and errors.
//!
//! Everything here is pure data. Fetching and navigation live in
//! `rowpage-cursor`; concrete fetchers and file readers in `rowpage-io`.

pub mod batch;
pub mod config;
pub mod error;
pub mod id;
pub mod prelude;
pub mod schema;
pub mod types;
