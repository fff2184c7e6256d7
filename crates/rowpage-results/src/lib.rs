#![forbid(unsafe_code)]
//! rowpage-results: the cursor surface callers actually use.
//!
//! `ResultSet` maps the usual relational navigation calls (`next`,
//! `absolute`, `relative`, `is_last`, ...) onto a `BatchWindow`, enforces the
//! cursor type, hides trailing output-parameter rows, and reads columns.

pub mod metrics;
pub mod result_set;

pub use result_set::ResultSet;
