#![forbid(unsafe_code)]
//! rowpage: a randomly navigable cursor over a server-paginated result stream.
//!
//! This facade re-exports the workspace crates so applications can depend on
//! one package.

pub use rowpage_core;
pub use rowpage_cursor;
pub use rowpage_io;
pub use rowpage_results;

pub use rowpage_core::prelude::*;
pub use rowpage_cursor::{BatchFetcher, BatchWindow, FetchStats};
pub use rowpage_results::ResultSet;
