#![forbid(unsafe_code)]
//! rowpage-io: concrete fetchers and file adapters.
//!
//! `MemoryFetcher` stands in for the remote engine in tests, benches, and the
//! CLI. The CSV reader and JSONL writer move tables in and out of it.

pub mod error;
pub mod memory_fetcher;
pub mod readers;
pub mod writers;

pub use error::{Error, Result};
pub use memory_fetcher::MemoryFetcher;
pub use readers::csv::CsvTable;
pub use writers::jsonl::JsonlWriter;
