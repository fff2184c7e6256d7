//! Readers that load a whole table into memory for a `MemoryFetcher`.

pub mod csv;
