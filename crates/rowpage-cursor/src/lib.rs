#![forbid(unsafe_code)]
//! rowpage-cursor: random-access navigation over a paginated result stream.
//!
//! A [`BatchWindow`] keeps the few most recently used row batches and answers
//! `next`/`previous`/`absolute` from them, going back to its
//! [`BatchFetcher`] only on a miss or when it has to look past the highest
//! row fetched so far.
//!
//! Nothing here performs IO itself. Concrete fetchers live in `rowpage-io`
//! (in-memory) or in whatever transport layer wraps the remote engine.

pub mod fetcher;
pub mod tracking;
pub mod window;

pub use fetcher::BatchFetcher;
pub use tracking::{FetchStats, FetchTracker};
pub use window::{BatchWindow, SAVED_BATCHES};
