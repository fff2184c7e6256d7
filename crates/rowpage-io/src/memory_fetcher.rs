//! In-memory batch source for testing.
//!
//! Holds a fully materialized result stream and serves exactly the requested
//! range, clipped at the end of the stream. Records every request so tests
//! can count round trips, and can be told to fail the next request.

use std::sync::{Arc, Mutex, MutexGuard};

use rowpage_core::batch::Batch;
use rowpage_core::error::{Error, Result};
use rowpage_core::types::Row;
use rowpage_cursor::BatchFetcher;

struct Inner {
    rows: Vec<Row>,
    requests: Vec<(u64, u64)>,
    pending_failure: Option<Error>,
}

/// Thread-safe, cloneable fetcher. Clones share rows and request history.
#[derive(Clone)]
pub struct MemoryFetcher {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryFetcher {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                rows,
                requests: Vec::new(),
                pending_failure: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Number of rows in the backing stream.
    pub fn total_rows(&self) -> u64 {
        self.lock().rows.len() as u64
    }

    /// Number of successful requests served so far.
    pub fn calls(&self) -> usize {
        self.lock().requests.len()
    }

    /// Ranges requested so far, in order.
    pub fn requests(&self) -> Vec<(u64, u64)> {
        self.lock().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }

    /// Fail the next request with `err`; later requests succeed again.
    pub fn fail_next(&self, err: Error) {
        self.lock().pending_failure = Some(err);
    }

    /// The batch an execute response would carry along: rows `1..=fetch_size`.
    pub fn first_batch(&self, fetch_size: usize) -> Result<Batch> {
        self.request_batch(1, fetch_size.max(1) as u64)
    }
}

impl BatchFetcher for MemoryFetcher {
    fn request_batch(&self, begin_row: u64, end_row: u64) -> Result<Batch> {
        let mut inner = self.lock();
        if let Some(err) = inner.pending_failure.take() {
            return Err(err);
        }
        if begin_row == 0 || end_row < begin_row {
            return Err(Error::Processing(format!(
                "invalid row range [{begin_row}, {end_row}]"
            )));
        }
        inner.requests.push((begin_row, end_row));

        let total = inner.rows.len() as u64;
        if begin_row > total {
            return Batch::empty_last(begin_row);
        }
        let end = end_row.min(total);
        let rows = inner.rows[(begin_row - 1) as usize..end as usize].to_vec();
        Batch::new(rows, begin_row, end == total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowpage_core::types::{row, Scalar};

    fn numbered(n: i64) -> Vec<Row> {
        (1..=n).map(|i| row(vec![Scalar::I64(i)])).collect()
    }

    #[test]
    fn serves_requested_range() {
        let fetcher = MemoryFetcher::new(numbered(12));
        let batch = fetcher.request_batch(6, 10).unwrap();
        assert_eq!(batch.begin_row(), 6);
        assert_eq!(batch.end_row(), 10);
        assert!(!batch.is_last());
        assert_eq!(batch.row(6).unwrap()[0], Scalar::I64(6));
    }

    #[test]
    fn clips_at_end_and_flags_last() {
        let fetcher = MemoryFetcher::new(numbered(12));
        let batch = fetcher.request_batch(11, 15).unwrap();
        assert_eq!(batch.end_row(), 12);
        assert!(batch.is_last());

        let exact = fetcher.request_batch(8, 12).unwrap();
        assert!(exact.is_last());
    }

    #[test]
    fn past_end_yields_empty_final_batch() {
        let fetcher = MemoryFetcher::new(numbered(4));
        let batch = fetcher.request_batch(5, 9).unwrap();
        assert!(batch.is_empty());
        assert!(batch.is_last());
        assert_eq!(batch.end_row(), 4);
    }

    #[test]
    fn failure_is_one_shot_and_not_recorded() {
        let fetcher = MemoryFetcher::new(numbered(4));
        fetcher.fail_next(Error::Communication("socket closed".into()));
        assert!(matches!(
            fetcher.request_batch(1, 2),
            Err(Error::Communication(_))
        ));
        assert_eq!(fetcher.calls(), 0);
        assert!(fetcher.request_batch(1, 2).is_ok());
        assert_eq!(fetcher.requests(), vec![(1, 2)]);
    }

    #[test]
    fn clones_share_history() {
        let fetcher = MemoryFetcher::new(numbered(4));
        let handle = fetcher.clone();
        fetcher.first_batch(2).unwrap();
        assert_eq!(handle.calls(), 1);
        handle.clear_requests();
        assert_eq!(fetcher.calls(), 0);
    }

    #[test]
    fn rejects_inverted_range() {
        let fetcher = MemoryFetcher::new(numbered(4));
        assert!(matches!(
            fetcher.request_batch(3, 2),
            Err(Error::Processing(_))
        ));
        assert!(fetcher.request_batch(0, 2).is_err());
    }
}
