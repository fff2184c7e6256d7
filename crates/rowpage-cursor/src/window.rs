//! Scrollable window over a server-paginated result stream.
//!
//! The window retains at most [`SAVED_BATCHES`] batches, most recently used
//! first. Sequential forward scans keep hitting the head batch, a step back
//! lands in the second slot, and one bounded jump fits in the third.
//!
//! Row numbers are 1-based. Position `0` is "before first"; `last + 1` is the
//! "after last" sentinel.

use std::collections::VecDeque;
use std::sync::Arc;

use rowpage_core::batch::Batch;
use rowpage_core::error::{Error, Result};
use rowpage_core::id::RequestId;
use rowpage_core::types::Row;

use crate::fetcher::BatchFetcher;
use crate::tracking::{FetchStats, FetchTracker};

/// Number of batches a window keeps. Fixed, not client-tunable.
pub const SAVED_BATCHES: usize = 3;

pub struct BatchWindow {
    fetcher: Box<dyn BatchFetcher>,
    batches: VecDeque<Batch>,
    current_row: u64,
    /// Final row of the stream, once a batch flagged `is_last` was seen.
    last_row: Option<u64>,
    highest_row: u64,
    fetch_size: usize,
    next_request: RequestId,
    tracker: Arc<FetchTracker>,
}

impl BatchWindow {
    /// Window that fetches its first batch lazily on first navigation.
    pub fn new(fetcher: Box<dyn BatchFetcher>, fetch_size: usize) -> Self {
        Self {
            fetcher,
            batches: VecDeque::with_capacity(SAVED_BATCHES + 1),
            current_row: 0,
            last_row: None,
            highest_row: 0,
            fetch_size: fetch_size.max(1),
            next_request: RequestId::new(1),
            tracker: Arc::new(FetchTracker::new()),
        }
    }

    /// Window seeded with a batch that arrived together with the execute
    /// response.
    ///
    /// # Panics
    /// If `first` is empty but not flagged as the last batch.
    pub fn with_first_batch(
        fetcher: Box<dyn BatchFetcher>,
        first: Batch,
        fetch_size: usize,
    ) -> Self {
        let mut window = Self::new(fetcher, fetch_size);
        window.set_batch(first);
        window
    }

    pub fn current_row_number(&self) -> u64 {
        self.current_row
    }

    /// Final row of the stream, if the end has been reached by some fetch.
    pub fn final_row_number(&self) -> Option<u64> {
        self.last_row
    }

    pub fn highest_row_number(&self) -> u64 {
        self.highest_row
    }

    pub fn fetch_size(&self) -> usize {
        self.fetch_size
    }

    /// Takes effect on the next fetch. Zero is treated as one.
    pub fn set_fetch_size(&mut self, fetch_size: usize) {
        self.fetch_size = fetch_size.max(1);
    }

    pub fn retained_batches(&self) -> usize {
        self.batches.len()
    }

    pub fn stats(&self) -> FetchStats {
        self.tracker.snapshot()
    }

    /// Shared handle on the counters; stays readable after the window is dropped.
    pub fn tracker(&self) -> Arc<FetchTracker> {
        Arc::clone(&self.tracker)
    }

    /// The row under the cursor, or `None` before the first or past the last row.
    ///
    /// Served from a retained batch when one covers the position (promoting
    /// it to most recently used). Otherwise exactly one fetch is issued,
    /// sized by the nearest retained neighbours and the fetch size, and
    /// pointed toward whichever side leaves more room (forward on a tie).
    pub fn current_row(&mut self) -> Result<Option<Row>> {
        let current = self.current_row;
        if current == 0 || self.last_row.is_some_and(|last| current > last) {
            return Ok(None);
        }

        let mut closest_min: u64 = 1;
        let mut closest_max: u64 = u64::MAX;
        for i in 0..self.batches.len() {
            let batch = &self.batches[i];
            if current < batch.begin_row() {
                // The least recently used slot only ever acts as a floor.
                if i != SAVED_BATCHES - 1 {
                    closest_max = closest_max.min(batch.begin_row() - 1);
                }
                continue;
            }
            if current > batch.end_row() {
                closest_min = closest_min.max(batch.end_row() + 1);
                continue;
            }
            if i != 0 {
                if let Some(hit) = self.batches.remove(i) {
                    self.batches.push_front(hit);
                }
                #[cfg(feature = "tracing")]
                tracing::trace!(row = current, slot = i, "promoted retained batch");
            }
            self.tracker.record_hit();
            return Ok(self.batches.front().and_then(|b| b.row(current)).cloned());
        }
        self.tracker.record_miss();

        let reach = self.fetch_size as u64 - 1;
        closest_max = closest_max.min(current.saturating_add(reach));
        closest_min = closest_min.max(current.saturating_sub(reach));

        let batch = if closest_max - current >= current - closest_min {
            self.fetch(current, closest_max)?
        } else {
            self.fetch(closest_min, current)?
        };
        self.set_batch(batch);

        match self.batches.front().and_then(|b| b.row(current)) {
            Some(row) => Ok(Some(Arc::clone(row))),
            None => Err(Error::Contract(format!(
                "fetched batch does not contain row {current}"
            ))),
        }
    }

    /// Advance one row. Stepping off the end lands on the after-last
    /// sentinel once; further calls leave the position alone.
    pub fn next(&mut self) -> Result<bool> {
        if self.has_next(1)? {
            self.current_row += 1;
            return Ok(true);
        }
        if self.current_row == self.highest_row {
            self.current_row += 1;
        }
        Ok(false)
    }

    /// Whether row `current + n` exists, paging forward until it is fetched
    /// or the end of the stream is found.
    pub fn has_next(&mut self, n: u64) -> Result<bool> {
        let target = self.current_row.saturating_add(n);
        while target > self.highest_row && self.last_row.is_none() {
            self.request_next_batch()?;
        }
        Ok(target <= self.highest_row)
    }

    pub fn has_previous(&self) -> bool {
        self.current_row > 1
    }

    /// Step back one row. From row 1 this moves to "before first" and
    /// returns `false`.
    ///
    /// Forward-only cursors must be rejected by the caller before getting here.
    pub fn previous(&mut self) -> bool {
        if self.has_previous() {
            self.current_row -= 1;
            return true;
        }
        if self.current_row == 1 {
            self.current_row = 0;
        }
        false
    }

    /// Move to `row`, counted from the start when positive and from the end
    /// when negative (`-1` is the last row).
    ///
    /// `offset` hides that many trailing rows of the stream from navigation.
    /// Positions past the visible end clamp to the after-last sentinel and
    /// return `false`. Negative rows need the final row count, so they may
    /// page through the whole rest of the stream.
    pub fn absolute(&mut self, row: i64, offset: u64) -> Result<bool> {
        if row == 0 {
            self.current_row = 0;
            return Ok(false);
        }

        if row > 0 {
            let target = row as u64;
            loop {
                if target.saturating_add(offset) <= self.highest_row {
                    self.current_row = target;
                    return Ok(true);
                }
                if let Some(last) = self.last_row {
                    self.current_row = (last + 1).saturating_sub(offset);
                    return Ok(false);
                }
                self.request_next_batch()?;
            }
        }

        let last = self.discover_last_row()?;
        let positive = last as i128 + row as i128 - offset as i128 + 1;
        if positive <= 0 {
            self.current_row = 0;
            return Ok(false);
        }
        self.current_row = positive as u64;
        Ok(true)
    }

    /// Page forward until the final row is known and return it.
    pub fn discover_last_row(&mut self) -> Result<u64> {
        loop {
            if let Some(last) = self.last_row {
                return Ok(last);
            }
            self.request_next_batch()?;
        }
    }

    fn request_next_batch(&mut self) -> Result<()> {
        let begin = self.highest_row + 1;
        let end = self.highest_row + self.fetch_size as u64;
        let batch = self.fetch(begin, end)?;
        if !batch.is_empty() && !batch.is_last() && batch.end_row() < begin {
            return Err(Error::Contract(format!(
                "batch [{}, {}] does not advance past row {}",
                batch.begin_row(),
                batch.end_row(),
                self.highest_row
            )));
        }
        self.set_batch(batch);
        Ok(())
    }

    /// One round trip. Leaves the window untouched; callers merge the result.
    fn fetch(&mut self, begin: u64, end: u64) -> Result<Batch> {
        let request = self.next_request;
        self.next_request = request.next();

        #[cfg(feature = "tracing")]
        tracing::debug!(request = %request, begin, end, "requesting batch");

        let batch = match self.fetcher.request_batch(begin, end) {
            Ok(batch) => batch,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(request = %request, error = %err, "batch request failed");
                return Err(err);
            }
        };
        self.tracker.record_fetch(batch.len());

        #[cfg(feature = "tracing")]
        tracing::debug!(
            request = %request,
            begin = batch.begin_row(),
            end = batch.end_row(),
            last = batch.is_last(),
            "received batch"
        );
        Ok(batch)
    }

    fn set_batch(&mut self, batch: Batch) {
        assert!(
            !batch.is_empty() || batch.is_last(),
            "fetcher returned an empty batch at row {} that is not the last one",
            batch.begin_row()
        );

        if batch.is_last() {
            self.last_row = Some(batch.end_row());
        }
        self.highest_row = self.highest_row.max(batch.end_row());

        if !batch.is_empty() {
            self.batches.push_front(batch);
            self.batches.truncate(SAVED_BATCHES);
            let retained: u64 = self.batches.iter().map(|b| b.len() as u64).sum();
            self.tracker.record_retained(retained);
        }
    }
}

impl std::fmt::Debug for BatchWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ranges: Vec<(u64, u64)> = self
            .batches
            .iter()
            .map(|b| (b.begin_row(), b.end_row()))
            .collect();
        f.debug_struct("BatchWindow")
            .field("current_row", &self.current_row)
            .field("last_row", &self.last_row)
            .field("highest_row", &self.highest_row)
            .field("fetch_size", &self.fetch_size)
            .field("batches", &ranges)
            .finish()
    }
}
