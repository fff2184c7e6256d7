//! The one collaborator the window depends on.

use rowpage_core::batch::Batch;
use rowpage_core::error::Result;

/// Source of row batches for a single open result stream.
///
/// Contract:
/// - Called with `1 <= begin_row <= end_row`.
/// - The returned batch covers `[begin_row, end_row]`, or stops short of it
///   only because the stream ends there, in which case `is_last` is set and
///   `end_row` is the true final row.
/// - An empty batch must be final.
///
/// Errors are handed back to the navigating caller untouched.
pub trait BatchFetcher: Send {
    fn request_batch(&self, begin_row: u64, end_row: u64) -> Result<Batch>;
}

/// Closures make convenient ad-hoc fetchers.
impl<F> BatchFetcher for F
where
    F: Fn(u64, u64) -> Result<Batch> + Send,
{
    fn request_batch(&self, begin_row: u64, end_row: u64) -> Result<Batch> {
        self(begin_row, end_row)
    }
}
