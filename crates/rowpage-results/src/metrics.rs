//! Metrics/tracing hooks.
//!
//! Wire these up to a subscriber in the binary layer.

use rowpage_core::id::CursorId;
use rowpage_cursor::FetchStats;

#[cfg(feature = "tracing")]
pub fn emit_fetch_stats(cursor: CursorId, stats: &FetchStats) {
    let span = tracing::span!(tracing::Level::TRACE, "rowpage", %cursor);
    let _enter = span.enter();
    tracing::trace!(
        round_trips = stats.round_trips,
        rows_fetched = stats.rows_fetched,
        cache_hits = stats.cache_hits,
        cache_misses = stats.cache_misses,
        peak_retained_rows = stats.peak_retained_rows,
        "cursor stats"
    );
}

#[cfg(not(feature = "tracing"))]
pub fn emit_fetch_stats(_cursor: CursorId, _stats: &FetchStats) { /* no-op */
}
