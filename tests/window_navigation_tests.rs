//! Batch window navigation against the in-memory fetcher

use rowpage_core::error::Error;
use rowpage_core::types::{row, Row, Scalar};
use rowpage_cursor::{BatchWindow, SAVED_BATCHES};
use rowpage_io::MemoryFetcher;
use std::sync::Arc;

fn numbered(n: i64) -> Vec<Row> {
    (1..=n)
        .map(|i| row(vec![Scalar::I64(i), Scalar::Str(format!("row-{}", i))]))
        .collect()
}

fn window(rows: i64, fetch_size: usize) -> (BatchWindow, MemoryFetcher) {
    let fetcher = MemoryFetcher::new(numbered(rows));
    let window = BatchWindow::new(Box::new(fetcher.clone()), fetch_size);
    (window, fetcher)
}

fn id_at(window: &mut BatchWindow) -> Option<i64> {
    window
        .current_row()
        .expect("current_row failed")
        .map(|r| match r[0] {
            Scalar::I64(v) => v,
            ref other => panic!("unexpected value {:?}", other),
        })
}

#[test]
fn test_twelve_rows_in_batches_of_five() {
    let (mut w, fetcher) = window(12, 5);

    assert_eq!(id_at(&mut w), None);
    assert_eq!(fetcher.calls(), 0);

    for expected in 1..=12 {
        assert!(w.next().unwrap(), "next should reach row {}", expected);
        assert_eq!(id_at(&mut w), Some(expected));
    }
    assert_eq!(fetcher.requests(), vec![(1, 5), (6, 10), (11, 15)]);
    assert_eq!(w.final_row_number(), Some(12));

    // Off the end once, then stay put.
    assert!(!w.next().unwrap());
    assert_eq!(w.current_row_number(), 13);
    assert_eq!(id_at(&mut w), None);
    assert!(!w.next().unwrap());
    assert_eq!(w.current_row_number(), 13);

    assert!(w.absolute(-1, 0).unwrap());
    assert_eq!(id_at(&mut w), Some(12));
    assert!(!w.absolute(0, 0).unwrap());
    assert_eq!(w.current_row_number(), 0);
    assert!(w.has_next(1).unwrap());

    assert_eq!(fetcher.calls(), 3);
}

#[test]
fn test_retained_rows_are_served_without_fetching() {
    let (mut w, fetcher) = window(12, 5);
    assert!(w.absolute(7, 0).unwrap());
    let first = w.current_row().unwrap().unwrap();
    let calls = fetcher.calls();

    for _ in 0..5 {
        let again = w.current_row().unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &again));
    }
    assert!(w.absolute(8, 0).unwrap());
    assert_eq!(id_at(&mut w), Some(8));
    assert_eq!(fetcher.calls(), calls);
    assert!(w.stats().cache_hits >= 6);
}

#[test]
fn test_eviction_keeps_three_batches_and_refetches() {
    let (mut w, fetcher) = window(20, 5);
    while w.next().unwrap() {
        assert!(w.current_row().unwrap().is_some());
        assert!(w.retained_batches() <= SAVED_BATCHES);
    }
    assert_eq!(fetcher.calls(), 4);
    assert_eq!(w.retained_batches(), SAVED_BATCHES);

    // Rows 1-5 were evicted. The least recently used batch [6, 10] does not
    // bound the refetch, so it reaches a full fetch size forward.
    assert!(w.absolute(2, 0).unwrap());
    assert_eq!(id_at(&mut w), Some(2));
    assert_eq!(fetcher.requests().last(), Some(&(2, 6)));
    assert_eq!(w.retained_batches(), SAVED_BATCHES);
}

#[test]
fn test_negative_absolute_discovers_end() {
    let (mut w, fetcher) = window(23, 4);
    assert!(w.absolute(-1, 0).unwrap());
    assert_eq!(w.final_row_number(), Some(23));
    assert_eq!(fetcher.calls(), 6);
    assert_eq!(id_at(&mut w), Some(23));

    assert!(w.absolute(-23, 0).unwrap());
    assert_eq!(w.current_row_number(), 1);
    assert!(!w.absolute(-24, 0).unwrap());
    assert_eq!(w.current_row_number(), 0);
}

#[test]
fn test_absolute_past_end_clamps_to_sentinel() {
    let (mut w, _) = window(9, 4);
    assert!(!w.absolute(50, 0).unwrap());
    assert_eq!(w.current_row_number(), 10);
    assert_eq!(id_at(&mut w), None);
    assert!(w.previous());
    assert_eq!(id_at(&mut w), Some(9));
}

#[test]
fn test_failed_fetch_leaves_window_untouched() {
    let (mut w, fetcher) = window(12, 5);
    assert!(w.next().unwrap());
    assert!(w.absolute(5, 0).unwrap());

    fetcher.fail_next(Error::Communication("connection reset".into()));
    let err = w.next().unwrap_err();
    assert!(err.is_fetch_failure());
    assert_eq!(w.current_row_number(), 5);
    assert_eq!(w.highest_row_number(), 5);
    assert_eq!(w.final_row_number(), None);

    assert!(w.next().unwrap());
    assert_eq!(id_at(&mut w), Some(6));
}

#[test]
fn test_random_walk_keeps_invariants() {
    let total = 57;
    let (mut w, _) = window(total, 6);
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    let mut highest = 0;

    for _ in 0..500 {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let pick = (seed >> 33) % 5;
        let arg = ((seed >> 40) % (total as u64 + 10)) as i64;
        match pick {
            0 => {
                w.next().unwrap();
            }
            1 => {
                w.previous();
            }
            2 => {
                w.absolute(arg, 0).unwrap();
            }
            3 => {
                w.absolute(-arg - 1, 0).unwrap();
            }
            _ => {
                w.has_next(arg as u64).unwrap();
            }
        }

        let current = w.current_row_number();
        if let Some(expected) = id_at(&mut w) {
            assert_eq!(expected as u64, current);
        } else {
            assert!(current == 0 || current > total as u64);
        }
        assert!(w.highest_row_number() >= highest);
        highest = w.highest_row_number();
        assert!(w.retained_batches() <= SAVED_BATCHES);
        if let Some(last) = w.final_row_number() {
            assert!(last >= w.highest_row_number());
            assert!(current <= last + 1);
        }
    }
}

#[test]
fn test_seeded_window_skips_first_round_trip() {
    let fetcher = MemoryFetcher::new(numbered(8));
    let first = fetcher.first_batch(4).unwrap();
    fetcher.clear_requests();

    let mut w = BatchWindow::with_first_batch(Box::new(fetcher.clone()), first, 4);
    assert!(w.next().unwrap());
    assert_eq!(id_at(&mut w), Some(1));
    assert_eq!(fetcher.calls(), 0);
    assert!(w.absolute(-1, 0).unwrap());
    assert_eq!(fetcher.requests(), vec![(5, 8)]);
}
