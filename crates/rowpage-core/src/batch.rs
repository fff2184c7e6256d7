//! One contiguous slice of a server-paginated result stream.
//!
//! Row numbers are 1-based and inclusive on both ends. An empty batch is
//! only meaningful as the final one: it says "nothing beyond `begin_row - 1`".

use crate::error::{Error, Result};
use crate::types::Row;

#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    rows: Vec<Row>,
    begin_row: u64,
    end_row: u64,
    is_last: bool,
}

impl Batch {
    /// Batch starting at `begin_row`; the end row follows from `rows.len()`.
    pub fn new(rows: Vec<Row>, begin_row: u64, is_last: bool) -> Result<Self> {
        if begin_row == 0 {
            return Err(Error::Contract("row numbers start at 1".into()));
        }
        let end_row = begin_row + rows.len() as u64 - 1;
        Ok(Self {
            rows,
            begin_row,
            end_row,
            is_last,
        })
    }

    /// Batch with an explicit range, validated against the row count.
    pub fn with_range(
        rows: Vec<Row>,
        begin_row: u64,
        end_row: u64,
        is_last: bool,
    ) -> Result<Self> {
        if begin_row == 0 {
            return Err(Error::Contract("row numbers start at 1".into()));
        }
        let expected = (end_row + 1).saturating_sub(begin_row);
        if rows.len() as u64 != expected || end_row + 1 < begin_row {
            return Err(Error::Contract(format!(
                "range [{begin_row}, {end_row}] does not match {} rows",
                rows.len()
            )));
        }
        Ok(Self {
            rows,
            begin_row,
            end_row,
            is_last,
        })
    }

    /// Final batch carrying no rows: the stream ends at `begin_row - 1`.
    pub fn empty_last(begin_row: u64) -> Result<Self> {
        Self::new(Vec::new(), begin_row, true)
    }

    pub fn begin_row(&self) -> u64 {
        self.begin_row
    }

    pub fn end_row(&self) -> u64 {
        self.end_row
    }

    pub fn is_last(&self) -> bool {
        self.is_last
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn contains(&self, row_number: u64) -> bool {
        row_number >= self.begin_row && row_number <= self.end_row
    }

    /// Row at absolute position `row_number`, if this batch covers it.
    pub fn row(&self, row_number: u64) -> Option<&Row> {
        if !self.contains(row_number) {
            return None;
        }
        self.rows.get((row_number - self.begin_row) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{row, Scalar};

    fn rows(range: std::ops::RangeInclusive<i64>) -> Vec<Row> {
        range.map(|i| row(vec![Scalar::I64(i)])).collect()
    }

    #[test]
    fn range_follows_row_count() {
        let batch = Batch::new(rows(6..=10), 6, false).unwrap();
        assert_eq!(batch.begin_row(), 6);
        assert_eq!(batch.end_row(), 10);
        assert!(batch.contains(8));
        assert!(!batch.contains(11));
        assert_eq!(batch.row(7).unwrap()[0], Scalar::I64(7));
        assert!(batch.row(5).is_none());
    }

    #[test]
    fn empty_final_batch_ends_before_begin() {
        let batch = Batch::empty_last(13).unwrap();
        assert!(batch.is_last());
        assert!(batch.is_empty());
        assert_eq!(batch.end_row(), 12);
        assert!(!batch.contains(12));
        assert!(!batch.contains(13));
    }

    #[test]
    fn explicit_range_must_match_rows() {
        assert!(Batch::with_range(rows(1..=5), 1, 5, false).is_ok());
        assert!(Batch::with_range(Vec::new(), 4, 3, true).is_ok());
        let err = Batch::with_range(rows(1..=4), 1, 5, false).unwrap_err();
        assert!(matches!(err, Error::Contract(_)));
    }

    #[test]
    fn row_zero_is_rejected() {
        assert!(Batch::new(rows(1..=2), 0, false).is_err());
    }
}
