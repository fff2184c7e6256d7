//! Result-set navigation over a batch window.
//!
//! Positions are the window's 1-based row numbers. When the stream carries
//! trailing output-parameter rows, the last `output_param_rows` rows are
//! never reachable through navigation; the visible result ends before them.

use std::sync::Arc;

use rowpage_core::batch::Batch;
use rowpage_core::config::{CursorConfig, CursorType};
use rowpage_core::error::{Error, Result};
use rowpage_core::id::CursorId;
use rowpage_core::schema::Schema;
use rowpage_core::types::{Row, Scalar};
use rowpage_cursor::{BatchFetcher, BatchWindow, FetchStats, FetchTracker};

use crate::metrics::emit_fetch_stats;

pub struct ResultSet {
    id: CursorId,
    schema: Schema,
    /// `None` once closed.
    window: Option<BatchWindow>,
    cursor_type: CursorType,
    /// Trailing output-parameter rows hidden from navigation.
    offset: u64,
    was_null: bool,
    tracker: Arc<FetchTracker>,
}

impl ResultSet {
    pub fn new(
        id: CursorId,
        schema: Schema,
        fetcher: Box<dyn BatchFetcher>,
        config: &CursorConfig,
    ) -> Result<Self> {
        config.validate()?;
        let window = BatchWindow::new(fetcher, config.fetch_size);
        Ok(Self::from_window(id, schema, window, config))
    }

    /// Result set whose first batch came back with the execute response.
    pub fn with_first_batch(
        id: CursorId,
        schema: Schema,
        fetcher: Box<dyn BatchFetcher>,
        first: Batch,
        config: &CursorConfig,
    ) -> Result<Self> {
        config.validate()?;
        let window = BatchWindow::with_first_batch(fetcher, first, config.fetch_size);
        Ok(Self::from_window(id, schema, window, config))
    }

    fn from_window(id: CursorId, schema: Schema, window: BatchWindow, config: &CursorConfig) -> Self {
        Self {
            id,
            schema,
            tracker: window.tracker(),
            window: Some(window),
            cursor_type: config.cursor_type,
            offset: config.output_param_rows,
            was_null: false,
        }
    }

    pub fn id(&self) -> CursorId {
        self.id
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn cursor_type(&self) -> CursorType {
        self.cursor_type
    }

    pub fn is_closed(&self) -> bool {
        self.window.is_none()
    }

    /// Fetch counters; still readable after `close`.
    pub fn stats(&self) -> FetchStats {
        self.tracker.snapshot()
    }

    fn window(&mut self) -> Result<&mut BatchWindow> {
        self.window.as_mut().ok_or(Error::Closed)
    }

    fn require_scrollable(&self, op: &'static str) -> Result<()> {
        if self.window.is_none() {
            return Err(Error::Closed);
        }
        if !self.cursor_type.is_scrollable() {
            return Err(Error::ForwardOnly(op));
        }
        Ok(())
    }

    pub fn fetch_size(&self) -> Result<usize> {
        self.window
            .as_ref()
            .map(BatchWindow::fetch_size)
            .ok_or(Error::Closed)
    }

    /// Zero restores the default fetch size.
    pub fn set_fetch_size(&mut self, fetch_size: usize) -> Result<()> {
        let fetch_size = if fetch_size == 0 {
            CursorConfig::default().fetch_size
        } else {
            fetch_size
        };
        self.window()?.set_fetch_size(fetch_size);
        Ok(())
    }

    /// Last visible row, paging to the end of the stream if needed.
    fn visible_last(&mut self) -> Result<u64> {
        let offset = self.offset;
        let last = self.window()?.discover_last_row()?;
        Ok(last.saturating_sub(offset))
    }

    /// Whether the cursor sits on a visible row.
    fn on_row(&mut self) -> Result<bool> {
        let offset = self.offset;
        let w = self.window()?;
        if w.current_row_number() == 0 {
            return Ok(false);
        }
        w.has_next(offset)
    }

    pub fn next(&mut self) -> Result<bool> {
        let offset = self.offset;
        let w = self.window()?;
        if w.has_next(offset + 1)? {
            return w.next();
        }
        // End of the visible rows is known now; step onto the sentinel once.
        let visible_last = w.discover_last_row()?.saturating_sub(offset);
        if w.current_row_number() <= visible_last {
            w.absolute(visible_last as i64 + 1, offset)?;
        }
        Ok(false)
    }

    pub fn previous(&mut self) -> Result<bool> {
        self.require_scrollable("previous")?;
        Ok(self.window()?.previous())
    }

    pub fn absolute(&mut self, row: i64) -> Result<bool> {
        self.require_scrollable("absolute")?;
        let offset = self.offset;
        self.window()?.absolute(row, offset)
    }

    /// Move `rows` forward (or backward when negative) from the current row.
    pub fn relative(&mut self, rows: i64) -> Result<bool> {
        self.require_scrollable("relative")?;
        if !self.on_row()? {
            return Err(Error::InvalidCursorState(
                "relative positioning needs a current row".into(),
            ));
        }
        let current = self.window()?.current_row_number() as i64;
        let target = current.saturating_add(rows).max(0);
        self.absolute(target)
    }

    pub fn first(&mut self) -> Result<bool> {
        self.require_scrollable("first")?;
        self.absolute(1)
    }

    pub fn last(&mut self) -> Result<bool> {
        self.require_scrollable("last")?;
        self.absolute(-1)
    }

    pub fn before_first(&mut self) -> Result<()> {
        self.require_scrollable("before_first")?;
        self.absolute(0)?;
        Ok(())
    }

    /// No effect when the result has no rows.
    pub fn after_last(&mut self) -> Result<()> {
        self.require_scrollable("after_last")?;
        let visible_last = self.visible_last()?;
        if visible_last > 0 {
            self.absolute(visible_last as i64 + 1)?;
        }
        Ok(())
    }

    /// False when the result has no rows.
    pub fn is_before_first(&mut self) -> Result<bool> {
        let offset = self.offset;
        let w = self.window()?;
        Ok(w.current_row_number() == 0 && w.has_next(offset + 1)?)
    }

    /// False when the result has no rows.
    pub fn is_after_last(&mut self) -> Result<bool> {
        let offset = self.offset;
        let w = self.window()?;
        let Some(last) = w.final_row_number() else {
            return Ok(false);
        };
        let visible_last = last.saturating_sub(offset);
        Ok(visible_last > 0 && w.current_row_number() > visible_last)
    }

    pub fn is_first(&mut self) -> Result<bool> {
        let at_one = self.window()?.current_row_number() == 1;
        Ok(at_one && self.on_row()?)
    }

    /// May fetch one batch ahead to find out whether another row follows.
    pub fn is_last(&mut self) -> Result<bool> {
        if !self.on_row()? {
            return Ok(false);
        }
        let offset = self.offset;
        Ok(!self.window()?.has_next(offset + 1)?)
    }

    /// Current row number, or 0 when not on a row.
    pub fn row(&mut self) -> Result<u64> {
        if self.on_row()? {
            Ok(self.window()?.current_row_number())
        } else {
            Ok(0)
        }
    }

    pub fn current_row(&mut self) -> Result<Option<Row>> {
        if !self.on_row()? {
            return Ok(None);
        }
        self.window()?.current_row()
    }

    /// Advance and return the new current row, `None` at the end.
    pub fn next_row(&mut self) -> Result<Option<Row>> {
        if self.next()? {
            self.current_row()
        } else {
            Ok(None)
        }
    }

    /// 1-based position of the column labelled `label`, ignoring case.
    pub fn find_column(&self, label: &str) -> Result<usize> {
        if self.window.is_none() {
            return Err(Error::Closed);
        }
        self.schema
            .index_of(label)
            .map(|i| i + 1)
            .ok_or_else(|| Error::ColumnLabel(label.to_string()))
    }

    /// Value of the 1-based column `index` in the current row.
    pub fn get(&mut self, index: usize) -> Result<Scalar> {
        let row = self.current_row()?.ok_or_else(|| {
            Error::InvalidCursorState("no current row".into())
        })?;
        let count = if self.schema.is_empty() {
            row.len()
        } else {
            self.schema.len()
        };
        if index == 0 || index > count {
            return Err(Error::ColumnIndex { index, count });
        }
        let value = row.get(index - 1).cloned().unwrap_or(Scalar::Null);
        self.was_null = value.is_null();
        Ok(value)
    }

    pub fn get_by_label(&mut self, label: &str) -> Result<Scalar> {
        let index = self.find_column(label)?;
        self.get(index)
    }

    /// Whether the last value read by `get` was NULL.
    pub fn was_null(&self) -> bool {
        self.was_null
    }

    /// The trailing output-parameter rows, in stream order. The cursor
    /// position is restored afterwards.
    pub fn output_parameters(&mut self) -> Result<Vec<Row>> {
        let offset = self.offset;
        let w = self.window()?;
        if offset == 0 {
            return Ok(Vec::new());
        }
        let saved = w.current_row_number();
        let last = w.discover_last_row()?;
        let first = last.saturating_sub(offset) + 1;

        let mut params = Vec::with_capacity(offset as usize);
        for position in first..=last {
            w.absolute(position as i64, 0)?;
            if let Some(row) = w.current_row()? {
                params.push(row);
            }
        }
        w.absolute(saved as i64, 0)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(cursor = %self.id, params = params.len(), "read output parameters");
        Ok(params)
    }

    /// Release the window and its cached batches. Idempotent.
    pub fn close(&mut self) {
        if self.window.take().is_some() {
            #[cfg(feature = "tracing")]
            tracing::debug!(cursor = %self.id, "closed result set");
            emit_fetch_stats(self.id, &self.tracker.snapshot());
        }
    }
}

impl Drop for ResultSet {
    fn drop(&mut self) {
        self.close();
    }
}
