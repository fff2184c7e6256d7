use thiserror::Error;

/// Canonical result for the cursor stack.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The transport could not deliver a request or its response.
    #[error("communication error: {0}")]
    Communication(String),

    /// The remote engine failed while producing the requested rows.
    #[error("processing error: {0}")]
    Processing(String),

    /// A collaborator handed back something that breaks the batch contract.
    #[error("batch contract violated: {0}")]
    Contract(String),

    #[error("result set is closed")]
    Closed,

    #[error("operation '{0}' is not allowed on a forward-only cursor")]
    ForwardOnly(&'static str),

    #[error("invalid cursor state: {0}")]
    InvalidCursorState(String),

    #[error("column index {index} out of range (1..={count})")]
    ColumnIndex { index: usize, count: usize },

    #[error("no column labelled '{0}'")]
    ColumnLabel(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// True for failures raised by a fetch round trip.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Error::Communication(_) | Error::Processing(_))
    }
}
