//! Convenient re-exports for downstream crates.

pub use crate::batch::Batch;
pub use crate::config::{CursorConfig, CursorType};
pub use crate::error::{Error, Result};
pub use crate::id::{CursorId, RequestId};
pub use crate::schema::{DataType, Field, Schema};
pub use crate::types::{Row, Scalar};
