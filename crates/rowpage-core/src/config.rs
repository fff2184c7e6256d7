//! Cursor configuration that downstream crates can serialize/deserialize.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Navigation capabilities of an open cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorType {
    /// Only `next` is permitted.
    ForwardOnly,
    /// Any direction; rows are a snapshot taken at execution time.
    ScrollInsensitive,
}

impl CursorType {
    pub fn is_scrollable(self) -> bool {
        matches!(self, CursorType::ScrollInsensitive)
    }
}

impl FromStr for CursorType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "forward_only" | "forward-only" => Ok(CursorType::ForwardOnly),
            "scroll_insensitive" | "scroll-insensitive" => Ok(CursorType::ScrollInsensitive),
            other => Err(Error::Config(format!("unknown cursor type '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorConfig {
    /// Rows requested per forward fetch; also bounds gap-fill fetches.
    pub fetch_size: usize,

    pub cursor_type: CursorType,

    /// Trailing pseudo-rows carrying output parameters. They follow the real
    /// result rows in the stream and are hidden from navigation.
    pub output_param_rows: u64,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            fetch_size: 2048,
            cursor_type: CursorType::ForwardOnly,
            output_param_rows: 0,
        }
    }
}

impl CursorConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `ROWPAGE_FETCH_SIZE`: rows per fetch
    /// - `ROWPAGE_CURSOR_TYPE`: `forward_only` or `scroll_insensitive`
    /// - `ROWPAGE_OUTPUT_PARAM_ROWS`: trailing output-parameter rows
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("ROWPAGE_FETCH_SIZE") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.fetch_size = v;
            }
        }

        if let Ok(s) = std::env::var("ROWPAGE_CURSOR_TYPE") {
            if let Ok(v) = s.parse::<CursorType>() {
                cfg.cursor_type = v;
            }
        }

        if let Ok(s) = std::env::var("ROWPAGE_OUTPUT_PARAM_ROWS") {
            if let Ok(v) = s.parse::<u64>() {
                cfg.output_param_rows = v;
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<()> {
        if self.fetch_size == 0 {
            return Err(Error::Config("fetch_size must be at least 1".into()));
        }
        Ok(())
    }
}
