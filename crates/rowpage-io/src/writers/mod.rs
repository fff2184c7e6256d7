//! Writers that drain rows read through a cursor.

pub mod jsonl;
