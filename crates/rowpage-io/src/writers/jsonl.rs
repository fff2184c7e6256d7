//! Streaming NDJSON writer.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use rowpage_core::schema::Schema;
use rowpage_core::types::Scalar;

pub struct JsonlWriter<W: Write> {
    writer: BufWriter<W>,
    columns: Vec<String>,
    written: u64,
}

impl JsonlWriter<File> {
    pub fn to_path(path: impl AsRef<Path>, schema: &Schema) -> Result<Self> {
        let f = File::create(path)?;
        Ok(Self::to_writer(f, schema))
    }
}

impl<W: Write> JsonlWriter<W> {
    pub fn to_writer(writer: W, schema: &Schema) -> Self {
        Self {
            writer: BufWriter::new(writer),
            columns: schema.fields.iter().map(|f| f.name.clone()).collect(),
            written: 0,
        }
    }

    /// Write one row as a JSON object keyed by column label.
    pub fn write_row(&mut self, row: &[Scalar]) -> Result<()> {
        let mut obj = BTreeMap::new();
        for (name, val) in self.columns.iter().zip(row) {
            obj.insert(name.as_str(), scalar_to_json(val));
        }
        let line = serde_json::to_string(&obj)?;
        writeln!(self.writer, "{}", line)?;
        self.written += 1;
        Ok(())
    }

    pub fn rows_written(&self) -> u64 {
        self.written
    }

    /// Flush buffered lines and hand back the underlying writer.
    pub fn finish(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::error::Error::Io(e.into_error()))
    }
}

pub fn scalar_to_json(v: &Scalar) -> serde_json::Value {
    use Scalar::*;
    match v {
        Null => serde_json::Value::Null,
        Bool(b) => serde_json::Value::Bool(*b),
        I32(i) => serde_json::Value::from(*i),
        I64(i) => serde_json::Value::from(*i),
        F32(f) => serde_json::Value::from(*f as f64),
        F64(f) => serde_json::Value::from(*f),
        Str(s) => serde_json::Value::String(s.clone()),
        Bin(b) => serde_json::Value::String(format!("[binary {} bytes]", b.len())),
    }
}
