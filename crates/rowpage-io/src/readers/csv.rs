//! Load a CSV file (header row = column labels) as a typed table.
//!
//! Column types are inferred from the non-empty cells: all integers gives
//! `Int64`, all numbers `Float64`, all `true`/`false` `Boolean`, anything
//! else `Utf8`. Empty cells become `Null`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use rowpage_core::schema::{DataType, Field, Schema};
use rowpage_core::types::{row, Row, Scalar};

use crate::error::{Error, Result};
use crate::memory_fetcher::MemoryFetcher;

#[derive(Debug, Clone)]
pub struct CsvTable {
    pub schema: Schema,
    pub rows: Vec<Row>,
}

impl CsvTable {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.trim().to_string()).collect();
        if headers.is_empty() {
            return Err(Error::Schema("csv has no header row".into()));
        }
        // Labels key JSON output and are looked up case-insensitively.
        for (i, name) in headers.iter().enumerate() {
            if headers[..i].iter().any(|h| h.eq_ignore_ascii_case(name)) {
                return Err(Error::Schema(format!("duplicate column label '{name}'")));
            }
        }

        let mut raw: Vec<Vec<String>> = Vec::new();
        for record in rdr.records() {
            let record = record?;
            if record.len() != headers.len() {
                return Err(Error::Schema(format!(
                    "record {} has {} fields, expected {}",
                    raw.len() + 1,
                    record.len(),
                    headers.len()
                )));
            }
            raw.push(record.iter().map(str::to_string).collect());
        }

        let fields: Vec<Field> = headers
            .iter()
            .enumerate()
            .map(|(ci, name)| {
                let cells = raw.iter().map(|r| r[ci].as_str());
                let nullable = raw.iter().any(|r| r[ci].is_empty());
                Field::new(name.clone(), infer_type(cells), nullable)
            })
            .collect();

        let rows = raw
            .iter()
            .map(|r| {
                let values = r
                    .iter()
                    .zip(&fields)
                    .map(|(cell, field)| parse_cell(cell, field.data_type))
                    .collect();
                row(values)
            })
            .collect();

        Ok(Self {
            schema: Schema::new(fields),
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Serve this table's rows through an in-memory fetcher.
    pub fn into_fetcher(self) -> (Schema, MemoryFetcher) {
        (self.schema, MemoryFetcher::new(self.rows))
    }
}

fn infer_type<'a>(cells: impl Iterator<Item = &'a str>) -> DataType {
    let mut present = cells.filter(|c| !c.is_empty()).peekable();
    if present.peek().is_none() {
        return DataType::Utf8;
    }
    let present: Vec<&str> = present.collect();
    if present.iter().all(|c| c.trim().parse::<i64>().is_ok()) {
        DataType::Int64
    } else if present.iter().all(|c| c.trim().parse::<f64>().is_ok()) {
        DataType::Float64
    } else if present
        .iter()
        .all(|c| matches!(c.trim().to_ascii_lowercase().as_str(), "true" | "false"))
    {
        DataType::Boolean
    } else {
        DataType::Utf8
    }
}

fn parse_cell(cell: &str, data_type: DataType) -> Scalar {
    if cell.is_empty() {
        return Scalar::Null;
    }
    let trimmed = cell.trim();
    match data_type {
        DataType::Int64 => trimmed.parse().map(Scalar::I64).unwrap_or(Scalar::Null),
        DataType::Float64 => trimmed.parse().map(Scalar::F64).unwrap_or(Scalar::Null),
        DataType::Boolean => Scalar::Bool(trimmed.eq_ignore_ascii_case("true")),
        _ => Scalar::Str(cell.to_string()),
    }
}
