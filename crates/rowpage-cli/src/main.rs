//! rowpage CLI: scroll a CSV table through a batched cursor.

use clap::{Parser, Subcommand};
use rowpage_core::config::{CursorConfig, CursorType};
use rowpage_core::id::CursorId;
use rowpage_core::schema::Schema;
use rowpage_core::types::Scalar;
use rowpage_io::writers::jsonl::scalar_to_json;
use rowpage_io::{CsvTable, JsonlWriter};
use rowpage_results::ResultSet;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rowpage")]
#[command(about = "Navigate a paginated result stream through a batched cursor window", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a sequence of navigation operations and print each step
    Scroll {
        /// Path to the CSV table
        #[arg(short, long)]
        input: PathBuf,

        /// Rows per fetch (overrides ROWPAGE_FETCH_SIZE)
        #[arg(long)]
        fetch_size: Option<usize>,

        /// Open a scroll-insensitive cursor (overrides ROWPAGE_CURSOR_TYPE)
        #[arg(long)]
        scrollable: bool,

        /// Trailing rows treated as output parameters
        #[arg(long)]
        output_param_rows: Option<u64>,

        /// Comma-separated operations, e.g. next,absolute:-1,relative:-2
        #[arg(long, value_delimiter = ',', required = true)]
        ops: Vec<Op>,
    },

    /// Walk the cursor forward and report the row count
    Count {
        /// Path to the CSV table
        #[arg(short, long)]
        input: PathBuf,

        /// Rows per fetch (overrides ROWPAGE_FETCH_SIZE)
        #[arg(long)]
        fetch_size: Option<usize>,
    },

    /// Stream every row through a cursor into a JSONL file
    Export {
        /// Path to the CSV table
        #[arg(short, long)]
        input: PathBuf,

        /// Destination JSONL file
        #[arg(short, long)]
        output: PathBuf,

        /// Rows per fetch (overrides ROWPAGE_FETCH_SIZE)
        #[arg(long)]
        fetch_size: Option<usize>,
    },
}

/// One navigation step of `rowpage scroll`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Next,
    Previous,
    First,
    Last,
    BeforeFirst,
    AfterLast,
    Absolute(i64),
    Relative(i64),
}

impl FromStr for Op {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };
        let parse_arg = |arg: Option<&str>| -> Result<i64, String> {
            let arg = arg.ok_or_else(|| format!("'{name}' needs a row argument, e.g. {name}:3"))?;
            arg.trim()
                .parse::<i64>()
                .map_err(|e| format!("bad row argument '{arg}': {e}"))
        };
        let op = match name.to_ascii_lowercase().replace('-', "_").as_str() {
            "next" => Op::Next,
            "previous" | "prev" => Op::Previous,
            "first" => Op::First,
            "last" => Op::Last,
            "before_first" => Op::BeforeFirst,
            "after_last" => Op::AfterLast,
            "absolute" | "abs" => return Ok(Op::Absolute(parse_arg(arg)?)),
            "relative" | "rel" => return Ok(Op::Relative(parse_arg(arg)?)),
            other => return Err(format!("unknown operation '{other}'")),
        };
        if arg.is_some() {
            return Err(format!("'{name}' takes no argument"));
        }
        Ok(op)
    }
}

impl Op {
    fn apply(self, rs: &mut ResultSet) -> rowpage_core::error::Result<bool> {
        match self {
            Op::Next => rs.next(),
            Op::Previous => rs.previous(),
            Op::First => rs.first(),
            Op::Last => rs.last(),
            Op::BeforeFirst => rs.before_first().map(|_| false),
            Op::AfterLast => rs.after_last().map(|_| false),
            Op::Absolute(row) => rs.absolute(row),
            Op::Relative(rows) => rs.relative(rows),
        }
    }

    fn label(self) -> String {
        match self {
            Op::Next => "next".into(),
            Op::Previous => "previous".into(),
            Op::First => "first".into(),
            Op::Last => "last".into(),
            Op::BeforeFirst => "before_first".into(),
            Op::AfterLast => "after_last".into(),
            Op::Absolute(row) => format!("absolute:{row}"),
            Op::Relative(rows) => format!("relative:{rows}"),
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scroll {
            input,
            fetch_size,
            scrollable,
            output_param_rows,
            ops,
        } => {
            let mut config = CursorConfig::from_env();
            apply_overrides(&mut config, fetch_size, scrollable, output_param_rows);
            scroll(&input, &config, &ops)
        }
        Commands::Count { input, fetch_size } => {
            let mut config = CursorConfig::from_env();
            apply_overrides(&mut config, fetch_size, false, None);
            count(&input, &config)
        }
        Commands::Export {
            input,
            output,
            fetch_size,
        } => {
            let mut config = CursorConfig::from_env();
            apply_overrides(&mut config, fetch_size, false, None);
            export(&input, &output, &config)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Command-line flags win over environment values.
fn apply_overrides(
    config: &mut CursorConfig,
    fetch_size: Option<usize>,
    scrollable: bool,
    output_param_rows: Option<u64>,
) {
    if let Some(size) = fetch_size {
        config.fetch_size = size;
    }
    if scrollable {
        config.cursor_type = CursorType::ScrollInsensitive;
    }
    if let Some(rows) = output_param_rows {
        config.output_param_rows = rows;
    }
}

fn open(input: &PathBuf, config: &CursorConfig) -> Result<ResultSet, Box<dyn std::error::Error>> {
    let table = CsvTable::from_path(input)?;
    tracing::info!(
        path = %input.display(),
        rows = table.len(),
        fetch_size = config.fetch_size,
        "opened table"
    );
    let (schema, fetcher) = table.into_fetcher();
    let rs = ResultSet::new(CursorId::new(1), schema, Box::new(fetcher), config)?;
    Ok(rs)
}

fn row_to_json(schema: &Schema, values: &[Scalar]) -> serde_json::Value {
    let obj = schema
        .fields
        .iter()
        .zip(values)
        .map(|(field, value)| (field.name.clone(), scalar_to_json(value)))
        .collect::<serde_json::Map<_, _>>();
    serde_json::Value::Object(obj)
}

fn scroll(
    input: &PathBuf,
    config: &CursorConfig,
    ops: &[Op],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut rs = open(input, config)?;

    for op in ops {
        let moved = op.apply(&mut rs)?;
        let row_number = rs.row()?;
        let values = rs
            .current_row()?
            .map(|row| row_to_json(rs.schema(), &row))
            .unwrap_or(serde_json::Value::Null);
        let step = serde_json::json!({
            "op": op.label(),
            "moved": moved,
            "row": row_number,
            "values": values,
        });
        println!("{}", step);
    }

    if config.output_param_rows > 0 {
        for params in rs.output_parameters()? {
            println!("{}", serde_json::json!({ "output": row_to_json(rs.schema(), &params) }));
        }
    }

    let stats = rs.stats();
    rs.close();
    println!("{}", serde_json::to_string(&stats)?);
    Ok(())
}

fn count(input: &PathBuf, config: &CursorConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut rs = open(input, config)?;
    let mut rows = 0u64;
    while rs.next()? {
        rows += 1;
    }
    let stats = rs.stats();
    rs.close();

    println!("✓ {} rows", rows);
    println!("  Round trips: {}", stats.round_trips);
    println!("  Peak retained rows: {}", stats.peak_retained_rows);
    Ok(())
}

fn export(
    input: &PathBuf,
    output: &PathBuf,
    config: &CursorConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut rs = open(input, config)?;
    let mut writer = JsonlWriter::to_path(output, rs.schema())?;

    while let Some(row) = rs.next_row()? {
        writer.write_row(&row)?;
    }
    let written = writer.rows_written();
    writer.finish()?;
    let stats = rs.stats();
    rs.close();

    println!("✓ Exported {} rows to {}", written, output.display());
    println!("  Round trips: {}", stats.round_trips);
    Ok(())
}
