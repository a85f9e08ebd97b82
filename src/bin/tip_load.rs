//! tip-load: parse a delimited file into columns and report what was loaded.
//!
//! Usage:
//!   tip-load data.csv --types int,float,str --skip 1 --head 5
//!   tip-load data.tsv --options load.json --json
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`
//! (e.g. `RUST_LOG=tip=debug`).

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use tip::{Column, ColumnSet, ColumnType, MalformedPolicy, ParseOptions, TrailingRecord};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Policy {
    Sentinel,
    Abort,
}

#[derive(Debug, Parser)]
#[command(name = "tip-load", version, about = "Load delimited text into typed columns")]
struct Args {
    /// Input file
    file: PathBuf,

    /// Column types, comma separated (int, float, str)
    #[arg(short, long, required_unless_present = "options")]
    types: Option<String>,

    /// JSON options file; command-line flags override its values
    #[arg(long)]
    options: Option<PathBuf>,

    /// Field delimiter (single byte; `\t` accepted)
    #[arg(short, long)]
    delim: Option<String>,

    /// Record delimiter (single byte; `\n` accepted)
    #[arg(long)]
    eor: Option<String>,

    /// Leading records to skip
    #[arg(short, long)]
    skip: Option<u64>,

    /// Malformed field policy
    #[arg(long, value_enum)]
    policy: Option<Policy>,

    /// Ignore bytes after the last record delimiter
    #[arg(long)]
    drop_trailing: bool,

    /// Initial row capacity (estimated from the file when omitted)
    #[arg(long)]
    initial_rows: Option<usize>,

    /// Print stats as JSON instead of a text summary
    #[arg(long)]
    json: bool,

    /// Print the first N rows
    #[arg(long, default_value_t = 0)]
    head: usize,
}

/// Parse a delimiter argument, accepting a few escapes.
fn delimiter_byte(arg: &str) -> Result<u8> {
    match arg {
        "\\t" => Ok(b'\t'),
        "\\n" => Ok(b'\n'),
        "\\r" => Ok(b'\r'),
        "\\0" => Ok(0),
        _ => match arg.as_bytes() {
            [b] => Ok(*b),
            _ => bail!("delimiter must be a single byte, got {:?}", arg),
        },
    }
}

fn build_options(args: &Args) -> Result<ParseOptions> {
    let mut options = match &args.options {
        Some(path) => ParseOptions::from_json_file(path)
            .with_context(|| format!("reading options from {}", path.display()))?,
        None => ParseOptions::new(Vec::new()),
    };
    if let Some(types) = &args.types {
        options.types = ColumnType::parse_list(types)?;
    }
    if let Some(d) = &args.delim {
        options.delimiter = delimiter_byte(d)?;
    }
    if let Some(e) = &args.eor {
        options.record_delimiter = delimiter_byte(e)?;
    }
    if let Some(skip) = args.skip {
        options.skip_records = skip;
    }
    if let Some(policy) = args.policy {
        options.malformed = match policy {
            Policy::Sentinel => MalformedPolicy::Sentinel,
            Policy::Abort => MalformedPolicy::Abort,
        };
    }
    if args.drop_trailing {
        options.trailing = TrailingRecord::Drop;
    }
    if args.initial_rows.is_some() {
        options.initial_rows = args.initial_rows;
    }
    options.validate()?;
    Ok(options)
}

fn format_cell(columns: &ColumnSet, col: usize, row: usize) -> String {
    match columns.column(col) {
        Some(Column::Integer(c)) => c.get(row).map(|v| v.to_string()),
        Some(Column::Float(c)) => c.get(row).map(|v| v.to_string()),
        Some(Column::String(c)) => c
            .get_bytes(row)
            .map(|b| String::from_utf8_lossy(b).into_owned()),
        None => None,
    }
    .unwrap_or_default()
}

fn run(args: Args) -> Result<()> {
    let options = build_options(&args)?;
    let parsed = tip::parse_path(&args.file, &options)
        .with_context(|| format!("parsing {}", args.file.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&parsed.stats)?);
    } else {
        let stats = &parsed.stats;
        println!("file:        {}", args.file.display());
        println!("columns:     {}", parsed.columns.num_columns());
        println!("records:     {}", parsed.record_count);
        println!("skipped:     {}", stats.records_skipped);
        println!("bytes:       {}", stats.bytes_scanned);
        println!("coerced:     {} malformed, {} short, {} long",
            stats.malformed_fields, stats.short_records, stats.long_records);
        println!("growths:     {} rows, {} bytes", stats.row_growths, stats.byte_growths);
        println!("elapsed:     {:.3} ms ({:.1} MB/s)",
            stats.elapsed_us as f64 / 1000.0, stats.throughput_mb_s());
    }

    let rows = args.head.min(parsed.columns.len());
    if rows > 0 {
        println!();
        for row in 0..rows {
            let cells: Vec<String> = (0..parsed.columns.num_columns())
                .map(|col| format_cell(&parsed.columns, col, row))
                .collect();
            println!("{}", cells.join("\t"));
        }
    }

    tip::free_columns(parsed.columns);
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e
                .downcast_ref::<tip::TipError>()
                .map(|t| t.code())
                .unwrap_or("ERROR");
            eprintln!("[tip-load] {}: {:#}", code, e);
            ExitCode::FAILURE
        }
    }
}
