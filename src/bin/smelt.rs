//! smelt: Denormalize JSON:API response documents into plain records
//!
//! Usage:
//!   # Read from file, output to stdout
//!   smelt response.json
//!
//!   # Read from stdin, output to stdout
//!   curl -s https://api.example.com/books | smelt
//!
//!   # Process NDJSON (one JSON:API document per line)
//!   smelt --ndjson responses.jsonl
//!
//!   # Pretty-print the denormalized output
//!   smelt --pretty response.json

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use smelt::JsonApiReader;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};

#[derive(Parser, Debug)]
#[command(name = "smelt")]
#[command(about = "Denormalize JSON:API response documents into plain records", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<String>,

    /// Process newline-delimited input (one JSON:API document per line)
    #[arg(long)]
    ndjson: bool,

    /// Pretty-print output instead of compact JSON lines
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let reader: Box<dyn Read> = if let Some(file_path) = &args.input {
        Box::new(BufReader::new(
            File::open(file_path).context(format!("Failed to open file: {}", file_path))?,
        ))
    } else {
        Box::new(std::io::stdin())
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let json_api = JsonApiReader::new();

    if args.ndjson {
        process_lines(reader, &json_api, args.pretty, &mut out)?;
    } else {
        process_document(reader, &json_api, args.pretty, &mut out)?;
    }

    out.flush().context("Failed to flush output")?;
    Ok(())
}

/// Parse a single JSON:API document from the whole input.
///
/// Tries SIMD-accelerated parsing first and falls back to serde_json, so a
/// decode error is reported from the conventional parser.
fn process_document<R: Read>(
    mut reader: R,
    json_api: &JsonApiReader,
    pretty: bool,
    out: &mut impl Write,
) -> Result<()> {
    let mut content = Vec::new();
    reader
        .read_to_end(&mut content)
        .context("Failed to read input")?;

    // simd-json mutates its buffer, so give it a scratch copy and keep the
    // original for the fallback path.
    let mut simd_buf = content.clone();
    let document: Value = match simd_json::serde::from_slice(&mut simd_buf) {
        Ok(value) => value,
        Err(_) => serde_json::from_slice(&content).context("Failed to parse JSON")?,
    };

    let parsed = json_api.parse(&document)?;
    write_parsed(&parsed, pretty, out)
}

/// Parse one JSON:API document per input line, emitting one result per line.
fn process_lines<R: Read>(
    reader: R,
    json_api: &JsonApiReader,
    pretty: bool,
    out: &mut impl Write,
) -> Result<()> {
    for line in BufReader::new(reader).lines() {
        let line = line.context("Failed to read line")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let document: Value = serde_json::from_str(line).context("Failed to parse JSON")?;
        let parsed = json_api.parse(&document)?;
        write_parsed(&parsed, pretty, out)?;
    }

    Ok(())
}

fn write_parsed(parsed: &smelt::Parsed, pretty: bool, out: &mut impl Write) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(parsed).context("Failed to serialize output")?
    } else {
        serde_json::to_string(parsed).context("Failed to serialize output")?
    };
    writeln!(out, "{}", json).context("Failed to write output")?;
    Ok(())
}
