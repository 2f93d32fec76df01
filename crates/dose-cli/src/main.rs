//! `doses` CLI -- schedule a stream of two-dose requests onto the fewest timelines.
//!
//! ## Usage
//!
//! ```sh
//! # Header (first dose, second dose, gap) followed by requests, ended by `x`
//! printf '3\n3\n0\n1, 1, 0, 3\nx\n' | doses
//!
//! # Run parameters as flags, requests from a file
//! doses --first 3 --second 3 --gap 0 -i requests.txt
//!
//! # Zero-based input and output, JSON report
//! doses --zero-based --format json -i input.txt -o schedule.json
//!
//! # Print the occupancy of every timeline to stderr
//! doses --show-timelines -i input.txt
//! ```

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dose_engine::{Allocator, IndexBase, RequestStream, RunConfig, Schedule};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "doses",
    version,
    about = "Online two-dose allocator: packs each request onto the fewest timelines"
)]
struct Cli {
    /// Input file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<String>,

    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<String>,

    /// First dose duration; without the three run flags they are read from the input header
    #[arg(long, requires_all = ["second", "gap"])]
    first: Option<usize>,

    /// Second dose duration
    #[arg(long, requires_all = ["first", "gap"])]
    second: Option<usize>,

    /// Minimum gap between the first dose and the second window
    #[arg(long, requires_all = ["first", "second"])]
    gap: Option<usize>,

    /// Read and write times and timeline numbers counted from 0 instead of 1
    #[arg(long)]
    zero_based: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Print every timeline's occupancy to stderr after the run
    #[arg(long)]
    show_timelines: bool,

    /// Log scheduling decisions (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    enable_tracing(cli.verbose);

    let base = if cli.zero_based {
        IndexBase::Zero
    } else {
        IndexBase::One
    };

    let mut stream = RequestStream::new(read_input(cli.input.as_deref())?, base);
    let config = match (cli.first, cli.second, cli.gap) {
        (Some(first), Some(second), Some(gap)) => {
            RunConfig::new(first, second, gap).context("Invalid run parameters")?
        }
        _ => stream
            .read_config()
            .context("Failed to read the run configuration header")?,
    };

    let mut allocator = Allocator::new(config);
    let mut placements = Vec::new();
    for request in stream {
        let request = request.context("Failed to read request")?;
        let placement = allocator
            .schedule(&request)
            .with_context(|| format!("Failed to schedule request {}", request.id))?;
        placements.push(placement);
    }

    info!(
        requests = placements.len(),
        timelines = allocator.timeline_count(),
        "allocation finished"
    );

    if cli.show_timelines {
        for timeline in allocator.timelines() {
            eprintln!("{:>4}: {}", timeline.id().0 + base.offset(), timeline);
        }
    }

    let schedule = Schedule {
        config,
        placements,
        timeline_count: allocator.timeline_count(),
    };
    let rendered = match cli.format {
        OutputFormat::Text => schedule.to_text(base),
        OutputFormat::Json => schedule
            .to_json(base)
            .context("Failed to serialize schedule")?,
    };

    write_output(cli.output.as_deref(), &rendered)
}

fn enable_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}

fn read_input(path: Option<&str>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(path) => {
            let file = File::open(path).with_context(|| format!("Failed to read file: {}", path))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
