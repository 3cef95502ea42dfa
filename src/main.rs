use std::io::{self, BufWriter, Write};
use std::ops::Range;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{LevelFilter, Log, Metadata, Record, info};

use maskgen::{Limits, PackedBuffer, Pattern};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Mask to expand, e.g. "file_(a|b)[0-9]{2}.dat"
    #[arg(value_name = "MASK")]
    mask: String,

    /// Print only the number of combinations
    #[arg(short = 'c', long)]
    count: bool,

    /// Emit only chunk I of N (1-based), e.g. 2/8
    #[arg(long, value_name = "I/N")]
    chunk: Option<String>,

    /// Largest value list a single group may expand to
    #[arg(long, value_name = "N")]
    max_node_values: Option<u64>,

    /// Largest total number of combinations
    #[arg(long, value_name = "N")]
    max_total: Option<u64>,

    /// Pack output into fixed-size slots and print the layout summary
    #[arg(short = 'p', long)]
    packed: bool,

    /// More diagnostics on stderr (repeatable)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// No diagnostics at all
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Args {
    fn limits(&self) -> Limits {
        let defaults = Limits::default();
        Limits {
            max_node_values: self.max_node_values.unwrap_or(defaults.max_node_values),
            max_total: self.max_total.unwrap_or(defaults.max_total),
        }
    }

    fn level(&self) -> LevelFilter {
        match (self.quiet, self.verbose) {
            (true, _) => LevelFilter::Off,
            (false, 0) => LevelFilter::Warn,
            (false, 1) => LevelFilter::Info,
            (false, 2) => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Parse `I/N` into the 1-based chunk index and chunk count.
fn parse_chunk(spec: &str) -> Result<(u64, u64)> {
    let (index, parts) = spec
        .split_once('/')
        .with_context(|| format!("chunk {spec:?} is not of the form I/N"))?;
    let index: u64 = index
        .trim()
        .parse()
        .with_context(|| format!("invalid chunk index {index:?}"))?;
    let parts: u64 = parts
        .trim()
        .parse()
        .with_context(|| format!("invalid chunk count {parts:?}"))?;
    if parts == 0 || index == 0 || index > parts {
        bail!("chunk {index}/{parts} is out of range");
    }
    Ok((index, parts))
}

fn run(args: &Args) -> Result<()> {
    let mut pattern = Pattern::with_limits(&args.mask, args.limits())
        .with_context(|| format!("Failed to compile mask {:?}", args.mask))?;

    if args.count {
        println!("{}", pattern.count());
        return Ok(());
    }

    let range: Range<u64> = match args.chunk.as_deref() {
        Some(spec) => {
            let (index, parts) = parse_chunk(spec)?;
            pattern.chunk(index - 1, parts)?
        }
        None => 0..pattern.count(),
    };
    info!(
        "emitting combinations {}..{} of {}",
        range.start,
        range.end,
        pattern.count()
    );

    if args.packed {
        let mut packed = PackedBuffer::new();
        pattern.collect_range(range, &mut packed)?;
        println!(
            "units={} stride={} bytes={}",
            packed.len(),
            packed.stride(),
            packed.as_bytes().len()
        );
        return Ok(());
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let skip = usize::try_from(range.start).context("chunk start does not fit in memory")?;
    let take = usize::try_from(range.end - range.start).context("chunk is too large")?;
    for value in pattern.combinations().skip(skip).take(take) {
        writeln!(out, "{value}")?;
    }
    out.flush()?;
    Ok(())
}

fn main() {
    let args = Args::parse();
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(args.level());
    }

    if let Err(err) = run(&args) {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chunk() {
        assert_eq!(parse_chunk("2/8").unwrap(), (2, 8));
        assert_eq!(parse_chunk(" 1 / 1 ").unwrap(), (1, 1));
        assert!(parse_chunk("0/4").is_err());
        assert!(parse_chunk("5/4").is_err());
        assert!(parse_chunk("3").is_err());
        assert!(parse_chunk("a/b").is_err());
    }

    #[test]
    fn test_chunk_with_huge_count_is_cheap() {
        let (index, parts) = parse_chunk("3/18446744073709551615").unwrap();
        let pattern = Pattern::new("[num]").unwrap();
        assert_eq!(pattern.chunk(index - 1, parts).unwrap(), 2..3);
    }

    #[test]
    fn test_args_map_onto_limits() {
        let args = Args::parse_from(["maskgen", "--max-total", "10", "[num]"]);
        assert_eq!(args.limits().max_total, 10);
        assert_eq!(args.limits().max_node_values, Limits::default().max_node_values);
        assert_eq!(args.level(), LevelFilter::Warn);
        let args = Args::parse_from(["maskgen", "-vv", "x"]);
        assert_eq!(args.level(), LevelFilter::Debug);
    }
}
