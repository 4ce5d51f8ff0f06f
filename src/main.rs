//! csv-cleaner CLI - select, filter, and drop blank rows from a delimited file.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use tracing::Subscriber;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use csv_cleaner::clause::{parse_select, parse_where};
use csv_cleaner::types::{Delimiter, LineEnding};
use csv_cleaner::{CleanOptions, CleanResult, clean};

/// Target of the failed-run event. It goes to the log file only; stderr already gets the
/// error message from `main`.
const FAILURE_TARGET: &str = "csv_cleaner::failure";

/// Clean/filter a delimited text file.
#[derive(Parser)]
#[command(name = "csv-cleaner")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to input file
    input: PathBuf,

    /// Path to output file (parent directories are created)
    output: PathBuf,

    /// Comma-separated columns to keep, in output order (e.g. name,age,country)
    #[arg(long)]
    select: Option<String>,

    /// Row filter like: age>=18 or country=="Italy"
    #[arg(long = "where", value_name = "EXPR")]
    where_expr: Option<String>,

    /// Drop rows with a blank value in any output column
    #[arg(long)]
    dropna: bool,

    /// Field delimiter, a single ASCII character (`\t` for tab)
    #[arg(long, default_value = ",")]
    delimiter: String,

    /// Output line ending: crlf or lf
    #[arg(long, default_value = "crlf")]
    line_ending: LineEnding,

    /// Also append run events (info and above) to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match build_subscriber(cli.verbose, cli.log_file.as_deref()) {
        Ok(subscriber) => subscriber.init(),
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::FAILURE;
        }
    }

    match run(&cli) {
        Ok(written) => {
            println!("[OK] Wrote {written} rows to {}", cli.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            report_failure(&cli.input, &e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<usize> {
    let options = build_options(cli).context("invalid arguments")?;
    clean(&cli.input, &cli.output, &options)
        .with_context(|| format!("failed to clean {}", cli.input.display()))
}

fn build_options(cli: &Cli) -> CleanResult<CleanOptions> {
    Ok(CleanOptions {
        select: parse_select(cli.select.as_deref()),
        where_clause: parse_where(cli.where_expr.as_deref())?,
        drop_empty: cli.dropna,
        delimiter: cli.delimiter.parse::<Delimiter>()?,
        line_ending: cli.line_ending,
    })
}

/// Stderr logging at the `-v` level (or `RUST_LOG`), plus an optional plain-text log file that
/// always records `info` and above.
fn build_subscriber(
    verbose: u8,
    log_file: Option<&Path>,
) -> anyhow::Result<impl Subscriber + Send + Sync + 'static> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let stderr_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level))
        .add_directive(format!("{FAILURE_TARGET}=off").parse()?);
    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(stderr_filter);

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(LevelFilter::INFO),
            )
        }
        None => None,
    };

    Ok(tracing_subscriber::registry().with(stderr_layer).with(file_layer))
}

fn report_failure(input: &Path, e: &anyhow::Error) {
    tracing::error!(target: FAILURE_TARGET, input = %input.display(), error = %format!("{e:#}"), "clean failed");
    eprintln!("error: {e}");
    for cause in e.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("csv-cleaner").chain(args.iter().copied()))
    }

    #[test]
    fn build_options_parses_clauses_and_delimiter() {
        let args = cli(&[
            "in.csv", "out.csv", "--select", "a, b", "--where", "a>=1", "--delimiter", "\\t",
        ]);
        let options = build_options(&args).unwrap();

        assert_eq!(options.select, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(options.where_clause.unwrap().to_string(), "a>=1");
        assert_eq!(options.delimiter.as_byte(), b'\t');
        assert_eq!(options.line_ending, LineEnding::Crlf);
    }

    #[test]
    fn build_options_rejects_bad_arguments() {
        assert!(build_options(&cli(&["in.csv", "out.csv", "--where", "bogus"])).is_err());
        assert!(build_options(&cli(&["in.csv", "out.csv", "--delimiter", "::"])).is_err());
    }

    #[test]
    fn log_file_records_completed_and_failed_runs() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("run.log");
        let subscriber = build_subscriber(0, Some(&log)).unwrap();

        tracing::subscriber::with_default(subscriber, || {
            let adults = cli(&[
                "tests/fixtures/people.csv",
                dir.path().join("out.csv").to_str().unwrap(),
                "--where",
                "age>=18",
            ]);
            assert_eq!(run(&adults).unwrap(), 2);

            let missing = cli(&[
                "tests/fixtures/does_not_exist.csv",
                dir.path().join("never.csv").to_str().unwrap(),
            ]);
            let err = run(&missing).unwrap_err();
            report_failure(&missing.input, &err);
        });

        let text = std::fs::read_to_string(&log).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2, "{text}");
        assert!(lines[0].contains("clean complete"));
        assert!(lines[0].contains("rows_written=2"));
        assert!(lines[0].contains("filtered_out=1"));
        assert!(lines[1].contains("clean failed"));
        assert!(lines[1].contains("input file not found"));
    }
}
