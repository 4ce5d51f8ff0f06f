//! The streaming read → project → filter → write loop.
//!
//! Most callers should use [`clean`], which:
//!
//! - validates the input path and header before touching the output
//! - projects every record onto the selected columns (or all header columns)
//! - drops records with blank projected values when [`CleanOptions::drop_empty`] is set
//! - keeps only records whose *full* row satisfies [`CleanOptions::where_clause`]
//! - logs the row counters of a finished run as a single `info` event
//!
//! Records are processed one at a time; the input is never buffered in full.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read, Write};
use std::path::{Path, PathBuf};

use csv::StringRecord;

use crate::error::{CleanError, CleanResult};
use crate::predicate::row_matches;
use crate::types::{Delimiter, Header, LineEnding, Row, WhereClause};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Options controlling a cleaning run.
///
/// Use [`Default`] for a plain copy (all columns, no filter, comma-delimited).
#[derive(Debug, Clone, Default)]
pub struct CleanOptions {
    /// Output columns, in output order. `None` keeps every header column.
    pub select: Option<Vec<String>>,
    /// Row predicate, evaluated against the full input row.
    pub where_clause: Option<WhereClause>,
    /// Skip records where any projected value is blank after trimming.
    pub drop_empty: bool,
    /// Field delimiter for both input and output.
    pub delimiter: Delimiter,
    /// Record terminator for output.
    pub line_ending: LineEnding,
}

/// Row counters for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanStats {
    /// Data records read (header excluded).
    pub rows_read: usize,
    /// Records written (header excluded).
    pub rows_written: usize,
    /// Records skipped for a blank projected value.
    pub dropped_empty: usize,
    /// Records skipped by the where-clause.
    pub filtered_out: usize,
}

/// Clean `input` into `output` and return the number of data rows written.
///
/// # Errors
///
/// - [`CleanError::FileNotFound`] if `input` does not exist
/// - [`CleanError::MissingHeader`] if `input` has no header record
/// - [`CleanError::ColumnsNotFound`] if a selected column is not in the header; `output` is
///   left untouched in that case
/// - [`CleanError::Io`] / [`CleanError::Csv`] for read/write failures mid-stream, in which
///   case `output` holds whatever was flushed
///
/// # Examples
///
/// ```no_run
/// use csv_cleaner::clause::{parse_select, parse_where};
/// use csv_cleaner::pipeline::{clean, CleanOptions};
///
/// # fn main() -> Result<(), csv_cleaner::CleanError> {
/// let opts = CleanOptions {
///     select: parse_select(Some("name,country")),
///     where_clause: parse_where(Some("age>=18"))?,
///     ..Default::default()
/// };
/// let written = clean("people.csv", "out/adults.csv", &opts)?;
/// println!("wrote {written} rows");
/// # Ok(())
/// # }
/// ```
pub fn clean(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &CleanOptions,
) -> CleanResult<usize> {
    clean_with_stats(input, output, options).map(|stats| stats.rows_written)
}

/// Like [`clean`], but returns the full [`CleanStats`].
///
/// Both paths are made absolute first so errors and log events name the real location.
pub fn clean_with_stats(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    options: &CleanOptions,
) -> CleanResult<CleanStats> {
    clean_paths(&absolute(input.as_ref()), &absolute(output.as_ref()), options)
}

/// Run the pipeline over an arbitrary reader/writer pair.
///
/// A leading UTF-8 byte-order mark on `reader` is skipped.
pub fn clean_reader<R: Read, W: Write>(
    reader: R,
    writer: W,
    options: &CleanOptions,
) -> CleanResult<CleanStats> {
    let mut rdr = reader_builder(options).from_reader(skip_bom(BufReader::new(reader))?);
    let header = read_header(&mut rdr)?;
    let projection = Projection::resolve(&header, options.select.as_deref())?;
    let mut wtr = writer_builder(options).from_writer(writer);
    stream_records(&mut rdr, &header, &projection, options, &mut wtr)
}

fn clean_paths(input: &Path, output: &Path, options: &CleanOptions) -> CleanResult<CleanStats> {
    tracing::debug!(
        input = %input.display(),
        output = %output.display(),
        select = ?options.select,
        where_clause = ?options.where_clause.as_ref().map(ToString::to_string),
        drop_empty = options.drop_empty,
        delimiter = %options.delimiter,
        "starting clean"
    );

    if !input.exists() {
        return Err(CleanError::FileNotFound {
            path: input.to_path_buf(),
        });
    }

    let file = File::open(input)?;
    let mut rdr = reader_builder(options).from_reader(skip_bom(BufReader::new(file))?);
    let header = read_header(&mut rdr)?;
    let projection = Projection::resolve(&header, options.select.as_deref())?;

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut wtr = writer_builder(options).from_path(output)?;
    let stats = stream_records(&mut rdr, &header, &projection, options, &mut wtr)?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        rows_read = stats.rows_read,
        rows_written = stats.rows_written,
        dropped_empty = stats.dropped_empty,
        filtered_out = stats.filtered_out,
        "clean complete"
    );
    Ok(stats)
}

/// Output column names plus the input position each one is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Projection {
    names: Vec<String>,
    indices: Vec<usize>,
}

impl Projection {
    fn resolve(header: &Header, select: Option<&[String]>) -> CleanResult<Self> {
        let names: Vec<String> = match select {
            Some(cols) => {
                let missing: Vec<String> = cols
                    .iter()
                    .filter(|c| !header.contains(c))
                    .cloned()
                    .collect();
                if !missing.is_empty() {
                    return Err(CleanError::ColumnsNotFound {
                        missing,
                        available: header.names().map(str::to_owned).collect(),
                    });
                }
                cols.to_vec()
            }
            None => header.names().map(str::to_owned).collect(),
        };

        let indices = names
            .iter()
            .filter_map(|name| header.index_of(name))
            .collect();

        tracing::debug!(columns = ?names, "resolved output columns");
        Ok(Self { names, indices })
    }

    fn project<'r>(&self, record: &'r StringRecord) -> Vec<&'r str> {
        self.indices
            .iter()
            .map(|&idx| record.get(idx).unwrap_or(""))
            .collect()
    }
}

fn stream_records<R: Read, W: Write>(
    rdr: &mut csv::Reader<R>,
    header: &Header,
    projection: &Projection,
    options: &CleanOptions,
    wtr: &mut csv::Writer<W>,
) -> CleanResult<CleanStats> {
    wtr.write_record(&projection.names)?;

    let mut stats = CleanStats::default();
    let mut record = StringRecord::new();
    while rdr.read_record(&mut record)? {
        stats.rows_read += 1;
        let values = projection.project(&record);

        if options.drop_empty && values.iter().any(|v| v.trim().is_empty()) {
            tracing::trace!(row = stats.rows_read, "dropping row with blank value");
            stats.dropped_empty += 1;
            continue;
        }

        if let Some(clause) = options.where_clause.as_ref() {
            if !row_matches(&Row::new(header, &record), clause) {
                tracing::trace!(row = stats.rows_read, "row rejected by where-clause");
                stats.filtered_out += 1;
                continue;
            }
        }

        wtr.write_record(&values)?;
        stats.rows_written += 1;
    }

    wtr.flush()?;
    Ok(stats)
}

fn read_header<R: Read>(rdr: &mut csv::Reader<R>) -> CleanResult<Header> {
    let header = Header::from(rdr.headers()?);
    if header.is_empty() {
        return Err(CleanError::MissingHeader);
    }
    Ok(header)
}

fn reader_builder(options: &CleanOptions) -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .flexible(true)
        .delimiter(options.delimiter.as_byte());
    builder
}

fn writer_builder(options: &CleanOptions) -> csv::WriterBuilder {
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(options.delimiter.as_byte())
        .terminator(options.line_ending.terminator())
        .quote_style(csv::QuoteStyle::Necessary);
    builder
}

fn skip_bom<R: BufRead>(mut reader: R) -> io::Result<R> {
    if reader.fill_buf()?.starts_with(UTF8_BOM) {
        reader.consume(UTF8_BOM.len());
    }
    Ok(reader)
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Convenience helper for callers that want an owned request object.
#[derive(Debug, Clone)]
pub struct CleanRequest {
    /// Path to the input file.
    pub input: PathBuf,
    /// Path to the output file.
    pub output: PathBuf,
    /// Options controlling the run.
    pub options: CleanOptions,
}

impl CleanRequest {
    /// Execute the request by calling [`clean_with_stats`].
    pub fn run(&self) -> CleanResult<CleanStats> {
        clean_with_stats(&self.input, &self.output, &self.options)
    }
}
