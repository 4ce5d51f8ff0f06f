//! `csv-cleaner` streams a delimited text file through an optional column projection, an
//! optional single-predicate row filter, and an optional blank-value drop, writing the surviving
//! rows to a new file.
//!
//! The primary entrypoint is [`pipeline::clean`], configured with [`pipeline::CleanOptions`].
//! The textual forms accepted on the command line are parsed by [`clause::parse_select`] and
//! [`clause::parse_where`].
//!
//! ## What a run does
//!
//! 1. Checks that the input exists and reads its header (a UTF-8 byte-order mark is skipped).
//! 2. Validates that every selected column is in the header; output columns follow the select
//!    order, or the header order when nothing is selected.
//! 3. For each record, projects the output values, drops the record if `drop_empty` is set and
//!    any projected value is blank, and drops it if the where-clause does not hold for the
//!    *full* input row.
//! 4. Writes the remaining records and returns how many were written.
//!
//! ## Where-clause semantics
//!
//! A clause is `<column><op><value>` with `op` one of `==`, `!=`, `>=`, `<=`, `>`, `<`. When both
//! the cell and the literal parse as numbers they are compared numerically, otherwise as
//! strings:
//!
//! ```rust
//! use csv_cleaner::predicate::compare;
//! use csv_cleaner::types::CompareOp;
//!
//! assert!(compare("9", CompareOp::Lt, "10"));        // 9 < 10
//! assert!(compare("9", CompareOp::Gt, "10 apples")); // "9" > "10 apples"
//! ```
//!
//! ## Example
//!
//! ```rust
//! use csv_cleaner::clause::{parse_select, parse_where};
//! use csv_cleaner::pipeline::{CleanOptions, clean_reader};
//! use csv_cleaner::types::LineEnding;
//!
//! # fn main() -> Result<(), csv_cleaner::CleanError> {
//! let input = "name,age,country\nAnn,17,Italy\nBo,22,Italy\nCy,30,France\n";
//! let opts = CleanOptions {
//!     select: parse_select(Some("name,country")),
//!     where_clause: parse_where(Some("age>=18"))?,
//!     line_ending: LineEnding::Lf,
//!     ..Default::default()
//! };
//!
//! let mut out = Vec::new();
//! let stats = clean_reader(input.as_bytes(), &mut out, &opts)?;
//! assert_eq!(stats.rows_written, 2);
//! assert_eq!(String::from_utf8(out).unwrap(), "name,country\nBo,Italy\nCy,France\n");
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`clause`]: parsing of the select list and where expression
//! - [`predicate`]: where-clause evaluation with numeric coercion
//! - [`pipeline`]: the streaming clean run
//! - [`types`]: clause, header, row, and format types
//! - [`error`]: error type shared across the crate

pub mod clause;
pub mod error;
pub mod pipeline;
pub mod predicate;
pub mod types;

pub use error::{CleanError, CleanResult};
pub use pipeline::{CleanOptions, CleanRequest, CleanStats, clean, clean_reader, clean_with_stats};
