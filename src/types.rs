//! Core data model types for the cleaning pipeline.
//!
//! A run reads a [`Header`] once, then views each input record through a transient [`Row`].
//! Filtering is driven by an optional [`WhereClause`].

use std::fmt;
use std::str::FromStr;

use csv::StringRecord;

use crate::error::{CleanError, CleanResult};

/// Comparison operator of a [`WhereClause`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `>=`
    Ge,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `<`
    Lt,
}

impl CompareOp {
    /// All operators, in the order the clause parser scans for them.
    pub const SCAN_ORDER: [CompareOp; 6] = [
        CompareOp::Eq,
        CompareOp::Ne,
        CompareOp::Ge,
        CompareOp::Le,
        CompareOp::Gt,
        CompareOp::Lt,
    ];

    /// The textual symbol for this operator.
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
            CompareOp::Ge => ">=",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Lt => "<",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for CompareOp {
    type Err = CleanError;

    fn from_str(s: &str) -> CleanResult<Self> {
        Self::SCAN_ORDER
            .into_iter()
            .find(|op| op.symbol() == s)
            .ok_or_else(|| CleanError::UnsupportedOperator { op: s.to_owned() })
    }
}

/// A single `column op value` row predicate.
///
/// Immutable once built; the column name is guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhereClause {
    column: String,
    op: CompareOp,
    value: String,
}

impl WhereClause {
    /// Build a clause from an operator symbol.
    ///
    /// Fails with [`CleanError::UnsupportedOperator`] for an unknown symbol and with
    /// [`CleanError::InvalidFilterExpression`] for an empty column name.
    pub fn new(column: impl Into<String>, op: &str, value: impl Into<String>) -> CleanResult<Self> {
        let op = op.parse::<CompareOp>()?;
        Self::with_op(column, op, value)
    }

    /// Build a clause from an already-parsed operator.
    pub fn with_op(column: impl Into<String>, op: CompareOp, value: impl Into<String>) -> CleanResult<Self> {
        let column = column.into();
        let value = value.into();
        if column.is_empty() {
            return Err(CleanError::InvalidFilterExpression {
                expression: format!("{op}{value}"),
                reason: "missing column name".to_string(),
            });
        }
        Ok(Self { column, op, value })
    }

    /// Column tested by this clause.
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Comparison operator.
    pub fn op(&self) -> CompareOp {
        self.op
    }

    /// Literal right-hand side.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for WhereClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.column, self.op, self.value)
    }
}

/// The field names of an input file, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    names: Vec<String>,
}

impl Header {
    /// Create a header from field names.
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Iterate field names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// True when the header has no fields.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Position of a field by name.
    ///
    /// With duplicate names the last occurrence wins.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().rposition(|n| n == name)
    }

    /// True when `name` is one of the header fields.
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }
}

impl From<&StringRecord> for Header {
    fn from(record: &StringRecord) -> Self {
        Self::new(record.iter().map(str::to_owned).collect())
    }
}

/// A single input record viewed as an ordered `column -> value` map.
///
/// Rows borrow the header and the record; they are built per record and dropped right after.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    header: &'a Header,
    record: &'a StringRecord,
}

impl<'a> Row<'a> {
    /// View `record` through `header`.
    pub fn new(header: &'a Header, record: &'a StringRecord) -> Self {
        Self { header, record }
    }

    /// Value of `column`, or `None` when the column is unknown or the record is too short.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        self.header
            .index_of(column)
            .and_then(|idx| self.record.get(idx))
    }

    /// Value of `column`, treating a missing value as the empty string.
    pub fn get_or_empty(&self, column: &str) -> &'a str {
        self.get(column).unwrap_or("")
    }
}

/// Field delimiter: one ASCII byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiter(u8);

impl Delimiter {
    /// Comma.
    pub const COMMA: Delimiter = Delimiter(b',');

    /// The raw delimiter byte.
    pub fn as_byte(self) -> u8 {
        self.0
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Self::COMMA
    }
}

impl fmt::Display for Delimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            b'\t' => f.write_str("\\t"),
            b => write!(f, "{}", b as char),
        }
    }
}

impl FromStr for Delimiter {
    type Err = CleanError;

    fn from_str(s: &str) -> CleanResult<Self> {
        // Shells make a literal tab awkward to type.
        if s == "\\t" {
            return Ok(Self(b'\t'));
        }
        match s.as_bytes() {
            [b] if b.is_ascii() => Ok(Self(*b)),
            _ => Err(CleanError::InvalidDelimiter { raw: s.to_owned() }),
        }
    }
}

/// Record terminator used when writing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// `\r\n`
    #[default]
    Crlf,
    /// `\n`
    Lf,
}

impl LineEnding {
    pub(crate) fn terminator(self) -> csv::Terminator {
        match self {
            LineEnding::Crlf => csv::Terminator::CRLF,
            LineEnding::Lf => csv::Terminator::Any(b'\n'),
        }
    }
}

impl FromStr for LineEnding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "crlf" => Ok(Self::Crlf),
            "lf" => Ok(Self::Lf),
            other => Err(format!("unknown line ending '{other}' (expected crlf or lf)")),
        }
    }
}
