//! Parsing of the textual `--select` list and `--where` expression.

use crate::error::{CleanError, CleanResult};
use crate::types::{CompareOp, WhereClause};

/// Quote pairs stripped (once) from a where-clause value.
const QUOTE_PAIRS: [(char, char); 4] = [('"', '"'), ('\'', '\''), ('\u{201C}', '\u{201D}'), ('\u{2018}', '\u{2019}')];

/// Parse a comma-separated column list.
///
/// Pieces are trimmed and empty pieces dropped. Returns `None` ("keep every column") when
/// nothing is left.
pub fn parse_select(text: Option<&str>) -> Option<Vec<String>> {
    let columns: Vec<String> = text?
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_owned)
        .collect();
    (!columns.is_empty()).then_some(columns)
}

/// Parse a `<column><op><value>` expression.
///
/// Operators are tried in [`CompareOp::SCAN_ORDER`]; the first one that occurs anywhere in the
/// text wins and the text is split at its first occurrence. A value such as `a>b` inside
/// `note==a>b` is therefore fine, but `a>b==c` splits at `==`.
///
/// An absent or empty expression yields `Ok(None)`.
pub fn parse_where(text: Option<&str>) -> CleanResult<Option<WhereClause>> {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    let (op, idx) = CompareOp::SCAN_ORDER
        .into_iter()
        .find_map(|op| text.find(op.symbol()).map(|idx| (op, idx)))
        .ok_or_else(|| CleanError::InvalidFilterExpression {
            expression: text.to_owned(),
            reason: "operator not found (use ==, !=, >=, <=, >, <)".to_string(),
        })?;

    let column = text[..idx].trim();
    let value = strip_quotes(&text[idx + op.symbol().len()..]);
    if column.is_empty() {
        return Err(CleanError::InvalidFilterExpression {
            expression: text.to_owned(),
            reason: "missing column name".to_string(),
        });
    }

    WhereClause::with_op(column, op, value).map(Some)
}

/// Trims outside the quotes only, so a quoted value can match a padded cell.
fn strip_quotes(raw: &str) -> &str {
    let trimmed = raw.trim();
    for (open, close) in QUOTE_PAIRS {
        if let Some(inner) = trimmed
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            return inner;
        }
    }
    trimmed
}
