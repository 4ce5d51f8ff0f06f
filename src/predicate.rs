//! Evaluation of a [`WhereClause`] against a single [`Row`].
//!
//! Both sides are compared as numbers when both parse as `f64`, otherwise as strings
//! (byte order, which for UTF-8 is code point order).

use crate::types::{CompareOp, Row, WhereClause};

/// The two operands of a comparison, after numeric coercion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Comparison<'a> {
    /// Both sides parsed as numbers.
    Numeric(f64, f64),
    /// At least one side is not a number; compare the raw strings.
    Text(&'a str, &'a str),
}

impl<'a> Comparison<'a> {
    /// Coerce a pair of raw values.
    pub fn of(left: &'a str, right: &'a str) -> Self {
        match (parse_number(left), parse_number(right)) {
            (Some(l), Some(r)) => Comparison::Numeric(l, r),
            _ => Comparison::Text(left, right),
        }
    }

    /// Apply `op` to the operands.
    ///
    /// NaN never compares equal or ordered, so every operator except `!=` is false for it.
    pub fn holds(&self, op: CompareOp) -> bool {
        match *self {
            Comparison::Numeric(l, r) => apply(op, &l, &r),
            Comparison::Text(l, r) => apply(op, l, r),
        }
    }
}

fn apply<T: PartialOrd + ?Sized>(op: CompareOp, l: &T, r: &T) -> bool {
    match op {
        CompareOp::Eq => l == r,
        CompareOp::Ne => l != r,
        CompareOp::Ge => l >= r,
        CompareOp::Le => l <= r,
        CompareOp::Gt => l > r,
        CompareOp::Lt => l < r,
    }
}

/// Parse a cell as a number, tolerating surrounding whitespace.
///
/// This is `f64::from_str`: exponents and `inf`/`nan` are accepted, `_` digit separators
/// (`1_000`) are not, so such cells compare as strings.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

/// Compare two raw values with `op`.
pub fn compare(left: &str, op: CompareOp, right: &str) -> bool {
    Comparison::of(left, right).holds(op)
}

/// Returns `true` when `row` satisfies `clause`.
///
/// A column missing from the row is treated as the empty string.
pub fn row_matches(row: &Row<'_>, clause: &WhereClause) -> bool {
    compare(row.get_or_empty(clause.column()), clause.op(), clause.value())
}

#[cfg(test)]
mod tests {
    use csv::StringRecord;
    use rstest::rstest;

    use super::*;
    use crate::types::Header;

    #[test]
    fn numeric_path_is_taken_when_both_sides_parse() {
        assert_eq!(Comparison::of("9", "10"), Comparison::Numeric(9.0, 10.0));
        assert!(compare("9", CompareOp::Lt, "10"));
        // Lexicographically "9" > "10".
        assert!(Comparison::Text("9", "10").holds(CompareOp::Gt));
    }

    #[test]
    fn text_path_when_either_side_is_not_numeric() {
        assert_eq!(Comparison::of("9", "ten"), Comparison::Text("9", "ten"));
        assert_eq!(Comparison::of("", "0"), Comparison::Text("", "0"));
    }

    #[rstest]
    #[case("18", CompareOp::Ge, "18", true)]
    #[case("17", CompareOp::Ge, "18", false)]
    #[case("18.0", CompareOp::Eq, "18", true)]
    #[case(" 5 ", CompareOp::Eq, "5", true)]
    #[case("1e3", CompareOp::Gt, "999", true)]
    #[case("Italy", CompareOp::Eq, "Italy", true)]
    #[case("Italy", CompareOp::Ne, "France", true)]
    #[case("apple", CompareOp::Lt, "banana", true)]
    #[case("Zebra", CompareOp::Lt, "apple", true)]
    #[case("b", CompareOp::Le, "a", false)]
    #[case("1_000", CompareOp::Gt, "999", false)]
    fn compare_cases(#[case] left: &str, #[case] op: CompareOp, #[case] right: &str, #[case] expected: bool) {
        assert_eq!(compare(left, op, right), expected);
    }

    #[test]
    fn nan_only_satisfies_not_equal() {
        for op in CompareOp::SCAN_ORDER {
            assert_eq!(compare("nan", op, "1"), op == CompareOp::Ne, "{op}");
        }
    }

    #[test]
    fn row_matches_reads_clause_column() {
        let header = Header::new(vec!["name".into(), "age".into()]);
        let record = StringRecord::from(vec!["Bo", "22"]);
        let row = Row::new(&header, &record);

        let adult = WhereClause::new("age", ">=", "18").unwrap();
        let minor = WhereClause::new("age", "<", "18").unwrap();
        assert!(row_matches(&row, &adult));
        assert!(!row_matches(&row, &minor));
    }

    #[test]
    fn row_matches_treats_missing_column_as_empty() {
        let header = Header::new(vec!["name".into()]);
        let record = StringRecord::from(vec!["Bo"]);
        let row = Row::new(&header, &record);

        assert!(row_matches(&row, &WhereClause::new("city", "==", "").unwrap()));
        assert!(!row_matches(&row, &WhereClause::new("city", "==", "Rome").unwrap()));
    }
}
