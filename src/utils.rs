use crate::schema::{LineItem, Statement};

/// Stand-in denominator for a zero prior value or zero anchor total.
///
/// Dividing by it yields a very large but finite percentage, which keeps every
/// derived figure renderable instead of producing `inf`/`NaN`.
pub const EPSILON: f64 = 1e-9;

pub fn safe_divisor(value: f64) -> f64 {
    if value == 0.0 {
        EPSILON
    } else {
        value
    }
}

/// Returns the first row whose name contains `keyword`, ignoring case.
///
/// Substring semantics are deliberate: real statements carry labels such as
/// "A. CURRENT ASSETS" or "TOTAL ASSETS (270 = 100 + 200)".
pub fn resolve_row<'a>(statement: &'a Statement, keyword: &str) -> Option<&'a LineItem> {
    resolve_row_index(statement, keyword).map(|idx| &statement.items[idx])
}

pub fn resolve_row_index(statement: &Statement, keyword: &str) -> Option<usize> {
    let needle = keyword.to_lowercase();
    statement
        .items
        .iter()
        .position(|item| item.name.to_lowercase().contains(&needle))
}
