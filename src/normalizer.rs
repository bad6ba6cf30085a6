use crate::error::{Result, StatementError};
use crate::schema::{Cell, LineItem, RawTable, Statement};
use log::debug;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

pub const EXPECTED_COLUMNS: usize = 3;

/// Converts an uploaded table into a [`Statement`].
///
/// Only the layout is validated: the header and every row must have exactly
/// three cells. Value cells that cannot be read as a finite number become `0`.
pub fn normalize(table: &RawTable) -> Result<Statement> {
    if table.columns.len() != EXPECTED_COLUMNS {
        return Err(StatementError::Schema(format!(
            "expected {} columns (item, prior, current), found {}",
            EXPECTED_COLUMNS,
            table.columns.len()
        )));
    }

    let mut items = Vec::with_capacity(table.rows.len());
    for (idx, row) in table.rows.iter().enumerate() {
        let [name, prior, current] = row.as_slice() else {
            return Err(StatementError::Schema(format!(
                "row {} has {} cells, expected {}",
                idx + 1,
                row.len(),
                EXPECTED_COLUMNS
            )));
        };

        items.push(LineItem {
            name: cell_text(name),
            prior_value: coerce_number(prior),
            current_value: coerce_number(current),
        });
    }

    debug!("Normalized {} statement rows", items.len());
    Ok(Statement::new(items))
}

pub fn coerce_number(cell: &Cell) -> f64 {
    let value = match cell {
        Cell::Number(n) => *n,
        Cell::Text(s) => parse_number_text(s).unwrap_or(0.0),
        Cell::Empty => 0.0,
    };

    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Accepts a plain float (`-1250.5`, `1e6`) or comma-grouped thousands
/// (`1,250,000.75`). Anything else is not a number.
fn parse_number_text(raw: &str) -> Option<f64> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    let value = if text.contains(',') {
        parse_grouped(text)?
    } else {
        text.parse::<f64>().ok()?
    };
    Some(value).filter(|v| v.is_finite())
}

fn parse_grouped(text: &str) -> Option<f64> {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    let mut groups = int_part.split(',');
    let head = groups.next()?;
    if !all_digits(head) || head.len() > 3 {
        return None;
    }
    if !groups.all(|g| g.len() == 3 && all_digits(g)) {
        return None;
    }
    if let Some(frac) = frac_part {
        if !all_digits(frac) {
            return None;
        }
    }

    text.replace(',', "").parse::<f64>().ok()
}

fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Text(s) => s.clone(),
        Cell::Number(n) => n.to_string(),
        Cell::Empty => String::new(),
    }
}

/// Content fingerprint of a table, used as the memoization key.
pub fn table_fingerprint(table: &RawTable) -> u64 {
    let mut hasher = DefaultHasher::new();
    table.columns.hash(&mut hasher);
    table.rows.len().hash(&mut hasher);
    for row in &table.rows {
        row.len().hash(&mut hasher);
        for cell in row {
            match cell {
                Cell::Number(n) => {
                    0u8.hash(&mut hasher);
                    n.to_bits().hash(&mut hasher);
                }
                Cell::Text(s) => {
                    1u8.hash(&mut hasher);
                    s.hash(&mut hasher);
                }
                Cell::Empty => 2u8.hash(&mut hasher),
            }
        }
    }
    hasher.finish()
}

/// One-entry cache so a given upload is normalized at most once per session.
#[derive(Debug, Default)]
pub struct NormalizationCache {
    entry: Option<(u64, Arc<Statement>)>,
    misses: usize,
}

impl NormalizationCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_normalize(&mut self, table: &RawTable) -> Result<Arc<Statement>> {
        let key = table_fingerprint(table);
        if let Some((cached_key, statement)) = &self.entry {
            if *cached_key == key {
                debug!("Normalization cache hit for table {:016x}", key);
                return Ok(Arc::clone(statement));
            }
        }

        // A schema failure leaves the previous entry in place.
        let statement = Arc::new(normalize(table)?);
        self.misses += 1;
        self.entry = Some((key, Arc::clone(&statement)));
        Ok(statement)
    }

    /// Number of times a table was actually normalized.
    pub fn normalizations(&self) -> usize {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Vec<String> {
        vec!["Item".into(), "Prior".into(), "Current".into()]
    }

    #[test]
    fn test_unparseable_cells_become_zero() {
        let table = RawTable::new(columns())
            .with_row(vec!["CASH".into(), Cell::text("n/a"), Cell::Empty])
            .with_row(vec!["INVENTORY".into(), Cell::text(" 1,250 "), Cell::Number(f64::NAN)]);

        let statement = normalize(&table).unwrap();

        assert_eq!(statement.items[0], LineItem::new("CASH", 0.0, 0.0));
        assert_eq!(statement.items[1], LineItem::new("INVENTORY", 1250.0, 0.0));
    }

    #[test]
    fn test_malformed_number_text_is_zero() {
        for text in ["1.000,50", "1 2", "12,34,5", "1,2345", ",100", "1,000.5.5", "1_000", "1,000.-5"] {
            assert_eq!(coerce_number(&Cell::text(text)), 0.0, "{:?}", text);
        }
    }

    #[test]
    fn test_grouped_thousands() {
        assert_eq!(coerce_number(&Cell::text("1,250,000.75")), 1_250_000.75);
        assert_eq!(coerce_number(&Cell::text("-12,345")), -12_345.0);
        assert_eq!(coerce_number(&Cell::text("999")), 999.0);
        assert_eq!(coerce_number(&Cell::text("1e3")), 1000.0);
    }

    #[test]
    fn test_infinite_text_is_not_a_number() {
        assert_eq!(coerce_number(&Cell::text("inf")), 0.0);
        assert_eq!(coerce_number(&Cell::text("-12.5")), -12.5);
    }

    #[test]
    fn test_wrong_column_count_is_schema_error() {
        let table = RawTable::new(vec!["Item".into(), "Prior".into()]);
        assert!(matches!(normalize(&table), Err(StatementError::Schema(_))));

        let ragged = RawTable::new(columns()).with_row(vec!["CASH".into(), 1.0.into()]);
        assert!(matches!(normalize(&ragged), Err(StatementError::Schema(_))));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let table = RawTable::new(columns())
            .with_row(vec!["TOTAL ASSETS".into(), 100.0.into(), Cell::text("150")])
            .with_row(vec![Cell::Number(2023.0), Cell::text("x"), 3.5.into()]);

        let once = normalize(&table).unwrap();
        let twice = normalize(&once.to_raw_table()).unwrap();

        assert_eq!(once, twice);
        assert_eq!(once.items[1].name, "2023");
    }

    #[test]
    fn test_cache_normalizes_once_per_table() {
        let table = RawTable::new(columns()).with_row(vec!["CASH".into(), 1.0.into(), 2.0.into()]);
        let other = RawTable::new(columns()).with_row(vec!["CASH".into(), 1.0.into(), 3.0.into()]);
        let mut cache = NormalizationCache::new();

        let first = cache.get_or_normalize(&table).unwrap();
        let again = cache.get_or_normalize(&table.clone()).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(cache.normalizations(), 1);

        cache.get_or_normalize(&other).unwrap();
        assert_eq!(cache.normalizations(), 2);
    }
}
