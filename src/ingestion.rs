use crate::error::Result;
use crate::schema::{Cell, RawTable};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;

/// Reads a CSV export of the statement sheet into a [`RawTable`].
///
/// The first record is the header. Record lengths are not checked here so
/// that layout problems surface from the normalizer as schema errors.
pub fn read_csv_table<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = rdr.headers()?.iter().map(|h| h.to_string()).collect();
    let mut table = RawTable::new(columns);

    for record in rdr.records() {
        let record = record?;
        table.rows.push(record.iter().map(parse_cell).collect());
    }

    Ok(table)
}

pub fn read_csv_file(path: impl AsRef<Path>) -> Result<RawTable> {
    let file = std::fs::File::open(path)?;
    read_csv_table(file)
}

fn parse_cell(raw: &str) -> Cell {
    if raw.is_empty() {
        return Cell::Empty;
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Cell::Number(value),
        _ => Cell::Text(raw.to_string()),
    }
}
