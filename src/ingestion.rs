//! Reads a comma-separated ledger into a [`TransactionTable`].
//!
//! Only the structure of the source is checked here: it must exist, carry a
//! header row and at least one record, and, if the date column is present,
//! every date must be in `YYYY-MM-DD` form. Which columns are required is the
//! validator's concern.

use crate::error::{EstimatorError, Result};
use crate::schema::{Cell, Column, ColumnNames, TransactionTable};
use crate::utils::parse_iso_date;
use csv::Trim;
use log::debug;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub fn load_transactions(
    path: impl AsRef<Path>,
    columns: &ColumnNames,
) -> Result<TransactionTable> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(EstimatorError::NotFound(path.to_path_buf()));
    }

    debug!("Loading transactions from {}", path.display());
    let file = File::open(path)?;
    load_transactions_from_reader(BufReader::new(file), columns)
}

/// Same contract as [`load_transactions`], minus the existence check.
pub fn load_transactions_from_reader<R: Read>(
    reader: R,
    columns: &ColumnNames,
) -> Result<TransactionTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(EstimatorError::EmptyDataset);
    }

    let date_index = headers.iter().position(|h| *h == columns.date);
    let mut cells: Vec<Vec<Cell>> = vec![Vec::new(); headers.len()];

    for (idx, record) in csv_reader.records().enumerate() {
        let record = record?;
        for (col, raw) in record.iter().enumerate() {
            let cell = if Some(col) == date_index {
                let date = parse_iso_date(raw).ok_or_else(|| EstimatorError::InvalidDateFormat {
                    row: idx + 1,
                    value: raw.to_string(),
                })?;
                Cell::Date(date)
            } else {
                Cell::infer(raw)
            };
            cells[col].push(cell);
        }
    }

    let table = TransactionTable::new(
        headers
            .into_iter()
            .zip(cells)
            .map(|(name, cells)| Column::new(name, cells))
            .collect(),
    );

    if table.is_empty() {
        return Err(EstimatorError::EmptyDataset);
    }

    debug!(
        "Loaded {} rows with columns {:?}",
        table.row_count(),
        table.column_names()
    );

    Ok(table)
}
