use crate::error::{EstimatorError, Result};
use crate::schema::{Cell, Column, ColumnKind, ColumnNames, Transaction, TransactionTable};
use chrono::NaiveDate;
use serde::Serialize;

/// Checks the three required columns in a fixed order; the first failure wins.
///
/// 1. date column present
/// 2. id column present
/// 3. amount column present
/// 4. date column is date-typed
/// 5. id column is textual
/// 6. amount column is integral
pub fn validate_transactions_columns(table: &TransactionTable, names: &ColumnNames) -> Result<()> {
    required_columns(table, names).map(|_| ())
}

fn required_columns<'a>(
    table: &'a TransactionTable,
    names: &ColumnNames,
) -> Result<(&'a Column, &'a Column, &'a Column)> {
    let date = table
        .column(&names.date)
        .ok_or_else(|| EstimatorError::MissingDateColumn(names.date.clone()))?;
    let id = table
        .column(&names.id)
        .ok_or_else(|| EstimatorError::MissingIdColumn(names.id.clone()))?;
    let amount = table
        .column(&names.amount)
        .ok_or_else(|| EstimatorError::MissingAmountColumn(names.amount.clone()))?;

    if date.kind != ColumnKind::Date {
        return Err(EstimatorError::InvalidDateType(names.date.clone()));
    }

    if id.kind != ColumnKind::Text {
        return Err(EstimatorError::InvalidIdType(names.id.clone()));
    }

    if amount.kind != ColumnKind::Integer {
        return Err(EstimatorError::InvalidAmountType(names.amount.clone()));
    }

    Ok((date, id, amount))
}

/// The validated ledger: one typed [`Transaction`] per source row, in source order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionLedger {
    transactions: Vec<Transaction>,
}

impl TransactionLedger {
    /// Validates `table` and extracts the typed rows.
    pub fn from_table(table: &TransactionTable, names: &ColumnNames) -> Result<Self> {
        let (dates, ids, amounts) = required_columns(table, names)?;

        let transactions = dates
            .cells
            .iter()
            .zip(&ids.cells)
            .zip(&amounts.cells)
            .map(|((date, id), amount)| {
                Ok(Transaction {
                    date: date_cell(date, &names.date)?,
                    id: id_cell(id).into(),
                    amount: amount_cell(amount, &names.amount)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { transactions })
    }

    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

fn date_cell(cell: &Cell, column: &str) -> Result<NaiveDate> {
    match cell {
        Cell::Date(date) => Ok(*date),
        _ => Err(EstimatorError::InvalidDateType(column.to_string())),
    }
}

// A text column may still hold numeric-looking or empty cells next to the
// textual ones; those are kept as opaque tokens.
fn id_cell(cell: &Cell) -> String {
    match cell {
        Cell::Text(text) => text.clone(),
        Cell::Integer(value) => value.to_string(),
        Cell::Float(value) => value.to_string(),
        Cell::Date(date) => date.format("%Y-%m-%d").to_string(),
        Cell::Missing => String::new(),
    }
}

fn amount_cell(cell: &Cell, column: &str) -> Result<i64> {
    match cell {
        Cell::Integer(value) => Ok(*value),
        _ => Err(EstimatorError::InvalidAmountType(column.to_string())),
    }
}
