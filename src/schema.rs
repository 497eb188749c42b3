use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const TRANSACTION_DATE: &str = "transaction_date";
pub const TRANSACTION_ID: &str = "transaction_id";
pub const TRANSACTION_AMOUNT: &str = "transaction_amount";

/// Header names playing the three required roles in a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub date: String,
    pub id: String,
    pub amount: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            date: TRANSACTION_DATE.to_string(),
            id: TRANSACTION_ID.to_string(),
            amount: TRANSACTION_AMOUNT.to_string(),
        }
    }
}

/// A single typed value read from the source.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Integer(i64),
    Float(f64),
    Date(NaiveDate),
    Text(String),
}

impl Cell {
    /// Classifies a raw field. Blank fields and `NaN` spellings are missing.
    /// Dates are never inferred here; only the date column gets parsed into
    /// [`Cell::Date`], by the loader.
    pub fn infer(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
            Cell::Missing
        } else if let Ok(value) = raw.parse::<i64>() {
            Cell::Integer(value)
        } else if let Some(value) = raw.parse::<f64>().ok().filter(|v| v.is_finite()) {
            Cell::Float(value)
        } else {
            Cell::Text(raw.to_string())
        }
    }
}

/// Column-level type, inferred from every cell the way a dataframe assigns a dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Date,
    Integer,
    Float,
    Text,
}

impl ColumnKind {
    pub fn infer(cells: &[Cell]) -> Self {
        let mut has_text = false;
        let mut has_float = false;
        let mut has_missing = false;
        let mut dates = 0usize;
        let mut integers = 0usize;

        for cell in cells {
            match cell {
                Cell::Missing => has_missing = true,
                Cell::Integer(_) => integers += 1,
                Cell::Float(_) => has_float = true,
                Cell::Date(_) => dates += 1,
                Cell::Text(_) => has_text = true,
            }
        }

        if has_text {
            ColumnKind::Text
        } else if dates > 0 {
            if dates == cells.len() {
                ColumnKind::Date
            } else {
                ColumnKind::Text
            }
        } else if integers > 0 && !has_float && !has_missing {
            ColumnKind::Integer
        } else {
            // numeric with gaps, or nothing but gaps
            ColumnKind::Float
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        let kind = ColumnKind::infer(&cells);
        Self {
            name: name.into(),
            kind,
            cells,
        }
    }
}

/// An untyped-by-role, column-oriented view of a ledger source.
///
/// All source columns are kept in source order and every column holds
/// one cell per data row, so row order is preserved across columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionTable {
    pub columns: Vec<Column>,
}

impl TransactionTable {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.cells.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}

/// Opaque transaction identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TransactionId(String);

impl From<&str> for TransactionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TransactionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A well-typed ledger row. Amounts are whole minor units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub date: NaiveDate,
    pub amount: i64,
}
