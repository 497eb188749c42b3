use crate::error::Result;
use crate::schema::ColumnNames;
use crate::utils::{month_end, remaining_days_in_month};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Run configuration. The current date is an input, never read from the clock
/// by the library.
///
/// ```json
/// {
///   "current_date": "2023-03-26",
///   "source": "historic_transactions.csv",
///   "columns": { "date": "booked_on" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    pub current_date: NaiveDate,
    #[serde(default)]
    pub source: Option<PathBuf>,
    #[serde(default)]
    pub columns: ColumnNames,
}

impl EstimatorConfig {
    pub fn new(current_date: NaiveDate) -> Self {
        Self {
            current_date,
            source: None,
            columns: ColumnNames::default(),
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn remaining_days(&self) -> Result<u32> {
        remaining_days_in_month(self.current_date)
    }

    /// Last calendar day of the current month, the date the estimate is reported for.
    pub fn target_month_end(&self) -> Result<NaiveDate> {
        month_end(self.current_date)
    }
}
