//! # Month End Estimator
//!
//! Projects the final transaction volume of the current, still incomplete month
//! from a ledger of historic transactions.
//!
//! ## Core Concepts
//!
//! - **Total amount**: the sum of a month's transaction amounts
//! - **Partial amount**: the same sum restricted to the first `days_in_month - remaining_days`
//!   days of the month, where `remaining_days` comes from the configured current date
//! - **Factor**: `total / partial` for every completed month
//! - **Estimate**: the last month's partial amount scaled by the average factor
//!
//! The pipeline runs in a fixed order: load, validate, aggregate totals,
//! aggregate partials, project.
//!
//! ## Example
//!
//! ```rust,ignore
//! use month_end_estimator::*;
//! use chrono::NaiveDate;
//!
//! let config = EstimatorConfig::new(NaiveDate::from_ymd_opt(2023, 3, 26).unwrap());
//! let report = EstimationPipeline::new(config)?.run("historic_transactions.csv")?;
//! println!("{}", render_text(&report)?);
//! ```

pub mod aggregation;
pub mod config;
pub mod error;
pub mod estimator;
pub mod ingestion;
pub mod report;
pub mod schema;
pub mod utils;
pub mod validation;

pub use aggregation::{
    calculate_partial_amount, calculate_partial_amounts_by_month,
    calculate_total_amounts_by_month, MonthlySeries,
};
pub use config::EstimatorConfig;
pub use error::{EstimatorError, Result};
pub use estimator::{
    average_factor, calculate_factor_increases, generate_estimate, project, FactorRow, Projection,
};
pub use ingestion::{load_transactions, load_transactions_from_reader};
pub use report::{render_json, render_text, EstimateReport};
pub use schema::*;
pub use validation::{validate_transactions_columns, TransactionLedger};

use log::{debug, info, warn};
use std::path::Path;

/// One estimation run over one ledger. `remaining_days` is derived from the
/// configured current date when the pipeline is built and stays fixed.
#[derive(Debug, Clone)]
pub struct EstimationPipeline {
    config: EstimatorConfig,
    remaining_days: u32,
}

impl EstimationPipeline {
    pub fn new(config: EstimatorConfig) -> Result<Self> {
        let remaining_days = config.remaining_days()?;
        Ok(Self {
            config,
            remaining_days,
        })
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    pub fn remaining_days(&self) -> u32 {
        self.remaining_days
    }

    pub fn run(&self, source: impl AsRef<Path>) -> Result<EstimateReport> {
        let source = source.as_ref();
        info!(
            "Estimating from {} for current date {} ({} days remaining)",
            source.display(),
            self.config.current_date,
            self.remaining_days
        );

        let table = load_transactions(source, &self.config.columns)?;
        self.run_table(&table)
    }

    /// Runs every stage after loading.
    pub fn run_table(&self, table: &TransactionTable) -> Result<EstimateReport> {
        let ledger = TransactionLedger::from_table(table, &self.config.columns)?;
        debug!("Validated {} transactions", ledger.len());

        let totals = calculate_total_amounts_by_month(&ledger)?;
        let partials = calculate_partial_amounts_by_month(&ledger, self.remaining_days)?;
        let projection = project(&totals, &partials)?;

        let estimate_date = self.config.target_month_end()?;
        if projection.projected_month_end != estimate_date {
            warn!(
                "Latest month in the data ends {} but current date {} is in the month ending {}",
                projection.projected_month_end, self.config.current_date, estimate_date
            );
        }

        for row in &projection.factors {
            debug!("Factor for {}: {}", row.month_end, row.factor);
        }
        info!(
            "Average factor {} applied to partial amount {} gives estimate {}",
            projection.average_factor, projection.partial_amount, projection.estimate
        );

        Ok(EstimateReport {
            current_date: self.config.current_date,
            remaining_days: self.remaining_days,
            total_amounts_by_month: totals,
            partial_amounts_by_month: partials,
            factor_increases: projection.factors,
            average_factor_increase: projection.average_factor,
            estimate: projection.estimate,
            estimate_date,
        })
    }
}

pub fn estimate_month_end(
    source: impl AsRef<Path>,
    config: &EstimatorConfig,
) -> Result<EstimateReport> {
    EstimationPipeline::new(config.clone())?.run(source)
}
