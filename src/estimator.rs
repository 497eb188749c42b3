use crate::aggregation::MonthlySeries;
use crate::error::{EstimatorError, Result};
use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

/// One completed month's ratio of its final total to its partial amount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorRow {
    pub month_end: NaiveDate,
    pub total_amount: i64,
    pub partial_amount: i64,
    pub factor: f64,
}

/// Joins the two series on month and computes a factor for every month but
/// the chronologically last one, whose total is still incomplete.
pub fn calculate_factor_increases(
    totals: &MonthlySeries,
    partials: &MonthlySeries,
) -> Result<Vec<FactorRow>> {
    if !totals.keys().eq(partials.keys()) {
        return Err(EstimatorError::MismatchedSeries(format!(
            "{} total months vs {} partial months",
            totals.len(),
            partials.len()
        )));
    }

    let completed = totals.len().saturating_sub(1);
    let rows = totals
        .iter()
        .zip(partials.values())
        .take(completed)
        .map(|((&month_end, &total_amount), &partial_amount)| {
            if partial_amount == 0 {
                return Err(EstimatorError::ZeroPartialAmount { month: month_end });
            }
            Ok(FactorRow {
                month_end,
                total_amount,
                partial_amount,
                factor: total_amount as f64 / partial_amount as f64,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!("Computed {} factors", rows.len());
    Ok(rows)
}

pub fn average_factor(factors: &[FactorRow]) -> Result<f64> {
    if factors.is_empty() {
        return Err(EstimatorError::InsufficientHistory {
            months: factors.len() + 1,
        });
    }
    Ok(factors.iter().map(|row| row.factor).sum::<f64>() / factors.len() as f64)
}

/// Projects the last month's total: `partial * average_factor`, rounded half to even.
pub fn generate_estimate(average_factor: f64, last_partial_amount: i64) -> Result<i64> {
    let projected = (last_partial_amount as f64 * average_factor).round_ties_even();
    if !projected.is_finite() || projected < i64::MIN as f64 || projected >= i64::MAX as f64 {
        return Err(EstimatorError::EstimateOutOfRange(projected));
    }
    Ok(projected as i64)
}

/// Output of the factor stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub factors: Vec<FactorRow>,
    pub average_factor: f64,
    /// Month the estimate is for: the last month in the data.
    pub projected_month_end: NaiveDate,
    pub partial_amount: i64,
    pub estimate: i64,
}

pub fn project(totals: &MonthlySeries, partials: &MonthlySeries) -> Result<Projection> {
    if totals.len() < 2 {
        // checked up front so a lone month's zero partial is not what gets reported
        return Err(EstimatorError::InsufficientHistory {
            months: totals.len(),
        });
    }

    let factors = calculate_factor_increases(totals, partials)?;
    let average_factor = average_factor(&factors)?;

    let (&projected_month_end, &partial_amount) = partials
        .last_key_value()
        .ok_or(EstimatorError::InsufficientHistory { months: 0 })?;
    let estimate = generate_estimate(average_factor, partial_amount)?;

    Ok(Projection {
        factors,
        average_factor,
        projected_month_end,
        partial_amount,
        estimate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn series(values: &[(NaiveDate, i64)]) -> MonthlySeries {
        values.iter().copied().collect()
    }

    #[test]
    fn test_last_month_is_excluded() {
        let totals = series(&[
            (month(2023, 1, 31), 600),
            (month(2023, 2, 28), 500),
            (month(2023, 3, 31), 600),
        ]);
        let partials = series(&[
            (month(2023, 1, 31), 400),
            (month(2023, 2, 28), 400),
            (month(2023, 3, 31), 600),
        ]);

        let factors = calculate_factor_increases(&totals, &partials).unwrap();
        assert_eq!(factors.len(), 2);
        assert_eq!(factors[0].month_end, month(2023, 1, 31));
        assert!((factors[0].factor - 1.5).abs() < 1e-12);
        assert!((factors[1].factor - 1.25).abs() < 1e-12);
    }

    #[test]
    fn test_two_months_give_one_factor() {
        let totals = series(&[(month(2023, 1, 31), 300), (month(2023, 2, 28), 10)]);
        let partials = series(&[(month(2023, 1, 31), 200), (month(2023, 2, 28), 10)]);

        let factors = calculate_factor_increases(&totals, &partials).unwrap();
        assert_eq!(factors.len(), 1);
        assert_eq!(factors[0].total_amount, 300);
        assert_eq!(factors[0].partial_amount, 200);
    }

    #[test]
    fn test_projection() {
        let totals = series(&[
            (month(2023, 1, 31), 600),
            (month(2023, 2, 28), 500),
            (month(2023, 3, 31), 600),
        ]);
        let partials = series(&[
            (month(2023, 1, 31), 400),
            (month(2023, 2, 28), 400),
            (month(2023, 3, 31), 600),
        ]);

        let projection = project(&totals, &partials).unwrap();
        assert!((projection.average_factor - 1.375).abs() < 1e-12);
        assert_eq!(projection.projected_month_end, month(2023, 3, 31));
        assert_eq!(projection.partial_amount, 600);
        assert_eq!(projection.estimate, 825);
    }

    #[test]
    fn test_single_month_is_insufficient() {
        let totals = series(&[(month(2023, 1, 31), 600)]);
        let partials = series(&[(month(2023, 1, 31), 0)]);

        assert!(matches!(
            project(&totals, &partials),
            Err(EstimatorError::InsufficientHistory { months: 1 })
        ));
        assert!(matches!(
            average_factor(&[]),
            Err(EstimatorError::InsufficientHistory { .. })
        ));
    }

    #[test]
    fn test_zero_partial_in_completed_month() {
        let totals = series(&[(month(2023, 1, 31), 600), (month(2023, 2, 28), 100)]);
        let partials = series(&[(month(2023, 1, 31), 0), (month(2023, 2, 28), 100)]);

        match calculate_factor_increases(&totals, &partials) {
            Err(EstimatorError::ZeroPartialAmount { month: m }) => {
                assert_eq!(m, month(2023, 1, 31))
            }
            other => panic!("Expected ZeroPartialAmount, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_partial_in_last_month_is_allowed() {
        let totals = series(&[(month(2023, 1, 31), 600), (month(2023, 2, 28), 0)]);
        let partials = series(&[(month(2023, 1, 31), 300), (month(2023, 2, 28), 0)]);

        let projection = project(&totals, &partials).unwrap();
        assert_eq!(projection.estimate, 0);
    }

    #[test]
    fn test_mismatched_series() {
        let totals = series(&[(month(2023, 1, 31), 600), (month(2023, 2, 28), 100)]);
        let partials = series(&[(month(2023, 1, 31), 300), (month(2023, 3, 31), 100)]);

        assert!(matches!(
            calculate_factor_increases(&totals, &partials),
            Err(EstimatorError::MismatchedSeries(_))
        ));
    }

    #[test]
    fn test_estimate_rounds_half_to_even() {
        assert_eq!(generate_estimate(1.25, 2).unwrap(), 2);
        assert_eq!(generate_estimate(1.25, 6).unwrap(), 8);
        assert_eq!(generate_estimate(0.5, 5).unwrap(), 2);
        assert_eq!(generate_estimate(0.5, 7).unwrap(), 4);
        assert_eq!(generate_estimate(1.1, 10).unwrap(), 11);
        assert_eq!(generate_estimate(1.5, -3).unwrap(), -4);
    }

    #[test]
    fn test_estimate_out_of_range() {
        assert!(matches!(
            generate_estimate(f64::INFINITY, 10),
            Err(EstimatorError::EstimateOutOfRange(_))
        ));
        assert!(matches!(
            generate_estimate(1e300, i64::MAX),
            Err(EstimatorError::EstimateOutOfRange(_))
        ));
    }
}
