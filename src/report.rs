use crate::aggregation::MonthlySeries;
use crate::error::Result;
use crate::estimator::FactorRow;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write;

/// Everything a run produces, in the order the stages produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateReport {
    pub current_date: NaiveDate,
    pub remaining_days: u32,
    pub total_amounts_by_month: MonthlySeries,
    pub partial_amounts_by_month: MonthlySeries,
    pub factor_increases: Vec<FactorRow>,
    pub average_factor_increase: f64,
    pub estimate: i64,
    pub estimate_date: NaiveDate,
}

pub fn render_json(report: &EstimateReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn render_text(report: &EstimateReport) -> Result<String> {
    let mut out = String::new();
    write_text(&mut out, report)?;
    Ok(out)
}

fn write_text(out: &mut String, report: &EstimateReport) -> std::fmt::Result {
    writeln!(out, "Current date targeted: {}", report.current_date)?;
    writeln!(out)?;

    writeln!(out, "Total transaction amounts by month:")?;
    writeln!(out)?;
    write_series(out, "total_amount", &report.total_amounts_by_month)?;
    writeln!(out)?;

    writeln!(
        out,
        "Partial amounts (excluding the last {} days from results):",
        report.remaining_days
    )?;
    writeln!(out)?;
    write_series(out, "partial_amount", &report.partial_amounts_by_month)?;
    writeln!(out)?;

    writeln!(
        out,
        "Factor increase in partial amounts ({} days remaining) versus total amounts per month:",
        report.remaining_days
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "{:<12} {:>14} {:>14} {:>10}",
        "month", "total_amount", "partial_amount", "factor"
    )?;
    for row in &report.factor_increases {
        writeln!(
            out,
            "{:<12} {:>14} {:>14} {:>10.6}",
            row.month_end.to_string(), row.total_amount, row.partial_amount, row.factor
        )?;
    }
    writeln!(out)?;

    writeln!(
        out,
        "Average factor increase: {}",
        report.average_factor_increase
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "Estimated amount for {}: {}",
        report.estimate_date.format("%Y-%m-%d"),
        report.estimate
    )
}

fn write_series(out: &mut String, label: &str, series: &MonthlySeries) -> std::fmt::Result {
    writeln!(out, "{:<12} {:>14}", "month", label)?;
    for (month, amount) in series {
        writeln!(out, "{:<12} {:>14}", month.to_string(), amount)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> EstimateReport {
        let jan = NaiveDate::from_ymd_opt(2023, 1, 31).unwrap();
        let feb = NaiveDate::from_ymd_opt(2023, 2, 28).unwrap();
        EstimateReport {
            current_date: NaiveDate::from_ymd_opt(2023, 2, 25).unwrap(),
            remaining_days: 3,
            total_amounts_by_month: [(jan, 300), (feb, 120)].into_iter().collect(),
            partial_amounts_by_month: [(jan, 200), (feb, 120)].into_iter().collect(),
            factor_increases: vec![FactorRow {
                month_end: jan,
                total_amount: 300,
                partial_amount: 200,
                factor: 1.5,
            }],
            average_factor_increase: 1.5,
            estimate: 180,
            estimate_date: feb,
        }
    }

    #[test]
    fn test_render_text() {
        let text = render_text(&sample_report()).unwrap();
        assert!(text.starts_with("Current date targeted: 2023-02-25\n"));
        assert!(text.contains("Partial amounts (excluding the last 3 days from results):"));
        assert!(text.contains("2023-01-31"));
        assert!(text.contains("1.500000"));
        assert!(text.contains("Average factor increase: 1.5\n"));
        assert!(text.trim_end().ends_with("Estimated amount for 2023-02-28: 180"));
    }

    #[test]
    fn test_render_text_on_empty_factors() {
        let mut report = sample_report();
        report.factor_increases.clear();
        let text = render_text(&report).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        let header = lines
            .iter()
            .position(|l| l.starts_with("month") && l.ends_with("factor"))
            .unwrap();
        assert_eq!(lines[header + 1], "");
        assert!(lines[header + 2].starts_with("Average factor increase"));
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["estimate"], 180);
        assert_eq!(value["estimate_date"], "2023-02-28");
        assert_eq!(value["total_amounts_by_month"]["2023-01-31"], 300);
        assert_eq!(value["factor_increases"][0]["factor"], 1.5);
    }
}
