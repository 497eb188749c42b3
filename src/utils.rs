use crate::error::{EstimatorError, Result};
use chrono::{Datelike, Days, NaiveDate};

pub fn last_day_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.checked_sub_days(Days::new(1)))
        .ok_or_else(|| {
            EstimatorError::DateError(format!(
                "No last day for month {:04}-{:02}",
                year, month
            ))
        })
}

/// Month-end date of the month containing `date`. Monthly series are keyed by this value.
pub fn month_end(date: NaiveDate) -> Result<NaiveDate> {
    last_day_of_month(date.year(), date.month())
}

pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn days_in_month(year: i32, month: u32) -> Result<u32> {
    last_day_of_month(year, month).map(|last| last.day())
}

/// Days left in the month after `date`, e.g. 5 for 2023-03-26.
pub fn remaining_days_in_month(date: NaiveDate) -> Result<u32> {
    let days = days_in_month(date.year(), date.month())?;
    Ok(days - date.day())
}

/// Parses a strict `YYYY-MM-DD` date.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    // %Y accepts signed and short years, so pin the shape first
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(
            last_day_of_month(2023, 2).unwrap(),
            NaiveDate::from_ymd_opt(2023, 2, 28).unwrap()
        );
        assert_eq!(
            last_day_of_month(2024, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            last_day_of_month(2023, 12).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
        );
        assert!(last_day_of_month(2023, 13).is_err());
    }

    #[test]
    fn test_month_end_and_first_day() {
        let date = NaiveDate::from_ymd_opt(2023, 4, 17).unwrap();
        assert_eq!(
            month_end(date).unwrap(),
            NaiveDate::from_ymd_opt(2023, 4, 30).unwrap()
        );
        assert_eq!(
            first_day_of_month(date),
            NaiveDate::from_ymd_opt(2023, 4, 1).unwrap()
        );
    }

    #[test]
    fn test_remaining_days_in_month() {
        let date = NaiveDate::from_ymd_opt(2023, 3, 26).unwrap();
        assert_eq!(remaining_days_in_month(date).unwrap(), 5);

        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(remaining_days_in_month(date).unwrap(), 0);

        let date = NaiveDate::from_ymd_opt(2023, 2, 1).unwrap();
        assert_eq!(remaining_days_in_month(date).unwrap(), 27);
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(
            parse_iso_date("2023-03-05"),
            NaiveDate::from_ymd_opt(2023, 3, 5)
        );
        assert_eq!(parse_iso_date("2023/03/05"), None);
        assert_eq!(parse_iso_date("2023-3-5"), None);
        assert_eq!(parse_iso_date("2023-02-30"), None);
        assert_eq!(parse_iso_date("05-03-2023"), None);
        assert_eq!(parse_iso_date(""), None);
    }
}
