use crate::error::{EstimatorError, Result};
use crate::schema::Transaction;
use crate::utils::{days_in_month, first_day_of_month, month_end};
use crate::validation::TransactionLedger;
use chrono::{Datelike, NaiveDate};
use log::debug;
use std::collections::BTreeMap;

/// Amount per calendar month, keyed by the month-end date.
pub type MonthlySeries = BTreeMap<NaiveDate, i64>;

/// Buckets transactions by the month containing their date. Only months with
/// at least one transaction get a bucket; source order is kept within a bucket.
pub fn group_by_month(
    ledger: &TransactionLedger,
) -> Result<BTreeMap<NaiveDate, Vec<&Transaction>>> {
    let mut buckets: BTreeMap<NaiveDate, Vec<&Transaction>> = BTreeMap::new();
    for transaction in ledger.transactions() {
        buckets
            .entry(month_end(transaction.date)?)
            .or_default()
            .push(transaction);
    }
    Ok(buckets)
}

pub fn calculate_total_amounts_by_month(ledger: &TransactionLedger) -> Result<MonthlySeries> {
    let totals = group_by_month(ledger)?
        .into_iter()
        .map(|(month, transactions)| {
            Ok((month, checked_sum(month, transactions.iter().copied())?))
        })
        .collect::<Result<MonthlySeries>>()?;

    debug!("Total amounts computed for {} months", totals.len());
    Ok(totals)
}

pub fn calculate_partial_amounts_by_month(
    ledger: &TransactionLedger,
    remaining_days: u32,
) -> Result<MonthlySeries> {
    let partials = group_by_month(ledger)?
        .into_iter()
        .map(|(month, transactions)| {
            let partial = calculate_partial_amount(month, remaining_days, &transactions)?;
            Ok((month, partial))
        })
        .collect::<Result<MonthlySeries>>()?;

    debug!(
        "Partial amounts computed for {} months ({} trailing days excluded)",
        partials.len(),
        remaining_days
    );
    Ok(partials)
}

/// Sums the amounts dated within `[first day, days_in_month - remaining_days]`
/// of `month`. Each month uses its own length, so the cutoff sits the same
/// number of days before every month end.
pub fn calculate_partial_amount(
    month: NaiveDate,
    remaining_days: u32,
    transactions: &[&Transaction],
) -> Result<i64> {
    let Some(end) = partial_window_end(month, remaining_days)? else {
        return Ok(0);
    };
    let start = first_day_of_month(month);

    checked_sum(
        month,
        transactions
            .iter()
            .copied()
            .filter(|t| t.date >= start && t.date <= end),
    )
}

fn checked_sum<'a>(
    month: NaiveDate,
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Result<i64> {
    transactions
        .into_iter()
        .try_fold(0i64, |acc, t| acc.checked_add(t.amount))
        .ok_or(EstimatorError::AmountOverflow { month })
}

/// Last date included in the partial window, or `None` when the window is empty.
pub fn partial_window_end(month: NaiveDate, remaining_days: u32) -> Result<Option<NaiveDate>> {
    let days = days_in_month(month.year(), month.month())?;
    if remaining_days >= days {
        return Ok(None);
    }
    Ok(month.with_day(days - remaining_days))
}
