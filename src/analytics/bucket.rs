use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::dates::days_in_month;
use crate::model::Expense;

/// Charting granularity for the spending analysis view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PeriodMode {
    Week,
    Month,
    Year,
}

impl PeriodMode {
    /// Number of buckets the mode always produces.
    pub fn bucket_count(&self) -> usize {
        match self {
            PeriodMode::Week => 7,
            PeriodMode::Month => 5,
            PeriodMode::Year => 12,
        }
    }
}

/// Inclusive calendar span.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// One labeled aggregation slot on the chart's x-axis.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Bucket {
    pub label: &'static str,
    pub total: f64,
}

/// Complete bucketer output: a fully keyed bucket list in fixed order, the
/// total spend across filtered records, and the literal window used.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BucketReport {
    pub buckets: Vec<Bucket>,
    pub total_spent: f64,
    pub window: DateWindow,
}

const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTH_WEEK_LABELS: [&str; 5] = ["Week 1", "Week 2", "Week 3", "Week 4", "Week 5"];
const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Groups expense records into ordered, zero-filled buckets for charting.
///
/// Only expense-direction records whose date falls inside the window implied
/// by `mode` and `reference` contribute; each contributes its absolute
/// magnitude exactly once. Pure and deterministic, safe on every re-render.
pub fn bucket_expenses(records: &[Expense], mode: PeriodMode, reference: NaiveDate) -> BucketReport {
    let window = window_for(mode, reference);
    let labels: &[&'static str] = match mode {
        PeriodMode::Week => &WEEKDAY_LABELS,
        PeriodMode::Month => &MONTH_WEEK_LABELS,
        PeriodMode::Year => &MONTH_LABELS,
    };
    let mut totals = vec![0.0f64; labels.len()];
    let mut total_spent = 0.0f64;

    for record in records {
        if !record.is_expense() || !window.contains(record.date) {
            continue;
        }
        let slot = match mode {
            PeriodMode::Week => record.date.weekday().num_days_from_sunday() as usize,
            // Week number within the month: ceil(day / 7), days 1..=7 land in
            // "Week 1", 29..=31 in "Week 5".
            PeriodMode::Month => (record.date.day() as usize + 6) / 7 - 1,
            PeriodMode::Year => record.date.month0() as usize,
        };
        let magnitude = record.amount.abs();
        totals[slot] += magnitude;
        total_spent += magnitude;
    }

    let buckets = labels
        .iter()
        .zip(totals)
        .map(|(label, total)| Bucket { label, total })
        .collect();
    BucketReport {
        buckets,
        total_spent,
        window,
    }
}

/// The calendar span implied by a mode and its reference date.
pub fn window_for(mode: PeriodMode, reference: NaiveDate) -> DateWindow {
    match mode {
        PeriodMode::Week => {
            // Sunday through Saturday containing the reference date.
            let back = reference.weekday().num_days_from_sunday() as i64;
            let start = reference - Duration::days(back);
            DateWindow {
                start,
                end: start + Duration::days(6),
            }
        }
        PeriodMode::Month => {
            let start = reference.with_day(1).unwrap_or(reference);
            let last = days_in_month(reference.year(), reference.month());
            DateWindow {
                start,
                end: reference.with_day(last).unwrap_or(reference),
            }
        }
        PeriodMode::Year => DateWindow {
            start: NaiveDate::from_ymd_opt(reference.year(), 1, 1).unwrap_or(reference),
            end: NaiveDate::from_ymd_opt(reference.year(), 12, 31).unwrap_or(reference),
        },
    }
}
