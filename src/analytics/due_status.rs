use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::dates::days_between;

/// Ordinal urgency tier attached to a due status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    None,
    Normal,
    Warning,
    Critical,
}

/// Discrete due state of an unpaid (or paid) record relative to today.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DueStatus {
    Paid,
    Overdue,
    DueToday,
    DueTomorrow,
    DueInTwoDays,
    DueOn(u32),
}

impl DueStatus {
    pub fn label(&self) -> String {
        match self {
            DueStatus::Paid => "PAID".into(),
            DueStatus::Overdue => "OVERDUE".into(),
            DueStatus::DueToday => "DUE TODAY".into(),
            DueStatus::DueTomorrow => "DUE TOMORROW".into(),
            DueStatus::DueInTwoDays => "DUE IN 2 DAYS".into(),
            DueStatus::DueOn(day) => format!("DUE ON {:02}", day),
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            DueStatus::Paid => Severity::None,
            DueStatus::Overdue | DueStatus::DueToday => Severity::Critical,
            DueStatus::DueTomorrow | DueStatus::DueInTwoDays => Severity::Warning,
            DueStatus::DueOn(_) => Severity::Normal,
        }
    }
}

/// Classifies a due date against today.
///
/// Total and pure: both inputs are calendar dates, so time-of-day can never
/// affect the result, and every input triple maps to exactly one status.
/// Paid is terminal and wins regardless of date distance.
pub fn classify(due_date: NaiveDate, today: NaiveDate, paid: bool) -> DueStatus {
    if paid {
        return DueStatus::Paid;
    }
    match days_between(today, due_date) {
        d if d < 0 => DueStatus::Overdue,
        0 => DueStatus::DueToday,
        1 => DueStatus::DueTomorrow,
        2 => DueStatus::DueInTwoDays,
        _ => DueStatus::DueOn(due_date.day()),
    }
}
