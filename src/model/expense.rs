use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dates::shift_month;
use crate::errors::{ExpenseError, Result};

/// Whether a record moves money out of or into the household.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Direction {
    Expense,
    Income,
}

/// Position within a multi-installment purchase.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Installment {
    pub index: u32,
    pub count: u32,
}

/// Canonical monetary record.
///
/// Amounts are always positive magnitudes; `direction` carries the sign the
/// legacy data shape encoded into the amount itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Expense {
    pub id: Uuid,
    pub amount: f64,
    pub direction: Direction,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub category_id: String,
    pub paid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installment: Option<Installment>,
    #[serde(default)]
    pub is_fixed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Expense {
    pub fn new(
        amount: f64,
        direction: Direction,
        date: NaiveDate,
        category_id: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            amount: validate_amount(amount)?,
            direction,
            date,
            due_date: None,
            category_id: category_id.into(),
            paid: false,
            paid_at: None,
            installment: None,
            is_fixed: false,
            description: None,
        })
    }

    /// Due date used for sorting and status, falling back to the record date.
    pub fn effective_due_date(&self) -> NaiveDate {
        self.due_date.unwrap_or(self.date)
    }

    pub fn is_expense(&self) -> bool {
        matches!(self.direction, Direction::Expense)
    }

    /// The single mutation in the record's common path. Monotonic: marking an
    /// already-paid record again does not change anything.
    pub fn mark_paid(&mut self, paid_at: NaiveDate) {
        if !self.paid {
            self.paid = true;
            self.paid_at = Some(paid_at);
        }
    }
}

/// Input to the add-expense flow, before ids and installment rows exist.
#[derive(Debug, Clone)]
pub struct ExpenseDraft {
    pub amount: f64,
    pub date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub category_id: String,
    pub installments: u32,
    pub is_fixed: bool,
    pub description: Option<String>,
}

impl ExpenseDraft {
    pub fn new(amount: f64, date: NaiveDate, category_id: impl Into<String>) -> Self {
        Self {
            amount,
            date,
            due_date: None,
            category_id: category_id.into(),
            installments: 1,
            is_fixed: false,
            description: None,
        }
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_installments(mut self, installments: u32) -> Self {
        self.installments = installments;
        self
    }
}

/// Materializes one record per installment, equal sub-amounts, with due
/// dates offset by whole calendar months from the draft's due date.
pub fn plan_installments(draft: &ExpenseDraft) -> Result<Vec<Expense>> {
    let count = draft.installments;
    if count == 0 {
        return Err(ExpenseError::InvalidInstallments(
            "installment count must be at least 1".into(),
        ));
    }
    let total = validate_amount(draft.amount)?;
    let per_installment = total / count as f64;
    let first_due = draft.due_date.unwrap_or(draft.date);

    let mut records = Vec::with_capacity(count as usize);
    for index in 1..=count {
        let mut expense = Expense::new(
            per_installment,
            Direction::Expense,
            draft.date,
            draft.category_id.clone(),
        )?;
        expense.due_date = Some(shift_month(first_due, index as i32 - 1));
        expense.is_fixed = draft.is_fixed;
        expense.description = draft.description.clone();
        if count > 1 {
            expense.installment = Some(Installment { index, count });
        }
        records.push(expense);
    }
    Ok(records)
}

/// Record shapes as they arrive from the backing store.
///
/// The product shipped two table layouts over its lifetime: a legacy one
/// where the amount sign encodes expense vs. income, and a structured one
/// with a positive amount plus explicit flags. Both are normalized here so
/// the rest of the crate only ever sees [`Expense`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum RawRecord {
    Legacy {
        amount: f64,
        date: NaiveDate,
        #[serde(default)]
        due_date: Option<NaiveDate>,
        category: String,
        #[serde(default)]
        description: Option<String>,
    },
    Structured {
        amount: f64,
        due_date: NaiveDate,
        category_id: String,
        paid: bool,
        #[serde(default)]
        current_installment: Option<u32>,
        #[serde(default)]
        total_installments: Option<u32>,
        #[serde(default)]
        is_fixed: bool,
        #[serde(default)]
        description: Option<String>,
    },
}

impl RawRecord {
    pub fn normalize(self) -> Result<Expense> {
        match self {
            RawRecord::Legacy {
                amount,
                date,
                due_date,
                category,
                description,
            } => {
                let direction = if amount < 0.0 {
                    Direction::Expense
                } else {
                    Direction::Income
                };
                let mut expense = Expense::new(amount.abs(), direction, date, slug(&category))?;
                expense.due_date = due_date;
                expense.description = description;
                Ok(expense)
            }
            RawRecord::Structured {
                amount,
                due_date,
                category_id,
                paid,
                current_installment,
                total_installments,
                is_fixed,
                description,
            } => {
                let mut expense =
                    Expense::new(amount, Direction::Expense, due_date, category_id)?;
                expense.due_date = Some(due_date);
                expense.paid = paid;
                expense.is_fixed = is_fixed;
                expense.description = description;
                expense.installment = match (current_installment, total_installments) {
                    (Some(index), Some(count)) if count > 1 => {
                        if index == 0 || index > count {
                            return Err(ExpenseError::InvalidInstallments(format!(
                                "installment {}/{} out of range",
                                index, count
                            )));
                        }
                        Some(Installment { index, count })
                    }
                    _ => None,
                };
                Ok(expense)
            }
        }
    }
}

fn validate_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(ExpenseError::InvalidAmount(format!(
            "amount must be a positive number, got {}",
            amount
        )));
    }
    Ok(amount)
}

/// Free-text category names from the legacy shape become opaque ids.
fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_sep = true;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            last_sep = false;
        } else if !last_sep {
            out.push('_');
            last_sep = true;
        }
    }
    out.trim_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_rejects_non_positive_magnitudes() {
        for bad in [0.0, -42.5, f64::NAN, f64::INFINITY] {
            let result = Expense::new(bad, Direction::Expense, date(2024, 3, 1), "rent");
            assert!(matches!(result, Err(ExpenseError::InvalidAmount(_))));
        }
    }

    #[test]
    fn mark_paid_is_monotonic() {
        let mut expense =
            Expense::new(100.0, Direction::Expense, date(2024, 3, 1), "rent").unwrap();
        expense.mark_paid(date(2024, 3, 5));
        assert!(expense.paid);
        assert_eq!(expense.paid_at, Some(date(2024, 3, 5)));

        expense.mark_paid(date(2024, 4, 1));
        assert_eq!(expense.paid_at, Some(date(2024, 3, 5)));
    }

    #[test]
    fn effective_due_date_falls_back_to_record_date() {
        let mut expense =
            Expense::new(10.0, Direction::Expense, date(2024, 3, 1), "rent").unwrap();
        assert_eq!(expense.effective_due_date(), date(2024, 3, 1));
        expense.due_date = Some(date(2024, 3, 20));
        assert_eq!(expense.effective_due_date(), date(2024, 3, 20));
    }

    #[test]
    fn plan_installments_offsets_due_dates_by_month() {
        let draft = ExpenseDraft::new(300.0, date(2024, 1, 15), "nubank")
            .with_due_date(date(2024, 1, 31))
            .with_installments(3);
        let records = plan_installments(&draft).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].due_date, Some(date(2024, 1, 31)));
        assert_eq!(records[1].due_date, Some(date(2024, 2, 29)));
        assert_eq!(records[2].due_date, Some(date(2024, 3, 31)));
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.amount, 100.0);
            assert_eq!(
                record.installment,
                Some(Installment {
                    index: i as u32 + 1,
                    count: 3
                })
            );
        }
    }

    #[test]
    fn plan_installments_single_payment_has_no_installment_pair() {
        let draft = ExpenseDraft::new(50.0, date(2024, 1, 15), "energia");
        let records = plan_installments(&draft).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].installment, None);
        assert_eq!(records[0].due_date, Some(date(2024, 1, 15)));
    }

    #[test]
    fn plan_installments_rejects_zero_count() {
        let draft = ExpenseDraft::new(50.0, date(2024, 1, 15), "energia").with_installments(0);
        assert!(matches!(
            plan_installments(&draft),
            Err(ExpenseError::InvalidInstallments(_))
        ));
    }

    #[test]
    fn legacy_shape_normalizes_sign_into_direction() {
        let raw = RawRecord::Legacy {
            amount: -42.5,
            date: date(2024, 3, 15),
            due_date: None,
            category: "Posto Shell".into(),
            description: None,
        };
        let expense = raw.normalize().unwrap();
        assert_eq!(expense.amount, 42.5);
        assert_eq!(expense.direction, Direction::Expense);
        assert_eq!(expense.category_id, "posto_shell");
        assert!(!expense.paid);
    }

    #[test]
    fn structured_shape_keeps_magnitude_and_flags() {
        let raw = RawRecord::Structured {
            amount: 110.0,
            due_date: date(2024, 3, 12),
            category_id: "aline".into(),
            paid: true,
            current_installment: Some(2),
            total_installments: Some(6),
            is_fixed: false,
            description: Some("Aline Veloso".into()),
        };
        let expense = raw.normalize().unwrap();
        assert_eq!(expense.amount, 110.0);
        assert!(expense.paid);
        assert_eq!(expense.installment, Some(Installment { index: 2, count: 6 }));
        assert_eq!(expense.effective_due_date(), date(2024, 3, 12));
    }

    #[test]
    fn structured_shape_rejects_out_of_range_installments() {
        let raw = RawRecord::Structured {
            amount: 110.0,
            due_date: date(2024, 3, 12),
            category_id: "aline".into(),
            paid: false,
            current_installment: Some(7),
            total_installments: Some(6),
            is_fixed: false,
            description: None,
        };
        assert!(matches!(
            raw.normalize(),
            Err(ExpenseError::InvalidInstallments(_))
        ));
    }
}
