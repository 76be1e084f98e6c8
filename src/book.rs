use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analytics::bucket::{window_for, DateWindow, PeriodMode};
use crate::errors::{ExpenseError, Result};
use crate::model::{plan_installments, CategoryRegistry, Expense, ExpenseDraft};

/// Dashboard header figures for one month.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MonthSummary {
    pub total: f64,
    pub paid: f64,
    pub remaining: f64,
}

/// The in-memory record set behind the app's views.
///
/// Aggregates are always derived from the records; nothing here keeps a
/// running `spent` figure that call sites patch by hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseBook {
    pub categories: CategoryRegistry,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip)]
    spent_memo: SpentMemo,
}

impl ExpenseBook {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            categories: CategoryRegistry::with_defaults(),
            expenses: Vec::new(),
            created_at: now,
            updated_at: now,
            spent_memo: SpentMemo::default(),
        }
    }

    /// Records an expense, splitting it into one row per installment. Returns
    /// the ids of every record created.
    pub fn add_expense(&mut self, draft: ExpenseDraft) -> Result<Vec<Uuid>> {
        if !self.categories.contains(&draft.category_id) {
            return Err(ExpenseError::CategoryNotFound(draft.category_id));
        }
        let records = plan_installments(&draft)?;
        let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();
        tracing::info!(
            category = %draft.category_id,
            amount = draft.amount,
            installments = records.len(),
            "expense recorded"
        );
        self.expenses.extend(records);
        self.spent_memo.invalidate();
        self.touch();
        Ok(ids)
    }

    /// Flips the paid flag on one record. Marking an already-paid record is a
    /// no-op; aggregate spend is realized at creation time and never changes
    /// here.
    pub fn mark_paid(&mut self, id: Uuid, paid_at: NaiveDate) -> Result<()> {
        let expense = self
            .expenses
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| ExpenseError::ExpenseNotFound(id.to_string()))?;
        if !expense.paid {
            expense.mark_paid(paid_at);
            tracing::info!(%id, %paid_at, "expense marked paid");
            self.touch();
        }
        Ok(())
    }

    pub fn expense(&self, id: Uuid) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    pub fn expenses_in(&self, window: DateWindow) -> Vec<&Expense> {
        self.expenses
            .iter()
            .filter(|e| window.contains(e.effective_due_date()))
            .collect()
    }

    /// Expense records due in the month containing `reference`, sorted by
    /// effective due date (the Dashboard list order).
    pub fn due_in_month(&self, reference: NaiveDate) -> Vec<&Expense> {
        let window = window_for(PeriodMode::Month, reference);
        let mut rows: Vec<&Expense> = self
            .expenses
            .iter()
            .filter(|e| e.is_expense() && window.contains(e.effective_due_date()))
            .collect();
        rows.sort_by_key(|e| e.effective_due_date());
        rows
    }

    /// Total, paid, and remaining spend for the month containing `reference`.
    pub fn month_summary(&self, reference: NaiveDate) -> MonthSummary {
        let rows = self.due_in_month(reference);
        let total: f64 = rows.iter().map(|e| e.amount).sum();
        let paid: f64 = rows.iter().filter(|e| e.paid).map(|e| e.amount).sum();
        MonthSummary {
            total,
            paid,
            remaining: total - paid,
        }
    }

    /// Spend for one category inside a window, recomputed from the records.
    pub fn category_spent(&self, category_id: &str, window: DateWindow) -> f64 {
        self.expenses
            .iter()
            .filter(|e| {
                e.is_expense() && e.category_id == category_id && window.contains(e.date)
            })
            .map(|e| e.amount)
            .sum()
    }

    /// Memoized per-category spend for the month containing `reference`.
    /// The memo is invalidated whenever a record is inserted, never patched.
    pub fn monthly_spent_by_category(&mut self, reference: NaiveDate) -> HashMap<String, f64> {
        let window = window_for(PeriodMode::Month, reference);
        if let Some(cached) = self.spent_memo.get(window) {
            return cached.clone();
        }
        let mut totals: HashMap<String, f64> = HashMap::new();
        for expense in self.expenses.iter().filter(|e| e.is_expense()) {
            if window.contains(expense.date) {
                *totals.entry(expense.category_id.clone()).or_default() += expense.amount;
            }
        }
        self.spent_memo.store(window, totals.clone());
        totals
    }

    pub fn expense_count(&self) -> usize {
        self.expenses.len()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for ExpenseBook {
    fn default() -> Self {
        Self::new()
    }
}

/// Explicit invalidate-on-write memo for derived spend totals.
#[derive(Debug, Clone, Default)]
struct SpentMemo {
    window: Option<DateWindow>,
    totals: Option<HashMap<String, f64>>,
}

impl SpentMemo {
    fn get(&self, window: DateWindow) -> Option<&HashMap<String, f64>> {
        match (&self.window, &self.totals) {
            (Some(cached), Some(totals)) if *cached == window => Some(totals),
            _ => None,
        }
    }

    fn store(&mut self, window: DateWindow, totals: HashMap<String, f64>) {
        self.window = Some(window);
        self.totals = Some(totals);
    }

    fn invalidate(&mut self) {
        self.window = None;
        self.totals = None;
    }
}
