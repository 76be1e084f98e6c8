pub mod category;
pub mod expense;

pub use category::{CategoryMeta, CategoryRegistry, IconKey};
pub use expense::{plan_installments, Direction, Expense, ExpenseDraft, Installment, RawRecord};
