use thiserror::Error;

/// Error type covering expense validation and persistence failures.
#[derive(Debug, Error)]
pub enum ExpenseError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid installments: {0}")]
    InvalidInstallments(String),
    #[error("Category not found: {0}")]
    CategoryNotFound(String),
    #[error("Expense not found: {0}")]
    ExpenseNotFound(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ExpenseError>;
