#![doc(test(attr(deny(warnings))))]

//! Expense Core offers the record model, analytics, and persistence
//! primitives behind a personal expense-tracking application.

pub mod analytics;
pub mod book;
pub mod config;
pub mod dates;
pub mod errors;
pub mod model;
pub mod storage;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("expense_core=info".parse().unwrap());
        fmt().with_env_filter(filter).init();
        tracing::info!("Expense Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
