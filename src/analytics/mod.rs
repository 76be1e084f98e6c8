pub mod bucket;
pub mod due_status;

pub use bucket::{bucket_expenses, Bucket, BucketReport, DateWindow, PeriodMode};
pub use due_status::{classify, DueStatus, Severity};
