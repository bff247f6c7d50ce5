use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Credential error: {0}")]
    Credential(String),
    #[error("Invalid time log: {0}")]
    InvalidTimeLog(String),
    #[error("TimeCamp API error: {0}")]
    Api(String),
    #[error("TimeCamp reference data unavailable: {0}")]
    ReferenceDataUnavailable(String),
    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange { from: NaiveDate, to: NaiveDate },
    #[error("{count} time entries were outside of the date range {from}..={to}")]
    EntriesOutOfRange {
        from: NaiveDate,
        to: NaiveDate,
        count: usize,
    },
    #[error("task path '{path}' did not resolve: {matches} tasks named '{segment}' under parent {parent_id}")]
    UnresolvedTask {
        path: String,
        segment: String,
        parent_id: i64,
        matches: usize,
    },
    #[error("task {task_id} was not found in the task tree")]
    DanglingTask { task_id: String },
    #[error("task {task_id} has a cyclic parent chain")]
    CyclicTask { task_id: i64 },
}

impl SyncError {
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidDateRange { .. } | Self::EntriesOutOfRange { .. }
        )
    }

    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedTask { .. } | Self::DanglingTask { .. } | Self::CyclicTask { .. }
        )
    }
}
