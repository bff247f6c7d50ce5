pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::bootstrap::{SyncContext, bootstrap_sync};
pub use application::task_resolver::{ServiceMapping, TaskResolver};
pub use application::time_sync::{EntryMatch, SyncPlan, SyncResult, TimeSyncService};
pub use domain::models::TimeLogEntry;
pub use infrastructure::error::SyncError;
