pub mod models;
pub mod reconcile;
pub mod task_forest;
