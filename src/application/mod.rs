pub mod bootstrap;
pub mod reference_cache;
pub mod task_resolver;
pub mod time_sync;
