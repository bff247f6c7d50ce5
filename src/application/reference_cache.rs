use crate::domain::models::CurrentUser;
use crate::domain::task_forest::TaskForest;
use crate::infrastructure::error::SyncError;
use crate::infrastructure::timecamp_client::TimeCampClient;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use tokio::sync::Mutex;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct ReferenceSnapshot {
    pub current_user: Arc<CurrentUser>,
    pub tasks: Arc<TaskForest>,
}

// Reads after the first successful load never touch the lock. Callers that
// queued behind a failed load get its error; the next call starts over.
pub struct ReferenceDataCache<C>
where
    C: TimeCampClient,
{
    client: Arc<C>,
    snapshot: OnceLock<ReferenceSnapshot>,
    failed_loads: AtomicU64,
    last_failure: Mutex<Option<String>>,
}

impl<C> ReferenceDataCache<C>
where
    C: TimeCampClient,
{
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            snapshot: OnceLock::new(),
            failed_loads: AtomicU64::new(0),
            last_failure: Mutex::new(None),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.snapshot.get().is_some()
    }

    pub async fn ensure_initialized(&self) -> Result<ReferenceSnapshot, SyncError> {
        if let Some(snapshot) = self.snapshot.get() {
            return Ok(snapshot.clone());
        }

        let failed_before = self.failed_loads.load(Ordering::Acquire);
        let mut last_failure = self.last_failure.lock().await;
        if let Some(snapshot) = self.snapshot.get() {
            return Ok(snapshot.clone());
        }
        if self.failed_loads.load(Ordering::Acquire) != failed_before {
            let message = last_failure.clone().unwrap_or_default();
            return Err(SyncError::ReferenceDataUnavailable(message));
        }

        match self.load().await {
            Ok(snapshot) => {
                *last_failure = None;
                Ok(self.snapshot.get_or_init(|| snapshot).clone())
            }
            Err(error) => {
                warn!(error = %error, "failed to load TimeCamp reference data");
                *last_failure = Some(error.to_string());
                self.failed_loads.fetch_add(1, Ordering::Release);
                Err(error)
            }
        }
    }

    async fn load(&self) -> Result<ReferenceSnapshot, SyncError> {
        let (current_user, tasks) =
            tokio::try_join!(self.client.current_user(), self.client.list_tasks())?;
        let tasks = TaskForest::new(tasks);
        info!(user_id = %current_user.user_id, tasks = tasks.len(), "loaded TimeCamp reference data");

        Ok(ReferenceSnapshot {
            current_user: Arc::new(current_user),
            tasks: Arc::new(tasks),
        })
    }

    pub async fn current_user(&self) -> Result<Arc<CurrentUser>, SyncError> {
        Ok(self.ensure_initialized().await?.current_user)
    }

    pub async fn task_forest(&self) -> Result<Arc<TaskForest>, SyncError> {
        Ok(self.ensure_initialized().await?.tasks)
    }
}
