use crate::application::reference_cache::ReferenceDataCache;
use crate::application::task_resolver::{ServiceMapping, TaskResolver};
use crate::domain::models::TimeLogEntry;
use crate::domain::reconcile::{Joined, full_outer_join};
use crate::infrastructure::entry_mapper::{
    TimeCampEntry, decode_time_camp_entry, encode_time_log_entry,
};
use crate::infrastructure::error::SyncError;
use crate::infrastructure::timecamp_client::TimeCampClient;
use chrono::{NaiveDate, NaiveTime};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryMatch {
    #[default]
    IgnoreRemoteId,
    /// Every field. Freshly mapped entries carry no id, so unchanged
    /// entries are removed and created again on every run.
    Exact,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EntryKey<'a> {
    id: Option<u64>,
    user_id: &'a str,
    date: NaiveDate,
    start: NaiveTime,
    end: NaiveTime,
    task_id: &'a str,
    name: &'a str,
    description: &'a str,
}

impl EntryMatch {
    fn key(self, entry: &TimeCampEntry) -> EntryKey<'_> {
        EntryKey {
            id: match self {
                Self::IgnoreRemoteId => None,
                Self::Exact => entry.id,
            },
            user_id: &entry.user_id,
            date: entry.date,
            start: entry.start,
            end: entry.end,
            task_id: &entry.task_id,
            name: &entry.name,
            description: &entry.description,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncPlan {
    pub to_add: Vec<TimeCampEntry>,
    pub to_remove: Vec<TimeCampEntry>,
    pub unchanged: usize,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncResult {
    pub added: Vec<TimeCampEntry>,
    pub removed: Vec<TimeCampEntry>,
    pub unchanged: usize,
}

#[derive(Debug, Clone, Copy)]
enum BatchOperation {
    Add,
    Remove,
}

impl BatchOperation {
    fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }
}

pub struct TimeSyncService<C>
where
    C: TimeCampClient,
{
    client: Arc<C>,
    cache: ReferenceDataCache<C>,
    resolver: TaskResolver,
    entry_match: EntryMatch,
}

impl<C> TimeSyncService<C>
where
    C: TimeCampClient + 'static,
{
    pub fn new(client: Arc<C>, mapping: ServiceMapping) -> Self {
        Self {
            cache: ReferenceDataCache::new(Arc::clone(&client)),
            client,
            resolver: TaskResolver::new(mapping),
            entry_match: EntryMatch::default(),
        }
    }

    pub fn with_entry_match(mut self, entry_match: EntryMatch) -> Self {
        self.entry_match = entry_match;
        self
    }

    pub fn reference_data(&self) -> &ReferenceDataCache<C> {
        &self.cache
    }

    pub async fn resolve_task_id(&self, service: &str) -> Result<i64, SyncError> {
        let tasks = self.cache.task_forest().await?;
        self.resolver.resolve_task_id(&tasks, service)
    }

    pub async fn resolve_service_name(&self, entry: &TimeCampEntry) -> Result<String, SyncError> {
        let tasks = self.cache.task_forest().await?;
        self.resolver.resolve_service_name(&tasks, entry)
    }

    pub async fn fetch_entries(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<TimeLogEntry>, SyncError> {
        let entries = self.client.list_entries(from, to).await?;
        let tasks = self.cache.task_forest().await?;

        entries
            .iter()
            .map(|entry| {
                let service = self.resolver.resolve_service_name(&tasks, entry)?;
                Ok(decode_time_camp_entry(entry, service))
            })
            .collect()
    }

    pub async fn plan_entries(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        entries: &[TimeLogEntry],
    ) -> Result<SyncPlan, SyncError> {
        validate_range(from, to, entries)?;

        let original = self.client.list_entries(from, to).await?;
        let current = self.map_time_log_entries(entries).await?;

        let entry_match = self.entry_match;
        let mut plan = SyncPlan::default();
        for pairing in full_outer_join(
            &original,
            &current,
            |entry| entry_match.key(entry),
            |entry| entry_match.key(entry),
        ) {
            match pairing {
                Joined::Right(current) => plan.to_add.push(current.clone()),
                Joined::Left(original) => plan.to_remove.push(original.clone()),
                Joined::Both(_, _) => plan.unchanged += 1,
            }
        }
        Ok(plan)
    }

    /// Rewrites TimeCamp's entries for `from..=to` so they match `entries`.
    pub async fn sync_entries(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        entries: &[TimeLogEntry],
    ) -> Result<SyncResult, SyncError> {
        let plan = self.plan_entries(from, to, entries).await?;

        self.dispatch_batch(&plan.to_add, BatchOperation::Add).await?;
        self.dispatch_batch(&plan.to_remove, BatchOperation::Remove).await?;

        info!(
            %from,
            %to,
            added = plan.to_add.len(),
            removed = plan.to_remove.len(),
            unchanged = plan.unchanged,
            "synchronized TimeCamp entries"
        );
        Ok(SyncResult {
            added: plan.to_add,
            removed: plan.to_remove,
            unchanged: plan.unchanged,
        })
    }

    async fn map_time_log_entries(
        &self,
        entries: &[TimeLogEntry],
    ) -> Result<Vec<TimeCampEntry>, SyncError> {
        let snapshot = self.cache.ensure_initialized().await?;
        entries
            .iter()
            .map(|entry| {
                let task_id = self.resolver.resolve_task_id(&snapshot.tasks, &entry.service)?;
                Ok(encode_time_log_entry(
                    entry,
                    &snapshot.current_user.user_id,
                    task_id,
                ))
            })
            .collect()
    }

    async fn dispatch_batch(
        &self,
        entries: &[TimeCampEntry],
        operation: BatchOperation,
    ) -> Result<(), SyncError> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut requests: JoinSet<Result<(), SyncError>> = JoinSet::new();
        for entry in entries.iter().cloned() {
            let client = Arc::clone(&self.client);
            requests.spawn(async move {
                match operation {
                    BatchOperation::Add => client.create_entry(&entry).await,
                    BatchOperation::Remove => client.delete_entry(&entry).await,
                }
            });
        }

        let mut first_error = None;
        let mut failures = 0usize;
        while let Some(join_result) = requests.join_next().await {
            let outcome = join_result
                .map_err(|error| {
                    SyncError::Api(format!(
                        "failed to join {} request: {error}",
                        operation.as_str()
                    ))
                })
                .and_then(|result| result);
            if let Err(failure) = outcome {
                failures += 1;
                error!(operation = operation.as_str(), error = %failure, "TimeCamp request failed");
                first_error.get_or_insert(failure);
            }
        }

        match first_error {
            Some(failure) => {
                error!(
                    operation = operation.as_str(),
                    failures,
                    total = entries.len(),
                    "TimeCamp batch failed"
                );
                Err(failure)
            }
            None => Ok(()),
        }
    }
}

fn validate_range(
    from: NaiveDate,
    to: NaiveDate,
    entries: &[TimeLogEntry],
) -> Result<(), SyncError> {
    if from > to {
        return Err(SyncError::InvalidDateRange { from, to });
    }
    let count = entries
        .iter()
        .filter(|entry| !entry.is_within(from, to))
        .count();
    if count > 0 {
        return Err(SyncError::EntriesOutOfRange { from, to, count });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{CurrentUser, TaskNode};
    use async_trait::async_trait;
    use proptest::prelude::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    #[derive(Debug)]
    struct FakeTimeCampClient {
        entries: Mutex<Vec<TimeCampEntry>>,
        tasks: Vec<TaskNode>,
        next_id: AtomicU64,
        list_calls: AtomicUsize,
        create_calls: AtomicUsize,
        delete_calls: AtomicUsize,
        reference_calls: AtomicUsize,
        failing_description: Option<String>,
    }

    impl FakeTimeCampClient {
        fn new(tasks: Vec<TaskNode>) -> Self {
            Self {
                entries: Mutex::new(Vec::new()),
                tasks,
                next_id: AtomicU64::new(100),
                list_calls: AtomicUsize::new(0),
                create_calls: AtomicUsize::new(0),
                delete_calls: AtomicUsize::new(0),
                reference_calls: AtomicUsize::new(0),
                failing_description: None,
            }
        }

        fn failing_on(mut self, description: &str) -> Self {
            self.failing_description = Some(description.to_string());
            self
        }

        fn seed(&self, entry: TimeCampEntry) {
            self.entries.lock().expect("entries lock poisoned").push(entry);
        }

        fn stored(&self) -> Vec<TimeCampEntry> {
            self.entries.lock().expect("entries lock poisoned").clone()
        }

        fn mutation_calls(&self) -> usize {
            self.create_calls.load(Ordering::SeqCst) + self.delete_calls.load(Ordering::SeqCst)
        }

        fn fails_for(&self, entry: &TimeCampEntry) -> bool {
            self.failing_description.as_deref() == Some(entry.description.as_str())
        }
    }

    #[async_trait]
    impl TimeCampClient for FakeTimeCampClient {
        async fn list_entries(
            &self,
            from: NaiveDate,
            to: NaiveDate,
        ) -> Result<Vec<TimeCampEntry>, SyncError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .stored()
                .into_iter()
                .filter(|entry| entry.date >= from && entry.date <= to)
                .collect())
        }

        async fn create_entry(&self, entry: &TimeCampEntry) -> Result<(), SyncError> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            if self.fails_for(entry) {
                return Err(SyncError::Api("http 500".to_string()));
            }
            let mut created = entry.clone();
            created.id = Some(self.next_id.fetch_add(1, Ordering::SeqCst));
            self.seed(created);
            Ok(())
        }

        async fn delete_entry(&self, entry: &TimeCampEntry) -> Result<(), SyncError> {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            if self.fails_for(entry) {
                return Err(SyncError::Api("http 500".to_string()));
            }
            self.entries
                .lock()
                .expect("entries lock poisoned")
                .retain(|stored| stored.id != entry.id);
            Ok(())
        }

        async fn current_user(&self) -> Result<CurrentUser, SyncError> {
            self.reference_calls.fetch_add(1, Ordering::SeqCst);
            Ok(CurrentUser {
                user_id: "7".to_string(),
            })
        }

        async fn list_tasks(&self) -> Result<Vec<TaskNode>, SyncError> {
            self.reference_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.tasks.clone())
        }
    }

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid date")
    }

    fn time(hour: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, 0, 0).expect("valid time")
    }

    fn forest() -> Vec<TaskNode> {
        vec![
            TaskNode {
                task_id: 1,
                parent_id: 0,
                name: "ProjectX".to_string(),
            },
            TaskNode {
                task_id: 2,
                parent_id: 1,
                name: "Design".to_string(),
            },
            TaskNode {
                task_id: 3,
                parent_id: 0,
                name: "Admin".to_string(),
            },
        ]
    }

    fn design_mapping() -> ServiceMapping {
        ServiceMapping::new(vec![("Design", "ProjectX - Design")]).expect("valid mapping")
    }

    fn local(day: &str, start: u32, service: &str, description: &str) -> TimeLogEntry {
        TimeLogEntry {
            date: date(day),
            start: time(start),
            end: time(start + 1),
            service: service.to_string(),
            description: description.to_string(),
        }
    }

    fn remote(id: u64, day: &str, start: u32, task_id: &str, description: &str) -> TimeCampEntry {
        TimeCampEntry {
            id: Some(id),
            user_id: "7".to_string(),
            date: date(day),
            start: time(start),
            end: time(start + 1),
            task_id: task_id.to_string(),
            name: "Admin".to_string(),
            description: description.to_string(),
        }
    }

    fn service(client: &Arc<FakeTimeCampClient>) -> TimeSyncService<FakeTimeCampClient> {
        TimeSyncService::new(Arc::clone(client), design_mapping())
    }

    #[tokio::test]
    async fn adds_single_entry_to_empty_remote() {
        let client = Arc::new(FakeTimeCampClient::new(forest()));
        let sync = service(&client);

        let result = sync
            .sync_entries(
                date("2024-01-01"),
                date("2024-01-31"),
                &[local("2024-01-02", 9, "Design", "wireframes")],
            )
            .await
            .expect("sync succeeds");

        assert_eq!(result.added.len(), 1);
        assert!(result.removed.is_empty());
        let added = &result.added[0];
        assert_eq!(added.id, None);
        assert_eq!(added.task_id, "2");
        assert_eq!(added.user_id, "7");
        assert_eq!(added.name, "Design");
        assert_eq!(added.description, "wireframes");
        assert_eq!(client.create_calls.load(Ordering::SeqCst), 1);
        assert_eq!(client.delete_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn out_of_range_entry_fails_before_any_remote_call() {
        let client = Arc::new(FakeTimeCampClient::new(forest()));
        let sync = service(&client);

        let error = sync
            .sync_entries(
                date("2024-01-01"),
                date("2024-01-31"),
                &[
                    local("2024-01-02", 9, "Design", "in range"),
                    local("2024-02-01", 9, "Design", "too late"),
                ],
            )
            .await
            .expect_err("validation error");

        assert!(error.is_validation());
        assert!(matches!(error, SyncError::EntriesOutOfRange { count: 1, .. }));
        assert_eq!(client.list_calls.load(Ordering::SeqCst), 0);
        assert_eq!(client.reference_calls.load(Ordering::SeqCst), 0);
        assert_eq!(client.mutation_calls(), 0);
    }

    #[tokio::test]
    async fn inverted_range_is_rejected() {
        let client = Arc::new(FakeTimeCampClient::new(forest()));
        let sync = service(&client);

        let error = sync
            .sync_entries(date("2024-01-31"), date("2024-01-01"), &[])
            .await
            .expect_err("validation error");

        assert!(matches!(error, SyncError::InvalidDateRange { .. }));
        assert_eq!(client.list_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn remote_entries_without_local_counterpart_are_removed() {
        let client = Arc::new(FakeTimeCampClient::new(forest()));
        client.seed(remote(1, "2024-01-03", 9, "3", "standup"));
        client.seed(remote(2, "2024-01-04", 9, "3", "planning"));
        client.seed(remote(3, "2024-03-01", 9, "3", "outside range"));
        let sync = service(&client);

        let result = sync
            .sync_entries(date("2024-01-01"), date("2024-01-31"), &[])
            .await
            .expect("sync succeeds");

        assert!(result.added.is_empty());
        assert_eq!(result.removed.len(), 2);
        assert_eq!(client.delete_calls.load(Ordering::SeqCst), 2);
        let remaining = client.stored();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].description, "outside range");
    }

    #[tokio::test]
    async fn second_run_is_a_no_op() {
        let client = Arc::new(FakeTimeCampClient::new(forest()));
        let sync = service(&client);
        let entries = vec![
            local("2024-01-02", 9, "Design", "wireframes"),
            local("2024-01-02", 11, "Admin", "mail"),
        ];

        let first = sync
            .sync_entries(date("2024-01-01"), date("2024-01-31"), &entries)
            .await
            .expect("first sync");
        assert_eq!(first.added.len(), 2);

        let second = sync
            .sync_entries(date("2024-01-01"), date("2024-01-31"), &entries)
            .await
            .expect("second sync");

        assert!(second.added.is_empty());
        assert!(second.removed.is_empty());
        assert_eq!(second.unchanged, 2);
        assert_eq!(client.create_calls.load(Ordering::SeqCst), 2);
        assert_eq!(client.delete_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn exact_matching_recreates_unchanged_entries() {
        let client = Arc::new(FakeTimeCampClient::new(forest()));
        let sync = service(&client).with_entry_match(EntryMatch::Exact);
        let entries = vec![local("2024-01-02", 9, "Design", "wireframes")];

        sync.sync_entries(date("2024-01-01"), date("2024-01-31"), &entries)
            .await
            .expect("first sync");
        let second = sync
            .sync_entries(date("2024-01-01"), date("2024-01-31"), &entries)
            .await
            .expect("second sync");

        assert_eq!(second.added.len(), 1);
        assert_eq!(second.removed.len(), 1);
        assert_eq!(second.unchanged, 0);
        assert_eq!(client.stored().len(), 1);
    }

    #[tokio::test]
    async fn changed_entry_is_replaced() {
        let client = Arc::new(FakeTimeCampClient::new(forest()));
        client.seed(remote(1, "2024-01-02", 9, "3", "old text"));
        let sync = service(&client);

        let result = sync
            .sync_entries(
                date("2024-01-01"),
                date("2024-01-31"),
                &[local("2024-01-02", 9, "Admin", "new text")],
            )
            .await
            .expect("sync succeeds");

        assert_eq!(result.added.len(), 1);
        assert_eq!(result.removed.len(), 1);
        assert_eq!(result.removed[0].id, Some(1));
        let stored = client.stored();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].description, "new text");
    }

    #[tokio::test]
    async fn duplicate_local_entries_each_get_created() {
        let client = Arc::new(FakeTimeCampClient::new(forest()));
        client.seed(remote(1, "2024-01-02", 9, "3", "mail"));
        let sync = service(&client);
        let entry = local("2024-01-02", 9, "Admin", "mail");

        let plan = sync
            .plan_entries(
                date("2024-01-01"),
                date("2024-01-31"),
                &[entry.clone(), entry],
            )
            .await
            .expect("plan succeeds");

        assert_eq!(plan.unchanged, 1);
        assert_eq!(plan.to_add.len(), 1);
        assert!(plan.to_remove.is_empty());
    }

    #[tokio::test]
    async fn planning_does_not_touch_remote_entries() {
        let client = Arc::new(FakeTimeCampClient::new(forest()));
        client.seed(remote(1, "2024-01-03", 9, "3", "standup"));
        let sync = service(&client);

        let plan = sync
            .plan_entries(
                date("2024-01-01"),
                date("2024-01-31"),
                &[local("2024-01-02", 9, "Design", "wireframes")],
            )
            .await
            .expect("plan succeeds");

        assert_eq!(plan.to_add.len(), 1);
        assert_eq!(plan.to_remove.len(), 1);
        assert!(!plan.is_empty());
        assert_eq!(client.mutation_calls(), 0);
    }

    #[tokio::test]
    async fn unresolvable_service_aborts_without_mutation() {
        let client = Arc::new(FakeTimeCampClient::new(forest()));
        client.seed(remote(1, "2024-01-03", 9, "3", "standup"));
        let sync = service(&client);

        let error = sync
            .sync_entries(
                date("2024-01-01"),
                date("2024-01-31"),
                &[local("2024-01-02", 9, "Marketing", "launch")],
            )
            .await
            .expect_err("resolution error");

        assert!(error.is_resolution());
        assert_eq!(client.mutation_calls(), 0);
    }

    #[tokio::test]
    async fn failed_addition_skips_removals_but_not_sibling_additions() {
        let client = Arc::new(FakeTimeCampClient::new(forest()).failing_on("broken"));
        client.seed(remote(1, "2024-01-03", 9, "3", "standup"));
        let sync = service(&client);

        let error = sync
            .sync_entries(
                date("2024-01-01"),
                date("2024-01-31"),
                &[
                    local("2024-01-02", 9, "Design", "broken"),
                    local("2024-01-02", 10, "Design", "fine"),
                    local("2024-01-02", 11, "Admin", "also fine"),
                ],
            )
            .await
            .expect_err("batch fails");

        assert!(matches!(error, SyncError::Api(_)));
        assert_eq!(client.create_calls.load(Ordering::SeqCst), 3);
        assert_eq!(client.delete_calls.load(Ordering::SeqCst), 0);
        let descriptions: Vec<String> = client
            .stored()
            .into_iter()
            .map(|entry| entry.description)
            .collect();
        assert!(descriptions.contains(&"standup".to_string()));
        assert!(descriptions.contains(&"fine".to_string()));
        assert!(descriptions.contains(&"also fine".to_string()));
    }

    #[tokio::test]
    async fn failed_removal_still_attempts_every_removal() {
        let client = Arc::new(FakeTimeCampClient::new(forest()).failing_on("locked"));
        client.seed(remote(1, "2024-01-03", 9, "3", "locked"));
        client.seed(remote(2, "2024-01-04", 9, "3", "stale"));
        let sync = service(&client);

        let error = sync
            .sync_entries(date("2024-01-01"), date("2024-01-31"), &[])
            .await
            .expect_err("batch fails");

        assert!(matches!(error, SyncError::Api(_)));
        assert_eq!(client.delete_calls.load(Ordering::SeqCst), 2);
        assert_eq!(client.stored().len(), 1);
    }

    #[tokio::test]
    async fn fetch_maps_remote_entries_back_to_service_labels() {
        let client = Arc::new(FakeTimeCampClient::new(forest()));
        client.seed(remote(1, "2024-01-02", 9, "2", "wireframes"));
        client.seed(remote(2, "2024-01-03", 9, "3", "mail"));
        let sync = service(&client);

        let entries = sync
            .fetch_entries(date("2024-01-01"), date("2024-01-31"))
            .await
            .expect("fetch succeeds");

        assert_eq!(
            entries,
            vec![
                local("2024-01-02", 9, "Design", "wireframes"),
                local("2024-01-03", 9, "Admin", "mail"),
            ]
        );
    }

    #[tokio::test]
    async fn fetch_fails_on_dangling_task_reference() {
        let client = Arc::new(FakeTimeCampClient::new(forest()));
        client.seed(remote(1, "2024-01-02", 9, "42", "orphan"));
        let sync = service(&client);

        let error = sync
            .fetch_entries(date("2024-01-01"), date("2024-01-31"))
            .await
            .expect_err("dangling task");

        assert!(matches!(error, SyncError::DanglingTask { task_id } if task_id == "42"));
    }

    #[tokio::test]
    async fn resolution_round_trips_through_the_service() {
        let client = Arc::new(FakeTimeCampClient::new(forest()));
        let sync = TimeSyncService::new(Arc::clone(&client), ServiceMapping::default());

        let task_id = sync.resolve_task_id("ProjectX - Design").await.expect("resolved");
        assert_eq!(task_id, 2);

        let name = sync
            .resolve_service_name(&remote(1, "2024-01-02", 9, &task_id.to_string(), ""))
            .await
            .expect("named");
        assert_eq!(name, "ProjectX - Design");
        assert_eq!(client.reference_calls.load(Ordering::SeqCst), 2);
        assert!(sync.reference_data().is_initialized());
    }

    fn description_pattern() -> impl Strategy<Value = String> {
        "[a-z]{1,12}".prop_map(|value| value.to_string())
    }

    // Distinct start hours keep the generated entries pairwise different.
    proptest! {
        #[test]
        fn every_new_local_entry_is_added_once(descriptions in proptest::collection::vec(description_pattern(), 0..8)) {
            let runtime = tokio::runtime::Runtime::new().expect("runtime");
            runtime.block_on(async move {
                let client = Arc::new(FakeTimeCampClient::new(forest()));
                let sync = service(&client);
                let entries: Vec<TimeLogEntry> = descriptions
                    .iter()
                    .enumerate()
                    .map(|(index, description)| local("2024-01-02", index as u32 + 8, "Design", description))
                    .collect();

                let result = sync
                    .sync_entries(date("2024-01-01"), date("2024-01-31"), &entries)
                    .await
                    .expect("sync succeeds");

                assert_eq!(result.added.len(), entries.len());
                assert!(result.removed.is_empty());
                assert_eq!(client.create_calls.load(Ordering::SeqCst), entries.len());
                assert_eq!(client.delete_calls.load(Ordering::SeqCst), 0);
            });
        }
    }

    proptest! {
        #[test]
        fn every_orphaned_remote_entry_is_removed_once(descriptions in proptest::collection::vec(description_pattern(), 0..8)) {
            let runtime = tokio::runtime::Runtime::new().expect("runtime");
            runtime.block_on(async move {
                let client = Arc::new(FakeTimeCampClient::new(forest()));
                for (index, description) in descriptions.iter().enumerate() {
                    client.seed(remote(index as u64 + 1, "2024-01-05", index as u32 + 8, "3", description));
                }
                let sync = service(&client);

                let result = sync
                    .sync_entries(date("2024-01-01"), date("2024-01-31"), &[])
                    .await
                    .expect("sync succeeds");

                assert!(result.added.is_empty());
                assert_eq!(result.removed.len(), descriptions.len());
                assert_eq!(client.delete_calls.load(Ordering::SeqCst), descriptions.len());
                assert!(client.stored().is_empty());
            });
        }
    }
}
