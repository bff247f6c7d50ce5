use crate::application::task_resolver::ServiceMapping;
use crate::application::time_sync::{EntryMatch, TimeSyncService};
use crate::infrastructure::config::{AppSettings, load_settings};
use crate::infrastructure::credential_store::{CredentialStore, resolve_auth_token};
use crate::infrastructure::error::SyncError;
use crate::infrastructure::time_log::CsvTimeLog;
use crate::infrastructure::timecamp_client::ReqwestTimeCampClient;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub struct SyncContext {
    pub config_dir: PathBuf,
    pub settings: AppSettings,
    pub time_log: CsvTimeLog,
    pub service: TimeSyncService<ReqwestTimeCampClient>,
}

pub fn bootstrap_sync(
    config_dir: &Path,
    credential_store: &dyn CredentialStore,
) -> Result<SyncContext, SyncError> {
    let settings = load_settings(config_dir)?;
    let mapping = ServiceMapping::new(settings.service_mapping_pairs())?;
    let auth_token = resolve_auth_token(settings.time_camp.auth_token.as_deref(), credential_store)?;

    let client = ReqwestTimeCampClient::new(
        &settings.time_camp.base_address,
        auth_token,
        Duration::from_secs(settings.time_camp.timeout_seconds),
    )?;
    let entry_match = if settings.time_camp.match_remote_id {
        EntryMatch::Exact
    } else {
        EntryMatch::IgnoreRemoteId
    };
    let service = TimeSyncService::new(Arc::new(client), mapping).with_entry_match(entry_match);
    let time_log = CsvTimeLog::new(settings.time_log_path(config_dir))
        .with_client(settings.time_log.client.clone());

    Ok(SyncContext {
        config_dir: config_dir.to_path_buf(),
        settings,
        time_log,
        service,
    })
}
