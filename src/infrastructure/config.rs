use crate::infrastructure::error::SyncError;
use crate::infrastructure::timecamp_client::{DEFAULT_BASE_ADDRESS, DEFAULT_TIMEOUT_SECONDS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const APP_SETTINGS_JSON: &str = "appsettings.json";
pub const DEVELOPMENT_SETTINGS_JSON: &str = "appsettings.development.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct AppSettings {
    pub time_log: TimeLogSettings,
    pub time_camp: TimeCampSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct TimeLogSettings {
    pub file_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct TimeCampSettings {
    #[serde(default = "default_base_address")]
    pub base_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub match_remote_id: bool,
    #[serde(default)]
    pub service_mappings: Vec<ServiceMappingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceMappingSettings {
    pub time_log_entry_service: String,
    pub time_camp_time_entry_task_name: String,
}

fn default_base_address() -> String {
    DEFAULT_BASE_ADDRESS.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}

impl AppSettings {
    pub fn time_log_path(&self, config_dir: &Path) -> PathBuf {
        if self.time_log.file_path.is_absolute() {
            self.time_log.file_path.clone()
        } else {
            config_dir.join(&self.time_log.file_path)
        }
    }

    pub fn service_mapping_pairs(&self) -> impl Iterator<Item = (String, String)> + '_ {
        self.time_camp.service_mappings.iter().map(|mapping| {
            (
                mapping.time_log_entry_service.clone(),
                mapping.time_camp_time_entry_task_name.clone(),
            )
        })
    }

    fn validate(&self) -> Result<(), SyncError> {
        if self.time_log.file_path.as_os_str().is_empty() {
            return Err(SyncError::InvalidConfig(
                "TimeLog.FilePath must not be empty".to_string(),
            ));
        }
        if self.time_camp.base_address.trim().is_empty() {
            return Err(SyncError::InvalidConfig(
                "TimeCamp.BaseAddress must not be empty".to_string(),
            ));
        }
        if self.time_camp.timeout_seconds == 0 {
            return Err(SyncError::InvalidConfig(
                "TimeCamp.TimeoutSeconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_settings() -> serde_json::Value {
    serde_json::json!({
        "TimeLog": {
            "FilePath": "timelog.csv"
        },
        "TimeCamp": {
            "BaseAddress": DEFAULT_BASE_ADDRESS,
            "TimeoutSeconds": DEFAULT_TIMEOUT_SECONDS,
            "ServiceMappings": []
        }
    })
}

pub fn ensure_default_config(config_dir: &Path) -> Result<bool, SyncError> {
    let path = config_dir.join(APP_SETTINGS_JSON);
    if path.exists() {
        return Ok(false);
    }
    fs::create_dir_all(config_dir)?;
    let formatted = serde_json::to_string_pretty(&default_settings())?;
    fs::write(path, format!("{formatted}\n"))?;
    Ok(true)
}

fn read_config(path: &Path) -> Result<serde_json::Value, SyncError> {
    let raw = fs::read_to_string(path).map_err(|error| {
        SyncError::InvalidConfig(format!("cannot read {}: {error}", path.display()))
    })?;
    let parsed: serde_json::Value = serde_json::from_str(&raw).map_err(|error| {
        SyncError::InvalidConfig(format!("malformed JSON in {}: {error}", path.display()))
    })?;
    if !parsed.is_object() {
        return Err(SyncError::InvalidConfig(format!(
            "expected a JSON object in {}",
            path.display()
        )));
    }
    Ok(parsed)
}

fn merge_values(base: &mut serde_json::Value, overlay: serde_json::Value) {
    match (base, overlay) {
        (serde_json::Value::Object(base), serde_json::Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

pub fn load_settings(config_dir: &Path) -> Result<AppSettings, SyncError> {
    let mut merged = read_config(&config_dir.join(APP_SETTINGS_JSON))?;

    let development = config_dir.join(DEVELOPMENT_SETTINGS_JSON);
    if development.exists() {
        merge_values(&mut merged, read_config(&development)?);
    }

    let settings: AppSettings = serde_json::from_value(merged)
        .map_err(|error| SyncError::InvalidConfig(format!("invalid settings: {error}")))?;
    settings.validate()?;
    Ok(settings)
}
