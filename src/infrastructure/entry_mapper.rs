use crate::domain::models::{CurrentUser, TaskNode, TimeLogEntry};
use crate::infrastructure::error::SyncError;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

// TimeCamp returns ids as numbers on some endpoints and numeric strings on others.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

fn deserialize_id_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(value) => value.to_string(),
        RawId::Text(value) => value.trim().to_string(),
    })
}

fn deserialize_id_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(0),
        Some(RawId::Number(value)) => Ok(value),
        Some(RawId::Text(value)) if value.trim().is_empty() => Ok(0),
        Some(RawId::Text(value)) => value
            .trim()
            .parse()
            .map_err(|error| serde::de::Error::custom(format!("invalid id '{value}': {error}"))),
    }
}

fn deserialize_entry_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = deserialize_id_number(deserializer)?;
    if id == 0 {
        return Ok(None);
    }
    u64::try_from(id)
        .map(Some)
        .map_err(|_| serde::de::Error::custom(format!("negative entry id {id}")))
}

fn deserialize_nullable_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TimeCampEntry {
    #[serde(
        default,
        deserialize_with = "deserialize_entry_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<u64>,
    #[serde(deserialize_with = "deserialize_id_text")]
    pub user_id: String,
    pub date: NaiveDate,
    #[serde(rename = "start_time")]
    pub start: NaiveTime,
    #[serde(rename = "end_time")]
    pub end: NaiveTime,
    #[serde(deserialize_with = "deserialize_id_text")]
    pub task_id: String,
    #[serde(default, deserialize_with = "deserialize_nullable_text")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_nullable_text")]
    pub description: String,
}

impl TimeCampEntry {
    pub fn task_number(&self) -> Result<i64, SyncError> {
        self.task_id
            .trim()
            .parse()
            .map_err(|_| SyncError::DanglingTask {
                task_id: self.task_id.clone(),
            })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimeCampUser {
    #[serde(deserialize_with = "deserialize_id_text")]
    pub user_id: String,
}

impl From<TimeCampUser> for CurrentUser {
    fn from(user: TimeCampUser) -> Self {
        Self {
            user_id: user.user_id,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimeCampTask {
    #[serde(deserialize_with = "deserialize_id_number")]
    pub task_id: i64,
    #[serde(default, deserialize_with = "deserialize_id_number")]
    pub parent_id: i64,
    #[serde(default, deserialize_with = "deserialize_nullable_text")]
    pub name: String,
}

impl From<TimeCampTask> for TaskNode {
    fn from(task: TimeCampTask) -> Self {
        Self {
            task_id: task.task_id,
            parent_id: task.parent_id,
            name: task.name,
        }
    }
}

pub fn encode_time_log_entry(entry: &TimeLogEntry, user_id: &str, task_id: i64) -> TimeCampEntry {
    TimeCampEntry {
        id: None,
        user_id: user_id.to_string(),
        date: entry.date,
        start: entry.start,
        end: entry.end,
        task_id: task_id.to_string(),
        name: entry.service.clone(),
        description: entry.description.clone(),
    }
}

pub fn decode_time_camp_entry(entry: &TimeCampEntry, service: String) -> TimeLogEntry {
    TimeLogEntry {
        date: entry.date,
        start: entry.start,
        end: entry.end,
        service,
        description: entry.description.clone(),
    }
}
