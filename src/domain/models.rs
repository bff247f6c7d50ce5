use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

pub const TASK_PATH_SEPARATOR: &str = " - ";
pub const ROOT_PARENT_ID: i64 = 0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeLogEntry {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub service: String,
    pub description: String,
}

impl TimeLogEntry {
    pub fn is_within(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.date >= from && self.date <= to
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub user_id: String,
}

/// One node of the remote task forest. `parent_id == 0` marks a root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskNode {
    pub task_id: i64,
    pub parent_id: i64,
    pub name: String,
}

impl TaskNode {
    pub fn is_root(&self) -> bool {
        self.parent_id == ROOT_PARENT_ID
    }
}

pub fn split_task_path(path: &str) -> Vec<&str> {
    path.split(TASK_PATH_SEPARATOR).collect()
}

pub fn join_task_path<S: AsRef<str>>(names: &[S]) -> String {
    names
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(TASK_PATH_SEPARATOR)
}
