use crate::domain::models::TimeLogEntry;
use crate::infrastructure::error::SyncError;
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

const REQUIRED_COLUMNS: [&str; 5] = ["Date", "Start", "End", "Service", "Description"];

pub trait TimeLog: Send + Sync {
    fn get_entries(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<TimeLogEntry>, SyncError>;
}

#[derive(Debug, Deserialize)]
struct CsvTimeLogRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Start")]
    start: String,
    #[serde(rename = "End")]
    end: String,
    #[serde(rename = "Client")]
    client: Option<String>,
    #[serde(rename = "Service")]
    service: String,
    #[serde(rename = "Description")]
    description: String,
}

#[derive(Debug, Clone)]
pub struct CsvTimeLog {
    path: PathBuf,
    client: Option<String>,
}

impl CsvTimeLog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            client: None,
        }
    }

    /// Rows tagged with a different client are skipped; untagged rows are kept.
    pub fn with_client(mut self, client: Option<String>) -> Self {
        self.client = client
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn belongs_to_client(&self, row_client: Option<&str>) -> bool {
        match (self.client.as_deref(), row_client.map(str::trim)) {
            (None, _) | (_, None) | (_, Some("")) => true,
            (Some(expected), Some(actual)) => expected == actual,
        }
    }
}

fn parse_date(value: &str, line: u64) -> Result<NaiveDate, SyncError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|error| {
        SyncError::InvalidTimeLog(format!("line {line}: invalid date '{value}': {error}"))
    })
}

fn parse_time(value: &str, line: u64) -> Result<NaiveTime, SyncError> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|error| {
            SyncError::InvalidTimeLog(format!("line {line}: invalid time '{value}': {error}"))
        })
}

impl TimeLog for CsvTimeLog {
    fn get_entries(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<TimeLogEntry>, SyncError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)?;

        let headers = reader.headers()?.clone();
        if REQUIRED_COLUMNS
            .iter()
            .any(|column| !headers.iter().any(|header| header == *column))
        {
            return Err(SyncError::InvalidTimeLog(format!(
                "unexpected header row in {}; expected: {}",
                self.path.display(),
                REQUIRED_COLUMNS.join(", ")
            )));
        }

        let mut entries = Vec::new();
        for record in reader.records() {
            let record = record?;
            let line = record.position().map_or(0, csv::Position::line);
            let row: CsvTimeLogRow = record.deserialize(Some(&headers))?;

            if !self.belongs_to_client(row.client.as_deref()) {
                continue;
            }
            let entry = TimeLogEntry {
                date: parse_date(&row.date, line)?,
                start: parse_time(&row.start, line)?,
                end: parse_time(&row.end, line)?,
                service: row.service,
                description: row.description,
            };
            if entry.is_within(from, to) {
                entries.push(entry);
            }
        }

        debug!(path = %self.path.display(), count = entries.len(), "read time log");
        Ok(entries)
    }
}
