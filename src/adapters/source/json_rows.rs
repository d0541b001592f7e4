//! Implements ScheduleSourcePort over a JSON file.
//!
//! Accepts either a bare array of rows or `{ "student_name": ..., "rows": [...] }`.

use crate::domain::{DomainError, RawScheduleRow, ScheduleSnapshot};
use crate::ports::ScheduleSourcePort;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonSchedule {
    Rows(Vec<RawScheduleRow>),
    Snapshot(ScheduleSnapshot),
}

pub struct JsonScheduleSource {
    path: PathBuf,
    /// Used when the file itself carries no name.
    student_name: Option<String>,
}

impl JsonScheduleSource {
    pub fn new(path: impl AsRef<Path>, student_name: Option<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            student_name,
        }
    }

    pub fn parse(json: &str) -> Result<ScheduleSnapshot, DomainError> {
        let parsed: JsonSchedule = serde_json::from_str(json)
            .map_err(|e| DomainError::Source(format!("schedule JSON: {}", e)))?;
        Ok(match parsed {
            JsonSchedule::Rows(rows) => ScheduleSnapshot {
                student_name: None,
                rows,
            },
            JsonSchedule::Snapshot(snapshot) => snapshot,
        })
    }
}

#[async_trait::async_trait]
impl ScheduleSourcePort for JsonScheduleSource {
    async fn load_schedule(&self) -> Result<ScheduleSnapshot, DomainError> {
        let json = fs::read_to_string(&self.path)
            .await
            .map_err(|e| DomainError::Source(format!("read {}: {}", self.path.display(), e)))?;
        let mut snapshot = Self::parse(&json)?;
        if snapshot.student_name.is_none() {
            snapshot.student_name = self.student_name.clone();
        }
        info!(path = %self.path.display(), rows = snapshot.rows.len(), "parsed JSON schedule");
        Ok(snapshot)
    }
}
