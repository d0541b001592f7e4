//! Implements ScheduleSourcePort over a CSV export. Uses the `csv` crate with serde.
//!
//! Header row names the RawScheduleRow fields (`days_times`, `start_end_date`, `room`, ...).
//! Missing columns default to empty text.

use crate::domain::{DomainError, RawScheduleRow, ScheduleSnapshot};
use crate::ports::ScheduleSourcePort;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

pub struct CsvScheduleSource {
    path: PathBuf,
    student_name: Option<String>,
}

impl CsvScheduleSource {
    pub fn new(path: impl AsRef<Path>, student_name: Option<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            student_name,
        }
    }

    /// Parse CSV bytes (comma-delimited, header row required).
    pub fn parse(bytes: &[u8]) -> Result<Vec<RawScheduleRow>, DomainError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(bytes);
        rdr.deserialize()
            .enumerate()
            .map(|(i, record)| {
                record.map_err(|e| DomainError::Source(format!("CSV record {}: {}", i + 1, e)))
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl ScheduleSourcePort for CsvScheduleSource {
    async fn load_schedule(&self) -> Result<ScheduleSnapshot, DomainError> {
        let bytes = fs::read(&self.path)
            .await
            .map_err(|e| DomainError::Source(format!("read {}: {}", self.path.display(), e)))?;
        let rows = Self::parse(&bytes)?;
        info!(path = %self.path.display(), rows = rows.len(), "parsed CSV schedule");
        Ok(ScheduleSnapshot {
            student_name: self.student_name.clone(),
            rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_quoted_fields() {
        let csv = "\
course_code,section,component,days_times,start_end_date,room,instructor
CS 135,001,LEC,MWF 1:00PM - 1:50PM,01/05/2015 - 04/10/2015,MC 2065,\"Smith, Jane\"
CS 135,101,TUT,TBA,01/05/2015 - 04/10/2015,TBA,
";
        let rows = CsvScheduleSource::parse(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].days_times, "MWF 1:00PM - 1:50PM");
        assert_eq!(rows[0].instructor, "Smith, Jane");
        // column not present in the header
        assert_eq!(rows[0].class_number, "");
        assert_eq!(rows[1].days_times, "TBA");
    }

    #[test]
    fn test_parse_header_only() {
        let rows = CsvScheduleSource::parse(b"days_times,start_end_date\n").unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_student_name_is_passed_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        std::fs::write(&path, "days_times\nM 9:30AM - 10:20AM\n").unwrap();

        let source = CsvScheduleSource::new(&path, Some("Jane Doe".into()));
        let snapshot = source.load_schedule().await.unwrap();
        assert_eq!(snapshot.student_name.as_deref(), Some("Jane Doe"));
        assert_eq!(snapshot.rows.len(), 1);
    }
}
