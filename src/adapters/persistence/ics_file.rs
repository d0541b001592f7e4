//! Implements CalendarSinkPort by writing `.ics` files into a directory.

use crate::domain::{CalendarDocument, DomainError};
use crate::ports::CalendarSinkPort;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Output directory for exported calendars.
pub struct IcsFileSink {
    dir: PathBuf,
}

impl IcsFileSink {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn target(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }
}

#[async_trait::async_trait]
impl CalendarSinkPort for IcsFileSink {
    async fn exists(&self, file_name: &str) -> bool {
        fs::try_exists(self.target(file_name)).await.unwrap_or(false)
    }

    /// Write-replace: temp file, sync_all, then rename over the target.
    /// A crash mid-write never leaves a truncated calendar behind.
    async fn deliver(
        &self,
        file_name: &str,
        document: &CalendarDocument,
    ) -> Result<PathBuf, DomainError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| DomainError::Sink(format!("create {}: {}", self.dir.display(), e)))?;

        let path = self.target(file_name);
        let temp_path = path.with_extension("ics.tmp");
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::Sink(format!("create temp file: {}", e)))?;
        f.write_all(document.as_str().as_bytes())
            .await
            .map_err(|e| DomainError::Sink(format!("write temp file: {}", e)))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::Sink(format!("sync temp file: {}", e)))?;
        drop(f);

        fs::rename(&temp_path, &path)
            .await
            .map_err(|e| DomainError::Sink(format!("atomic rename failed: {}", e)))?;
        debug!(path = %path.display(), bytes = document.as_str().len(), "wrote calendar");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::RandomUid;
    use crate::domain::{
        CalendarHeader, CompileOptions, RawScheduleRow, ScheduleExport, compile_schedule,
    };
    use chrono::Utc;

    fn document() -> CalendarDocument {
        let rows = [RawScheduleRow {
            days_times: "MWF 1:00PM - 1:50PM".into(),
            start_end_date: "01/05/2015 - 04/10/2015".into(),
            ..RawScheduleRow::default()
        }];
        match compile_schedule(
            &rows,
            &CompileOptions::default(),
            &CalendarHeader::default(),
            &mut RandomUid,
            Utc::now(),
        ) {
            ScheduleExport::Calendar { document, .. } => document,
            other => panic!("expected a calendar, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_deliver_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = IcsFileSink::new(dir.path().join("out"));
        let doc = document();

        assert!(!sink.exists("a.ics").await);
        let path = sink.deliver("a.ics", &doc).await.unwrap();
        assert_eq!(path, dir.path().join("out").join("a.ics"));
        assert!(sink.exists("a.ics").await);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), doc.as_str());
        assert!(!dir.path().join("out").join("a.ics.tmp").exists());
    }

    #[tokio::test]
    async fn test_deliver_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.ics"), "old").unwrap();
        let sink = IcsFileSink::new(dir.path());

        let path = sink.deliver("a.ics", &document()).await.unwrap();
        assert!(std::fs::read_to_string(path).unwrap().starts_with("BEGIN:VCALENDAR"));
    }
}
