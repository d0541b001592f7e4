//! Export logic: load rows -> compile -> assemble -> deliver.
//!
//! - Compilation is one pure pass over the loaded rows (no shared counters)
//! - Per-row failures are logged and skipped, never abort the export
//! - Zero events is an outcome (`NothingToExport`), not an error; no file is written

use crate::domain::{
    CalendarHeader, CompileOptions, DomainError, RandomUid, ScheduleExport, compile_schedule,
};
use crate::ports::{CalendarSinkPort, ScheduleSourcePort};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

const FILE_SUFFIX: &str = "uw-class-schedule.ics";

/// `Jane Q Doe` → `jane-q-doe-uw-class-schedule.ics`; no name → `uw-class-schedule.ics`.
pub fn schedule_file_name(student_name: Option<&str>) -> String {
    let stem = student_name
        .unwrap_or_default()
        .to_lowercase()
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if stem.is_empty() {
        FILE_SUFFIX.to_string()
    } else {
        format!("{}-{}", stem, FILE_SUFFIX)
    }
}

/// Compiled but not yet delivered. Lets the caller confirm before anything is written.
#[derive(Debug, Clone)]
pub struct PreparedExport {
    pub file_name: String,
    pub export: ScheduleExport,
}

/// What the caller should tell the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Exported {
        path: PathBuf,
        events: usize,
        skipped: usize,
    },
    /// No row had meeting times; nothing was written.
    NothingToExport { skipped: usize },
}

/// Export service. Coordinates schedule source, compiler and calendar sink.
pub struct ExportService {
    source: Arc<dyn ScheduleSourcePort>,
    sink: Arc<dyn CalendarSinkPort>,
    options: CompileOptions,
    header: CalendarHeader,
}

impl ExportService {
    pub fn new(
        source: Arc<dyn ScheduleSourcePort>,
        sink: Arc<dyn CalendarSinkPort>,
        options: CompileOptions,
        header: CalendarHeader,
    ) -> Self {
        Self {
            source,
            sink,
            options,
            header,
        }
    }

    /// Load and compile all rows. Nothing is written.
    pub async fn prepare(&self) -> Result<PreparedExport, DomainError> {
        let snapshot = self.source.load_schedule().await?;
        info!(
            rows = snapshot.rows.len(),
            anchor = %self.options.anchor_strategy,
            "loaded schedule rows"
        );

        let export = compile_schedule(
            &snapshot.rows,
            &self.options,
            &self.header,
            &mut RandomUid,
            Utc::now(),
        );
        for skipped in export.skipped() {
            warn!(row = skipped.index, reason = %skipped.reason, "skipping schedule row");
        }

        Ok(PreparedExport {
            file_name: schedule_file_name(snapshot.student_name.as_deref()),
            export,
        })
    }

    /// True if delivering `prepared` would replace an existing calendar.
    pub async fn would_overwrite(&self, prepared: &PreparedExport) -> bool {
        matches!(prepared.export, ScheduleExport::Calendar { .. })
            && self.sink.exists(&prepared.file_name).await
    }

    /// Hand the document to the sink, or report that there is nothing to export.
    pub async fn deliver(&self, prepared: PreparedExport) -> Result<ExportOutcome, DomainError> {
        match prepared.export {
            ScheduleExport::Calendar {
                document, skipped, ..
            } => {
                let path = self.sink.deliver(&prepared.file_name, &document).await?;
                info!(
                    path = %path.display(),
                    events = document.event_count(),
                    skipped = skipped.len(),
                    "calendar exported"
                );
                Ok(ExportOutcome::Exported {
                    path,
                    events: document.event_count(),
                    skipped: skipped.len(),
                })
            }
            ScheduleExport::NoQualifyingRows { skipped } => {
                info!(skipped = skipped.len(), "no rows with meeting times; nothing exported");
                Ok(ExportOutcome::NothingToExport {
                    skipped: skipped.len(),
                })
            }
        }
    }

    /// `prepare` then `deliver`, without confirmation.
    pub async fn run(&self) -> Result<ExportOutcome, DomainError> {
        let prepared = self.prepare().await?;
        self.deliver(prepared).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CalendarDocument, RawScheduleRow, ScheduleSnapshot};
    use tokio::sync::Mutex;

    struct StaticSource(ScheduleSnapshot);

    #[async_trait::async_trait]
    impl ScheduleSourcePort for StaticSource {
        async fn load_schedule(&self) -> Result<ScheduleSnapshot, DomainError> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    #[async_trait::async_trait]
    impl ScheduleSourcePort for FailingSource {
        async fn load_schedule(&self) -> Result<ScheduleSnapshot, DomainError> {
            Err(DomainError::Source("page not found".into()))
        }
    }

    /// Records deliveries in memory.
    #[derive(Default)]
    struct MemorySink {
        delivered: Mutex<Vec<(String, String)>>,
    }

    #[async_trait::async_trait]
    impl CalendarSinkPort for MemorySink {
        async fn exists(&self, file_name: &str) -> bool {
            self.delivered
                .lock()
                .await
                .iter()
                .any(|(name, _)| name == file_name)
        }

        async fn deliver(
            &self,
            file_name: &str,
            document: &CalendarDocument,
        ) -> Result<PathBuf, DomainError> {
            self.delivered
                .lock()
                .await
                .push((file_name.to_string(), document.as_str().to_string()));
            Ok(PathBuf::from(file_name))
        }
    }

    fn snapshot(days_times: &[&str]) -> ScheduleSnapshot {
        ScheduleSnapshot {
            student_name: Some("Jane Q Doe".into()),
            rows: days_times
                .iter()
                .map(|dt| RawScheduleRow {
                    days_times: dt.to_string(),
                    start_end_date: "01/05/2015 - 04/10/2015".into(),
                    course_code: "CS 135".into(),
                    ..RawScheduleRow::default()
                })
                .collect(),
        }
    }

    fn service(source: ScheduleSnapshot, sink: Arc<MemorySink>) -> ExportService {
        ExportService::new(
            Arc::new(StaticSource(source)),
            sink,
            CompileOptions::default(),
            CalendarHeader::default(),
        )
    }

    #[test]
    fn test_schedule_file_name() {
        assert_eq!(
            schedule_file_name(Some("Jane Q Doe")),
            "jane-q-doe-uw-class-schedule.ics"
        );
        assert_eq!(
            schedule_file_name(Some("  Doe, Jane ")),
            "doe-jane-uw-class-schedule.ics"
        );
        assert_eq!(schedule_file_name(Some("../..")), "uw-class-schedule.ics");
        assert_eq!(schedule_file_name(None), "uw-class-schedule.ics");
    }

    #[tokio::test]
    async fn test_exports_qualifying_rows() {
        let sink = Arc::new(MemorySink::default());
        let svc = service(
            snapshot(&["MWF 1:00PM - 1:50PM", "TBA", "TTh 2:30PM - 3:50PM"]),
            Arc::clone(&sink),
        );

        let outcome = svc.run().await.unwrap();
        assert_eq!(
            outcome,
            ExportOutcome::Exported {
                path: PathBuf::from("jane-q-doe-uw-class-schedule.ics"),
                events: 2,
                skipped: 0,
            }
        );
        let delivered = sink.delivered.lock().await;
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].1.matches("BEGIN:VEVENT").count(), 2);
    }

    #[tokio::test]
    async fn test_nothing_to_export_writes_nothing() {
        let sink = Arc::new(MemorySink::default());
        let svc = service(snapshot(&["TBA", "1:00PM - 2:00PM"]), Arc::clone(&sink));

        let outcome = svc.run().await.unwrap();
        assert_eq!(outcome, ExportOutcome::NothingToExport { skipped: 1 });
        assert!(sink.delivered.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_would_overwrite() {
        let sink = Arc::new(MemorySink::default());
        let svc = service(snapshot(&["M 9:30AM - 10:20AM"]), Arc::clone(&sink));

        let prepared = svc.prepare().await.unwrap();
        assert!(!svc.would_overwrite(&prepared).await);
        svc.deliver(prepared).await.unwrap();

        let again = svc.prepare().await.unwrap();
        assert!(svc.would_overwrite(&again).await);
    }

    #[tokio::test]
    async fn test_source_error_propagates() {
        let svc = ExportService::new(
            Arc::new(FailingSource),
            Arc::new(MemorySink::default()),
            CompileOptions::default(),
            CalendarHeader::default(),
        );
        assert!(matches!(svc.run().await, Err(DomainError::Source(_))));
    }
}
