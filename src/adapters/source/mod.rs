//! Schedule sources, chosen by file extension.

pub mod csv_rows;
pub mod html_page;
pub mod json_rows;

pub use csv_rows::CsvScheduleSource;
pub use html_page::HtmlScheduleSource;
pub use json_rows::JsonScheduleSource;

use crate::domain::DomainError;
use crate::ports::ScheduleSourcePort;
use std::path::Path;
use std::sync::Arc;

/// `.html`/`.htm` → saved page, `.csv` → CSV rows, `.json` → JSON rows.
///
/// `student_name` is a fallback for sources that don't carry one.
pub fn open_source(
    path: &Path,
    student_name: Option<String>,
) -> Result<Arc<dyn ScheduleSourcePort>, DomainError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "html" | "htm" => Ok(Arc::new(HtmlScheduleSource::new(path, student_name))),
        "csv" => Ok(Arc::new(CsvScheduleSource::new(path, student_name))),
        "json" => Ok(Arc::new(JsonScheduleSource::new(path, student_name))),
        _ => Err(DomainError::Source(format!(
            "unsupported schedule file {} (expected .html, .csv or .json)",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_source_by_extension() {
        assert!(open_source(Path::new("schedule.HTML"), None).is_ok());
        assert!(open_source(Path::new("rows.csv"), None).is_ok());
        assert!(open_source(Path::new("rows.json"), None).is_ok());
        assert!(matches!(
            open_source(Path::new("schedule.pdf"), None),
            Err(DomainError::Source(_))
        ));
        assert!(open_source(Path::new("schedule"), None).is_err());
    }
}
