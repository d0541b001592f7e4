//! Implements InputPort. Inquire-based prompts around one export run.

use crate::domain::DomainError;
use crate::ports::InputPort;
use crate::usecases::{ExportOutcome, ExportService};
use async_trait::async_trait;
use inquire::{Confirm, Text};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Shown when no row had meeting times.
pub const NOTHING_TO_EXPORT_HINT: &str = "Unable to create a schedule. No days or times were found on this page. Please make sure to be in List View.";

/// Ask for the schedule file when neither config nor argv named one.
pub fn prompt_input_path() -> Result<PathBuf, DomainError> {
    let path = Text::new("Schedule file (.html, .csv or .json):")
        .with_help_message("Save the My Class Schedule page in List View, then point to the file")
        .prompt()
        .map_err(|e| DomainError::Ui(e.to_string()))?;
    Ok(PathBuf::from(path.trim()))
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    export_service: Arc<ExportService>,
    /// Skip the overwrite confirmation.
    assume_yes: bool,
}

impl TuiInputPort {
    pub fn new(export_service: Arc<ExportService>, assume_yes: bool) -> Self {
        Self {
            export_service,
            assume_yes,
        }
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run_export(&self) -> Result<(), DomainError> {
        let prepared = self.export_service.prepare().await?;

        if !self.assume_yes && self.export_service.would_overwrite(&prepared).await {
            let overwrite = Confirm::new(&format!("{} already exists. Overwrite?", prepared.file_name))
                .with_default(false)
                .prompt()
                .map_err(|e| DomainError::Ui(e.to_string()))?;
            if !overwrite {
                info!(file = %prepared.file_name, "export cancelled by user");
                println!("Export cancelled.");
                return Ok(());
            }
        }

        match self.export_service.deliver(prepared).await? {
            ExportOutcome::Exported {
                path,
                events,
                skipped,
            } => {
                println!("Saved {} class meeting(s) to {}", events, path.display());
                if skipped > 0 {
                    println!("{} row(s) could not be read and were left out (see log).", skipped);
                }
            }
            ExportOutcome::NothingToExport { .. } => {
                println!("{}", NOTHING_TO_EXPORT_HINT);
            }
        }
        Ok(())
    }
}
