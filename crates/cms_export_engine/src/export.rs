use std::path::PathBuf;

use cms_export_core::{
    plan_record, ExportReport, PlanError, PlanOptions, RawRecord, RecordDecision, RecordId,
};
use export_logging::{export_debug, export_error, export_info, export_warn};

use crate::allocate::FilenameAllocator;
use crate::persist::{ensure_output_dir, ArtifactWriter, PersistError};
use crate::source::{RecordSource, SourceError};

#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub output_dir: PathBuf,
    pub plan: PlanOptions,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to fetch records: {0}")]
    Source(#[from] SourceError),
    #[error("output directory unusable: {0}")]
    OutputDir(#[source] PersistError),
    #[error("record {id} cannot be exported: {source} (last written id: {})", last_written(.last_written_id))]
    InvalidRecord {
        id: RecordId,
        #[source]
        source: PlanError,
        last_written_id: Option<RecordId>,
    },
    #[error("failed to write {filename:?} for record {id}: {source} (last written id: {})", last_written(.last_written_id))]
    Write {
        id: RecordId,
        filename: String,
        #[source]
        source: PersistError,
        last_written_id: Option<RecordId>,
    },
}

impl ExportError {
    /// Id of the last record written before the run aborted, if any.
    pub fn last_written_id(&self) -> Option<RecordId> {
        match self {
            ExportError::Source(_) | ExportError::OutputDir(_) => None,
            ExportError::InvalidRecord {
                last_written_id, ..
            }
            | ExportError::Write {
                last_written_id, ..
            } => *last_written_id,
        }
    }
}

fn last_written(id: &Option<RecordId>) -> String {
    id.map_or_else(|| "none".to_string(), |id| id.to_string())
}

/// Fetches every record from `start_id` on, then exports them in order.
pub async fn export_from_source(
    source: &dyn RecordSource,
    start_id: RecordId,
    settings: &ExportSettings,
    writer: &dyn ArtifactWriter,
) -> Result<ExportReport, ExportError> {
    let records = source.fetch_from(start_id).await.map_err(|err| {
        export_error!("Error reading data: {}", err);
        ExportError::from(err)
    })?;
    if records.is_empty() {
        export_info!("No records found from id {}", start_id);
    }
    export_records(&records, settings, writer)
}

/// Runs every record through planning, name allocation and writing.
///
/// Skipped records are counted and logged. A record that cannot be planned or
/// written aborts the run; files written before it stay in place.
pub fn export_records(
    records: &[RawRecord],
    settings: &ExportSettings,
    writer: &dyn ArtifactWriter,
) -> Result<ExportReport, ExportError> {
    ensure_output_dir(&settings.output_dir).map_err(ExportError::OutputDir)?;

    let mut report = ExportReport::new(records.len());
    let mut allocator = FilenameAllocator::new(settings.output_dir.clone());

    for record in records {
        let decision = match plan_record(record, &settings.plan) {
            Ok(decision) => decision,
            Err(source) => {
                export_error!("Record id={} cannot be exported: {}", record.id, source);
                return Err(ExportError::InvalidRecord {
                    id: record.id,
                    source,
                    last_written_id: report.last_written_id,
                });
            }
        };

        let plan = match decision {
            RecordDecision::Skip(reason) => {
                export_info!("Skipped ID: {}, reason: {}", record.id, reason);
                report.record_skip(reason);
                continue;
            }
            RecordDecision::Write(plan) => plan,
        };

        if plan.language.stopwords.is_none() {
            export_warn!(
                "ID: {} detected language '{}' (confidence {:.2}) has no stopword list",
                plan.id,
                plan.language.code,
                plan.language.confidence
            );
            report.record_language_note();
        }

        let filename = allocator.allocate(&plan.base_slug, plan.extension);
        if let Err(source) = writer.write(&filename, &plan.payload) {
            export_error!("Failed to write {:?} for ID {}: {}", filename, plan.id, source);
            return Err(ExportError::Write {
                id: plan.id,
                filename,
                source,
                last_written_id: report.last_written_id,
            });
        }
        export_debug!(
            "ID: {} detected language '{}' with confidence {:.2}",
            plan.id,
            plan.language.code,
            plan.language.confidence
        );
        export_info!("Processed ID: {}, File saved as: {}", plan.id, filename);
        report.record_written(plan.id);
    }

    export_info!("Finished processing all records: {}", report);
    Ok(report)
}
