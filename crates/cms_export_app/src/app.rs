use std::path::Path;

use anyhow::{Context, Result};
use cms_export_core::{ExportReport, RecordId};
use cms_export_engine::{export_from_source, AtomicFileWriter, ExportError, MySqlSource};
use export_logging::{export_error, export_info};

use crate::cli::Cli;
use crate::persistence::{load_state, resolve_start_id, save_state, ExportState};

/// Runs one export: resolve the resume cursor, fetch, write, remember progress.
pub(crate) fn run(cli: Cli) -> Result<ExportReport> {
    let source_settings = cli.source_settings()?;
    let settings = cli.export_settings()?;
    let output_dir = settings.output_dir.clone();

    if output_dir.is_dir() {
        export_info!("Using existing output directory: {:?}", output_dir);
    } else {
        export_info!("Creating output directory: {:?}", output_dir);
    }

    let previous = load_state(&output_dir);
    let start_id = resolve_start_id(cli.start_id, previous.as_ref());
    export_info!(
        "Exporting {} from id {} as {:?} into {:?}",
        source_settings.table,
        start_id,
        cli.format,
        output_dir
    );

    let source = MySqlSource::new(source_settings);
    let writer = AtomicFileWriter::new(output_dir.clone());
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    let result = runtime.block_on(export_from_source(&source, start_id, &settings, &writer));

    finish_run(result, &output_dir, start_id)
}

/// Records progress after a run, aborted or not, and turns a fatal error into
/// one that names the id to resume from.
fn finish_run(
    result: Result<ExportReport, ExportError>,
    output_dir: &Path,
    start_id: RecordId,
) -> Result<ExportReport> {
    let last_written_id = match &result {
        Ok(report) => report.last_written_id,
        Err(err) => err.last_written_id(),
    };
    if let Some(id) = last_written_id {
        save_state(output_dir, &ExportState::now(id));
    }

    result.map_err(|err| {
        let resume_from = last_written_id.map_or(start_id, |id| id.saturating_add(1));
        export_error!("Export aborted: {}", err);
        export_error!("Re-run with START_ID={} to resume", resume_from);
        anyhow::Error::new(err).context(format!("export aborted; resume with START_ID={resume_from}"))
    })
}
