use std::fs;
use std::path::Path;

use chrono::Utc;
use cms_export_core::RecordId;
use cms_export_engine::AtomicFileWriter;
use export_logging::{export_error, export_info, export_warn};
use serde::{Deserialize, Serialize};

const STATE_FILENAME: &str = ".export_state.ron";

/// Resume cursor kept next to the exported files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ExportState {
    pub last_written_id: RecordId,
    pub updated_utc: String,
}

impl ExportState {
    pub fn now(last_written_id: RecordId) -> Self {
        Self {
            last_written_id,
            updated_utc: Utc::now().to_rfc3339(),
        }
    }
}

/// An explicit start id wins; otherwise resume after the last written record.
pub(crate) fn resolve_start_id(explicit: Option<RecordId>, state: Option<&ExportState>) -> RecordId {
    match (explicit, state) {
        (Some(start_id), _) => start_id,
        (None, Some(state)) => state.last_written_id.saturating_add(1),
        (None, None) => 0,
    }
}

pub(crate) fn load_state(output_dir: &Path) -> Option<ExportState> {
    let path = output_dir.join(STATE_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return None;
        }
        Err(err) => {
            export_warn!("Failed to read export state from {:?}: {}", path, err);
            return None;
        }
    };

    match ron::from_str::<ExportState>(&content) {
        Ok(state) => {
            export_info!(
                "Loaded export state from {:?}: last written id {} at {}",
                path,
                state.last_written_id,
                state.updated_utc
            );
            Some(state)
        }
        Err(err) => {
            export_warn!("Failed to parse export state from {:?}: {}", path, err);
            None
        }
    }
}

pub(crate) fn save_state(output_dir: &Path, state: &ExportState) {
    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(state, pretty) {
        Ok(text) => text,
        Err(err) => {
            export_error!("Failed to serialize export state: {}", err);
            return;
        }
    };

    let writer = AtomicFileWriter::new(output_dir.to_path_buf());
    if let Err(err) = writer.replace(STATE_FILENAME, &content) {
        export_error!("Failed to write export state to {:?}: {}", output_dir, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn state_round_trips_through_output_dir() {
        let temp = TempDir::new().unwrap();
        assert_eq!(load_state(temp.path()), None);

        let state = ExportState::now(41);
        save_state(temp.path(), &state);
        assert_eq!(load_state(temp.path()), Some(state));
    }

    #[test]
    fn corrupt_state_is_ignored() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(STATE_FILENAME), "not ron at all {").unwrap();
        assert_eq!(load_state(temp.path()), None);
    }

    #[test]
    fn explicit_start_id_wins_over_state() {
        let state = ExportState::now(41);
        assert_eq!(resolve_start_id(Some(7), Some(&state)), 7);
        assert_eq!(resolve_start_id(None, Some(&state)), 42);
        assert_eq!(resolve_start_id(None, None), 0);
    }
}
