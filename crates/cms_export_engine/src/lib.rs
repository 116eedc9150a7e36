//! Exporter engine: record source, file placement and the export run.
mod allocate;
mod export;
mod persist;
mod source;

pub use allocate::FilenameAllocator;
pub use export::{export_from_source, export_records, ExportError, ExportSettings};
pub use persist::{ensure_output_dir, ArtifactWriter, AtomicFileWriter, PersistError};
pub use source::{
    decode_body, decode_id, decode_text, MySqlSource, RecordSource, SourceError, SourceSettings,
    TableName, DEFAULT_PAGE_SIZE,
};
