use std::fmt;

use crate::plan::SkipReason;
use crate::record::RecordId;

/// Counters for one export run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExportReport {
    pub fetched: usize,
    pub written: usize,
    pub skipped_empty: usize,
    pub skipped_undetectable: usize,
    /// Written records whose language has no stopword list.
    pub language_notes: usize,
    pub last_written_id: Option<RecordId>,
}

impl ExportReport {
    pub fn new(fetched: usize) -> Self {
        Self {
            fetched,
            ..Self::default()
        }
    }

    pub fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::EmptyContent => self.skipped_empty += 1,
            SkipReason::LanguageUndetectable => self.skipped_undetectable += 1,
        }
    }

    pub fn record_written(&mut self, id: RecordId) {
        self.written += 1;
        self.last_written_id = Some(id);
    }

    pub fn record_language_note(&mut self) {
        self.language_notes += 1;
    }

    pub fn skipped(&self) -> usize {
        self.skipped_empty + self.skipped_undetectable
    }

    pub fn skip_count(&self, reason: SkipReason) -> usize {
        match reason {
            SkipReason::EmptyContent => self.skipped_empty,
            SkipReason::LanguageUndetectable => self.skipped_undetectable,
        }
    }
}

impl fmt::Display for ExportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fetched {}, written {}, skipped {} (empty content {}, language undetectable {}), \
             language notes {}",
            self.fetched,
            self.written,
            self.skipped(),
            self.skipped_empty,
            self.skipped_undetectable,
            self.language_notes,
        )?;
        if let Some(id) = self.last_written_id {
            write!(f, ", last written id {id}")?;
        }
        Ok(())
    }
}
