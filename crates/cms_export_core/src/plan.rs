use std::fmt;

use crate::envelope::{render_payload, OutputMode};
use crate::language::{classify, DetectedLanguage, LanguageVerdict};
use crate::normalize::{HtmlNormalizer, NormalizeError};
use crate::record::{RawRecord, RecordId};
use crate::slug::{sanitize_title, DEFAULT_MAX_NAME_LEN};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOptions {
    pub mode: OutputMode,
    pub max_name_len: usize,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            mode: OutputMode::Text,
            max_name_len: DEFAULT_MAX_NAME_LEN,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    EmptyContent,
    LanguageUndetectable,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EmptyContent => write!(f, "empty content"),
            SkipReason::LanguageUndetectable => write!(f, "language undetectable"),
        }
    }
}

/// Everything needed to place and write one record, short of the final name.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordPlan {
    pub id: RecordId,
    pub base_slug: String,
    pub extension: &'static str,
    pub payload: String,
    pub language: DetectedLanguage,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordDecision {
    Skip(SkipReason),
    Write(RecordPlan),
}

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error("failed to render json envelope: {0}")]
    Envelope(#[from] serde_json::Error),
}

/// Pure per-record step: normalize, gate on content and language, build the payload.
///
/// Skips are returned as decisions; only a non-text body or an unrenderable
/// envelope is an error.
pub fn plan_record(record: &RawRecord, options: &PlanOptions) -> Result<RecordDecision, PlanError> {
    let text = HtmlNormalizer.convert(&record.body)?;
    if text.trim().is_empty() {
        return Ok(RecordDecision::Skip(SkipReason::EmptyContent));
    }

    let language = match classify(&text) {
        LanguageVerdict::Detected(language) => language,
        LanguageVerdict::Undetectable => {
            return Ok(RecordDecision::Skip(SkipReason::LanguageUndetectable))
        }
    };

    let payload = render_payload(&text, &record.uri, &options.mode)?;
    Ok(RecordDecision::Write(RecordPlan {
        id: record.id,
        base_slug: sanitize_title(&record.title, record.id, options.max_name_len),
        extension: options.mode.extension(),
        payload,
        language,
    }))
}
