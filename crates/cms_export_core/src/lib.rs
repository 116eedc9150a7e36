//! Exporter core: pure record transformation and output placement.
mod envelope;
mod language;
mod normalize;
mod plan;
mod record;
mod report;
mod slug;

pub use envelope::{render_payload, Envelope, EnvelopeMetadata, OutputMode};
pub use language::{classify, DetectedLanguage, LanguageVerdict};
pub use normalize::{html_to_text, HtmlNormalizer, NormalizeError};
pub use plan::{plan_record, PlanError, PlanOptions, RecordDecision, RecordPlan, SkipReason};
pub use record::{HtmlBody, RawRecord, RecordId};
pub use report::ExportReport;
pub use slug::{
    make_unique, make_unique_with, sanitize_title, strip_hostile, DEFAULT_MAX_NAME_LEN,
};
