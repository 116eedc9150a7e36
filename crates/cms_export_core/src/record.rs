pub type RecordId = u64;

/// Body column of a content row as handed over by the record source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HtmlBody {
    /// SQL `NULL`; normalizes like an empty string.
    #[default]
    Absent,
    Text(String),
    /// Anything that is not text-shaped (binary that is not UTF-8, numbers, dates).
    NonText { kind: &'static str },
}

impl From<&str> for HtmlBody {
    fn from(value: &str) -> Self {
        HtmlBody::Text(value.to_string())
    }
}

impl From<String> for HtmlBody {
    fn from(value: String) -> Self {
        HtmlBody::Text(value)
    }
}

impl From<Option<String>> for HtmlBody {
    fn from(value: Option<String>) -> Self {
        value.map_or(HtmlBody::Absent, HtmlBody::Text)
    }
}

/// One row of the content table, immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub id: RecordId,
    pub title: String,
    pub body: HtmlBody,
    pub uri: String,
}

impl RawRecord {
    pub fn new(
        id: RecordId,
        title: impl Into<String>,
        body: impl Into<HtmlBody>,
        uri: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
            uri: uri.into(),
        }
    }
}
