use serde::Serialize;

/// How a written record is laid out on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// The normalized text as is, in a `.txt` file.
    Text,
    /// A pretty-printed JSON envelope in a `.json` file.
    Json { user_id: String },
}

impl OutputMode {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputMode::Text => "txt",
            OutputMode::Json { .. } => "json",
        }
    }
}

// Field order is the on-disk key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Envelope<'a> {
    pub page_content: &'a str,
    pub metadata: EnvelopeMetadata<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvelopeMetadata<'a> {
    pub uri: &'a str,
    pub user_id: &'a str,
}

/// Renders the file content for `text` in the given mode.
pub fn render_payload(text: &str, uri: &str, mode: &OutputMode) -> serde_json::Result<String> {
    match mode {
        OutputMode::Text => Ok(text.to_string()),
        OutputMode::Json { user_id } => serde_json::to_string_pretty(&Envelope {
            page_content: text,
            metadata: EnvelopeMetadata { uri, user_id },
        }),
    }
}
