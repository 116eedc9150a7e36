use std::fmt;

use cms_export_core::{HtmlBody, RawRecord, RecordId};
use encoding_rs::UTF_8;
use export_logging::{export_debug, export_info};
use mysql_async::prelude::Queryable;
use mysql_async::{Opts, OptsBuilder, Pool, Row, Value};
use thiserror::Error;

pub const DEFAULT_PAGE_SIZE: usize = 500;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid table name {0:?}")]
    InvalidTable(String),
    #[error("database error: {0}")]
    Database(#[from] mysql_async::Error),
    #[error("row is missing column {column}")]
    MissingColumn { column: &'static str },
    #[error("column id holds {value}, which is not a record id")]
    InvalidId { value: String },
}

/// Supplier of content rows, ordered by ascending id.
#[async_trait::async_trait]
pub trait RecordSource: Send + Sync {
    /// Returns every record with `id >= start_id`, in ascending id order.
    async fn fetch_from(&self, start_id: RecordId) -> Result<Vec<RawRecord>, SourceError>;
}

/// `table` or `schema.table`, restricted to plain identifiers so it can be
/// spliced into SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName {
    parts: Vec<String>,
}

impl TableName {
    pub fn new(raw: &str) -> Result<Self, SourceError> {
        let parts: Vec<String> = raw.trim().split('.').map(str::to_string).collect();
        let valid = parts.len() <= 2 && parts.iter().all(|part| is_identifier(part));
        if !valid {
            return Err(SourceError::InvalidTable(raw.to_string()));
        }
        Ok(Self { parts })
    }
}

fn is_identifier(part: &str) -> bool {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted: Vec<String> = self.parts.iter().map(|part| format!("`{part}`")).collect();
        write!(f, "{}", quoted.join("."))
    }
}

#[derive(Clone)]
pub struct SourceSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub table: TableName,
    pub page_size: usize,
}

impl fmt::Debug for SourceSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("table", &self.table)
            .field("page_size", &self.page_size)
            .finish()
    }
}

/// Reads `id, pagetitle, content, uri` rows from a MySQL content table.
pub struct MySqlSource {
    opts: Opts,
    table: TableName,
    page_size: usize,
}

impl MySqlSource {
    pub fn new(settings: SourceSettings) -> Self {
        let opts: Opts = OptsBuilder::default()
            .ip_or_hostname(settings.host)
            .tcp_port(settings.port)
            .user(Some(settings.user))
            .pass(Some(settings.password))
            .db_name(Some(settings.database))
            .into();
        Self {
            opts,
            table: settings.table,
            page_size: settings.page_size.max(1),
        }
    }

    fn select_page_sql(&self) -> String {
        format!(
            "SELECT id, pagetitle, content, uri FROM {} WHERE id >= ? ORDER BY id ASC LIMIT ?",
            self.table
        )
    }

    async fn fetch_pages(
        &self,
        pool: &Pool,
        start_id: RecordId,
    ) -> Result<Vec<RawRecord>, SourceError> {
        let mut conn = pool.get_conn().await?;
        export_info!("Connected to the database, reading {} from id {}", self.table, start_id);

        let sql = self.select_page_sql();
        let mut records = Vec::new();
        let mut cursor = start_id;
        loop {
            let rows: Vec<Row> = conn
                .exec(sql.as_str(), (cursor, self.page_size as u64))
                .await?;
            let page_len = rows.len();
            for row in rows {
                records.push(record_from_row(row)?);
            }
            export_debug!("Fetched page of {} rows starting at id {}", page_len, cursor);

            if page_len < self.page_size {
                break;
            }
            match records.last().and_then(|last| last.id.checked_add(1)) {
                Some(next) => cursor = next,
                None => break,
            }
        }
        Ok(records)
    }
}

#[async_trait::async_trait]
impl RecordSource for MySqlSource {
    async fn fetch_from(&self, start_id: RecordId) -> Result<Vec<RawRecord>, SourceError> {
        let pool = Pool::new(self.opts.clone());
        let fetched = self.fetch_pages(&pool, start_id).await;
        let closed = pool.disconnect().await;
        let records = fetched?;
        closed?;
        export_info!("Database connection closed after {} records", records.len());
        Ok(records)
    }
}

fn record_from_row(mut row: Row) -> Result<RawRecord, SourceError> {
    let id = decode_id(take_column(&mut row, "id")?)?;
    let title = decode_text(take_column(&mut row, "pagetitle")?);
    let body = decode_body(take_column(&mut row, "content")?);
    let uri = decode_text(take_column(&mut row, "uri")?);
    Ok(RawRecord {
        id,
        title,
        body,
        uri,
    })
}

fn take_column(row: &mut Row, column: &'static str) -> Result<Value, SourceError> {
    row.take::<Value, _>(column)
        .ok_or(SourceError::MissingColumn { column })
}

pub fn decode_id(value: Value) -> Result<RecordId, SourceError> {
    let id = match &value {
        Value::UInt(id) => Some(*id),
        Value::Int(id) => u64::try_from(*id).ok(),
        Value::Bytes(bytes) => std::str::from_utf8(bytes)
            .ok()
            .and_then(|text| text.trim().parse().ok()),
        _ => None,
    };
    id.ok_or_else(|| SourceError::InvalidId {
        value: value.as_sql(true),
    })
}

/// Decodes the body column; bytes that are not UTF-8 and non-string SQL values
/// become `HtmlBody::NonText`.
pub fn decode_body(value: Value) -> HtmlBody {
    match value {
        Value::NULL => HtmlBody::Absent,
        Value::Bytes(bytes) => {
            match UTF_8.decode_without_bom_handling_and_without_replacement(&bytes) {
                Some(text) => HtmlBody::Text(text.into_owned()),
                None => HtmlBody::NonText { kind: "binary" },
            }
        }
        Value::Int(_) | Value::UInt(_) => HtmlBody::NonText { kind: "integer" },
        Value::Float(_) | Value::Double(_) => HtmlBody::NonText { kind: "float" },
        Value::Date(..) => HtmlBody::NonText { kind: "date" },
        Value::Time(..) => HtmlBody::NonText { kind: "time" },
    }
}

/// Decodes a free-text column leniently: `NULL` is empty, bad UTF-8 is replaced.
pub fn decode_text(value: Value) -> String {
    match value {
        Value::NULL => String::new(),
        Value::Bytes(bytes) => UTF_8.decode_without_bom_handling(&bytes).0.into_owned(),
        other => other.as_sql(true).trim_matches('\'').to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_names_are_quoted_identifiers() {
        assert_eq!(TableName::new("site_content").unwrap().to_string(), "`site_content`");
        assert_eq!(
            TableName::new("cms.modx_site_content").unwrap().to_string(),
            "`cms`.`modx_site_content`"
        );
    }

    #[test]
    fn hostile_table_names_are_rejected() {
        for raw in ["", "a.b.c", "1table", "content; DROP TABLE x", "`quoted`", "a."] {
            assert!(TableName::new(raw).is_err(), "accepted {raw:?}");
        }
    }

    #[test]
    fn body_values_map_to_html_bodies() {
        assert_eq!(decode_body(Value::NULL), HtmlBody::Absent);
        assert_eq!(
            decode_body(Value::Bytes("<p>héllo</p>".as_bytes().to_vec())),
            HtmlBody::Text("<p>héllo</p>".to_string())
        );
        assert_eq!(
            decode_body(Value::Bytes(vec![0xff, 0xfe, 0x00])),
            HtmlBody::NonText { kind: "binary" }
        );
        assert_eq!(decode_body(Value::Int(4)), HtmlBody::NonText { kind: "integer" });
    }

    #[test]
    fn ids_accept_unsigned_signed_and_text() {
        assert_eq!(decode_id(Value::UInt(7)).unwrap(), 7);
        assert_eq!(decode_id(Value::Int(8)).unwrap(), 8);
        assert_eq!(decode_id(Value::Bytes(b"9".to_vec())).unwrap(), 9);
        assert!(decode_id(Value::Int(-1)).is_err());
        assert!(decode_id(Value::NULL).is_err());
    }

    #[test]
    fn text_columns_are_lenient() {
        assert_eq!(decode_text(Value::NULL), "");
        assert_eq!(decode_text(Value::Bytes(b"Home".to_vec())), "Home");
        assert_eq!(decode_text(Value::UInt(12)), "12");
        assert_eq!(decode_text(Value::Bytes(vec![b'a', 0xff])), "a\u{fffd}");
    }
}
