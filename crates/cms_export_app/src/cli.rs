use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use cms_export_core::{OutputMode, PlanOptions, DEFAULT_MAX_NAME_LEN};
use cms_export_engine::{ExportSettings, SourceSettings, TableName, DEFAULT_PAGE_SIZE};
use log::LevelFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Normalized plain text in `.txt` files
    Text,
    /// JSON envelope with uri and user id metadata in `.json` files
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "cms_export",
    about = "Export content table rows into one text or JSON file per record"
)]
pub(crate) struct Cli {
    /// MySQL host name or address
    #[arg(long, env = "DB_HOST")]
    pub db_host: String,

    /// MySQL port
    #[arg(long, env = "DB_PORT", default_value_t = 3306)]
    pub db_port: u16,

    /// MySQL user
    #[arg(long, env = "DB_USER")]
    pub db_user: String,

    /// MySQL password
    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: String,

    /// Database holding the content table
    #[arg(long, env = "DB_NAME")]
    pub db_name: String,

    /// Content table, optionally as `schema.table`
    #[arg(long, env = "DB_TABLE", default_value = "site_content")]
    pub table: String,

    /// First record id to export; defaults to the record after the last one written
    #[arg(long, env = "START_ID")]
    pub start_id: Option<u64>,

    /// Directory receiving one file per record
    #[arg(long, env = "OUTPUT_DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Operator id stored in JSON metadata
    #[arg(long, env = "USER_ID", default_value = "default_user")]
    pub user_id: String,

    /// Output file format
    #[arg(long, env = "OUTPUT_FORMAT", value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Maximum number of title characters kept in a file name
    #[arg(long, env = "MAX_NAME_LENGTH", default_value_t = DEFAULT_MAX_NAME_LEN)]
    pub max_name_len: usize,

    /// Rows requested per database round trip
    #[arg(long, env = "PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// Log level (error, warn, info, debug, trace, off)
    #[arg(long, env = "LOG_LEVEL", default_value = "info", value_parser = parse_level)]
    pub log_level: LevelFilter,

    /// Also write the log to ./export.log
    #[arg(long)]
    pub log_file: bool,
}

impl Cli {
    pub fn source_settings(&self) -> Result<SourceSettings> {
        anyhow::ensure!(self.page_size > 0, "page size must be at least 1");
        Ok(SourceSettings {
            host: self.db_host.clone(),
            port: self.db_port,
            user: self.db_user.clone(),
            password: self.db_password.clone(),
            database: self.db_name.clone(),
            table: TableName::new(&self.table)?,
            page_size: self.page_size,
        })
    }

    pub fn export_settings(&self) -> Result<ExportSettings> {
        anyhow::ensure!(self.max_name_len > 0, "max name length must be at least 1");
        let mode = match self.format {
            OutputFormat::Text => OutputMode::Text,
            OutputFormat::Json => OutputMode::Json {
                user_id: self.user_id.clone(),
            },
        };
        Ok(ExportSettings {
            output_dir: self.output_dir.clone(),
            plan: PlanOptions {
                mode,
                max_name_len: self.max_name_len,
            },
        })
    }
}

fn parse_level(raw: &str) -> Result<LevelFilter, String> {
    raw.parse::<LevelFilter>()
        .map_err(|_| format!("unknown log level {raw:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Cli {
        let mut args = vec![
            "cms_export",
            "--db-host",
            "localhost",
            "--db-user",
            "reader",
            "--db-password",
            "secret",
            "--db-name",
            "cms",
        ];
        args.extend_from_slice(extra);
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn json_format_carries_user_id() {
        let cli = parse(&["--format", "json", "--user-id", "ops", "--table", "db.pages"]);
        let settings = cli.export_settings().unwrap();
        assert_eq!(
            settings.plan.mode,
            OutputMode::Json {
                user_id: "ops".to_string()
            }
        );
        assert_eq!(cli.source_settings().unwrap().table.to_string(), "`db`.`pages`");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(parse(&["--max-name-len", "0"]).export_settings().is_err());
        assert!(parse(&["--page-size", "0"]).source_settings().is_err());
        assert!(parse(&["--table", "pages; --"]).source_settings().is_err());
        assert!(parse_level("loud").is_err());
        assert_eq!(parse_level("debug").unwrap(), LevelFilter::Debug);
    }
}
