use clap::{Parser, ValueEnum};
use startpage_telemetry::LogFormat;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const LISTEN_ADDR_ENV: &str = "STARTPAGE_LISTEN_ADDR";
pub const STORAGE_BACKEND_ENV: &str = "STARTPAGE_STORAGE_BACKEND";
pub const SQLITE_PATH_ENV: &str = "STARTPAGE_SQLITE_PATH";
pub const REQUEST_TOKEN_ENV: &str = "STARTPAGE_REQUEST_TOKEN";
pub const LOG_FORMAT_ENV: &str = "STARTPAGE_LOG_FORMAT";
pub const OTLP_ENDPOINT_ENV: &str = "STARTPAGE_OTLP_ENDPOINT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_SQLITE_PATH: &str = "data/startpage.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "sqlite")]
    Sqlite,
    #[value(name = "in-memory")]
    InMemory,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::Sqlite => write!(f, "sqlite"),
            StorageBackendArg::InMemory => write!(f, "in-memory"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "startpage")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::Sqlite
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = SQLITE_PATH_ENV, default_value = DEFAULT_SQLITE_PATH)]
    pub sqlite_path: PathBuf,

    /// Fixed request token. A random one is generated per process if unset.
    #[arg(long, env = REQUEST_TOKEN_ENV, hide_env_values = true)]
    pub request_token: Option<String>,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Text
    )]
    pub log_format: LogFormatArg,

    #[arg(long, env = OTLP_ENDPOINT_ENV)]
    pub otlp_endpoint: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = CLI::try_parse_from(["startpage"]).unwrap();

        assert_eq!(cli.listen_addr, DEFAULT_LISTEN_ADDR.parse::<SocketAddr>().unwrap());
        assert_eq!(cli.sqlite_path, PathBuf::from(DEFAULT_SQLITE_PATH));
        assert_eq!(cli.log_format, LogFormatArg::Text);
        assert!(cli.otlp_endpoint.is_none());
    }

    #[test]
    fn parses_in_memory_backend() {
        let cli = CLI::try_parse_from(["startpage", "--storage", "in-memory", "--log-format", "json"])
            .unwrap();

        assert_eq!(cli.storage, StorageBackendArg::InMemory);
        assert_eq!(LogFormat::from(cli.log_format), LogFormat::Json);
    }

    #[test]
    fn rejects_unknown_backend() {
        assert!(CLI::try_parse_from(["startpage", "--storage", "mysql"]).is_err());
    }
}
