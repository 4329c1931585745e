use crate::telemetry::LogFormat;
use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "PINHOLE_LISTEN_ADDR";
pub const PUBLIC_BASE_URL_ENV: &str = "PINHOLE_PUBLIC_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "PINHOLE_STORAGE_BACKEND";
pub const MYSQL_DSN_ENV: &str = "PINHOLE_MYSQL_DSN";
pub const LOG_FORMAT_ENV: &str = "PINHOLE_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    /// Process memory only; mappings are lost on restart.
    #[value(name = "in-memory")]
    InMemory,
    /// Memory tier in front of a MySQL table.
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "pinhole", about = "A small URL shortener")]
pub struct Cli {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Base of the links returned by `/shorten`, e.g. `https://pin.example`.
    /// Defaults to `http://<Host header>`.
    #[arg(long, env = PUBLIC_BASE_URL_ENV)]
    pub public_base_url: Option<String>,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = MYSQL_DSN_ENV, required_if_eq("storage", "mysql"))]
    pub mysql_dsn: Option<String>,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}
