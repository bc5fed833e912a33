use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const LISTEN_ADDR_ENV: &str = "MINILINK_LISTEN_ADDR";
pub const STORAGE_BACKEND_ENV: &str = "MINILINK_STORAGE_BACKEND";
pub const LINK_DB_ENV: &str = "MINILINK_LINK_DB";
pub const USER_DB_ENV: &str = "MINILINK_USER_DB";
pub const REQUIRE_AUTH_ENV: &str = "MINILINK_REQUIRE_AUTH";
pub const RESOLVE_TTL_ENV: &str = "MINILINK_RESOLVE_TTL_SECS";
pub const RECORD_TTL_ENV: &str = "MINILINK_RECORD_TTL_SECS";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_LINK_DB: &str = "links.json";
pub const DEFAULT_USER_DB: &str = "users.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "file")]
    File,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::File => write!(f, "file"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "minilink-gateway")]
pub struct Cli {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::File
    )]
    pub storage: StorageBackendArg,

    /// Where the link store keeps its records (file backend only).
    #[arg(long, env = LINK_DB_ENV, default_value = DEFAULT_LINK_DB)]
    pub link_db: PathBuf,

    /// Where the user store keeps its records (file backend only).
    #[arg(long, env = USER_DB_ENV, default_value = DEFAULT_USER_DB)]
    pub user_db: PathBuf,

    /// Require a valid user id and auth token on shorten requests.
    #[arg(long, env = REQUIRE_AUTH_ENV)]
    pub require_auth: bool,

    /// Cache lifetime for code-to-link reads, in seconds.
    #[arg(long, env = RESOLVE_TTL_ENV, default_value_t = 300)]
    pub resolve_ttl_secs: u64,

    /// Cache lifetime for full link-record reads, in seconds.
    #[arg(long, env = RECORD_TTL_ENV, default_value_t = 1200)]
    pub record_ttl_secs: u64,
}
