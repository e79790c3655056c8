//! Start-up configuration, read once from the environment (and an optional `.env` file).

use board_db::client::{DEFAULT_MAX_CONNECTIONS, DbConfig};
use serde::Deserialize;
use std::{
    fmt::{Debug, Formatter},
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error parsing .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),
    #[error("Error parsing environment: {0}")]
    Envy(#[from] envy::Error),
}

#[derive(Clone, Eq, PartialEq, Hash, Deserialize)]
pub struct Env {
    pub server_address: IpAddr,
    pub server_port: u16,
    pub database_url: String,
    #[serde(default = "default_database_max_connections")]
    pub database_max_connections: u32,
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_database_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

impl Env {
    #[must_use]
    pub fn socket_address(&self) -> SocketAddr {
        SocketAddr::new(self.server_address, self.server_port)
    }

    #[must_use]
    pub fn db_config(&self) -> DbConfig {
        DbConfig {
            url: self.database_url.clone(),
            max_connections: self.database_max_connections,
        }
    }
}

// The database URL usually embeds credentials.
impl Debug for Env {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Env")
            .field("server_address", &self.server_address)
            .field("server_port", &self.server_port)
            .field("database_url", &"[redacted]")
            .field("database_max_connections", &self.database_max_connections)
            .field("static_dir", &self.static_dir)
            .finish()
    }
}

pub fn load() -> Result<Env, ConfigError> {
    if let Err(e) = dotenvy::dotenv() {
        if e.not_found() {
            debug!("No .env file found");
        } else {
            return Err(e.into());
        }
    }

    envy::from_env().map_err(ConfigError::from)
}
