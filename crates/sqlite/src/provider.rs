use std::io;

use dbfixture_core::{ConnectionConfig, ConnectionError, ConnectionProvider, Result};
use rusqlite::Connection;
use tracing::debug;

use crate::connection::SqliteConnection;

/// `on`/`off` (also `true`/`false`, `1`/`0`); sets `PRAGMA foreign_keys` on
/// every opened connection.
pub const FOREIGN_KEYS_KEY: &str = "sqlite.foreign_keys";

/// Opens a fresh connection to the configured database file per request.
#[derive(Debug, Clone)]
pub struct SqliteProvider {
    config: ConnectionConfig,
}

impl SqliteProvider {
    pub fn new(config: &ConnectionConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn database(&self) -> &str {
        &self.config.database
    }

    pub(crate) fn open(&self) -> Result<SqliteConnection> {
        let database = self.config.database.as_str();
        let foreign_keys = self
            .config
            .extra(FOREIGN_KEYS_KEY)
            .map(|raw| parse_switch(raw).ok_or_else(|| invalid_switch_error(database, raw)))
            .transpose()?;

        let connection =
            Connection::open(database).map_err(|source| open_error(database, source))?;
        if let Some(enabled) = foreign_keys {
            let pragma = if enabled {
                "PRAGMA foreign_keys = ON"
            } else {
                "PRAGMA foreign_keys = OFF"
            };
            connection
                .execute_batch(pragma)
                .map_err(|source| ConnectionError::statement(pragma, source))?;
        }

        debug!(database, ?foreign_keys, "opened sqlite connection");
        Ok(SqliteConnection::new(connection))
    }
}

impl ConnectionProvider for SqliteProvider {
    fn connection(&self) -> Result<Box<dyn dbfixture_core::Connection>> {
        let connection = self.open()?;
        Ok(Box::new(connection))
    }
}

fn parse_switch(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "1" => Some(true),
        "off" | "false" | "0" => Some(false),
        _ => None,
    }
}

fn open_error<E>(database: &str, source: E) -> dbfixture_core::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    ConnectionError::Open {
        target: database.to_string(),
        source: Box::new(source),
    }
    .into()
}

fn invalid_switch_error(database: &str, raw: &str) -> dbfixture_core::Error {
    open_error(
        database,
        io::Error::other(format!(
            "`{FOREIGN_KEYS_KEY}` must be `on` or `off`, got `{raw}`"
        )),
    )
}
