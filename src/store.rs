//! Store access: immutable connect options for the single SQLite file.
//! Every call opens its own connection; nothing is pooled or kept between requests.

use crate::error::SchemaError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use std::str::FromStr;

#[derive(Clone, Debug)]
pub struct Store {
    options: SqliteConnectOptions,
}

impl Store {
    /// Parse the database URL and check the file can be opened. Never creates the file.
    /// In-memory databases are refused: each per-call connection would see its own empty one.
    pub async fn open(database_url: &str) -> Result<Self, SchemaError> {
        if is_in_memory(database_url) {
            return Err(SchemaError::StoreUnavailable(sqlx::Error::Configuration(
                format!("in-memory database '{}' is not supported; point DATABASE_URL at a file", database_url).into(),
            )));
        }
        let options = SqliteConnectOptions::from_str(database_url).map_err(SchemaError::StoreUnavailable)?;
        let store = Store::from_options(options);
        store.ping().await.map_err(SchemaError::StoreUnavailable)?;
        tracing::info!(url = %database_url, "store opened");
        Ok(store)
    }

    pub fn from_options(options: SqliteConnectOptions) -> Self {
        Store {
            options: options.create_if_missing(false).disable_statement_logging(),
        }
    }

    /// Open a fresh connection. Callers close it when done; dropping it also closes it.
    pub async fn connect(&self) -> Result<SqliteConnection, sqlx::Error> {
        self.options.connect().await
    }

    /// Open and close one connection.
    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        let mut conn = self.connect().await?;
        sqlx::query("SELECT 1").execute(&mut conn).await?;
        conn.close().await
    }
}

/// `:memory:`, `mode=memory` and an empty name (a private temporary database) all live per connection.
fn is_in_memory(database_url: &str) -> bool {
    let rest = database_url.trim_start_matches("sqlite://").trim_start_matches("sqlite:");
    let (name, query) = rest.split_once('?').unwrap_or((rest, ""));
    name.is_empty() || name == ":memory:" || query.split('&').any(|kv| kv == "mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_urls_are_recognized() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://:memory:"));
        assert!(is_in_memory("sqlite://shared.db?mode=memory&cache=shared"));
        assert!(is_in_memory("sqlite:"));
        assert!(!is_in_memory("sqlite://paralympics.db"));
        assert!(!is_in_memory("sqlite:///tmp/p.db?mode=ro"));
    }
}
