//! Generic table operations against SQLite, one connection per call.

use crate::error::AppError;
use crate::schema::{Filter, NewRow, TableDescriptor};
use crate::sql::{
    insert, select_all, select_by_id, select_by_key, select_by_rowid, select_filtered, QueryBuf, SqliteBindValue,
    AGGREGATE_SQL,
};
use crate::store::Store;
use serde_json::{Map, Number, Value};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteRow};
use sqlx::Connection;

pub struct QueryExecutor;

impl QueryExecutor {
    /// All rows of the table; an empty table yields an empty vec.
    pub async fn list(store: &Store, table: &TableDescriptor) -> Result<Vec<Value>, AppError> {
        Self::query_many(store, &select_all(table)).await
    }

    /// Rows matching every filter term. No terms means every row.
    pub async fn search(store: &Store, filter: &Filter<'_>) -> Result<Vec<Value>, AppError> {
        Self::query_many(store, &select_filtered(filter)).await
    }

    /// Fetch one row by primary key (or rowid). Returns JSON object or None.
    pub async fn read(store: &Store, table: &TableDescriptor, id: &Value) -> Result<Option<Value>, AppError> {
        Self::query_optional(store, &select_by_id(table, id.clone())).await
    }

    /// Insert one row and return it as stored. Fails without writing when the row has no columns,
    /// or when a `WITHOUT ROWID` table is not given its whole key.
    pub async fn create(store: &Store, row: &NewRow<'_>) -> Result<Value, AppError> {
        let table = row.table();
        let q = insert(row).ok_or_else(|| {
            AppError::InvalidInsert(format!("no valid columns provided for insert into '{}'", table.name))
        })?;
        let key = if table.without_rowid {
            Some(row.key_values().ok_or_else(|| {
                AppError::InvalidInsert(format!(
                    "insert into '{}' must supply every key column ({})",
                    table.name,
                    table.key_columns.join(", ")
                ))
            })?)
        } else {
            None
        };
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut conn = store.connect().await?;
        let result = bind_params(sqlx::query(&q.sql), &q.params).execute(&mut conn).await?;

        // The rowid names the new row exactly, whatever the declared key looks like.
        let lookup = match &key {
            Some(key) => select_by_key(table, key),
            None => select_by_rowid(table, result.last_insert_rowid()),
        };
        tracing::debug!(sql = %lookup.sql, params = ?lookup.params, "query");
        let fetched = bind_params(sqlx::query(&lookup.sql), &lookup.params)
            .fetch_optional(&mut conn)
            .await?;
        conn.close().await?;

        match fetched {
            Some(r) => Ok(row_to_json(&r)?),
            None => Err(AppError::NotFound(format!("inserted row in '{}'", table.name))),
        }
    }

    /// Denormalized games/host/country rows for the dashboard.
    pub async fn aggregate(store: &Store) -> Result<Vec<Value>, AppError> {
        let q = QueryBuf {
            sql: AGGREGATE_SQL.to_string(),
            params: Vec::new(),
        };
        Self::query_many(store, &q).await
    }

    async fn query_many(store: &Store, q: &QueryBuf) -> Result<Vec<Value>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut conn = store.connect().await?;
        let rows = bind_params(sqlx::query(&q.sql), &q.params).fetch_all(&mut conn).await?;
        conn.close().await?;
        rows.iter().map(row_to_json).collect()
    }

    async fn query_optional(store: &Store, q: &QueryBuf) -> Result<Option<Value>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut conn = store.connect().await?;
        let row = bind_params(sqlx::query(&q.sql), &q.params)
            .fetch_optional(&mut conn)
            .await?;
        conn.close().await?;
        row.as_ref().map(row_to_json).transpose()
    }
}

fn bind_params<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &[Value],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for p in params {
        query = query.bind(SqliteBindValue::from(p));
    }
    query
}

fn row_to_json(row: &SqliteRow) -> Result<Value, AppError> {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = Map::new();
    for (idx, col) in row.columns().iter().enumerate() {
        map.insert(col.name().to_string(), cell_to_value(row, idx)?);
    }
    Ok(Value::Object(map))
}

/// Map the cell's storage class to JSON. Blobs become lossy UTF-8 text.
fn cell_to_value(row: &SqliteRow, idx: usize) -> Result<Value, AppError> {
    use sqlx::{Decode, Row, TypeInfo, ValueRef};
    let raw = row.try_get_raw(idx)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let storage = raw.type_info().name().to_owned();
    let value = match storage.as_str() {
        "INTEGER" | "BOOLEAN" => {
            let n = <i64 as Decode<Sqlite>>::decode(raw).map_err(sqlx::Error::Decode)?;
            Value::from(n)
        }
        "REAL" => {
            let n = <f64 as Decode<Sqlite>>::decode(raw).map_err(sqlx::Error::Decode)?;
            Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
        }
        "BLOB" => {
            let bytes = <Vec<u8> as Decode<Sqlite>>::decode(raw).map_err(sqlx::Error::Decode)?;
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => Value::String(<String as Decode<Sqlite>>::decode(raw).map_err(sqlx::Error::Decode)?),
    };
    Ok(value)
}
