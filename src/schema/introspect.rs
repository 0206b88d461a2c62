//! One-shot schema discovery from `sqlite_master` and `pragma_table_info`.

use crate::error::SchemaError;
use crate::schema::{ColumnInfo, SchemaRegistry, TableDescriptor};
use crate::store::Store;
use sqlx::sqlite::SqliteConnection;
use sqlx::{Connection, Row};

/// User tables in creation order with their `WITHOUT ROWID` flag; `sqlite_*` tables are internal.
const TABLE_NAMES_SQL: &str = "SELECT m.name, l.wr FROM sqlite_master AS m \
JOIN pragma_table_list AS l ON l.name = m.name AND l.schema = 'main' \
WHERE m.type = 'table' AND m.name NOT LIKE 'sqlite\\_%' ESCAPE '\\' ORDER BY m.rowid";

const TABLE_INFO_SQL: &str = "SELECT name, type, pk FROM pragma_table_info(?) ORDER BY cid";

/// Read every table's columns and primary key. Runs once, before any route exists.
pub async fn discover(store: &Store) -> Result<SchemaRegistry, SchemaError> {
    let mut conn = store.connect().await.map_err(SchemaError::StoreUnavailable)?;
    let tables = read_tables(&mut conn).await.map_err(SchemaError::Introspection)?;
    conn.close().await.map_err(SchemaError::Introspection)?;

    for t in &tables {
        tracing::info!(
            table = %t.name,
            columns = t.columns.len(),
            primary_key = t.primary_key.as_deref().unwrap_or("rowid"),
            key_columns = t.key_columns.len(),
            without_rowid = t.without_rowid,
            "discovered table"
        );
    }
    tracing::info!(count = tables.len(), "schema introspection complete");
    Ok(SchemaRegistry::new(tables))
}

async fn read_tables(conn: &mut SqliteConnection) -> Result<Vec<TableDescriptor>, sqlx::Error> {
    tracing::debug!(sql = %TABLE_NAMES_SQL, "query");
    let entries = sqlx::query(TABLE_NAMES_SQL).fetch_all(&mut *conn).await?;

    let mut tables = Vec::with_capacity(entries.len());
    for entry in &entries {
        let name: String = entry.try_get("name")?;
        let without_rowid: i64 = entry.try_get("wr")?;
        tracing::debug!(sql = %TABLE_INFO_SQL, table = %name, "query");
        let rows = sqlx::query(TABLE_INFO_SQL)
            .bind(&name)
            .fetch_all(&mut *conn)
            .await?;
        let mut columns = Vec::with_capacity(rows.len());
        let mut primary_key = None;
        let mut key: Vec<(i64, String)> = Vec::new();
        for row in &rows {
            let column: String = row.try_get("name")?;
            let declared: Option<String> = row.try_get("type")?;
            let pk: i64 = row.try_get("pk")?;
            if pk > 0 {
                primary_key.get_or_insert_with(|| column.clone());
                key.push((pk, column.clone()));
            }
            columns.push(ColumnInfo::new(column, declared.unwrap_or_default()));
        }
        key.sort_by_key(|(pos, _)| *pos);
        let key_columns = key.into_iter().map(|(_, c)| c).collect();
        tables.push(TableDescriptor::new(name, columns, primary_key).with_key(key_columns, without_rowid != 0));
    }
    Ok(tables)
}
