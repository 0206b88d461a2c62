//! Route synthesis: one list/search/get/insert set per discovered table.
//! Paths are fixed strings derived from the table name; each set carries its own descriptor as state.

use crate::handlers::table::{create, list, read, search};
use crate::schema::TableDescriptor;
use crate::state::TableState;
use crate::store::Store;
use axum::{routing::get, Router};
use std::sync::Arc;

/// `/{table}` (GET list, POST insert), `/{table}/search`, `/{table}/:id`.
pub fn table_routes(store: Store, table: Arc<TableDescriptor>) -> Router {
    let state = TableState {
        store,
        table: Arc::clone(&table),
    };
    Router::new()
        .route(&table.base_path(), get(list).post(create))
        .route(&table.search_path(), get(search))
        .route(&table.item_path(), get(read))
        .with_state(state)
}

/// Tables that get a route set: the name must be a plain path segment not already taken.
pub fn routable_tables<'a>(
    tables: &'a [Arc<TableDescriptor>],
    reserved: &[&str],
) -> Vec<&'a Arc<TableDescriptor>> {
    tables
        .iter()
        .filter(|t| {
            if !t.has_routable_name() {
                tracing::warn!(table = %t.name, "table name is not a valid path segment; no routes registered");
                return false;
            }
            if reserved.contains(&t.name.as_str()) {
                tracing::warn!(table = %t.name, "table name collides with a fixed route; no routes registered");
                return false;
            }
            true
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnInfo;

    fn table(name: &str) -> Arc<TableDescriptor> {
        Arc::new(TableDescriptor::new(name, vec![ColumnInfo::new("id", "INTEGER")], Some("id".into())))
    }

    #[test]
    fn skips_reserved_and_unroutable_names() {
        let tables = vec![table("games"), table("all"), table("two words"), table("host")];
        let routed: Vec<&str> = routable_tables(&tables, &["all", "health"])
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(routed, ["games", "host"]);
    }
}
