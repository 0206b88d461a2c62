//! Builds parameterized SELECT and INSERT statements from discovered descriptors.

use crate::schema::{ColumnInfo, Filter, NewRow, TableDescriptor};
use serde_json::Value;

/// Fixed dashboard join: games -> games_host -> host -> country.
pub const AGGREGATE_SQL: &str = "SELECT country.country_name, games.event_type, games.year, \
games.start_date, games.end_date, host.place_name, games.events, games.sports, games.countries, \
games.participants_m, games.participants_f, games.participants, host.latitude, host.longitude \
FROM games \
JOIN games_host ON games.id = games_host.games_id \
JOIN host ON games_host.host_id = host.id \
JOIN country ON host.country_id = country.id";

/// Quote identifier for SQLite (safe: only from descriptors).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) -> &'static str {
        self.params.push(v);
        "?"
    }
}

fn select_column_list(table: &TableDescriptor) -> String {
    if table.columns.is_empty() {
        return "*".into();
    }
    table
        .columns
        .iter()
        .map(|c| quoted(&c.name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Every row, in store order.
pub fn select_all(table: &TableDescriptor) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT {} FROM {}", select_column_list(table), quoted(&table.name));
    q
}

/// One row by primary key, or by rowid when the table has none.
pub fn select_by_id(table: &TableDescriptor, id: Value) -> QueryBuf {
    let mut q = QueryBuf::new();
    let key = match &table.primary_key {
        Some(pk) => quoted(pk),
        None => "rowid".into(),
    };
    let ph = q.push_param(id);
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = {}",
        select_column_list(table),
        quoted(&table.name),
        key,
        ph
    );
    q
}

/// One row by rowid; used to re-read a freshly inserted row.
pub fn select_by_rowid(table: &TableDescriptor, rowid: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(Value::from(rowid));
    q.sql = format!(
        "SELECT {} FROM {} WHERE rowid = {}",
        select_column_list(table),
        quoted(&table.name),
        ph
    );
    q
}

/// One row by its full key. Used for `WITHOUT ROWID` tables, which have no rowid to go by.
pub fn select_by_key(table: &TableDescriptor, key: &[(&ColumnInfo, Value)]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut where_parts = Vec::with_capacity(key.len());
    for (col, val) in key {
        let ph = q.push_param(val.clone());
        where_parts.push(format!("{} = {}", quoted(&col.name), ph));
    }
    q.sql = format!(
        "SELECT {} FROM {} WHERE {}",
        select_column_list(table),
        quoted(&table.name),
        where_parts.join(" AND ")
    );
    q
}

/// AND of exact matches. An empty filter selects every row.
pub fn select_filtered(filter: &Filter<'_>) -> QueryBuf {
    let table = filter.table();
    if filter.is_empty() {
        return select_all(table);
    }
    let mut q = QueryBuf::new();
    let mut where_parts = Vec::with_capacity(filter.terms().len());
    for (col, val) in filter.terms() {
        let ph = q.push_param(val.clone());
        where_parts.push(format!("{} = {}", quoted(&col.name), ph));
    }
    q.sql = format!(
        "SELECT {} FROM {} WHERE {}",
        select_column_list(table),
        quoted(&table.name),
        where_parts.join(" AND ")
    );
    q
}

/// INSERT of the whitelisted columns. `None` when nothing survived whitelisting.
pub fn insert(row: &NewRow<'_>) -> Option<QueryBuf> {
    if row.is_empty() {
        return None;
    }
    let mut q = QueryBuf::new();
    let mut cols = Vec::with_capacity(row.values().len());
    let mut placeholders = Vec::with_capacity(row.values().len());
    for (col, val) in row.values() {
        cols.push(quoted(&col.name));
        placeholders.push(q.push_param(val.clone()));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quoted(&row.table().name),
        cols.join(", "),
        placeholders.join(", ")
    );
    Some(q)
}
