//! Table descriptors discovered at startup, and the whitelisted filter/payload types built from them.

use serde_json::{Map, Number, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// SQLite column type affinity, derived from the declared type name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Affinity {
    Integer,
    Text,
    Blob,
    Real,
    Numeric,
}

impl Affinity {
    /// SQLite's affinity rules, applied in order.
    pub fn from_declared(declared: &str) -> Self {
        let upper = declared.to_ascii_uppercase();
        if upper.contains("INT") {
            Affinity::Integer
        } else if upper.contains("CHAR") || upper.contains("CLOB") || upper.contains("TEXT") {
            Affinity::Text
        } else if upper.is_empty() || upper.contains("BLOB") {
            Affinity::Blob
        } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
            Affinity::Real
        } else {
            Affinity::Numeric
        }
    }

    /// Convert a raw path or query-string value into the JSON value bound for this affinity.
    /// Values that do not parse stay text; SQLite applies its own comparison affinity to them.
    pub fn coerce(self, raw: &str) -> Value {
        match self {
            Affinity::Integer => raw
                .parse::<i64>()
                .map(Value::from)
                .unwrap_or_else(|_| Value::String(raw.to_string())),
            Affinity::Real | Affinity::Numeric => {
                if self == Affinity::Numeric {
                    if let Ok(n) = raw.parse::<i64>() {
                        return Value::from(n);
                    }
                }
                raw.parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::String(raw.to_string()))
            }
            Affinity::Text | Affinity::Blob => Value::String(raw.to_string()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ColumnInfo {
    pub name: String,
    /// Declared type as written in the table definition (may be empty).
    pub declared_type: String,
    pub affinity: Affinity,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        let declared_type = declared_type.into();
        ColumnInfo {
            name: name.into(),
            affinity: Affinity::from_declared(&declared_type),
            declared_type,
        }
    }
}

#[derive(Clone, Debug)]
pub struct TableDescriptor {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
    /// First column flagged as primary key; `GET /T/:id` matches on it alone.
    pub primary_key: Option<String>,
    /// Every primary key column, in key order.
    pub key_columns: Vec<String>,
    /// Declared `WITHOUT ROWID`: rows can only be addressed through `key_columns`.
    pub without_rowid: bool,
}

impl TableDescriptor {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnInfo>, primary_key: Option<String>) -> Self {
        TableDescriptor {
            name: name.into(),
            columns,
            key_columns: primary_key.iter().cloned().collect(),
            primary_key,
            without_rowid: false,
        }
    }

    /// Replace the key with the full (possibly composite) one.
    pub fn with_key(mut self, key_columns: Vec<String>, without_rowid: bool) -> Self {
        self.key_columns = key_columns;
        self.without_rowid = without_rowid;
        self
    }

    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.name == name)
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn primary_key_column(&self) -> Option<&ColumnInfo> {
        self.primary_key.as_deref().and_then(|pk| self.column(pk))
    }

    /// Id from a URL path, coerced by the primary key's affinity (rowid is an integer).
    pub fn coerce_id(&self, raw: &str) -> Value {
        self.primary_key_column()
            .map(|c| c.affinity)
            .unwrap_or(Affinity::Integer)
            .coerce(raw)
    }

    pub fn base_path(&self) -> String {
        format!("/{}", self.name)
    }

    pub fn search_path(&self) -> String {
        format!("/{}/search", self.name)
    }

    /// Router path for get-by-id.
    pub fn item_path(&self) -> String {
        format!("/{}/:id", self.name)
    }

    /// Whether the table name can be used verbatim as one URL path segment.
    pub fn has_routable_name(&self) -> bool {
        !self.name.is_empty()
            && self
                .name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '~'))
    }

    /// Build a search filter from query-string pairs. Unknown keys are dropped; a repeated key keeps its last value.
    pub fn filter<I>(&self, params: I) -> Filter<'_>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut terms: Vec<(usize, Value)> = Vec::new();
        for (key, raw) in params {
            let Some(idx) = self.column_index(&key) else { continue };
            let value = self.columns[idx].affinity.coerce(&raw);
            match terms.iter_mut().find(|(i, _)| *i == idx) {
                Some(term) => term.1 = value,
                None => terms.push((idx, value)),
            }
        }
        terms.sort_by_key(|(i, _)| *i);
        Filter {
            table: self,
            terms: terms.into_iter().map(|(i, v)| (&self.columns[i], v)).collect(),
        }
    }

    /// Keep only payload keys naming a column, in column order.
    pub fn new_row(&self, mut payload: Map<String, Value>) -> NewRow<'_> {
        let values = self
            .columns
            .iter()
            .filter_map(|c| payload.remove(&c.name).map(|v| (c, v)))
            .collect();
        NewRow { table: self, values }
    }
}

/// Exact-match constraints over columns of one table, ANDed together.
#[derive(Debug)]
pub struct Filter<'t> {
    table: &'t TableDescriptor,
    terms: Vec<(&'t ColumnInfo, Value)>,
}

impl<'t> Filter<'t> {
    pub fn table(&self) -> &'t TableDescriptor {
        self.table
    }

    pub fn terms(&self) -> &[(&'t ColumnInfo, Value)] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Column values for an insert, restricted to the table's columns.
#[derive(Debug)]
pub struct NewRow<'t> {
    table: &'t TableDescriptor,
    values: Vec<(&'t ColumnInfo, Value)>,
}

impl<'t> NewRow<'t> {
    pub fn table(&self) -> &'t TableDescriptor {
        self.table
    }

    pub fn values(&self) -> &[(&'t ColumnInfo, Value)] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values for every key column, or `None` unless the payload supplied all of them non-null.
    pub fn key_values(&self) -> Option<Vec<(&'t ColumnInfo, Value)>> {
        if self.table.key_columns.is_empty() {
            return None;
        }
        self.table
            .key_columns
            .iter()
            .map(|key| {
                self.values
                    .iter()
                    .find(|(c, v)| c.name == *key && !v.is_null())
                    .map(|(c, v)| (*c, v.clone()))
            })
            .collect()
    }
}

/// All tables discovered at startup, in creation order.
#[derive(Clone, Debug, Default)]
pub struct SchemaRegistry {
    tables: Vec<Arc<TableDescriptor>>,
    by_name: HashMap<String, Arc<TableDescriptor>>,
}

impl SchemaRegistry {
    pub fn new(tables: Vec<TableDescriptor>) -> Self {
        let tables: Vec<Arc<TableDescriptor>> = tables.into_iter().map(Arc::new).collect();
        let by_name = tables.iter().map(|t| (t.name.clone(), Arc::clone(t))).collect();
        SchemaRegistry { tables, by_name }
    }

    pub fn tables(&self) -> &[Arc<TableDescriptor>] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&Arc<TableDescriptor>> {
        self.by_name.get(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
