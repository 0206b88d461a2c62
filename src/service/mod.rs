//! QueryExecutor: runs built statements against the store.

mod query;
pub use query::QueryExecutor;
