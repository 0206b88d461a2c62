//! HTTP handlers for table routes, the aggregate read, and API docs.

pub mod aggregate;
pub mod docs;
pub mod table;
