//! Shared state handed to handlers. Everything here is immutable after startup.

use crate::schema::TableDescriptor;
use crate::store::Store;
use std::sync::Arc;
use utoipa::openapi::OpenApi;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    /// Target of the `/` redirect; `None` when every docs endpoint is disabled.
    pub docs_redirect: Option<String>,
    pub openapi: Arc<OpenApi>,
}

/// State of one synthesized table route set.
#[derive(Clone)]
pub struct TableState {
    pub store: Store,
    pub table: Arc<TableDescriptor>,
}
