//! Paralympics API: REST routes synthesized from the schema of a SQLite database.

pub mod error;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod schema;
pub mod service;
pub mod settings;
pub mod sql;
pub mod state;
pub mod store;

pub use error::{AppError, SchemaError};
pub use routes::{api_router, common_routes, table_routes};
pub use schema::{discover, SchemaRegistry, TableDescriptor};
pub use service::QueryExecutor;
pub use settings::Settings;
pub use state::{AppState, TableState};
pub use store::Store;

use axum::Router;

/// Open the store, introspect it once, and synthesize the router. Fails before serving if either step fails.
pub async fn app(settings: &Settings) -> Result<Router, SchemaError> {
    let store = Store::open(&settings.database_url).await?;
    let registry = discover(&store).await?;
    Ok(api_router(store, &registry, settings))
}
