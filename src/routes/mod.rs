//! Router assembly: synthesized table routes, the aggregate read, docs, and common routes.

mod common;
mod table;

pub use common::{common_routes, RESERVED_SEGMENTS};
pub use table::{routable_tables, table_routes};

use crate::handlers::{aggregate, docs};
use crate::openapi;
use crate::schema::SchemaRegistry;
use crate::settings::Settings;
use crate::state::AppState;
use crate::store::Store;
use axum::http::HeaderValue;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa_redoc::{Redoc, Servable};

/// Upper bound on insert bodies.
pub const BODY_LIMIT_BYTES: usize = 1024 * 1024;

/// CORS for the configured origin allow-list. Credentials are allowed, so methods and headers are mirrored.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

fn first_segment(path: &str) -> &str {
    path.trim_start_matches('/').split('/').next().unwrap_or_default()
}

/// A docs path is usable when its first segment is free. It then owns that segment,
/// so it can never shadow a table route.
fn docs_route<'a>(path: Option<&'a str>, taken: &[&str]) -> Option<&'a str> {
    path.filter(|p| {
        let first = first_segment(p);
        let usable = !first.is_empty() && !taken.contains(&first);
        if !usable {
            tracing::warn!(path = %p, "docs path collides with another route; disabled");
        }
        usable
    })
}

/// Build the full application router from an opened store and its discovered schema.
pub fn api_router(store: Store, registry: &SchemaRegistry, settings: &Settings) -> Router {
    let mut reserved: Vec<&str> = RESERVED_SEGMENTS.to_vec();
    let docs_path = docs_route(settings.docs_path.as_deref(), &reserved);
    if let Some(p) = docs_path {
        reserved.push(first_segment(p));
    }
    let docs_ui_path = docs_route(settings.docs_ui_path.as_deref(), &reserved);
    if let Some(p) = docs_ui_path {
        reserved.push(first_segment(p));
    }

    let routed = routable_tables(registry.tables(), &reserved);
    let openapi = Arc::new(openapi::build(&routed));
    let mut tables = Router::new();
    for table in &routed {
        tracing::debug!(table = %table.name, path = %table.base_path(), "registering table routes");
        tables = tables.merge(table_routes(store.clone(), Arc::clone(table)));
    }
    tracing::info!(tables = routed.len(), "table routes registered");

    // `/` prefers the interactive page and falls back to the raw document.
    let state = AppState {
        store,
        docs_redirect: docs_ui_path.or(docs_path).map(String::from),
        openapi: Arc::clone(&openapi),
    };

    let mut fixed = Router::new()
        .route("/", get(docs::root))
        .route("/all", get(aggregate::all));
    if let Some(path) = docs_path {
        fixed = fixed.route(path, get(docs::openapi));
    }

    let mut app = Router::new()
        .merge(common_routes(state.clone()))
        .merge(fixed.with_state(state))
        .merge(tables);
    if let Some(path) = docs_ui_path {
        app = app.merge(Redoc::with_url(path.to_string(), openapi.as_ref().clone()));
    }

    app.layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
        .layer(cors_layer(&settings.cors_origins))
        .layer(TraceLayer::new_for_http())
}
