//! `/` redirect and the raw OpenAPI document. The interactive page is mounted by the router.

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, response::Redirect, Json};
use utoipa::openapi::OpenApi;

/// `GET /`: send clients to the interactive docs, or to the raw document when that page is off.
pub async fn root(State(state): State<AppState>) -> Result<Redirect, AppError> {
    match state.docs_redirect.as_deref() {
        Some(path) => Ok(Redirect::temporary(path)),
        None => Err(AppError::NotFound("no API docs configured".into())),
    }
}

pub async fn openapi(State(state): State<AppState>) -> Json<OpenApi> {
    Json(state.openapi.as_ref().clone())
}
