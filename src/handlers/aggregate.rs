//! Hand-written join for the dashboards.

use crate::error::AppError;
use crate::service::QueryExecutor;
use crate::state::AppState;
use axum::{extract::State, Json};
use serde_json::Value;

pub async fn all(State(state): State<AppState>) -> Result<Json<Vec<Value>>, AppError> {
    let rows = QueryExecutor::aggregate(&state.store).await?;
    Ok(Json(rows))
}
