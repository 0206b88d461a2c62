//! Table handlers: list, search, read, create. Each is registered once per discovered table.

use crate::error::AppError;
use crate::service::QueryExecutor;
use crate::state::TableState;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

fn body_to_map(body: &[u8]) -> Result<serde_json::Map<String, Value>, AppError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("invalid JSON body: {}", e)))?;
    match value {
        Value::Object(m) => Ok(m),
        _ => Err(AppError::BadRequest("request body must be a JSON object".into())),
    }
}

pub async fn list(State(state): State<TableState>) -> Result<Json<Vec<Value>>, AppError> {
    let rows = QueryExecutor::list(&state.store, &state.table).await?;
    Ok(Json(rows))
}

pub async fn search(
    State(state): State<TableState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Value>>, AppError> {
    let filter = state.table.filter(params);
    let rows = QueryExecutor::search(&state.store, &filter).await?;
    Ok(Json(rows))
}

pub async fn read(
    State(state): State<TableState>,
    Path(id_str): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = state.table.coerce_id(&id_str);
    let row = QueryExecutor::read(&state.store, &state.table, &id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} '{}'", state.table.name, id_str)))?;
    Ok(Json(row))
}

pub async fn create(State(state): State<TableState>, body: Bytes) -> Result<Json<Value>, AppError> {
    let payload = body_to_map(&body)?;
    let row = state.table.new_row(payload);
    let created = QueryExecutor::create(&state.store, &row).await?;
    Ok(Json(created))
}
