use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use testmate_core::TurnRecord;

use super::{ApiQuery, CallerIdentity};
use crate::error::ServerError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/history", get(list_history))
}

pub async fn list_history(
    State(state): State<Arc<AppState>>,
    CallerIdentity(identity): CallerIdentity,
    ApiQuery(query): ApiQuery<HistoryQuery>,
) -> Result<Json<Vec<TurnRecord>>, ServerError> {
    let records = match query.limit {
        Some(0) => return Err(ServerError::BadRequest("limit must be positive".into())),
        Some(limit) => state.reader.list_recent(&identity, limit).await?,
        None => state.reader.list_history(&identity).await?,
    };
    Ok(Json(records))
}
