use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use testmate_core::{Conversation, Message, UseCase};

use super::{ApiJson, CallerIdentity};
use crate::error::ServerError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequestBody {
    pub conversation: Conversation,
    pub use_case: String,
}

#[derive(Debug, Serialize)]
pub struct UseCaseResponse {
    pub id: String,
    pub title: String,
    pub objective: String,
}

impl From<&UseCase> for UseCaseResponse {
    fn from(uc: &UseCase) -> Self {
        Self {
            id: uc.id.clone(),
            title: uc.title.clone(),
            objective: uc.objective.clone(),
        }
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/chat", post(chat))
        .route("/use-cases", get(list_use_cases))
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    CallerIdentity(identity): CallerIdentity,
    ApiJson(body): ApiJson<ChatRequestBody>,
) -> Result<Json<Message>, ServerError> {
    let reply = state
        .handler
        .handle_turn(&body.conversation, &body.use_case, &identity)
        .await?;
    Ok(Json(reply))
}

pub async fn list_use_cases(State(state): State<Arc<AppState>>) -> Json<Vec<UseCaseResponse>> {
    Json(state.handler.catalog().iter().map(UseCaseResponse::from).collect())
}
