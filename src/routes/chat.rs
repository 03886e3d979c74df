//! Chat routes — post a message, list recent history.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use time::OffsetDateTime;

use crate::routes::auth::AuthUser;
use crate::services::chat::{self, ChatError, ChatMessageView, Creator};
use crate::services::geo::GeoInfo;
use crate::state::AppState;

const HISTORY_LIMIT: i64 = 50;

#[derive(Deserialize)]
pub struct PostMessageRequest {
    pub text: String,
    #[serde(default)]
    pub geo: Option<GeoInfo>,
}

/// `POST /api/message` — validate, persist, broadcast, return the rendered
/// message.
pub async fn post_message(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<PostMessageRequest>,
) -> Response {
    let creator = Creator {
        id: auth.user.id,
        name: auth.user.name.clone(),
        avatar_url: Some(auth.user.avatar_url.clone()),
    };

    match chat::post_message(&state, creator, &body.text, body.geo).await {
        Ok(view) => Json(view).into_response(),
        Err(ChatError::Validation(violations)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({ "error": "message validation failed", "violations": violations })),
        )
            .into_response(),
        Err(ChatError::Database(e)) => {
            tracing::error!(error = %e, "message persistence failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({ "error": "message persistence failed" })),
            )
                .into_response()
        }
    }
}

/// `GET /api/messages` — recent history, oldest first, footers rendered at
/// request time.
pub async fn list_messages(State(state): State<AppState>) -> Result<Json<Vec<ChatMessageView>>, StatusCode> {
    let messages = chat::list_recent(&state.pool, HISTORY_LIMIT)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "message history query failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let now = OffsetDateTime::now_utc();
    Ok(Json(messages.iter().map(|m| chat::render(m, now)).collect()))
}
