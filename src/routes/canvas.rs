//! Canvas routes — bootstrap snapshot and paint requests.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;

use crate::grid::{Pixel, PixelGrid};
use crate::paint::Region;
use crate::routes::auth::AuthUser;
use crate::services::canvas::{self, CanvasError};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PaintRequest {
    pub pixel: Pixel,
    pub start_x: u32,
    pub start_y: u32,
    pub end_x: u32,
    pub end_y: u32,
}

/// `GET /api/globalcanvas` — full canonical grid snapshot. New mirrors call
/// this before consuming the event stream.
pub async fn global_canvas(State(state): State<AppState>) -> Json<PixelGrid> {
    Json(canvas::snapshot(&state).await)
}

/// `POST /api/globalcanvas/paint` — apply a rectangular fill. Responds with
/// the committed diff; the matching `canvas.diff` event reaches the caller's
/// own event stream as well.
pub async fn paint(State(state): State<AppState>, _auth: AuthUser, Json(body): Json<PaintRequest>) -> Response {
    let region = Region {
        start_x: body.start_x,
        start_y: body.start_y,
        end_x: body.end_x,
        end_y: body.end_y,
    };

    match canvas::paint(&state, body.pixel, region).await {
        Ok(diff) => Json(diff).into_response(),
        Err(e) => canvas_error_response(&e),
    }
}

fn canvas_error_response(err: &CanvasError) -> Response {
    match err {
        CanvasError::Paint(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({ "error": e.to_string() })),
        )
            .into_response(),
        CanvasError::Persistence(reason) => (
            StatusCode::BAD_GATEWAY,
            Json(serde_json::json!({ "error": "canvas persistence failed", "detail": reason })),
        )
            .into_response(),
    }
}
