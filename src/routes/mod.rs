//! Router assembly.
//!
//! Request/response traffic (login, paint, chat post, bootstrap snapshot)
//! rides plain HTTP; the per-client event stream rides one websocket per
//! connection at `/api/ws`.

pub mod auth;
pub mod canvas;
pub mod chat;
pub mod geo;
pub mod ws;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/login", post(auth::login))
        .route("/api/logout", post(auth::logout))
        .route("/api/me", get(auth::me))
        .route("/api/geo", get(geo::lookup_caller))
        .route("/api/globalcanvas", get(canvas::global_canvas))
        .route("/api/globalcanvas/paint", post(canvas::paint))
        .route("/api/message", post(chat::post_message))
        .route("/api/messages", get(chat::list_messages))
        .route("/api/ws", get(ws::handle_ws))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
