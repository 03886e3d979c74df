//! Geolocation route — resolve the caller's IP.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use axum::response::Json;

use crate::services::geo::{self, GeoInfo};
use crate::state::AppState;

/// `GET /api/geo` — geolocation for the caller, keyed by the first
/// `X-Forwarded-For` hop when present, else the peer address. Lookup
/// failures return an empty object rather than an error.
pub async fn lookup_caller(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Json<GeoInfo> {
    let ip = forwarded_for(&headers).unwrap_or_else(|| addr.ip().to_string());
    Json(geo::by_ip(&state.geo_api_url, &ip).await.unwrap_or_default())
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}
