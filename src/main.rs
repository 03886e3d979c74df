use std::net::SocketAddr;

use pixelboard::state::{AppState, env_parse};
use pixelboard::{db, routes, services};

const DEFAULT_CANVAS_WIDTH: u32 = 32;
const DEFAULT_CANVAS_HEIGHT: u32 = 32;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let port: u16 = env_parse("PORT", 3000);

    let pool = db::init_pool(&database_url)
        .await
        .expect("database init failed");

    let width = env_parse("CANVAS_WIDTH", DEFAULT_CANVAS_WIDTH);
    let height = env_parse("CANVAS_HEIGHT", DEFAULT_CANVAS_HEIGHT);
    let grid = services::image::ensure_global_canvas(&pool, width, height)
        .await
        .expect("canvas init failed");

    // Non-fatal: login still works for existing accounts if seeding fails.
    if let Err(e) = services::user::seed_guest_user(&pool).await {
        tracing::warn!(error = %e, "guest user seeding failed");
    }

    let state = AppState::new(pool, grid);
    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "pixelboard listening");
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .expect("server failed");
}
