use axum::{
    routing::{get, post},
    Router,
};
use std::env;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;

use egchess_core::{Mode, WidgetConfig};

mod actor;
mod routes;

use actor::BoardHandle;

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

pub struct AppState {
    pub board: BoardHandle,
}

fn load_config() -> WidgetConfig {
    match env::var("EGCHESS_CONFIG") {
        Ok(path) => WidgetConfig::from_file(&path).expect("Failed to read widget config"),
        Err(_) => WidgetConfig::new(Mode::Edit),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = load_config();
    let assets_dir = "crates/web/static";
    let board = BoardHandle::spawn(config).await.expect("Failed to create board");
    let state = Arc::new(AppState { board });

    let app = Router::new()
        .route("/", get(routes::index))
        .route("/board.svg", get(routes::board_svg))
        .route("/health", get(routes::health))
        .route("/api/state", get(routes::api::snapshot))
        .route("/api/pointer", post(routes::api::pointer))
        .route("/api/load", post(routes::api::load))
        .route("/api/reset", post(routes::api::reset))
        .route("/api/undo", post(routes::api::undo))
        .route("/api/orientation", post(routes::api::orientation))
        .route("/api/move", post(routes::api::play_move))
        .nest_service("/dist/assets", ServeDir::new(assets_dir))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state);

    let addr = env::var("EGCHESS_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind address");

    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await.expect("Server error");
}
