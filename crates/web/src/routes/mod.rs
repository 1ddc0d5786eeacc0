use askama::Template;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::actor::Op;
use crate::AppState;

pub mod api;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub title: String,
    pub mode: String,
    pub fen: String,
    pub svg: String,
}

pub async fn index(State(state): State<Arc<AppState>>) -> Response {
    let Some(snapshot) = state.board.send(Op::Snapshot).await else {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    };

    let template = IndexTemplate {
        title: "EgChess".to_string(),
        mode: format!("{:?}", snapshot.mode).to_lowercase(),
        fen: snapshot.fen,
        svg: snapshot.svg,
    };
    askama_axum::into_response(&template)
}

pub async fn board_svg(State(state): State<Arc<AppState>>) -> Response {
    match state.board.send(Op::Snapshot).await {
        Some(snapshot) => ([(header::CONTENT_TYPE, "image/svg+xml")], snapshot.svg).into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

pub async fn health() -> &'static str {
    "OK"
}
