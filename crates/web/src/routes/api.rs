use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use shakmaty::Role;
use std::sync::Arc;

use egchess_core::piece::parse_square;
use egchess_core::{Orientation, Point, PointerInput};

use crate::actor::{Op, Snapshot};
use crate::AppState;

type ApiResult = Result<Json<Snapshot>, StatusCode>;

// ============================================================================
// REQUESTS
// ============================================================================

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    Down,
    Up,
    ContextMenu,
}

#[derive(Deserialize)]
pub struct PointerRequest {
    pub kind: PointerKind,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub button: i16,
    #[serde(default)]
    pub timestamp: u64,
    /// Answer for the load-FEN prompt, if this press triggers it
    pub prompt: Option<String>,
}

impl PointerRequest {
    fn input(&self) -> PointerInput {
        let point = Point::new(self.x, self.y);
        match self.kind {
            PointerKind::Down => PointerInput::Down {
                point,
                button: self.button,
                timestamp_ms: self.timestamp,
            },
            PointerKind::Up => PointerInput::Up { point, button: self.button },
            PointerKind::ContextMenu => PointerInput::ContextMenu { point },
        }
    }
}

#[derive(Deserialize)]
pub struct LoadRequest {
    pub fen: String,
}

#[derive(Deserialize)]
pub struct OrientationRequest {
    pub color: Orientation,
}

#[derive(Deserialize)]
pub struct MoveRequest {
    pub from: String,
    pub to: String,
    /// One of q, r, b, n
    pub promotion: Option<char>,
}

// ============================================================================
// HANDLERS
// ============================================================================

async fn dispatch(state: &AppState, op: Op) -> ApiResult {
    state
        .board
        .send(op)
        .await
        .map(Json)
        .ok_or(StatusCode::SERVICE_UNAVAILABLE)
}

pub async fn snapshot(State(state): State<Arc<AppState>>) -> ApiResult {
    dispatch(&state, Op::Snapshot).await
}

pub async fn pointer(State(state): State<Arc<AppState>>, Json(req): Json<PointerRequest>) -> ApiResult {
    let input = req.input();
    dispatch(&state, Op::Pointer { input, prompt_answer: req.prompt }).await
}

pub async fn load(State(state): State<Arc<AppState>>, Json(req): Json<LoadRequest>) -> ApiResult {
    dispatch(&state, Op::Load(req.fen)).await
}

pub async fn reset(State(state): State<Arc<AppState>>) -> ApiResult {
    dispatch(&state, Op::Reset).await
}

pub async fn undo(State(state): State<Arc<AppState>>) -> ApiResult {
    dispatch(&state, Op::Undo).await
}

pub async fn orientation(
    State(state): State<Arc<AppState>>,
    Json(req): Json<OrientationRequest>,
) -> ApiResult {
    dispatch(&state, Op::Orientation(req.color.into())).await
}

pub async fn play_move(State(state): State<Arc<AppState>>, Json(req): Json<MoveRequest>) -> ApiResult {
    let from = parse_square(&req.from).map_err(|_| StatusCode::BAD_REQUEST)?;
    let to = parse_square(&req.to).map_err(|_| StatusCode::BAD_REQUEST)?;
    let promotion = match req.promotion {
        Some(c) => Some(Role::from_char(c.to_ascii_lowercase()).ok_or(StatusCode::BAD_REQUEST)?),
        None => None,
    };
    dispatch(&state, Op::Move { from, to, promotion }).await
}
