//! Connection-establishment endpoints: create, join, and resume handshakes.
//!
//! Handshake failures (missing parameters, unknown room, full room) are the
//! only errors ever surfaced to clients, as rejected upgrade attempts with a
//! distinguishable status and reason.

use axum::{
    Router,
    extract::{Query, State, WebSocketUpgrade},
    response::Response,
    routing::get,
};
use serde::Deserialize;

use crate::{
    error::{AppError, ServiceError},
    game::Player,
    services::websocket_service,
    state::SharedState,
};

#[derive(Debug, Deserialize)]
/// Query parameters for the join handshake.
pub struct JoinParams {
    #[serde(rename = "roomId")]
    room_id: Option<String>,
}

#[derive(Debug, Deserialize)]
/// Query parameters for the resume handshake.
pub struct ResumeParams {
    #[serde(rename = "roomId")]
    room_id: Option<String>,
    slot: Option<u8>,
}

/// Open a new room and upgrade the creator into slot 0.
pub async fn create_handler(
    State(state): State<SharedState>,
    ws: WebSocketUpgrade,
) -> Result<Response, AppError> {
    let room = state.create_room()?;
    Ok(ws.on_upgrade(move |socket| websocket_service::handle_socket(room, Player::Zero, socket)))
}

/// Claim slot 1 of an existing room and upgrade the joiner.
pub async fn join_handler(
    State(state): State<SharedState>,
    Query(params): Query<JoinParams>,
    ws: WebSocketUpgrade,
) -> Result<Response, AppError> {
    let id = params.room_id.ok_or(ServiceError::MissingParam("roomId"))?;
    let room = state.join_room(&id).await?;
    Ok(ws.on_upgrade(move |socket| websocket_service::handle_socket(room, Player::One, socket)))
}

/// Re-attach a returning player to their room and slot.
pub async fn resume_handler(
    State(state): State<SharedState>,
    Query(params): Query<ResumeParams>,
    ws: WebSocketUpgrade,
) -> Result<Response, AppError> {
    let id = params.room_id.ok_or(ServiceError::MissingParam("roomId"))?;
    let slot = params
        .slot
        .and_then(Player::from_index)
        .ok_or(ServiceError::MissingParam("slot"))?;
    let room = state.resume_room(&id, slot)?;
    Ok(ws.on_upgrade(move |socket| websocket_service::handle_socket(room, slot, socket)))
}

/// Configure the handshake endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/create", get(create_handler))
        .route("/join", get(join_handler))
        .route("/resume", get(resume_handler))
}
