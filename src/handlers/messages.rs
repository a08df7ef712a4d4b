// src/handlers/messages.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentActor,
    models::message::{Message, SendMessagePayload},
};

// POST /api/messages
#[utoipa::path(
    post,
    path = "/api/messages",
    tag = "Mensagens",
    request_body = SendMessagePayload,
    responses(
        (status = 201, description = "Mensagem enviada", body = Message),
        (status = 403, description = "OSC não atribuída ao contador"),
        (status = 422, description = "OSC sem contador atribuído")
    ),
    security(("api_jwt" = []))
)]
pub async fn send_message(
    State(app_state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(payload): Json<SendMessagePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let message = app_state.message_service.send(&actor, &payload).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

// GET /api/messages — a conversa da própria OSC autenticada.
#[utoipa::path(
    get,
    path = "/api/messages",
    tag = "Mensagens",
    responses(
        (status = 200, description = "Histórico com o contador atual", body = [Message])
    ),
    security(("api_jwt" = []))
)]
pub async fn my_conversation(
    State(app_state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<Vec<Message>>, AppError> {
    let messages = app_state
        .message_service
        .history(&actor, None)
        .await
        .map_err(|e| e.conceal_access())?;
    Ok(Json(messages))
}

// GET /api/messages/{organization_id} — conversa de uma OSC específica
// (contador atribuído ou Admin).
//
// Mesma resposta para "OSC inexistente" e "OSC de outro contador".
#[utoipa::path(
    get,
    path = "/api/messages/{organization_id}",
    tag = "Mensagens",
    params(("organization_id" = Uuid, Path, description = "ID da OSC")),
    responses(
        (status = 200, description = "Histórico da conversa", body = [Message]),
        (status = 404, description = "Conversa não encontrada ou fora do seu escopo")
    ),
    security(("api_jwt" = []))
)]
pub async fn conversation_history(
    State(app_state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(organization_id): Path<Uuid>,
) -> Result<Json<Vec<Message>>, AppError> {
    let messages = app_state
        .message_service
        .history(&actor, Some(organization_id))
        .await
        .map_err(|e| e.conceal_access())?;
    Ok(Json(messages))
}
