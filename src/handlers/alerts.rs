// src/handlers/alerts.rs

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
    models::alert::{Alert, CreateAlertPayload},
};

// POST /api/alerts
#[utoipa::path(
    post,
    path = "/api/alerts",
    tag = "Avisos",
    request_body = CreateAlertPayload,
    responses(
        (status = 201, description = "Aviso criado (organization_id nulo = difusão)", body = Alert),
        (status = 403, description = "Apenas contadores criam avisos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_alert(
    State(app_state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(payload): Json<CreateAlertPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let alert = app_state.alert_service.create(&actor, &payload).await?;
    Ok((StatusCode::CREATED, Json(alert)))
}

// GET /api/alerts
#[utoipa::path(
    get,
    path = "/api/alerts",
    tag = "Avisos",
    responses(
        (status = 200, description = "Avisos no escopo do usuário", body = [Alert])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_alerts(
    State(app_state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<Vec<Alert>>, AppError> {
    let alerts = app_state.alert_service.list(&actor).await?;
    Ok(Json(alerts))
}

// PATCH /api/alerts/{id}/read
#[utoipa::path(
    patch,
    path = "/api/alerts/{id}/read",
    tag = "Avisos",
    params(("id" = Uuid, Path, description = "ID do aviso")),
    responses(
        (status = 204, description = "Aviso marcado como lido"),
        (status = 404, description = "Aviso inexistente, de outra OSC ou já lido")
    ),
    security(("api_jwt" = []))
)]
pub async fn mark_alert_read(
    State(app_state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(alert_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.alert_service.mark_as_read(&actor, alert_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
