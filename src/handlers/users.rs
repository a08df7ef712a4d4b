// src/handlers/users.rs

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
    models::auth::{CreateAccountantPayload, SetStatusPayload, User},
};

// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Usuários",
    responses(
        (status = 200, description = "Perfil do usuário autenticado", body = User)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<User>, AppError> {
    let user = app_state.user_service.me(&actor).await?;
    Ok(Json(user))
}

// POST /api/users/accountants
#[utoipa::path(
    post,
    path = "/api/users/accountants",
    tag = "Usuários",
    request_body = CreateAccountantPayload,
    responses(
        (status = 201, description = "Contador cadastrado", body = User),
        (status = 403, description = "Apenas o Admin cadastra contadores"),
        (status = 409, description = "E-mail já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_accountant(
    State(app_state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Json(payload): Json<CreateAccountantPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let user = app_state
        .user_service
        .create_accountant(&actor, &payload.name, &payload.email, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

// GET /api/users/accountants
#[utoipa::path(
    get,
    path = "/api/users/accountants",
    tag = "Usuários",
    responses(
        (status = 200, description = "Lista de contadores", body = [User])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_accountants(
    State(app_state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<Vec<User>>, AppError> {
    let accountants = app_state.user_service.list_accountants(&actor).await?;
    Ok(Json(accountants))
}

// PATCH /api/users/{id}/status
#[utoipa::path(
    patch,
    path = "/api/users/{id}/status",
    tag = "Usuários",
    request_body = SetStatusPayload,
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 204, description = "Status alterado"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn set_user_status(
    State(app_state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<SetStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .user_service
        .set_status(&actor, user_id, payload.status)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// DELETE /api/users/{id}
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Usuários",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 204, description = "Usuário excluído"),
        (status = 403, description = "Sem permissão (ou tentativa de auto-exclusão)")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.user_service.delete_user(&actor, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
