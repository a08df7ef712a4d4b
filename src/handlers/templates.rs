// src/handlers/templates.rs

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::organizations::split_multipart,
    middleware::auth::CurrentActor,
    models::template::{Template, TemplateUploadForm},
};

// POST /api/templates
// Multipart: `display_name` + arquivo no campo `file`.
#[utoipa::path(
    post,
    path = "/api/templates",
    tag = "Modelos",
    request_body(content = TemplateUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Modelo publicado", body = Template),
        (status = 403, description = "Apenas contadores publicam modelos")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_template(
    State(app_state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let (mut texts, mut files) = split_multipart(multipart).await?;

    let display_name = texts.remove("display_name").unwrap_or_default();
    let file = files
        .remove("file")
        .ok_or_else(|| AppError::InvalidInput("Envie o arquivo no campo 'file'.".to_string()))?;

    let template = app_state
        .template_service
        .upload(&actor, &display_name, file)
        .await?;

    Ok((StatusCode::CREATED, Json(template)))
}

// GET /api/templates — lista única, sem escopo por OSC.
#[utoipa::path(
    get,
    path = "/api/templates",
    tag = "Modelos",
    responses(
        (status = 200, description = "Modelos disponíveis", body = [Template])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_templates(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Template>>, AppError> {
    let templates = app_state.template_service.list().await?;
    Ok(Json(templates))
}

// GET /api/templates/{id}/download
#[utoipa::path(
    get,
    path = "/api/templates/{id}/download",
    tag = "Modelos",
    params(("id" = Uuid, Path, description = "ID do modelo")),
    responses(
        (status = 200, description = "Conteúdo do modelo"),
        (status = 404, description = "Modelo não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn download_template(
    State(app_state): State<AppState>,
    Path(template_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (template, bytes) = app_state.template_service.download(template_id).await?;

    let headers = [
        (header::CONTENT_TYPE, "application/octet-stream".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", template.display_name),
        ),
    ];

    Ok((headers, bytes).into_response())
}

// DELETE /api/templates/{id}
#[utoipa::path(
    delete,
    path = "/api/templates/{id}",
    tag = "Modelos",
    params(("id" = Uuid, Path, description = "ID do modelo")),
    responses(
        (status = 204, description = "Modelo removido"),
        (status = 403, description = "Só o autor (ou o Admin) remove um modelo")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_template(
    State(app_state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(template_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.template_service.delete(&actor, template_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
