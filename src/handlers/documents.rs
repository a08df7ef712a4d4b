// src/handlers/documents.rs

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
    models::document::{Document, DocumentUploadForm, DocumentView},
};

// POST /api/documents
// Multipart: arquivo no campo `file`; contador acrescenta `organization_id`.
#[utoipa::path(
    post,
    path = "/api/documents",
    tag = "Documentos",
    request_body(content = DocumentUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Documento enviado", body = Document),
        (status = 422, description = "OSC sem contador atribuído")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_document(
    State(app_state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let (mut texts, mut files) = split_multipart(multipart).await?;

    let target_organization_id = match texts.remove("organization_id") {
        Some(raw) if !raw.trim().is_empty() => Some(Uuid::parse_str(&raw).map_err(|_| {
            AppError::InvalidInput("organization_id não é um UUID válido.".to_string())
        })?),
        _ => None,
    };

    let file = files
        .remove("file")
        .ok_or_else(|| AppError::InvalidInput("Envie o arquivo no campo 'file'.".to_string()))?;

    let document = app_state
        .document_service
        .upload(&actor, target_organization_id, file)
        .await?;

    Ok((StatusCode::CREATED, Json(document)))
}

// GET /api/documents
#[utoipa::path(
    get,
    path = "/api/documents",
    tag = "Documentos",
    responses(
        (status = 200, description = "Documentos no escopo do usuário, com direção por linha", body = [DocumentView])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_documents(
    State(app_state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<Vec<DocumentView>>, AppError> {
    let documents = app_state.document_service.list(&actor).await?;
    Ok(Json(documents))
}

// GET /api/documents/{id}/download
//
// A borda não distingue "não existe" de "não é seu": as duas situações saem
// como a mesma resposta de acesso negado.
#[utoipa::path(
    get,
    path = "/api/documents/{id}/download",
    tag = "Documentos",
    params(("id" = Uuid, Path, description = "ID do documento")),
    responses(
        (status = 200, description = "Conteúdo do arquivo"),
        (status = 404, description = "Documento não encontrado ou fora do seu escopo")
    ),
    security(("api_jwt" = []))
)]
pub async fn download_document(
    State(app_state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(document_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let (document, bytes) = app_state
        .document_service
        .download(&actor, document_id)
        .await
        .map_err(|e| e.conceal_access())?;

    let headers = [
        (header::CONTENT_TYPE, document.mime_type.clone()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", document.original_name),
        ),
    ];

    Ok((headers, bytes).into_response())
}
