// src/handlers/organizations.rs

use std::collections::HashMap;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::CurrentActor,
    models::organization::{
        CreateOrganizationPayload, OrganizationProfile, ProfileFileKind, ReassignPayload,
        UpdateOrganizationPayload,
    },
    services::storage::IncomingFile,
};

// Lê as partes do multipart separando campos de texto e arquivos nomeados.
// Usado pela criação de OSC (campos + logo + estatuto).
pub(crate) async fn split_multipart(
    mut multipart: Multipart,
) -> Result<(HashMap<String, String>, HashMap<String, IncomingFile>), AppError> {
    let mut texts = HashMap::new();
    let mut files = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Falha ao ler o formulário: {e}")))?
    {
        let Some(name) = field.name().map(|s| s.to_string()) else {
            continue;
        };

        if field.file_name().is_some() {
            let original_name = field
                .file_name()
                .unwrap_or("arquivo")
                .to_string();
            let mime_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Falha ao ler o arquivo: {e}")))?;
            files.insert(
                name,
                IncomingFile {
                    original_name,
                    mime_type,
                    bytes: bytes.to_vec(),
                },
            );
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Falha ao ler o campo: {e}")))?;
            texts.insert(name, value);
        }
    }

    Ok((texts, files))
}

fn required_text(texts: &mut HashMap<String, String>, key: &str) -> Result<String, AppError> {
    texts
        .remove(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput(format!("O campo '{key}' é obrigatório.")))
}

fn optional_text(texts: &mut HashMap<String, String>, key: &str) -> Option<String> {
    texts.remove(key).filter(|v| !v.trim().is_empty())
}

// POST /api/organizations
// Multipart: campos de texto do cadastro + arquivos opcionais `logo` e `bylaws`.
#[utoipa::path(
    post,
    path = "/api/organizations",
    tag = "OSCs",
    request_body(content = CreateOrganizationPayload, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "OSC criada (login + perfil)", body = OrganizationProfile),
        (status = 409, description = "E-mail ou CNPJ já cadastrado"),
        (status = 422, description = "Contador indicado inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_organization(
    State(app_state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let (mut texts, mut files) = split_multipart(multipart).await?;

    let assigned_accountant_id = match optional_text(&mut texts, "assigned_accountant_id") {
        Some(raw) => Some(Uuid::parse_str(&raw).map_err(|_| {
            AppError::InvalidInput("assigned_accountant_id não é um UUID válido.".to_string())
        })?),
        None => None,
    };

    let payload = CreateOrganizationPayload {
        name: required_text(&mut texts, "name")?,
        email: required_text(&mut texts, "email")?,
        password: required_text(&mut texts, "password")?,
        cnpj: required_text(&mut texts, "cnpj")?,
        registered_name: required_text(&mut texts, "registered_name")?,
        contact_email: optional_text(&mut texts, "contact_email"),
        contact_phone: optional_text(&mut texts, "contact_phone"),
        address: optional_text(&mut texts, "address"),
        assigned_accountant_id,
    };
    payload.validate().map_err(AppError::ValidationError)?;

    let profile = app_state
        .organization_service
        .create(&actor, &payload, files.remove("logo"), files.remove("bylaws"))
        .await?;

    Ok((StatusCode::CREATED, Json(profile)))
}

// GET /api/organizations
#[utoipa::path(
    get,
    path = "/api/organizations",
    tag = "OSCs",
    responses(
        (status = 200, description = "OSCs no escopo do usuário", body = [OrganizationProfile])
    ),
    security(("api_jwt" = []))
)]
pub async fn list_organizations(
    State(app_state): State<AppState>,
    CurrentActor(actor): CurrentActor,
) -> Result<Json<Vec<OrganizationProfile>>, AppError> {
    let profiles = app_state.organization_service.list(&actor).await?;
    Ok(Json(profiles))
}

// GET /api/organizations/{id}
#[utoipa::path(
    get,
    path = "/api/organizations/{id}",
    tag = "OSCs",
    params(("id" = Uuid, Path, description = "ID da OSC")),
    responses(
        (status = 200, description = "Perfil da OSC", body = OrganizationProfile),
        (status = 404, description = "OSC não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_organization(
    State(app_state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(org_id): Path<Uuid>,
) -> Result<Json<OrganizationProfile>, AppError> {
    let profile = app_state.organization_service.get(&actor, org_id).await?;
    Ok(Json(profile))
}

// PATCH /api/organizations/{id}
#[utoipa::path(
    patch,
    path = "/api/organizations/{id}",
    tag = "OSCs",
    request_body = UpdateOrganizationPayload,
    params(("id" = Uuid, Path, description = "ID da OSC")),
    responses(
        (status = 200, description = "Perfil atualizado", body = OrganizationProfile),
        (status = 403, description = "Campo não permitido para este papel")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_organization(
    State(app_state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<UpdateOrganizationPayload>,
) -> Result<Json<OrganizationProfile>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let profile = app_state
        .organization_service
        .update(&actor, org_id, &payload)
        .await?;
    Ok(Json(profile))
}

// DELETE /api/organizations/{id}
#[utoipa::path(
    delete,
    path = "/api/organizations/{id}",
    tag = "OSCs",
    params(("id" = Uuid, Path, description = "ID da OSC")),
    responses(
        (status = 204, description = "OSC excluída (login, perfil e recursos)"),
        (status = 403, description = "Apenas o Admin exclui OSCs")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_organization(
    State(app_state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(org_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.organization_service.delete(&actor, org_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// PUT /api/organizations/{id}/accountant
#[utoipa::path(
    put,
    path = "/api/organizations/{id}/accountant",
    tag = "OSCs",
    request_body = ReassignPayload,
    params(("id" = Uuid, Path, description = "ID da OSC")),
    responses(
        (status = 200, description = "Atribuição atualizada", body = OrganizationProfile),
        (status = 422, description = "Destino não é um contador válido")
    ),
    security(("api_jwt" = []))
)]
pub async fn reassign_accountant(
    State(app_state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(org_id): Path<Uuid>,
    Json(payload): Json<ReassignPayload>,
) -> Result<Json<OrganizationProfile>, AppError> {
    let profile = app_state
        .organization_service
        .reassign(&actor, org_id, payload.accountant_id)
        .await?;
    Ok(Json(profile))
}

// GET /api/organizations/{id}/files/{kind}
#[utoipa::path(
    get,
    path = "/api/organizations/{id}/files/{kind}",
    tag = "OSCs",
    params(
        ("id" = Uuid, Path, description = "ID da OSC"),
        ("kind" = String, Path, description = "logo ou bylaws")
    ),
    responses(
        (status = 200, description = "Conteúdo do arquivo"),
        (status = 404, description = "Arquivo não cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn download_profile_file(
    State(app_state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path((org_id, kind)): Path<(Uuid, ProfileFileKind)>,
) -> Result<Response, AppError> {
    let (stored_name, bytes) = app_state
        .organization_service
        .profile_file(&actor, org_id, kind)
        .await?;

    let headers = [
        (header::CONTENT_TYPE, "application/octet-stream".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{stored_name}\""),
        ),
    ];

    Ok((headers, bytes).into_response())
}
