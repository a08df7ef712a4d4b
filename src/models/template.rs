// src/models/template.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

// Só para a documentação da API: o formato do multipart de publicação.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct TemplateUploadForm {
    pub display_name: String,
    #[schema(value_type = String, format = Binary)]
    pub file: String,
}

// Modelo de documento publicado por um contador. Sem escopo por OSC:
// qualquer usuário autenticado enxerga a lista inteira.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: Uuid,
    pub display_name: String,
    #[serde(skip_serializing)]
    pub stored_name: String,
    pub uploaded_by: Uuid,
    pub created_at: DateTime<Utc>,
}
