// src/models/document.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::auth::Role;

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub uploaded_by: Uuid,
    pub original_name: String,
    #[serde(skip_serializing)]
    pub stored_name: String,
    pub size_bytes: i64,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
}

// Linha de listagem com o papel de quem subiu o arquivo (JOIN com `users`),
// para rotular a direção por visualizador.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DocumentRow {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub uploaded_by: Uuid,
    pub uploader_role: Role,
    pub original_name: String,
    pub size_bytes: i64,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Sent,
    Received,
}

/// Rotula um documento do ponto de vista de quem está listando.
///
/// "Enviado" significa que o arquivo partiu do mesmo lado da conversa que o
/// visualizador; o Admin enxerga pela perspectiva da OSC.
pub fn direction_for(viewer: Role, uploader: Role) -> Direction {
    let sender_side = match viewer {
        Role::Accountant => Role::Accountant,
        Role::Organization | Role::Admin => Role::Organization,
    };
    if uploader == sender_side {
        Direction::Sent
    } else {
        Direction::Received
    }
}

// Só para a documentação da API: o formato do multipart de upload.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct DocumentUploadForm {
    /// Obrigatório quando o remetente é contador.
    pub organization_id: Option<Uuid>,
    #[schema(value_type = String, format = Binary)]
    pub file: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentView {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub original_name: String,
    pub size_bytes: i64,
    pub mime_type: String,
    pub direction: Direction,
    pub created_at: DateTime<Utc>,
}

impl DocumentView {
    pub fn from_row(row: DocumentRow, viewer: Role) -> Self {
        let direction = direction_for(viewer, row.uploader_role);
        Self {
            id: row.id,
            organization_id: row.organization_id,
            original_name: row.original_name,
            size_bytes: row.size_bytes,
            mime_type: row.mime_type,
            direction,
            created_at: row.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn organization_sees_own_upload_as_sent() {
        assert_eq!(direction_for(Role::Organization, Role::Organization), Direction::Sent);
        assert_eq!(direction_for(Role::Organization, Role::Accountant), Direction::Received);
    }

    #[test]
    fn accountant_sees_osc_upload_as_received() {
        assert_eq!(direction_for(Role::Accountant, Role::Organization), Direction::Received);
        assert_eq!(direction_for(Role::Accountant, Role::Accountant), Direction::Sent);
    }

    #[test]
    fn admin_uses_organization_perspective() {
        assert_eq!(direction_for(Role::Admin, Role::Organization), Direction::Sent);
        assert_eq!(direction_for(Role::Admin, Role::Accountant), Direction::Received);
    }
}
