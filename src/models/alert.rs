// src/models/alert.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "alert_type", rename_all = "lowercase")]
pub enum AlertType {
    Info,
    Warning,
    Urgent,
}

// `organization_id` nulo = aviso em difusão para todas as OSCs.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: Uuid,
    pub organization_id: Option<Uuid>,
    pub title: String,
    pub message: String,
    pub alert_type: AlertType,
    pub created_by: Uuid,
    pub read_status: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAlertPayload {
    // Nulo para difusão. Qualquer contador pode avisar qualquer OSC; ao
    // contrário das mensagens, aqui não há checagem de atribuição.
    pub organization_id: Option<Uuid>,

    #[validate(length(min = 1, message = "O título é obrigatório."))]
    #[schema(example = "Prazo da prestação de contas")]
    pub title: String,

    #[validate(length(min = 1, message = "A mensagem é obrigatória."))]
    pub message: String,

    pub alert_type: Option<AlertType>,
}
