// src/models/message.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::auth::Role;

// Uma mensagem dentro da conversa (organization_id, accountant_id).
// O id sequencial desempata mensagens criadas no mesmo instante.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub organization_id: Uuid,
    pub accountant_id: Uuid,
    pub sender_id: Uuid,
    pub sender_role: Role,
    pub body: String,
    pub read_status: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendMessagePayload {
    // Obrigatório quando o remetente é contador; ignorado quando é OSC
    // (a conversa dela é sempre com o contador atribuído no momento).
    pub organization_id: Option<Uuid>,

    #[validate(length(min = 1, message = "A mensagem não pode ser vazia."))]
    pub body: String,
}
