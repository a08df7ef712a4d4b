// src/models/organization.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::auth::UserStatus;

// A linha crua da tabela `organizations`. O id é o MESMO da linha de login
// em `users`; o par nasce e morre junto.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: Uuid,
    pub cnpj: String,
    pub registered_name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub assigned_accountant_id: Option<Uuid>,
    #[serde(skip_serializing)]
    pub logo_stored_name: Option<String>,
    #[serde(skip_serializing)]
    pub bylaws_stored_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Visão combinada User + Organization devolvida pela API.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub status: UserStatus,
    pub cnpj: String,
    pub registered_name: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub assigned_accountant_id: Option<Uuid>,
    pub accountant_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Dados para criar uma OSC (login + perfil em uma transação).
// Nos envios multipart estes campos chegam como partes de texto.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrganizationPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    #[schema(example = "Instituto Esperança")]
    pub name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,

    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub password: String,

    #[validate(length(equal = 14, message = "O CNPJ deve ter exatamente 14 dígitos."))]
    #[schema(example = "12345678000199")]
    pub cnpj: String,

    #[validate(length(min = 2, message = "A razão social é obrigatória."))]
    pub registered_name: String,

    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,

    // Ignorado quando o criador é um contador (a OSC nasce atribuída a ele).
    pub assigned_accountant_id: Option<Uuid>,
}

// Atualização parcial. Note o que NÃO está aqui: `cnpj` (imutável após a
// criação) e `assigned_accountant_id` (só muda pela rota de reatribuição).
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateOrganizationPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    pub name: Option<String>,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub status: Option<UserStatus>,

    #[validate(length(min = 2, message = "A razão social não pode ficar vazia."))]
    pub registered_name: Option<String>,

    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReassignPayload {
    // `null` desfaz a atribuição atual.
    pub accountant_id: Option<Uuid>,
}

// Qual dos arquivos fixos do perfil da OSC está sendo pedido.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProfileFileKind {
    Logo,
    Bylaws,
}
