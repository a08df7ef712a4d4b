use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
//
// As variantes de negócio (NotFound, Forbidden, conflitos, etc.) são o
// contrato dos serviços; o mapeamento para status HTTP acontece só aqui.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Dado de entrada inválido: {0}")]
    InvalidInput(String),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("CNPJ já cadastrado")]
    CnpjAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário inativo")]
    InactiveUser,

    #[error("Recurso não encontrado")]
    NotFound,

    #[error("Acesso negado")]
    Forbidden,

    // NotFound/Forbidden já colapsados para a borda HTTP (documentos e
    // mensagens não revelam qual dos dois ocorreu).
    #[error("Recurso não encontrado ou acesso negado")]
    AccessDenied,

    #[error("A OSC não possui contador atribuído")]
    NoAssignedAccountant,

    #[error("O destino da atribuição não é um contador válido")]
    InvalidAssignee,

    #[error("Arquivo referenciado no banco não existe no armazenamento: {0}")]
    StorageInconsistency(String),

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado.
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// Colapsa o par NotFound/Forbidden em uma única resposta externa.
    ///
    /// Os serviços de documentos e mensagens devolvem o motivo real (os
    /// testes dependem disso); o handler chama este método antes de responder
    /// para que um id chutado e um id alheio sejam indistinguíveis de fora.
    pub fn conceal_access(self) -> AppError {
        match self {
            AppError::NotFound | AppError::Forbidden => AppError::AccessDenied,
            other => other,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidInput(ref msg) => {
                let body = Json(json!({ "error": msg }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Este e-mail já está em uso."),
            AppError::CnpjAlreadyExists => (StatusCode::CONFLICT, "Este CNPJ já está cadastrado."),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos."),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Token de autenticação inválido ou ausente."),
            AppError::InactiveUser => (StatusCode::FORBIDDEN, "Este usuário está inativo."),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Recurso não encontrado."),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Você não tem permissão para esta ação."),
            AppError::AccessDenied => (StatusCode::NOT_FOUND, "Recurso não encontrado ou acesso negado."),
            AppError::NoAssignedAccountant => {
                (StatusCode::UNPROCESSABLE_ENTITY, "A OSC ainda não possui um contador atribuído.")
            }
            AppError::InvalidAssignee => {
                (StatusCode::UNPROCESSABLE_ENTITY, "O usuário indicado não é um contador válido.")
            }
            AppError::StorageInconsistency(ref stored_name) => {
                tracing::error!("Arquivo ausente no armazenamento: {}", stored_name);
                (StatusCode::INTERNAL_SERVER_ERROR, "Falha ao recuperar o arquivo.")
            }

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conceal_access_merges_not_found_and_forbidden() {
        assert!(matches!(AppError::NotFound.conceal_access(), AppError::AccessDenied));
        assert!(matches!(AppError::Forbidden.conceal_access(), AppError::AccessDenied));
    }

    #[test]
    fn conceal_access_keeps_other_variants() {
        assert!(matches!(
            AppError::NoAssignedAccountant.conceal_access(),
            AppError::NoAssignedAccountant
        ));
        assert!(matches!(
            AppError::EmailAlreadyExists.conceal_access(),
            AppError::EmailAlreadyExists
        ));
    }

    #[test]
    fn access_denied_renders_as_not_found_status() {
        let resp = AppError::AccessDenied.into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        // Internamente a distinção continua disponível.
        let resp = AppError::Forbidden.into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
