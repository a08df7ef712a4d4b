// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers;
use crate::models;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_jwt",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,

        // --- Usuários ---
        handlers::users::get_me,
        handlers::users::create_accountant,
        handlers::users::list_accountants,
        handlers::users::set_user_status,
        handlers::users::delete_user,

        // --- OSCs ---
        handlers::organizations::create_organization,
        handlers::organizations::list_organizations,
        handlers::organizations::get_organization,
        handlers::organizations::update_organization,
        handlers::organizations::delete_organization,
        handlers::organizations::reassign_accountant,
        handlers::organizations::download_profile_file,

        // --- Documentos ---
        handlers::documents::upload_document,
        handlers::documents::list_documents,
        handlers::documents::download_document,

        // --- Mensagens ---
        handlers::messages::send_message,
        handlers::messages::my_conversation,
        handlers::messages::conversation_history,

        // --- Avisos ---
        handlers::alerts::create_alert,
        handlers::alerts::list_alerts,
        handlers::alerts::mark_alert_read,

        // --- Modelos ---
        handlers::templates::upload_template,
        handlers::templates::list_templates,
        handlers::templates::download_template,
        handlers::templates::delete_template,
    ),
    components(
        schemas(
            models::auth::User,
            models::auth::Role,
            models::auth::UserStatus,
            models::auth::LoginPayload,
            models::auth::AuthResponse,
            models::auth::CreateAccountantPayload,
            models::auth::SetStatusPayload,
            models::organization::Organization,
            models::organization::OrganizationProfile,
            models::organization::CreateOrganizationPayload,
            models::organization::UpdateOrganizationPayload,
            models::organization::ReassignPayload,
            models::document::Document,
            models::document::DocumentUploadForm,
            models::document::DocumentView,
            models::document::Direction,
            models::message::Message,
            models::message::SendMessagePayload,
            models::alert::Alert,
            models::alert::AlertType,
            models::alert::CreateAlertPayload,
            models::template::Template,
            models::template::TemplateUploadForm,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login e emissão de token"),
        (name = "Usuários", description = "Contas de acesso (admin e contadores)"),
        (name = "OSCs", description = "Cadastro e atribuição das organizações"),
        (name = "Documentos", description = "Arquivos trocados entre OSC e contador"),
        (name = "Mensagens", description = "Conversa direta OSC <-> contador"),
        (name = "Avisos", description = "Avisos de contadores para OSCs"),
        (name = "Modelos", description = "Modelos de documento publicados")
    )
)]
pub struct ApiDoc;
