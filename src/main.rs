//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Sem auto-cadastro, alguém precisa existir para cadastrar os demais:
    // garante o admin inicial a partir do ambiente.
    if let (Ok(email), Ok(password)) = (
        std::env::var("ADMIN_EMAIL"),
        std::env::var("ADMIN_PASSWORD"),
    ) {
        app_state
            .user_service
            .bootstrap_admin("Administrador", &email, &password)
            .await
            .expect("Falha ao criar o admin inicial.");
    }

    // Rotas públicas (só o login)
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    // Todas as demais rotas exigem a asserção de identidade do middleware.
    let user_routes = Router::new()
        .route("/me", get(handlers::users::get_me))
        .route(
            "/accountants",
            post(handlers::users::create_accountant).get(handlers::users::list_accountants),
        )
        .route("/{id}/status", patch(handlers::users::set_user_status))
        .route("/{id}", delete(handlers::users::delete_user));

    let organization_routes = Router::new()
        .route(
            "/",
            post(handlers::organizations::create_organization)
                .get(handlers::organizations::list_organizations),
        )
        .route(
            "/{id}",
            get(handlers::organizations::get_organization)
                .patch(handlers::organizations::update_organization)
                .delete(handlers::organizations::delete_organization),
        )
        .route(
            "/{id}/accountant",
            put(handlers::organizations::reassign_accountant),
        )
        .route(
            "/{id}/files/{kind}",
            get(handlers::organizations::download_profile_file),
        );

    let document_routes = Router::new()
        .route(
            "/",
            post(handlers::documents::upload_document).get(handlers::documents::list_documents),
        )
        .route("/{id}/download", get(handlers::documents::download_document));

    let message_routes = Router::new()
        .route(
            "/",
            post(handlers::messages::send_message).get(handlers::messages::my_conversation),
        )
        .route(
            "/{organization_id}",
            get(handlers::messages::conversation_history),
        );

    let alert_routes = Router::new()
        .route(
            "/",
            post(handlers::alerts::create_alert).get(handlers::alerts::list_alerts),
        )
        .route("/{id}/read", patch(handlers::alerts::mark_alert_read));

    let template_routes = Router::new()
        .route(
            "/",
            post(handlers::templates::upload_template).get(handlers::templates::list_templates),
        )
        .route(
            "/{id}/download",
            get(handlers::templates::download_template),
        )
        .route("/{id}", delete(handlers::templates::delete_template));

    let protected = Router::new()
        .nest("/api/users", user_routes)
        .nest("/api/organizations", organization_routes)
        .nest("/api/documents", document_routes)
        .nest("/api/messages", message_routes)
        .nest("/api/alerts", alert_routes)
        .nest("/api/templates", template_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .merge(protected)
        .merge(
            SwaggerUi::new("/api/docs")
                .url("/api/docs/openapi.json", docs::ApiDoc::openapi()),
        )
        .with_state(app_state.clone());

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Encerrando...");
        })
        .await
        .expect("Erro no servidor Axum");

    // Fecha o handle de persistência de forma explícita no desligamento.
    app_state.db_pool.close().await;
}
