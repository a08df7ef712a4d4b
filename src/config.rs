// src/config.rs

use std::{env, sync::Arc, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        AlertRepository, AssignmentDirectory, DocumentRepository, MessageRepository,
        OrganizationRepository, TemplateRepository, UserRepository,
    },
    services::{
        alert_service::AlertService,
        auth::AuthService,
        authorization::AuthorizationEngine,
        document_service::DocumentService,
        message_service::MessageService,
        organization_service::OrganizationService,
        storage::{BlobStore, FsBlobStore},
        template_service::TemplateService,
        user_service::UserService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub organization_service: OrganizationService,
    pub document_service: DocumentService,
    pub message_service: MessageService,
    pub alert_service: AlertService,
    pub template_service: TemplateService,
}

impl AppState {
    // Abre a conexão com o banco e monta o grafo de dependências. O pool
    // criado aqui é o único handle de persistência da aplicação; ele é
    // fechado explicitamente no desligamento, lá no main.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");
        let storage_dir = env::var("STORAGE_DIR").unwrap_or_else(|_| "./uploads".to_string());

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        let storage: Arc<dyn BlobStore> = Arc::new(FsBlobStore::new(&storage_dir).await?);

        // --- Monta o grafo de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let organization_repo = OrganizationRepository::new(db_pool.clone());
        let document_repo = DocumentRepository::new(db_pool.clone());
        let message_repo = MessageRepository::new(db_pool.clone());
        let alert_repo = AlertRepository::new(db_pool.clone());
        let template_repo = TemplateRepository::new(db_pool.clone());

        let assignments = AssignmentDirectory::new(db_pool.clone());
        let engine = AuthorizationEngine::new(assignments.clone());

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret);
        let user_service =
            UserService::new(user_repo.clone(), assignments.clone(), db_pool.clone());
        let organization_service = OrganizationService::new(
            user_repo,
            organization_repo,
            document_repo.clone(),
            assignments.clone(),
            engine.clone(),
            storage.clone(),
            db_pool.clone(),
        );
        let document_service = DocumentService::new(
            document_repo,
            assignments.clone(),
            engine,
            storage.clone(),
            db_pool.clone(),
        );
        let message_service =
            MessageService::new(message_repo, assignments.clone(), db_pool.clone());
        let alert_service = AlertService::new(alert_repo, assignments, db_pool.clone());
        let template_service = TemplateService::new(template_repo, storage);

        Ok(Self {
            db_pool,
            auth_service,
            user_service,
            organization_service,
            document_service,
            message_service,
            alert_service,
            template_service,
        })
    }
}
