// src/services/document_service.rs

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AssignmentDirectory, DocumentRepository},
    models::{
        auth::{Actor, Role},
        document::{Document, DocumentView},
    },
    services::{
        authorization::{AuthorizationEngine, ResourceDescriptor, ResourceKind},
        storage::{cleanup_blob, BlobStore, IncomingFile},
    },
};

#[derive(Clone)]
pub struct DocumentService {
    document_repo: DocumentRepository,
    assignments: AssignmentDirectory,
    engine: AuthorizationEngine,
    storage: Arc<dyn BlobStore>,
    pool: PgPool,
}

impl DocumentService {
    pub fn new(
        document_repo: DocumentRepository,
        assignments: AssignmentDirectory,
        engine: AuthorizationEngine,
        storage: Arc<dyn BlobStore>,
        pool: PgPool,
    ) -> Self {
        Self {
            document_repo,
            assignments,
            engine,
            storage,
            pool,
        }
    }

    /// Sobe um documento para a pasta de uma OSC.
    ///
    /// OSC envia para a própria pasta (`target_organization_id` ignorado);
    /// contador envia para uma OSC que esteja atribuída a ele AGORA. O
    /// arquivo vai ao disco antes da transação; qualquer falha depois disso
    /// remove o arquivo para não deixar órfão.
    pub async fn upload(
        &self,
        actor: &Actor,
        target_organization_id: Option<Uuid>,
        file: IncomingFile,
    ) -> Result<Document, AppError> {
        if file.bytes.is_empty() {
            return Err(AppError::InvalidInput("O arquivo enviado está vazio.".to_string()));
        }

        let stored_name = self.storage.store(&file.bytes, &file.original_name).await?;

        let outcome = self
            .upload_inner(actor, target_organization_id, &file, &stored_name)
            .await;

        match outcome {
            Ok(document) => Ok(document),
            Err(e) => {
                cleanup_blob(self.storage.as_ref(), &stored_name).await;
                Err(e)
            }
        }
    }

    async fn upload_inner(
        &self,
        actor: &Actor,
        target_organization_id: Option<Uuid>,
        file: &IncomingFile,
        stored_name: &str,
    ) -> Result<Document, AppError> {
        let mut tx = self.pool.begin().await?;

        // A checagem e o INSERT que ela protege enxergam o mesmo snapshot.
        let organization_id = match actor.role {
            Role::Organization => {
                let assignee = self.assignments.accountant_of(&mut *tx, actor.id).await?;
                if assignee.is_none() {
                    return Err(AppError::NoAssignedAccountant);
                }
                actor.id
            }
            Role::Accountant => {
                let organization_id = target_organization_id.ok_or_else(|| {
                    AppError::InvalidInput("Informe a OSC de destino do documento.".to_string())
                })?;
                let assigned = self.assignments
                    .is_assigned(&mut *tx, organization_id, actor.id)
                    .await?;
                if !assigned {
                    return Err(AppError::Forbidden);
                }
                organization_id
            }
            Role::Admin => return Err(AppError::Forbidden),
        };

        let document = self.document_repo
            .insert(
                &mut *tx,
                organization_id,
                actor.id,
                &file.original_name,
                stored_name,
                file.bytes.len() as i64,
                &file.mime_type,
            )
            .await?;

        tx.commit().await?;
        Ok(document)
    }

    /// O documento "pertence" ao contador atribuído à OSC dona NO MOMENTO do
    /// download, mesmo que a atribuição tenha mudado depois do upload.
    pub async fn download(
        &self,
        actor: &Actor,
        document_id: Uuid,
    ) -> Result<(Document, Vec<u8>), AppError> {
        let document = self.document_repo
            .find_by_id(document_id)
            .await?
            .ok_or(AppError::NotFound)?;

        self.engine
            .authorize(
                &self.pool,
                actor,
                &ResourceDescriptor::owned_by(ResourceKind::Document, document.organization_id),
            )
            .await?;

        let bytes = self.storage.read(&document.stored_name).await?;
        Ok((document, bytes))
    }

    pub async fn list(&self, actor: &Actor) -> Result<Vec<DocumentView>, AppError> {
        let rows = match actor.role {
            Role::Organization => {
                self.document_repo.list_for_organization(actor.id).await?
            }
            Role::Accountant => self.document_repo.list_for_accountant(actor.id).await?,
            Role::Admin => self.document_repo.list_all().await?,
        };

        Ok(rows
            .into_iter()
            .map(|row| DocumentView::from_row(row, actor.role))
            .collect())
    }
}
