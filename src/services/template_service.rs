// src/services/template_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::TemplateRepository,
    models::{
        auth::{Actor, Role},
        template::Template,
    },
    services::{
        authorization::{decide, ResourceDescriptor, ResourceKind},
        storage::{cleanup_blob, BlobStore, IncomingFile},
    },
};

// Modelos de documento: visíveis para todo mundo autenticado, mutáveis só
// por contadores (e removíveis pelo Admin).
#[derive(Clone)]
pub struct TemplateService {
    template_repo: TemplateRepository,
    storage: Arc<dyn BlobStore>,
}

impl TemplateService {
    pub fn new(template_repo: TemplateRepository, storage: Arc<dyn BlobStore>) -> Self {
        Self {
            template_repo,
            storage,
        }
    }

    pub async fn upload(
        &self,
        actor: &Actor,
        display_name: &str,
        file: IncomingFile,
    ) -> Result<Template, AppError> {
        let descriptor = ResourceDescriptor::authored_by(ResourceKind::Template, actor.id)
            .restricted_to(Role::Accountant);
        decide(actor, &descriptor, None)?;

        if display_name.trim().is_empty() {
            return Err(AppError::InvalidInput("O nome do modelo é obrigatório.".to_string()));
        }
        if file.bytes.is_empty() {
            return Err(AppError::InvalidInput("O arquivo enviado está vazio.".to_string()));
        }

        let stored_name = self.storage.store(&file.bytes, &file.original_name).await?;

        match self.template_repo.insert(display_name, &stored_name, actor.id).await {
            Ok(template) => Ok(template),
            Err(e) => {
                cleanup_blob(self.storage.as_ref(), &stored_name).await;
                Err(e)
            }
        }
    }

    // Sem escopo por OSC: a lista é a mesma para qualquer papel.
    pub async fn list(&self) -> Result<Vec<Template>, AppError> {
        self.template_repo.list().await
    }

    pub async fn download(&self, template_id: Uuid) -> Result<(Template, Vec<u8>), AppError> {
        let template = self.template_repo
            .find_by_id(template_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let bytes = self.storage.read(&template.stored_name).await?;
        Ok((template, bytes))
    }

    pub async fn delete(&self, actor: &Actor, template_id: Uuid) -> Result<(), AppError> {
        let template = self.template_repo
            .find_by_id(template_id)
            .await?
            .ok_or(AppError::NotFound)?;

        // Autoria manda: contador só apaga o que publicou; Admin apaga tudo.
        let descriptor =
            ResourceDescriptor::authored_by(ResourceKind::Template, template.uploaded_by);
        decide(actor, &descriptor, None)?;

        self.template_repo.delete(template_id).await?;
        cleanup_blob(self.storage.as_ref(), &template.stored_name).await;
        Ok(())
    }
}
