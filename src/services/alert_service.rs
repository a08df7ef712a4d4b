// src/services/alert_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AlertRepository, AssignmentDirectory},
    models::{
        alert::{Alert, AlertType, CreateAlertPayload},
        auth::{Actor, Role},
    },
    services::authorization::{decide, ResourceDescriptor, ResourceKind},
};

#[derive(Clone)]
pub struct AlertService {
    alert_repo: AlertRepository,
    assignments: AssignmentDirectory,
    pool: PgPool,
}

impl AlertService {
    pub fn new(alert_repo: AlertRepository, assignments: AssignmentDirectory, pool: PgPool) -> Self {
        Self {
            alert_repo,
            assignments,
            pool,
        }
    }

    /// Criação restrita a contadores; `organization_id` nulo é difusão.
    ///
    /// Atenção: ao contrário das mensagens, aqui NÃO há checagem de
    /// atribuição — qualquer contador pode avisar qualquer OSC. Só a
    /// existência da OSC de destino é verificada.
    pub async fn create(&self, actor: &Actor, payload: &CreateAlertPayload) -> Result<Alert, AppError> {
        // Operação de papel fixo: nega inclusive o Admin.
        let descriptor = ResourceDescriptor::authored_by(ResourceKind::Alert, actor.id)
            .restricted_to(Role::Accountant);
        decide(actor, &descriptor, None)?;

        if let Some(organization_id) = payload.organization_id {
            // Só existência; devolve NotFound se a OSC não está cadastrada.
            let _ = self.assignments.accountant_of(&self.pool, organization_id).await?;
        }

        let alert_type = payload.alert_type.unwrap_or(AlertType::Info);
        let alert = self.alert_repo
            .insert(
                payload.organization_id,
                &payload.title,
                &payload.message,
                alert_type,
                actor.id,
            )
            .await?;

        Ok(alert)
    }

    pub async fn list(&self, actor: &Actor) -> Result<Vec<Alert>, AppError> {
        match actor.role {
            Role::Organization => self.alert_repo.list_for_organization(actor.id).await,
            Role::Accountant => self.alert_repo.list_created_by(actor.id).await,
            Role::Admin => self.alert_repo.list_all().await,
        }
    }

    /// Transição única false -> true, só pela OSC dona do aviso.
    ///
    /// Aviso inexistente, de outra OSC, em difusão ou JÁ LIDO: tudo termina
    /// em `NotFound`, sem sinal separado de "já estava lido" — e o flag nunca
    /// volta para false.
    pub async fn mark_as_read(&self, actor: &Actor, alert_id: Uuid) -> Result<(), AppError> {
        let descriptor = ResourceDescriptor::owned_by(ResourceKind::Alert, actor.id)
            .restricted_to(Role::Organization);
        decide(actor, &descriptor, None)?;

        let rows = self.alert_repo.mark_read(alert_id, actor.id).await?;
        if rows == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
