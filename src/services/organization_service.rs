// src/services/organization_service.rs

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AssignmentDirectory, DocumentRepository, OrganizationRepository, UserRepository},
    models::{
        auth::{Actor, Role, UserStatus},
        organization::{
            CreateOrganizationPayload, OrganizationProfile, ProfileFileKind,
            UpdateOrganizationPayload,
        },
    },
    services::{
        auth::hash_password,
        authorization::{AuthorizationEngine, ResourceDescriptor, ResourceKind},
        storage::{cleanup_blob, BlobStore, IncomingFile},
    },
};

// O ciclo de vida pareado User + Organization. Toda mutação aqui dentro é
// uma transação única: ou as duas tabelas mudam, ou nenhuma.
#[derive(Clone)]
pub struct OrganizationService {
    user_repo: UserRepository,
    organization_repo: OrganizationRepository,
    document_repo: DocumentRepository,
    assignments: AssignmentDirectory,
    engine: AuthorizationEngine,
    storage: Arc<dyn BlobStore>,
    pool: PgPool,
}

/// Política de campos da atualização parcial: a própria OSC nunca altera o
/// `status` da conta. CNPJ e atribuição nem aparecem no payload — o primeiro
/// é imutável, o segundo tem rota própria (Admin).
pub fn ensure_patch_allowed(
    role: Role,
    patch: &UpdateOrganizationPayload,
) -> Result<(), AppError> {
    if role == Role::Organization && patch.status.is_some() {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

impl OrganizationService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_repo: UserRepository,
        organization_repo: OrganizationRepository,
        document_repo: DocumentRepository,
        assignments: AssignmentDirectory,
        engine: AuthorizationEngine,
        storage: Arc<dyn BlobStore>,
        pool: PgPool,
    ) -> Self {
        Self {
            user_repo,
            organization_repo,
            document_repo,
            assignments,
            engine,
            storage,
            pool,
        }
    }

    /// Cria o par login + perfil da OSC.
    ///
    /// Arquivos (logo, estatuto) vão para o disco ANTES da transação abrir;
    /// se qualquer passo seguinte falhar, eles são removidos na compensação.
    /// Assim uma falha de banco nunca deixa linha apontando para arquivo
    /// inexistente, nem arquivo órfão sem linha.
    pub async fn create(
        &self,
        actor: &Actor,
        payload: &CreateOrganizationPayload,
        logo: Option<IncomingFile>,
        bylaws: Option<IncomingFile>,
    ) -> Result<OrganizationProfile, AppError> {
        if !matches!(actor.role, Role::Admin | Role::Accountant) {
            return Err(AppError::Forbidden);
        }

        if !payload.cnpj.chars().all(|c| c.is_ascii_digit()) {
            return Err(AppError::InvalidInput(
                "O CNPJ deve conter apenas dígitos.".to_string(),
            ));
        }

        // OSC criada por um contador já nasce atribuída a ele.
        let assigned_accountant_id = match actor.role {
            Role::Accountant => Some(actor.id),
            _ => payload.assigned_accountant_id,
        };

        let password_hash = hash_password(&payload.password).await?;

        let mut stored_blobs: Vec<String> = Vec::new();
        let outcome = self
            .create_inner(
                payload,
                assigned_accountant_id,
                &password_hash,
                logo.as_ref(),
                bylaws.as_ref(),
                &mut stored_blobs,
            )
            .await;

        match outcome {
            Ok(profile) => Ok(profile),
            Err(e) => {
                for stored_name in &stored_blobs {
                    cleanup_blob(self.storage.as_ref(), stored_name).await;
                }
                Err(e)
            }
        }
    }

    async fn create_inner(
        &self,
        payload: &CreateOrganizationPayload,
        assigned_accountant_id: Option<Uuid>,
        password_hash: &str,
        logo: Option<&IncomingFile>,
        bylaws: Option<&IncomingFile>,
        stored_blobs: &mut Vec<String>,
    ) -> Result<OrganizationProfile, AppError> {
        let logo_name = match logo {
            Some(file) => {
                let name = self.storage.store(&file.bytes, &file.original_name).await?;
                stored_blobs.push(name.clone());
                Some(name)
            }
            None => None,
        };
        let bylaws_name = match bylaws {
            Some(file) => {
                let name = self.storage.store(&file.bytes, &file.original_name).await?;
                stored_blobs.push(name.clone());
                Some(name)
            }
            None => None,
        };

        let mut tx = self.pool.begin().await?;

        // Valida o contador indicado no mesmo snapshot que vai gravar.
        if let Some(accountant_id) = assigned_accountant_id {
            let target = self.user_repo.find_by_id(&mut *tx, accountant_id).await?;
            let is_accountant = matches!(
                &target,
                Some(u) if u.role == Role::Accountant && u.status == UserStatus::Active
            );
            if !is_accountant {
                return Err(AppError::InvalidAssignee);
            }
        }

        let user = self.user_repo
            .create_user(
                &mut *tx,
                &payload.name,
                &payload.email,
                password_hash,
                Role::Organization,
            )
            .await?;

        self.organization_repo
            .insert(
                &mut *tx,
                user.id,
                &payload.cnpj,
                &payload.registered_name,
                payload.contact_email.as_deref(),
                payload.contact_phone.as_deref(),
                payload.address.as_deref(),
                assigned_accountant_id,
                logo_name.as_deref(),
                bylaws_name.as_deref(),
            )
            .await?;

        tx.commit().await?;

        tracing::info!("🏢 OSC {} criada (CNPJ {})", user.email, payload.cnpj);

        self.organization_repo
            .profile_by_id(user.id)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn get(&self, actor: &Actor, org_id: Uuid) -> Result<OrganizationProfile, AppError> {
        self.engine
            .authorize(
                &self.pool,
                actor,
                &ResourceDescriptor::owned_by(ResourceKind::OrganizationProfile, org_id),
            )
            .await?;

        self.organization_repo
            .profile_by_id(org_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn list(&self, actor: &Actor) -> Result<Vec<OrganizationProfile>, AppError> {
        match actor.role {
            Role::Admin => self.organization_repo.list_all().await,
            Role::Accountant => self.organization_repo.list_for_accountant(actor.id).await,
            Role::Organization => Err(AppError::Forbidden),
        }
    }

    /// Atualização parcial. As duas tabelas do par mudam na mesma transação;
    /// se o alvo não é uma OSC (zero linhas em `organizations`), nada é
    /// aplicado em lugar nenhum.
    pub async fn update(
        &self,
        actor: &Actor,
        org_id: Uuid,
        patch: &UpdateOrganizationPayload,
    ) -> Result<OrganizationProfile, AppError> {
        ensure_patch_allowed(actor.role, patch)?;

        let mut tx = self.pool.begin().await?;

        self.engine
            .authorize(
                &mut *tx,
                actor,
                &ResourceDescriptor::owned_by(ResourceKind::OrganizationProfile, org_id),
            )
            .await?;

        let user_rows = self.user_repo
            .update_fields(
                &mut *tx,
                org_id,
                patch.name.as_deref(),
                patch.email.as_deref(),
                patch.status,
            )
            .await?;

        let org_rows = self.organization_repo
            .update_fields(
                &mut *tx,
                org_id,
                patch.registered_name.as_deref(),
                patch.contact_email.as_deref(),
                patch.contact_phone.as_deref(),
                patch.address.as_deref(),
            )
            .await?;

        if user_rows == 0 || org_rows == 0 {
            return Err(AppError::NotFound);
        }

        tx.commit().await?;

        self.organization_repo
            .profile_by_id(org_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    /// Admin-only. O DELETE na linha de `users` arrasta perfil, documentos,
    /// mensagens e avisos por cascata (contrato declarado na migration);
    /// os arquivos físicos são removidos depois do commit, sem desfazer nada
    /// se a limpeza falhar.
    pub async fn delete(&self, actor: &Actor, org_id: Uuid) -> Result<(), AppError> {
        if actor.role != Role::Admin {
            return Err(AppError::Forbidden);
        }

        let mut tx = self.pool.begin().await?;

        let organization = self.organization_repo
            .find_by_id(&mut *tx, org_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut blobs = self.document_repo
            .stored_names_for_organization(&mut *tx, org_id)
            .await?;
        if let Some(name) = organization.logo_stored_name {
            blobs.push(name);
        }
        if let Some(name) = organization.bylaws_stored_name {
            blobs.push(name);
        }

        self.user_repo.delete(&mut *tx, org_id).await?;

        tx.commit().await?;

        for stored_name in &blobs {
            cleanup_blob(self.storage.as_ref(), stored_name).await;
        }

        tracing::info!("🗑️ OSC {} excluída pelo admin {}", org_id, actor.id);
        Ok(())
    }

    // Ponto único de mudança da atribuição OSC -> Contador.
    pub async fn reassign(
        &self,
        actor: &Actor,
        org_id: Uuid,
        new_accountant_id: Option<Uuid>,
    ) -> Result<OrganizationProfile, AppError> {
        if actor.role != Role::Admin {
            return Err(AppError::Forbidden);
        }

        let mut tx = self.pool.begin().await?;
        self.assignments
            .reassign(&mut tx, org_id, new_accountant_id)
            .await?;
        tx.commit().await?;

        tracing::info!(
            "🔗 OSC {} reatribuída para {:?} pelo admin {}",
            org_id,
            new_accountant_id,
            actor.id
        );

        self.organization_repo
            .profile_by_id(org_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    // Logo ou estatuto do perfil. O nome físico nunca sai da API; o que sai
    // é o conteúdo.
    pub async fn profile_file(
        &self,
        actor: &Actor,
        org_id: Uuid,
        kind: ProfileFileKind,
    ) -> Result<(String, Vec<u8>), AppError> {
        self.engine
            .authorize(
                &self.pool,
                actor,
                &ResourceDescriptor::owned_by(ResourceKind::OrganizationProfile, org_id),
            )
            .await?;

        let organization = self.organization_repo
            .find_by_id(&self.pool, org_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let stored_name = match kind {
            ProfileFileKind::Logo => organization.logo_stored_name,
            ProfileFileKind::Bylaws => organization.bylaws_stored_name,
        }
        .ok_or(AppError::NotFound)?;

        let bytes = self.storage.read(&stored_name).await?;
        Ok((stored_name, bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn organization_cannot_touch_status() {
        let patch = UpdateOrganizationPayload {
            status: Some(UserStatus::Inactive),
            ..Default::default()
        };
        assert!(matches!(
            ensure_patch_allowed(Role::Organization, &patch),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn organization_may_change_operational_fields() {
        let patch = UpdateOrganizationPayload {
            contact_phone: Some("11 99999-0000".to_string()),
            address: Some("Rua Nova, 10".to_string()),
            ..Default::default()
        };
        assert!(ensure_patch_allowed(Role::Organization, &patch).is_ok());
    }

    #[test]
    fn staff_may_change_status() {
        let patch = UpdateOrganizationPayload {
            status: Some(UserStatus::Inactive),
            ..Default::default()
        };
        assert!(ensure_patch_allowed(Role::Admin, &patch).is_ok());
        assert!(ensure_patch_allowed(Role::Accountant, &patch).is_ok());
    }
}
