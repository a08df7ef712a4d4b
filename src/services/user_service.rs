// src/services/user_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AssignmentDirectory, UserRepository},
    models::auth::{Actor, Role, User, UserStatus},
    services::auth::hash_password,
};

#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    assignments: AssignmentDirectory,
    pool: PgPool,
}

impl UserService {
    pub fn new(user_repo: UserRepository, assignments: AssignmentDirectory, pool: PgPool) -> Self {
        Self {
            user_repo,
            assignments,
            pool,
        }
    }

    pub async fn me(&self, actor: &Actor) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(&self.pool, actor.id)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn create_accountant(
        &self,
        actor: &Actor,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        if actor.role != Role::Admin {
            return Err(AppError::Forbidden);
        }

        let password_hash = hash_password(password).await?;
        let user = self.user_repo
            .create_user(&self.pool, name, email, &password_hash, Role::Accountant)
            .await?;

        tracing::info!("Contador {} cadastrado pelo admin {}", user.email, actor.id);
        Ok(user)
    }

    pub async fn list_accountants(&self, actor: &Actor) -> Result<Vec<User>, AppError> {
        if actor.role != Role::Admin {
            return Err(AppError::Forbidden);
        }
        self.user_repo.list_by_role(Role::Accountant).await
    }

    pub async fn set_status(
        &self,
        actor: &Actor,
        user_id: Uuid,
        status: UserStatus,
    ) -> Result<(), AppError> {
        if actor.role != Role::Admin {
            return Err(AppError::Forbidden);
        }

        let rows = self.user_repo.set_status(&self.pool, user_id, status).await?;
        if rows == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    // Exclusão de contas avulsas (contadores e outros admins). A exclusão de
    // uma OSC passa pelo serviço de OSCs, que também limpa os arquivos dela.
    pub async fn delete_user(&self, actor: &Actor, user_id: Uuid) -> Result<(), AppError> {
        if actor.role != Role::Admin {
            return Err(AppError::Forbidden);
        }

        // Regra de identidade, não de recurso: nem o Admin apaga a si mesmo.
        if actor.id == user_id {
            return Err(AppError::Forbidden);
        }

        let target = self.user_repo
            .find_by_id(&self.pool, user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if target.role == Role::Organization {
            return Err(AppError::InvalidInput(
                "Para excluir uma OSC utilize a rota de OSCs.".to_string(),
            ));
        }

        // O schema desfaz as atribuições do contador excluído (SET NULL);
        // as OSCs dele ficam sem contador até uma nova atribuição.
        if target.role == Role::Accountant {
            let impacted = self.assignments.organizations_of(user_id).await?;
            if !impacted.is_empty() {
                tracing::warn!(
                    "Contador {} excluído; {} OSC(s) ficam sem contador atribuído",
                    user_id,
                    impacted.len()
                );
            }
        }

        self.user_repo.delete(&self.pool, user_id).await?;
        tracing::info!("Usuário {} excluído pelo admin {}", user_id, actor.id);
        Ok(())
    }

    // Garante um admin inicial quando o banco está vazio. Roda uma vez na
    // subida do processo, guiado por variáveis de ambiente.
    pub async fn bootstrap_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AppError> {
        if self.user_repo.admin_exists().await? {
            return Ok(());
        }

        let password_hash = hash_password(password).await?;
        self.user_repo
            .create_user(&self.pool, name, email, &password_hash, Role::Admin)
            .await?;

        tracing::info!("👤 Admin inicial criado: {}", email);
        Ok(())
    }
}
