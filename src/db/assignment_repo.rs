// src/db/assignment_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::common::error::AppError;

/// O diretório de atribuições OSC -> Contador.
///
/// É a única fonte do fato "quem pode enxergar quem". Toda checagem lê a
/// coluna `assigned_accountant_id` ao vivo — não existe cache — e os métodos
/// aceitam o executor do chamador para que a checagem e a escrita que ela
/// protege enxerguem o mesmo snapshot transacional.
#[derive(Clone)]
pub struct AssignmentDirectory {
    pool: PgPool,
}

impl AssignmentDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A OSC está atribuída a este contador neste exato momento?
    pub async fn is_assigned<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        accountant_id: Uuid,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let assigned = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM organizations
                WHERE id = $1 AND assigned_accountant_id = $2
            )
            "#,
        )
        .bind(organization_id)
        .bind(accountant_id)
        .fetch_one(executor)
        .await?;

        Ok(assigned)
    }

    /// Contador atual da OSC. `Ok(None)` = OSC existe mas está sem contador;
    /// OSC inexistente é `NotFound`.
    pub async fn accountant_of<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
    ) -> Result<Option<Uuid>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_scalar::<_, Option<Uuid>>(
            "SELECT assigned_accountant_id FROM organizations WHERE id = $1",
        )
        .bind(organization_id)
        .fetch_optional(executor)
        .await?;

        match row {
            Some(accountant) => Ok(accountant),
            None => Err(AppError::NotFound),
        }
    }

    pub async fn organizations_of(&self, accountant_id: Uuid) -> Result<Vec<Uuid>, AppError> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM organizations WHERE assigned_accountant_id = $1",
        )
        .bind(accountant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    /// Ponto único de mutação do fato de atribuição.
    ///
    /// Valida dentro da mesma transação que o destino é um contador ativo;
    /// `None` desfaz a atribuição. A mudança vale para a requisição seguinte:
    /// nenhuma checagem guarda esse fato em memória.
    pub async fn reassign(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        organization_id: Uuid,
        new_accountant_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        if let Some(accountant_id) = new_accountant_id {
            let valid = sqlx::query_scalar::<_, bool>(
                r#"
                SELECT EXISTS (
                    SELECT 1 FROM users
                    WHERE id = $1 AND role = 'accountant' AND status = 'active'
                )
                "#,
            )
            .bind(accountant_id)
            .fetch_one(&mut **tx)
            .await?;

            if !valid {
                return Err(AppError::InvalidAssignee);
            }
        }

        let result = sqlx::query(
            r#"
            UPDATE organizations
            SET assigned_accountant_id = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(organization_id)
        .bind(new_accountant_id)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
