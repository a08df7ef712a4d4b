// src/db/organization_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::user_repo::map_unique_violation,
    models::organization::{Organization, OrganizationProfile},
};

#[derive(Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

// SELECT base da visão combinada login + perfil + nome do contador atual.
const PROFILE_SELECT: &str = r#"
    SELECT o.id,
           u.name,
           u.email,
           u.status,
           o.cnpj,
           o.registered_name,
           o.contact_email,
           o.contact_phone,
           o.address,
           o.assigned_accountant_id,
           a.name AS accountant_name,
           o.created_at
    FROM organizations o
    JOIN users u ON u.id = o.id
    LEFT JOIN users a ON a.id = o.assigned_accountant_id
"#;

impl OrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Insere o perfil da OSC. Deve rodar na MESMA transação que criou a
    // linha de `users` com este id; é isso que mantém o par consistente.
    pub async fn insert<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        cnpj: &str,
        registered_name: &str,
        contact_email: Option<&str>,
        contact_phone: Option<&str>,
        address: Option<&str>,
        assigned_accountant_id: Option<Uuid>,
        logo_stored_name: Option<&str>,
        bylaws_stored_name: Option<&str>,
    ) -> Result<Organization, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let organization = sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (
                id, cnpj, registered_name, contact_email, contact_phone,
                address, assigned_accountant_id, logo_stored_name, bylaws_stored_name
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, cnpj, registered_name, contact_email, contact_phone,
                      address, assigned_accountant_id, logo_stored_name,
                      bylaws_stored_name, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(cnpj)
        .bind(registered_name)
        .bind(contact_email)
        .bind(contact_phone)
        .bind(address)
        .bind(assigned_accountant_id)
        .bind(logo_stored_name)
        .bind(bylaws_stored_name)
        .fetch_one(executor)
        .await
        .map_err(map_unique_violation)?;

        Ok(organization)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Organization>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let organization = sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, cnpj, registered_name, contact_email, contact_phone,
                   address, assigned_accountant_id, logo_stored_name,
                   bylaws_stored_name, created_at, updated_at
            FROM organizations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(organization)
    }

    pub async fn profile_by_id(&self, id: Uuid) -> Result<Option<OrganizationProfile>, AppError> {
        let sql = format!("{PROFILE_SELECT} WHERE o.id = $1");
        let profile = sqlx::query_as::<_, OrganizationProfile>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(profile)
    }

    pub async fn list_all(&self) -> Result<Vec<OrganizationProfile>, AppError> {
        let sql = format!("{PROFILE_SELECT} ORDER BY u.name");
        let profiles = sqlx::query_as::<_, OrganizationProfile>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(profiles)
    }

    // Leitura de escopo do contador. O filtro é a própria coluna de
    // atribuição, lida ao vivo; nada aqui é cacheado.
    pub async fn list_for_accountant(
        &self,
        accountant_id: Uuid,
    ) -> Result<Vec<OrganizationProfile>, AppError> {
        let sql = format!("{PROFILE_SELECT} WHERE o.assigned_accountant_id = $1 ORDER BY u.name");
        let profiles = sqlx::query_as::<_, OrganizationProfile>(&sql)
            .bind(accountant_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(profiles)
    }

    /// Atualização parcial dos campos operacionais do perfil.
    /// CNPJ fica de fora de propósito: é imutável após a criação.
    pub async fn update_fields<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        registered_name: Option<&str>,
        contact_email: Option<&str>,
        contact_phone: Option<&str>,
        address: Option<&str>,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE organizations
            SET registered_name = COALESCE($2, registered_name),
                contact_email   = COALESCE($3, contact_email),
                contact_phone   = COALESCE($4, contact_phone),
                address         = COALESCE($5, address),
                updated_at      = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(registered_name)
        .bind(contact_email)
        .bind(contact_phone)
        .bind(address)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}
