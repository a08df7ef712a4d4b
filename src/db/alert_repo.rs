// src/db/alert_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::alert::{Alert, AlertType},
};

#[derive(Clone)]
pub struct AlertRepository {
    pool: PgPool,
}

const ALERT_COLUMNS: &str = r#"id, organization_id, title, message, alert_type,
                               created_by, read_status, created_at"#;

impl AlertRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        organization_id: Option<Uuid>,
        title: &str,
        message: &str,
        alert_type: AlertType,
        created_by: Uuid,
    ) -> Result<Alert, AppError> {
        let sql = format!(
            r#"
            INSERT INTO alerts (organization_id, title, message, alert_type, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ALERT_COLUMNS}
            "#
        );
        let alert = sqlx::query_as::<_, Alert>(&sql)
            .bind(organization_id)
            .bind(title)
            .bind(message)
            .bind(alert_type)
            .bind(created_by)
            .fetch_one(&self.pool)
            .await?;

        Ok(alert)
    }

    // A OSC enxerga os avisos dirigidos a ela e os avisos em difusão.
    pub async fn list_for_organization(&self, organization_id: Uuid) -> Result<Vec<Alert>, AppError> {
        let sql = format!(
            r#"
            SELECT {ALERT_COLUMNS}
            FROM alerts
            WHERE organization_id = $1 OR organization_id IS NULL
            ORDER BY created_at DESC
            "#
        );
        let alerts = sqlx::query_as::<_, Alert>(&sql)
            .bind(organization_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(alerts)
    }

    pub async fn list_created_by(&self, accountant_id: Uuid) -> Result<Vec<Alert>, AppError> {
        let sql = format!(
            r#"
            SELECT {ALERT_COLUMNS}
            FROM alerts
            WHERE created_by = $1
            ORDER BY created_at DESC
            "#
        );
        let alerts = sqlx::query_as::<_, Alert>(&sql)
            .bind(accountant_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(alerts)
    }

    pub async fn list_all(&self) -> Result<Vec<Alert>, AppError> {
        let sql = format!("SELECT {ALERT_COLUMNS} FROM alerts ORDER BY created_at DESC");
        let alerts = sqlx::query_as::<_, Alert>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(alerts)
    }

    // Transição única false -> true, restrita à OSC dona do aviso. Um aviso
    // já lido, inexistente ou em difusão resulta em zero linhas afetadas;
    // o serviço trata os três casos do mesmo jeito.
    pub async fn mark_read(&self, alert_id: Uuid, organization_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE alerts
            SET read_status = TRUE
            WHERE id = $1 AND organization_id = $2 AND read_status = FALSE
            "#,
        )
        .bind(alert_id)
        .bind(organization_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
