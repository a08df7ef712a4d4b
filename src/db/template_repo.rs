// src/db/template_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::template::Template};

#[derive(Clone)]
pub struct TemplateRepository {
    pool: PgPool,
}

impl TemplateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        display_name: &str,
        stored_name: &str,
        uploaded_by: Uuid,
    ) -> Result<Template, AppError> {
        let template = sqlx::query_as::<_, Template>(
            r#"
            INSERT INTO templates (display_name, stored_name, uploaded_by)
            VALUES ($1, $2, $3)
            RETURNING id, display_name, stored_name, uploaded_by, created_at
            "#,
        )
        .bind(display_name)
        .bind(stored_name)
        .bind(uploaded_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(template)
    }

    pub async fn list(&self) -> Result<Vec<Template>, AppError> {
        let templates = sqlx::query_as::<_, Template>(
            r#"
            SELECT id, display_name, stored_name, uploaded_by, created_at
            FROM templates
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(templates)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Template>, AppError> {
        let template = sqlx::query_as::<_, Template>(
            r#"
            SELECT id, display_name, stored_name, uploaded_by, created_at
            FROM templates
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(template)
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM templates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
