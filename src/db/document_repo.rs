// src/db/document_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::document::{Document, DocumentRow},
};

#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

const ROW_SELECT: &str = r#"
    SELECT d.id,
           d.organization_id,
           d.uploaded_by,
           u.role AS uploader_role,
           d.original_name,
           d.size_bytes,
           d.mime_type,
           d.created_at
    FROM documents d
    JOIN users u ON u.id = d.uploaded_by
"#;

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        uploaded_by: Uuid,
        original_name: &str,
        stored_name: &str,
        size_bytes: i64,
        mime_type: &str,
    ) -> Result<Document, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let document = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (
                organization_id, uploaded_by, original_name, stored_name,
                size_bytes, mime_type
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, organization_id, uploaded_by, original_name,
                      stored_name, size_bytes, mime_type, created_at
            "#,
        )
        .bind(organization_id)
        .bind(uploaded_by)
        .bind(original_name)
        .bind(stored_name)
        .bind(size_bytes)
        .bind(mime_type)
        .fetch_one(executor)
        .await?;

        Ok(document)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Document>, AppError> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            SELECT id, organization_id, uploaded_by, original_name,
                   stored_name, size_bytes, mime_type, created_at
            FROM documents
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(document)
    }

    pub async fn list_for_organization(
        &self,
        organization_id: Uuid,
    ) -> Result<Vec<DocumentRow>, AppError> {
        let sql = format!("{ROW_SELECT} WHERE d.organization_id = $1 ORDER BY d.created_at DESC");
        let rows = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(organization_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    // Documentos das OSCs atribuídas AGORA a este contador. Uma OSC
    // reatribuída leva os documentos junto, mesmo os anteriores à troca.
    pub async fn list_for_accountant(
        &self,
        accountant_id: Uuid,
    ) -> Result<Vec<DocumentRow>, AppError> {
        let sql = format!(
            r#"{ROW_SELECT}
            JOIN organizations o ON o.id = d.organization_id
            WHERE o.assigned_accountant_id = $1
            ORDER BY d.created_at DESC"#
        );
        let rows = sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(accountant_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn list_all(&self) -> Result<Vec<DocumentRow>, AppError> {
        let sql = format!("{ROW_SELECT} ORDER BY d.created_at DESC");
        let rows = sqlx::query_as::<_, DocumentRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    // Nomes físicos dos arquivos de uma OSC, coletados antes do DELETE em
    // cascata para a limpeza pós-commit do armazenamento.
    pub async fn stored_names_for_organization<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
    ) -> Result<Vec<String>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT stored_name FROM documents WHERE organization_id = $1",
        )
        .bind(organization_id)
        .fetch_all(executor)
        .await?;
        Ok(names)
    }
}
