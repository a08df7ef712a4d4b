// src/db/message_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{auth::Role, message::Message},
};

#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        accountant_id: Uuid,
        sender_id: Uuid,
        sender_role: Role,
        body: &str,
    ) -> Result<Message, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (organization_id, accountant_id, sender_id, sender_role, body)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, organization_id, accountant_id, sender_id, sender_role,
                      body, read_status, created_at
            "#,
        )
        .bind(organization_id)
        .bind(accountant_id)
        .bind(sender_id)
        .bind(sender_role)
        .bind(body)
        .fetch_one(executor)
        .await?;

        Ok(message)
    }

    // O fio inteiro da OSC, atravessando reatribuições de contador: uma
    // troca de contador não zera o histórico. Ordem garantida: tempo de
    // criação não-decrescente, empate resolvido pelo id de inserção.
    pub async fn history<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
    ) -> Result<Vec<Message>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, organization_id, accountant_id, sender_id, sender_role,
                   body, read_status, created_at
            FROM messages
            WHERE organization_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(organization_id)
        .fetch_all(executor)
        .await?;

        Ok(messages)
    }

    // Marca como lidas as mensagens da outra ponta da conversa. O flag só
    // transita de false para true.
    pub async fn mark_read_for_viewer<'e, E>(
        &self,
        executor: E,
        organization_id: Uuid,
        viewer_role: Role,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET read_status = TRUE
            WHERE organization_id = $1
              AND sender_role <> $2
              AND read_status = FALSE
            "#,
        )
        .bind(organization_id)
        .bind(viewer_role)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }
}
