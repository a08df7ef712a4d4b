// src/services/message_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{AssignmentDirectory, MessageRepository},
    models::{
        auth::{Actor, Role},
        message::{Message, SendMessagePayload},
    },
};

#[derive(Clone)]
pub struct MessageService {
    message_repo: MessageRepository,
    assignments: AssignmentDirectory,
    pool: PgPool,
}

/// Resolve os participantes da conversa a partir do remetente e do fato de
/// atribuição lido ao vivo. Puro de propósito: a parte difícil do roteamento
/// fica testável sem banco.
///
/// - OSC conversa sempre com o contador atribuído a ela agora;
/// - contador precisa indicar a OSC, e ela precisa estar atribuída a ele;
/// - Admin não participa de conversas.
pub fn conversation_key(
    actor: &Actor,
    explicit_organization_id: Option<Uuid>,
    live_assignee: Option<Uuid>,
) -> Result<(Uuid, Uuid), AppError> {
    match actor.role {
        Role::Organization => {
            let accountant_id = live_assignee.ok_or(AppError::NoAssignedAccountant)?;
            Ok((actor.id, accountant_id))
        }
        Role::Accountant => {
            let organization_id = explicit_organization_id.ok_or_else(|| {
                AppError::InvalidInput("Informe a OSC da conversa.".to_string())
            })?;
            if live_assignee == Some(actor.id) {
                Ok((organization_id, actor.id))
            } else {
                Err(AppError::Forbidden)
            }
        }
        Role::Admin => Err(AppError::Forbidden),
    }
}

impl MessageService {
    pub fn new(
        message_repo: MessageRepository,
        assignments: AssignmentDirectory,
        pool: PgPool,
    ) -> Self {
        Self {
            message_repo,
            assignments,
            pool,
        }
    }

    pub async fn send(
        &self,
        actor: &Actor,
        payload: &SendMessagePayload,
    ) -> Result<Message, AppError> {
        let mut tx = self.pool.begin().await?;

        // O fato de atribuição é lido dentro da transação que grava a
        // mensagem: uma reatribuição concorrente não fura a checagem.
        let lookup_organization = match actor.role {
            Role::Organization => actor.id,
            Role::Accountant => payload.organization_id.ok_or_else(|| {
                AppError::InvalidInput("Informe a OSC da conversa.".to_string())
            })?,
            Role::Admin => return Err(AppError::Forbidden),
        };

        let live_assignee = self.assignments
            .accountant_of(&mut *tx, lookup_organization)
            .await?;

        let (organization_id, accountant_id) =
            conversation_key(actor, payload.organization_id, live_assignee)?;

        let message = self.message_repo
            .insert(
                &mut *tx,
                organization_id,
                accountant_id,
                actor.id,
                actor.role,
                &payload.body,
            )
            .await?;

        tx.commit().await?;
        Ok(message)
    }

    /// Histórico do fio da OSC, em ordem de criação (empates pelo id).
    ///
    /// O contador passa pela MESMA checagem de atribuição do envio — sem
    /// isso, qualquer contador leria a conversa de qualquer OSC chutando o
    /// id. A checagem decide quem LÊ; o fio em si pertence à OSC e
    /// sobrevive a reatribuições (o contador novo enxerga as mensagens
    /// anteriores, o antigo perde o acesso). Abrir o histórico marca como
    /// lidas as mensagens da outra ponta.
    pub async fn history(
        &self,
        actor: &Actor,
        organization_id: Option<Uuid>,
    ) -> Result<Vec<Message>, AppError> {
        let mut tx = self.pool.begin().await?;

        let thread_organization = match actor.role {
            // A OSC lê o próprio fio mesmo sem contador atribuído no momento.
            Role::Organization => actor.id,
            Role::Accountant => {
                let organization_id = organization_id.ok_or_else(|| {
                    AppError::InvalidInput("Informe a OSC da conversa.".to_string())
                })?;
                let live_assignee = self.assignments
                    .accountant_of(&mut *tx, organization_id)
                    .await?;
                let (organization_id, _) =
                    conversation_key(actor, Some(organization_id), live_assignee)?;
                organization_id
            }
            Role::Admin => {
                let organization_id = organization_id.ok_or_else(|| {
                    AppError::InvalidInput("Informe a OSC da conversa.".to_string())
                })?;
                // Só existência; devolve NotFound se a OSC não está cadastrada.
                let _ = self.assignments
                    .accountant_of(&mut *tx, organization_id)
                    .await?;
                organization_id
            }
        };

        // Admin só observa; não mexe nos flags de leitura.
        if actor.role != Role::Admin {
            self.message_repo
                .mark_read_for_viewer(&mut *tx, thread_organization, actor.role)
                .await?;
        }

        let messages = self.message_repo.history(&mut *tx, thread_organization).await?;

        tx.commit().await?;
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: Role) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            role,
            display_name: "Teste".to_string(),
        }
    }

    #[test]
    fn organization_routes_to_its_current_accountant() {
        let osc = actor(Role::Organization);
        let accountant_id = Uuid::new_v4();

        let key = conversation_key(&osc, None, Some(accountant_id)).unwrap();
        assert_eq!(key, (osc.id, accountant_id));
    }

    #[test]
    fn organization_without_accountant_cannot_send() {
        let osc = actor(Role::Organization);
        assert!(matches!(
            conversation_key(&osc, None, None),
            Err(AppError::NoAssignedAccountant)
        ));
    }

    #[test]
    fn accountant_must_name_the_organization() {
        let contador = actor(Role::Accountant);
        assert!(matches!(
            conversation_key(&contador, None, Some(contador.id)),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn accountant_needs_the_assignment_to_participate() {
        let contador = actor(Role::Accountant);
        let organization_id = Uuid::new_v4();

        let key =
            conversation_key(&contador, Some(organization_id), Some(contador.id)).unwrap();
        assert_eq!(key, (organization_id, contador.id));

        // OSC de outro contador, ou sem contador: negado.
        assert!(matches!(
            conversation_key(&contador, Some(organization_id), Some(Uuid::new_v4())),
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            conversation_key(&contador, Some(organization_id), None),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn admin_does_not_participate_in_conversations() {
        let admin = actor(Role::Admin);
        assert!(matches!(
            conversation_key(&admin, Some(Uuid::new_v4()), Some(Uuid::new_v4())),
            Err(AppError::Forbidden)
        ));
    }
}
