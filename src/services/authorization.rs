// src/services/authorization.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::AssignmentDirectory,
    models::auth::{Actor, Role},
};

// Os tipos de recurso que passam pelo motor de autorização.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Document,
    Message,
    Alert,
    OrganizationProfile,
    Template,
    UserAccount,
}

/// Descreve o recurso alvo de uma operação, do jeito que o motor precisa:
/// quem é a OSC dona, quem criou, e se a operação é exclusiva de um papel.
#[derive(Debug, Clone)]
pub struct ResourceDescriptor {
    pub kind: ResourceKind,
    pub owner_organization_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub required_role: Option<Role>,
}

impl ResourceDescriptor {
    /// Recurso pertencente a uma OSC (documentos, mensagens, o próprio perfil).
    pub fn owned_by(kind: ResourceKind, organization_id: Uuid) -> Self {
        Self {
            kind,
            owner_organization_id: Some(organization_id),
            created_by: None,
            required_role: None,
        }
    }

    /// Recurso de autoria de um usuário específico (modelos, avisos enviados).
    pub fn authored_by(kind: ResourceKind, creator_id: Uuid) -> Self {
        Self {
            kind,
            owner_organization_id: None,
            created_by: Some(creator_id),
            required_role: None,
        }
    }

    /// Operação exclusiva de um papel. Vale até para o Admin: criar aviso ou
    /// modelo exige ser contador, subir documento exige ser OSC.
    pub fn restricted_to(mut self, role: Role) -> Self {
        self.required_role = Some(role);
        self
    }
}

/// A decisão pura. Sem IO, sem estado: recebe o ator, o descritor e o fato
/// de atribuição lido ao vivo pelo chamador, e devolve permitir/negar.
///
/// Ordem de precedência:
/// 1. papel exigido pela operação (nega inclusive o Admin);
/// 2. Admin enxerga tudo;
/// 3. Contador: autor do recurso, ou contador ATUAL da OSC dona;
/// 4. OSC: só os próprios recursos.
pub fn decide(
    actor: &Actor,
    resource: &ResourceDescriptor,
    live_assignee: Option<Uuid>,
) -> Result<(), AppError> {
    if let Some(required) = resource.required_role {
        if actor.role != required {
            return Err(AppError::Forbidden);
        }
    }

    match actor.role {
        Role::Admin => Ok(()),
        Role::Accountant => {
            if resource.created_by == Some(actor.id) {
                return Ok(());
            }
            match resource.owner_organization_id {
                Some(_) if live_assignee == Some(actor.id) => Ok(()),
                _ => Err(AppError::Forbidden),
            }
        }
        Role::Organization => {
            if resource.owner_organization_id == Some(actor.id) {
                Ok(())
            } else {
                Err(AppError::Forbidden)
            }
        }
    }
}

/// O motor usado pelos acessores de recurso.
///
/// A parte com IO se resume a buscar o contador atual da OSC dona através do
/// diretório de atribuições, usando o executor do chamador — assim a checagem
/// e a escrita que ela protege compartilham o mesmo snapshot.
#[derive(Clone)]
pub struct AuthorizationEngine {
    assignments: AssignmentDirectory,
}

impl AuthorizationEngine {
    pub fn new(assignments: AssignmentDirectory) -> Self {
        Self { assignments }
    }

    pub async fn authorize<'e, E>(
        &self,
        executor: E,
        actor: &Actor,
        resource: &ResourceDescriptor,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Só o caminho do contador precisa do fato de atribuição, e só quando
        // ele não é o autor do recurso. `accountant_of` devolve NotFound se a
        // OSC dona nem existe — a distinção interna importa para os testes.
        let live_assignee = match (actor.role, resource.owner_organization_id) {
            (Role::Accountant, Some(organization_id))
                if resource.created_by != Some(actor.id) =>
            {
                self.assignments
                    .accountant_of(executor, organization_id)
                    .await?
            }
            _ => None,
        };

        decide(actor, resource, live_assignee)
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
    fn admin_passes_for_any_owned_resource() {
        let admin = actor(Role::Admin);
        let resource = ResourceDescriptor::owned_by(ResourceKind::Document, Uuid::new_v4());
        assert!(decide(&admin, &resource, None).is_ok());
    }

    #[test]
    fn required_role_denies_even_admin() {
        let admin = actor(Role::Admin);
        let upload = ResourceDescriptor::owned_by(ResourceKind::Document, Uuid::new_v4())
            .restricted_to(Role::Organization);
        assert!(matches!(decide(&admin, &upload, None), Err(AppError::Forbidden)));
    }

    #[test]
    fn required_role_accepts_the_matching_role() {
        let osc = actor(Role::Organization);
        let upload = ResourceDescriptor::owned_by(ResourceKind::Document, osc.id)
            .restricted_to(Role::Organization);
        assert!(decide(&osc, &upload, None).is_ok());
    }

    #[test]
    fn accountant_needs_the_live_assignment() {
        let contador = actor(Role::Accountant);
        let org = Uuid::new_v4();
        let resource = ResourceDescriptor::owned_by(ResourceKind::Document, org);

        // Atribuído a ele: permite.
        assert!(decide(&contador, &resource, Some(contador.id)).is_ok());

        // Atribuído a outro contador, ou a ninguém: nega.
        assert!(decide(&contador, &resource, Some(Uuid::new_v4())).is_err());
        assert!(decide(&contador, &resource, None).is_err());
    }

    #[test]
    fn accountant_owns_what_they_authored() {
        let contador = actor(Role::Accountant);
        let own_template = ResourceDescriptor::authored_by(ResourceKind::Template, contador.id);
        assert!(decide(&contador, &own_template, None).is_ok());

        let someone_elses =
            ResourceDescriptor::authored_by(ResourceKind::Template, Uuid::new_v4());
        assert!(decide(&contador, &someone_elses, None).is_err());
    }

    #[test]
    fn organization_only_touches_its_own_resources() {
        let osc = actor(Role::Organization);
        let own = ResourceDescriptor::owned_by(ResourceKind::Message, osc.id);
        assert!(decide(&osc, &own, None).is_ok());

        let other = ResourceDescriptor::owned_by(ResourceKind::Message, Uuid::new_v4());
        assert!(matches!(decide(&osc, &other, None), Err(AppError::Forbidden)));

        // O fato de atribuição é irrelevante para a OSC.
        let other_again = ResourceDescriptor::owned_by(ResourceKind::Document, Uuid::new_v4());
        assert!(decide(&osc, &other_again, Some(osc.id)).is_err());
    }

    #[test]
    fn organization_never_sees_authored_only_resources_of_others() {
        let osc = actor(Role::Organization);
        let template = ResourceDescriptor::authored_by(ResourceKind::Template, Uuid::new_v4());
        assert!(decide(&osc, &template, None).is_err());
    }
}
