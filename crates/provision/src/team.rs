use crate::account::AccountFactory;
use crate::dedupe::unique_principals;
use crate::error::Result;
use crate::permission_set::PermissionSetHandle;
use lz_cloud::{IdentityStoreApi, OrganizationsApi, SsoAdminApi};
use lz_models::{Account, Assignment, OuId, PrincipalId, PrincipalType, TeamDescriptor};
use std::sync::Arc;
use validator::Validate;

/// Everything one team unit needs, passed as a single configuration
/// struct rather than positionally.
#[derive(Clone)]
pub struct TeamProvisionRequest {
    pub descriptor: TeamDescriptor,
    pub teams_ou: OuId,
    pub permission_set: PermissionSetHandle,
    pub instance_arn: String,
    pub identity_store_id: String,
}

/// Result of one assignment request within a team.
#[derive(Debug, Clone)]
pub enum AssignmentStatus {
    Created {
        assignment: Assignment,
        principal_type: PrincipalType,
    },
    /// Lookup or assignment failed for this principal. Siblings still
    /// proceed; cleanup of anything already created is an operator
    /// decision.
    Failed { reason: String },
}

#[derive(Debug, Clone)]
pub struct AssignmentOutcome {
    pub principal_id: PrincipalId,
    pub status: AssignmentStatus,
}

/// What one team's provisioning produced: the accepted account plus a
/// per-principal assignment report.
#[derive(Debug, Clone)]
pub struct TeamOutcome {
    pub team_name: String,
    pub account: Account,
    pub assignments: Vec<AssignmentOutcome>,
}

impl TeamOutcome {
    pub fn failed_assignments(&self) -> usize {
        self.assignments
            .iter()
            .filter(|a| matches!(a.status, AssignmentStatus::Failed { .. }))
            .count()
    }
}

/// Composes one team's provisioning bundle: account creation under the
/// teams OU, then one assignment of the shared permission set per unique
/// member principal.
#[derive(Clone)]
pub struct TeamProvisioner {
    accounts: Arc<AccountFactory>,
    sso: Arc<dyn SsoAdminApi>,
    identity_store: Arc<dyn IdentityStoreApi>,
}

impl TeamProvisioner {
    pub fn new(
        organizations: Arc<dyn OrganizationsApi>,
        sso: Arc<dyn SsoAdminApi>,
        identity_store: Arc<dyn IdentityStoreApi>,
    ) -> Self {
        Self {
            accounts: Arc::new(AccountFactory::new(organizations)),
            sso,
            identity_store,
        }
    }

    /// Provision one team. A failed account creation returns an error and
    /// halts this team's assignment step; assignment failures are reported
    /// per principal without aborting the remaining principals. Nothing is
    /// rolled back: emitted creations are committed.
    pub async fn provision_team(&self, request: &TeamProvisionRequest) -> Result<TeamOutcome> {
        let descriptor = &request.descriptor;
        descriptor.validate()?;

        tracing::info!(team = %descriptor.team_name, "Provisioning team");

        let account = self
            .accounts
            .create_account(&descriptor.account_name, &descriptor.email, &request.teams_ou)
            .await?;

        let members = unique_principals(&descriptor.member_principal_ids);
        let mut assignments = Vec::with_capacity(members.len());

        for principal_id in members {
            let status = self.assign(request, &account, &principal_id).await;
            if let AssignmentStatus::Failed { reason } = &status {
                tracing::warn!(
                    team = %descriptor.team_name,
                    principal = %principal_id,
                    reason = %reason,
                    "Assignment failed"
                );
            }
            assignments.push(AssignmentOutcome {
                principal_id,
                status,
            });
        }

        Ok(TeamOutcome {
            team_name: descriptor.team_name.clone(),
            account,
            assignments,
        })
    }

    async fn assign(
        &self,
        request: &TeamProvisionRequest,
        account: &Account,
        principal_id: &PrincipalId,
    ) -> AssignmentStatus {
        let principal_type = match self
            .identity_store
            .lookup_principal(&request.identity_store_id, principal_id)
            .await
        {
            Ok(principal_type) => principal_type,
            Err(err) => {
                return AssignmentStatus::Failed {
                    reason: err.to_string(),
                }
            }
        };

        match self
            .sso
            .create_account_assignment(
                &request.instance_arn,
                &account.id,
                &request.permission_set.id,
                principal_id,
                principal_type,
            )
            .await
        {
            Ok(()) => AssignmentStatus::Created {
                assignment: Assignment {
                    account_id: account.id.clone(),
                    principal_id: principal_id.clone(),
                    permission_set_id: request.permission_set.id.clone(),
                },
                principal_type,
            },
            Err(err) => AssignmentStatus::Failed {
                reason: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission_set::{sso_instance_arn, PermissionSetRegistry};
    use lz_cloud::InMemoryCloud;

    fn descriptor(members: &[&str]) -> TeamDescriptor {
        TeamDescriptor {
            team_name: "west-vader".to_string(),
            account_name: "west-vader".to_string(),
            email: "west-aws-vader@example.de".to_string(),
            member_principal_ids: members.iter().map(|m| PrincipalId::new(*m)).collect(),
        }
    }

    async fn request_for(
        cloud: &Arc<InMemoryCloud>,
        descriptor: TeamDescriptor,
    ) -> TeamProvisionRequest {
        let root = cloud.ensure_organization().await.unwrap();
        let teams_ou = cloud.create_ou("OU - AWS Teams", root.as_str()).await.unwrap();

        let registry =
            PermissionSetRegistry::new(cloud.clone(), sso_instance_arn("ssoins-1"));
        let permission_set = registry.get_or_create().await.unwrap();

        TeamProvisionRequest {
            descriptor,
            teams_ou,
            permission_set,
            instance_arn: sso_instance_arn("ssoins-1"),
            identity_store_id: "d-identity".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_member_assigned_exactly_once() {
        let cloud = Arc::new(
            InMemoryCloud::new()
                .with_principal("p-1", PrincipalType::User)
                .with_principal("p-admin", PrincipalType::Group),
        );
        let provisioner = TeamProvisioner::new(cloud.clone(), cloud.clone(), cloud.clone());

        let request = request_for(&cloud, descriptor(&["p-1", "p-admin", "p-1"])).await;
        let outcome = provisioner.provision_team(&request).await.unwrap();

        assert_eq!(outcome.assignments.len(), 2);
        assert_eq!(outcome.failed_assignments(), 0);
        assert_eq!(cloud.counts().assignment_creates, 2);
    }

    #[tokio::test]
    async fn test_empty_member_list_creates_account_without_assignments() {
        let cloud = Arc::new(InMemoryCloud::new());
        let provisioner = TeamProvisioner::new(cloud.clone(), cloud.clone(), cloud.clone());

        let request = request_for(&cloud, descriptor(&[])).await;
        let outcome = provisioner.provision_team(&request).await.unwrap();

        assert!(outcome.assignments.is_empty());
        assert_eq!(cloud.counts().account_creates, 1);
        assert_eq!(cloud.counts().assignment_creates, 0);
    }

    #[tokio::test]
    async fn test_unknown_principal_does_not_abort_siblings() {
        let cloud = Arc::new(
            InMemoryCloud::new()
                .with_principal("p-1", PrincipalType::User)
                .with_principal("p-3", PrincipalType::User),
        );
        let provisioner = TeamProvisioner::new(cloud.clone(), cloud.clone(), cloud.clone());

        let request = request_for(&cloud, descriptor(&["p-1", "p-ghost", "p-3"])).await;
        let outcome = provisioner.provision_team(&request).await.unwrap();

        assert_eq!(outcome.assignments.len(), 3);
        assert_eq!(outcome.failed_assignments(), 1);
        // The two resolvable principals were still assigned.
        assert_eq!(cloud.counts().assignment_creates, 2);

        let failed = &outcome.assignments[1];
        assert_eq!(failed.principal_id, PrincipalId::new("p-ghost"));
        assert!(matches!(failed.status, AssignmentStatus::Failed { .. }));
    }

    #[tokio::test]
    async fn test_failed_account_creation_halts_assignment_step() {
        let cloud = Arc::new(InMemoryCloud::new().with_principal("p-1", PrincipalType::User));
        let provisioner = TeamProvisioner::new(cloud.clone(), cloud.clone(), cloud.clone());

        // Occupy the email before the team runs.
        let request = request_for(&cloud, descriptor(&["p-1"])).await;
        let factory = AccountFactory::new(cloud.clone());
        factory
            .create_account("squatter", "west-aws-vader@example.de", &request.teams_ou)
            .await
            .unwrap();

        assert!(provisioner.provision_team(&request).await.is_err());
        assert_eq!(cloud.counts().assignment_creates, 0);
    }
}
