use crate::account::AccountFactory;
use crate::error::{ProvisionError, Result};
use crate::org_unit::OuService;
use crate::params::{ParameterResolver, RetryConfig};
use crate::permission_set::{sso_instance_arn, PermissionSetHandle, PermissionSetRegistry};
use crate::team::{TeamOutcome, TeamProvisionRequest, TeamProvisioner};
use chrono::{DateTime, Utc};
use lz_cloud::{IdentityStoreApi, OrganizationsApi, ParameterStoreApi, SsoAdminApi};
use lz_models::{
    Account, CreateOrganizationalUnit, DeploymentDescriptor, OrganizationalUnit, OuId, ParentRef,
    RootId,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;
use validator::Validate;

#[derive(Debug, Clone)]
pub struct ComposerConfig {
    /// Name of the OU every team account lives under.
    pub teams_ou_name: String,
    /// Parameter-store key holding the SSO instance identifier.
    pub sso_parameter: String,
    /// Parameter-store key holding the identity-store identifier.
    pub identity_store_parameter: String,
    pub parameter_retry: RetryConfig,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            teams_ou_name: "OU - AWS Teams".to_string(),
            sso_parameter: "sso-id".to_string(),
            identity_store_parameter: "identity-store-id".to_string(),
            parameter_retry: RetryConfig::default(),
        }
    }
}

/// One team's slot in the report. Teams are independent graphs: a failed
/// team never affects its siblings.
#[derive(Debug)]
pub struct TeamResult {
    pub team_name: String,
    pub outcome: Result<TeamOutcome>,
}

#[derive(Debug)]
pub struct StandaloneAccountResult {
    pub name: String,
    pub outcome: Result<Account>,
}

/// Everything a deployment run created (or failed to create), in
/// descriptor order.
#[derive(Debug)]
pub struct DeploymentReport {
    pub root_id: RootId,
    pub permission_set: PermissionSetHandle,
    pub organizational_units: Vec<OrganizationalUnit>,
    pub teams: Vec<TeamResult>,
    pub accounts: Vec<StandaloneAccountResult>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl DeploymentReport {
    pub fn has_failures(&self) -> bool {
        self.teams.iter().any(|t| match &t.outcome {
            Ok(outcome) => outcome.failed_assignments() > 0,
            Err(_) => true,
        }) || self.accounts.iter().any(|a| a.outcome.is_err())
    }

    pub fn created_assignments(&self) -> usize {
        self.teams
            .iter()
            .filter_map(|t| t.outcome.as_ref().ok())
            .map(|outcome| outcome.assignments.len() - outcome.failed_assignments())
            .sum()
    }
}

/// Evaluates one deployment descriptor as a single dependency-ordered
/// pass: parameters, then the organization root and OUs, then the shared
/// permission set, then one independent provisioning unit per team, then
/// standalone accounts.
///
/// Local validation runs before the first remote request so a malformed
/// descriptor set cannot leave partial state behind. Once requests are
/// emitted they are committed; there is no rollback.
pub struct DeploymentComposer {
    organizations: Arc<dyn OrganizationsApi>,
    sso: Arc<dyn SsoAdminApi>,
    identity_store: Arc<dyn IdentityStoreApi>,
    parameters: ParameterResolver,
    config: ComposerConfig,
}

impl DeploymentComposer {
    pub fn new(
        organizations: Arc<dyn OrganizationsApi>,
        sso: Arc<dyn SsoAdminApi>,
        identity_store: Arc<dyn IdentityStoreApi>,
        parameter_store: Arc<dyn ParameterStoreApi>,
        config: ComposerConfig,
    ) -> Self {
        let parameters =
            ParameterResolver::with_retry(parameter_store, config.parameter_retry.clone());
        Self {
            organizations,
            sso,
            identity_store,
            parameters,
            config,
        }
    }

    pub async fn run(&self, descriptor: &DeploymentDescriptor) -> Result<DeploymentReport> {
        let started_at = Utc::now();
        self.validate_locally(descriptor)?;

        let sso_id = self.parameters.resolve(&self.config.sso_parameter).await?;
        let identity_store_id = self
            .parameters
            .resolve(&self.config.identity_store_parameter)
            .await?;
        let instance_arn = sso_instance_arn(&sso_id);

        let root = self.organizations.ensure_organization().await?;
        tracing::info!(root = %root, "Organization root resolved");

        let ou_service = OuService::new(self.organizations.clone(), root.clone());
        let mut organizational_units = Vec::new();
        let mut ou_ids: HashMap<String, OuId> = HashMap::new();

        let teams_ou = ou_service
            .ensure_ou(&CreateOrganizationalUnit {
                name: self.config.teams_ou_name.clone(),
                parent: ParentRef::Root,
            })
            .await?;
        ou_ids.insert(teams_ou.name.clone(), teams_ou.id.clone());
        organizational_units.push(teams_ou.clone());

        for name in &descriptor.organizational_units {
            let unit = ou_service
                .ensure_ou(&CreateOrganizationalUnit {
                    name: name.clone(),
                    parent: ParentRef::Root,
                })
                .await?;
            ou_ids.insert(unit.name.clone(), unit.id.clone());
            organizational_units.push(unit);
        }

        // Computed once, fanned out read-only to every team unit.
        let registry = PermissionSetRegistry::new(self.sso.clone(), instance_arn.clone());
        let permission_set = registry.get_or_create().await?;

        let teams = self
            .provision_teams(
                descriptor,
                &teams_ou.id,
                &permission_set,
                &instance_arn,
                &identity_store_id,
            )
            .await;

        let accounts = self.create_standalone_accounts(descriptor, &ou_ids).await;

        let report = DeploymentReport {
            root_id: root,
            permission_set,
            organizational_units,
            teams,
            accounts,
            started_at,
            finished_at: Utc::now(),
        };
        tracing::info!(
            teams = report.teams.len(),
            assignments = report.created_assignments(),
            failures = report.has_failures(),
            "Deployment run finished"
        );
        Ok(report)
    }

    /// Everything that can be caught without a remote call: descriptor
    /// field validation, email uniqueness across the descriptor set, and
    /// account-name uniqueness (two descriptors addressing one account is
    /// a configuration error).
    fn validate_locally(&self, descriptor: &DeploymentDescriptor) -> Result<()> {
        descriptor.validate()?;

        let mut emails: HashMap<&str, &str> = HashMap::new();
        let mut names: HashMap<&str, &str> = HashMap::new();

        let entries = descriptor
            .teams
            .iter()
            .map(|t| (t.account_name.as_str(), t.email.as_str()))
            .chain(
                descriptor
                    .accounts
                    .iter()
                    .map(|a| (a.name.as_str(), a.email.as_str())),
            );

        for (name, email) in entries {
            if let Some(first) = emails.insert(email, name) {
                return Err(ProvisionError::DuplicateDescriptorEmail {
                    email: email.to_string(),
                    first: first.to_string(),
                    second: name.to_string(),
                });
            }
            if names.insert(name, email).is_some() {
                return Err(ProvisionError::DuplicateAccountName(name.to_string()));
            }
        }

        for account in &descriptor.accounts {
            let known = account.organizational_unit == self.config.teams_ou_name
                || descriptor
                    .organizational_units
                    .contains(&account.organizational_unit);
            if !known {
                return Err(ProvisionError::UnknownOrganizationalUnit(
                    account.organizational_unit.clone(),
                ));
            }
        }

        Ok(())
    }

    async fn provision_teams(
        &self,
        descriptor: &DeploymentDescriptor,
        teams_ou: &OuId,
        permission_set: &PermissionSetHandle,
        instance_arn: &str,
        identity_store_id: &str,
    ) -> Vec<TeamResult> {
        let provisioner = TeamProvisioner::new(
            self.organizations.clone(),
            self.sso.clone(),
            self.identity_store.clone(),
        );

        let mut tasks = JoinSet::new();
        for (index, team) in descriptor.teams.iter().enumerate() {
            let provisioner = provisioner.clone();
            let request = TeamProvisionRequest {
                descriptor: team.clone(),
                teams_ou: teams_ou.clone(),
                permission_set: permission_set.clone(),
                instance_arn: instance_arn.to_string(),
                identity_store_id: identity_store_id.to_string(),
            };
            tasks.spawn(async move { (index, provisioner.provision_team(&request).await) });
        }

        // Report in descriptor order regardless of completion order.
        let mut slots: Vec<Option<Result<TeamOutcome>>> =
            (0..descriptor.teams.len()).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(err) => tracing::error!(error = %err, "Team provisioning task aborted"),
            }
        }

        slots
            .into_iter()
            .zip(descriptor.teams.iter())
            .map(|(outcome, team)| TeamResult {
                team_name: team.team_name.clone(),
                outcome: outcome.unwrap_or_else(|| {
                    Err(ProvisionError::Internal(
                        "team provisioning task aborted".to_string(),
                    ))
                }),
            })
            .collect()
    }

    async fn create_standalone_accounts(
        &self,
        descriptor: &DeploymentDescriptor,
        ou_ids: &HashMap<String, OuId>,
    ) -> Vec<StandaloneAccountResult> {
        let factory = AccountFactory::new(self.organizations.clone());
        let mut results = Vec::with_capacity(descriptor.accounts.len());

        for account in &descriptor.accounts {
            // Validated up front; the map always has the OU by now.
            let outcome = match ou_ids.get(&account.organizational_unit) {
                Some(ou) => {
                    factory
                        .create_account(&account.name, &account.email, ou)
                        .await
                }
                None => Err(ProvisionError::UnknownOrganizationalUnit(
                    account.organizational_unit.clone(),
                )),
            };
            results.push(StandaloneAccountResult {
                name: account.name.clone(),
                outcome,
            });
        }
        results
    }
}
