use crate::error::Result;
use async_trait::async_trait;
use lz_models::{
    AccountId, CreateAccount, OuId, PermissionSetDefinition, PermissionSetId, PrincipalId,
    PrincipalType, RootId,
};

/// Organization management: the root, organizational units and member
/// accounts.
///
/// Account creation is asynchronous at the remote service: a returned
/// [`AccountId`] means "request accepted", not "fully provisioned".
/// Completion is tracked by the external orchestrator behind the API.
#[async_trait]
pub trait OrganizationsApi: Send + Sync {
    /// Create the organization if it does not exist and return its root.
    async fn ensure_organization(&self) -> Result<RootId>;

    /// Look up an OU by logical name under a parent. Used for
    /// check-before-create so re-applying a deployment never duplicates.
    async fn find_ou_by_name(&self, name: &str, parent_id: &str) -> Result<Option<OuId>>;

    async fn create_ou(&self, name: &str, parent_id: &str) -> Result<OuId>;

    async fn create_account(&self, request: &CreateAccount) -> Result<AccountId>;
}

/// SSO administration: permission sets and account assignments, scoped to
/// an SSO instance ARN.
#[async_trait]
pub trait SsoAdminApi: Send + Sync {
    async fn create_permission_set(
        &self,
        instance_arn: &str,
        definition: &PermissionSetDefinition,
    ) -> Result<PermissionSetId>;

    /// Request one assignment. Duplicate requests against an existing
    /// identical assignment are rejected as conflicts, not upserted; the
    /// caller must deduplicate before emitting.
    async fn create_account_assignment(
        &self,
        instance_arn: &str,
        account_id: &AccountId,
        permission_set_id: &PermissionSetId,
        principal_id: &PrincipalId,
        principal_type: PrincipalType,
    ) -> Result<()>;
}

/// Resolves opaque principal identifiers to assignable principals.
#[async_trait]
pub trait IdentityStoreApi: Send + Sync {
    async fn lookup_principal(
        &self,
        identity_store_id: &str,
        principal_id: &PrincipalId,
    ) -> Result<PrincipalType>;
}

/// Remote key-value store holding deployment parameters such as the SSO
/// instance identifier.
#[async_trait]
pub trait ParameterStoreApi: Send + Sync {
    async fn get_parameter(&self, name: &str) -> Result<String>;
}
