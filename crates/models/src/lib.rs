// Core modules
pub mod account;
pub mod assignment;
pub mod deployment;
pub mod ids;
pub mod org_unit;
pub mod permission_set;
pub mod team;

// Re-export commonly used types
pub use account::{Account, CreateAccount, StandaloneAccount};
pub use assignment::{Assignment, PrincipalType};
pub use deployment::DeploymentDescriptor;
pub use ids::{AccountId, OuId, PermissionSetId, PrincipalId, RootId};
pub use org_unit::{CreateOrganizationalUnit, OrganizationalUnit, ParentRef};
pub use permission_set::{
    PermissionSet, PermissionSetDefinition, ADMIN_MANAGED_POLICY_ARN, ADMIN_PERMISSION_SET_NAME,
    ADMIN_SESSION_DURATION,
};
pub use team::TeamDescriptor;
