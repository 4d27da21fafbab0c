pub mod account;
pub mod dedupe;
pub mod deployment;
pub mod error;
pub mod org_unit;
pub mod params;
pub mod permission_set;
pub mod team;

pub use account::AccountFactory;
pub use dedupe::unique_principals;
pub use deployment::{
    ComposerConfig, DeploymentComposer, DeploymentReport, StandaloneAccountResult, TeamResult,
};
pub use error::{ProvisionError, Result};
pub use org_unit::OuService;
pub use params::{ParameterResolver, RetryConfig};
pub use permission_set::{sso_instance_arn, PermissionSetHandle, PermissionSetRegistry};
pub use team::{
    AssignmentOutcome, AssignmentStatus, TeamOutcome, TeamProvisionRequest, TeamProvisioner,
};
