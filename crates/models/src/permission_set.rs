use crate::ids::PermissionSetId;
use serde::{Deserialize, Serialize};

/// Name of the shared administrative permission set.
pub const ADMIN_PERMISSION_SET_NAME: &str = "Cloud-Team-AdministratorAccess";

/// Session duration for administrative sessions, ISO-8601.
pub const ADMIN_SESSION_DURATION: &str = "PT1H";

/// Managed policy attached to the administrative permission set.
pub const ADMIN_MANAGED_POLICY_ARN: &str = "arn:aws:iam::aws:policy/AdministratorAccess";

/// A named bundle of managed policies plus a session duration, assignable
/// to principals on specific accounts.
///
/// Exactly one administrative instance exists per deployment; team accounts
/// reference it by identifier and never redefine it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionSet {
    pub id: PermissionSetId,
    pub name: String,
    /// ISO-8601 duration, e.g. `PT1H`.
    pub session_duration: String,
    pub managed_policy_arns: Vec<String>,
}

/// The fixed, version-controlled definition of the administrative
/// permission set. Not derived per team.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionSetDefinition {
    pub name: String,
    pub session_duration: String,
    pub managed_policy_arns: Vec<String>,
}

impl PermissionSetDefinition {
    pub fn administrator_access() -> Self {
        Self {
            name: ADMIN_PERMISSION_SET_NAME.to_string(),
            session_duration: ADMIN_SESSION_DURATION.to_string(),
            managed_policy_arns: vec![ADMIN_MANAGED_POLICY_ARN.to_string()],
        }
    }
}
