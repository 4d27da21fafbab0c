use crate::ids::{AccountId, PermissionSetId, PrincipalId};
use serde::{Deserialize, Serialize};

/// Kind of principal an identity-store identifier resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrincipalType {
    User,
    Group,
}

impl std::fmt::Display for PrincipalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrincipalType::User => f.write_str("USER"),
            PrincipalType::Group => f.write_str("GROUP"),
        }
    }
}

/// The binding of one principal to one permission set on one account.
///
/// Derived from team descriptors, never persisted by the composer. For a
/// given (account, permission set) the assigned principals must equal the
/// set union of member lists across every descriptor targeting that
/// account, with one remote request per unique principal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub account_id: AccountId,
    pub principal_id: PrincipalId,
    pub permission_set_id: PermissionSetId,
}
