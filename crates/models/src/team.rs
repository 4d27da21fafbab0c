use crate::ids::PrincipalId;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One team's slice of the deployment descriptor: the account to stand up
/// and the principals that receive the shared administrative permission
/// set on it.
///
/// Supplied once at composition time and immutable thereafter. Member
/// order is preserved so plans are reproducible; an empty member list is
/// valid and provisions an account with no initial access.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TeamDescriptor {
    #[validate(length(min = 1, max = 64))]
    pub team_name: String,

    #[validate(length(min = 1, max = 64))]
    pub account_name: String,

    #[validate(email)]
    pub email: String,

    #[serde(default)]
    pub member_principal_ids: Vec<PrincipalId>,
}
