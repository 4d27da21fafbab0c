use crate::ids::{AccountId, OuId};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A member account: an isolated resource and billing boundary owned by
/// exactly one organizational unit at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    pub organizational_unit_id: OuId,
}

/// Request to create a member account under an organizational unit.
///
/// Email uniqueness across the organization is enforced by the remote API;
/// the composer only rejects duplicates within a single deployment
/// descriptor set before emitting anything.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAccount {
    #[validate(length(min = 1, max = 64))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    pub organizational_unit_id: OuId,
}

/// A non-team account provisioned directly under a named organizational
/// unit (payer accounts, shared proof-of-concept accounts and the like).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StandaloneAccount {
    #[validate(length(min = 1, max = 64))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    /// Logical name of the OU this account lives under.
    #[validate(length(min = 1, max = 128))]
    pub organizational_unit: String,
}
