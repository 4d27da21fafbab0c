use crate::account::StandaloneAccount;
use crate::team::TeamDescriptor;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// The sole configuration surface of a deployment: every team descriptor,
/// every additional organizational unit, and every standalone account.
/// Each distinct team descriptor is the unit of change.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct DeploymentDescriptor {
    /// Additional OUs created directly under the organization root,
    /// beside the teams OU (e.g. a consulting OU holding payer accounts).
    #[serde(default)]
    pub organizational_units: Vec<String>,

    #[serde(default)]
    #[validate(nested)]
    pub teams: Vec<TeamDescriptor>,

    /// Non-team accounts placed under one of `organizational_units`.
    #[serde(default)]
    #[validate(nested)]
    pub accounts: Vec<StandaloneAccount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_roundtrip() {
        let json = r#"
        {
            "organizational_units": ["ConsultingOU"],
            "teams": [
                {
                    "team_name": "nord-neo",
                    "account_name": "nord-neo",
                    "email": "nord-aws-neo@example.de",
                    "member_principal_ids": ["p-1", "p-2"]
                }
            ],
            "accounts": [
                {
                    "name": "payer",
                    "email": "payer@example.de",
                    "organizational_unit": "ConsultingOU"
                }
            ]
        }
        "#;

        let descriptor: DeploymentDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.teams.len(), 1);
        assert_eq!(descriptor.teams[0].member_principal_ids.len(), 2);
        assert_eq!(descriptor.accounts[0].organizational_unit, "ConsultingOU");
        assert!(descriptor.validate().is_ok());
    }
}
