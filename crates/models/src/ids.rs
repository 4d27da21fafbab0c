use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! remote_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

remote_id! {
    /// Identifier of the organization root, returned when the organization
    /// is created or described.
    RootId
}

remote_id! {
    /// Remote-issued identifier of an organizational unit.
    OuId
}

remote_id! {
    /// Remote-issued identifier of a member account.
    AccountId
}

remote_id! {
    /// Remote-issued identifier of a permission set.
    PermissionSetId
}

remote_id! {
    /// Opaque identity-store identifier of a user or group. Supplied in
    /// deployment descriptors and resolved against the identity store.
    PrincipalId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_serde_are_transparent() {
        let id = AccountId::new("acc-123");
        assert_eq!(id.to_string(), "acc-123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"acc-123\"");

        let parsed: AccountId = serde_json::from_str("\"acc-456\"").unwrap();
        assert_eq!(parsed.as_str(), "acc-456");
    }
}
