use crate::ids::{OuId, RootId};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Parent of an organizational unit: the organization root or another OU.
/// The hierarchy is a strict tree; a parent reference always resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ParentRef {
    Root,
    Ou(OuId),
}

impl ParentRef {
    /// The raw parent identifier to send to the organization API.
    pub fn remote_id<'a>(&'a self, root: &'a RootId) -> &'a str {
        match self {
            ParentRef::Root => root.as_str(),
            ParentRef::Ou(id) => id.as_str(),
        }
    }
}

/// A node in the organization hierarchy, keyed by stable logical name so
/// that re-applying a deployment reuses the existing unit instead of
/// creating a duplicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationalUnit {
    pub id: OuId,
    pub name: String,
    pub parent: ParentRef,
}

/// Request to create (or adopt) an organizational unit.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrganizationalUnit {
    #[validate(length(min = 1, max = 128))]
    pub name: String,

    pub parent: ParentRef,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_ref_resolves_root_and_ou() {
        let root = RootId::new("r-root");
        assert_eq!(ParentRef::Root.remote_id(&root), "r-root");

        let parent = ParentRef::Ou(OuId::new("ou-42"));
        assert_eq!(parent.remote_id(&root), "ou-42");
    }
}
