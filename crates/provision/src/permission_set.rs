use crate::error::Result;
use lz_cloud::SsoAdminApi;
use lz_models::{PermissionSet, PermissionSetDefinition};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Read-only handle to the shared administrative permission set, fanned
/// out to every team unit.
pub type PermissionSetHandle = Arc<PermissionSet>;

/// The ARN of an SSO instance, derived from its resolved identifier.
pub fn sso_instance_arn(sso_id: &str) -> String {
    format!("arn:aws:sso:::instance/{}", sso_id)
}

/// Holds the single administrative permission set of a deployment.
///
/// The definition is fixed and version-controlled; it is created at most
/// once per deployment and every caller receives the same handle, never a
/// per-team redefinition.
pub struct PermissionSetRegistry {
    sso: Arc<dyn SsoAdminApi>,
    instance_arn: String,
    definition: PermissionSetDefinition,
    handle: OnceCell<PermissionSetHandle>,
}

impl PermissionSetRegistry {
    pub fn new(sso: Arc<dyn SsoAdminApi>, instance_arn: String) -> Self {
        Self::with_definition(sso, instance_arn, PermissionSetDefinition::administrator_access())
    }

    pub fn with_definition(
        sso: Arc<dyn SsoAdminApi>,
        instance_arn: String,
        definition: PermissionSetDefinition,
    ) -> Self {
        Self {
            sso,
            instance_arn,
            definition,
            handle: OnceCell::new(),
        }
    }

    pub async fn get_or_create(&self) -> Result<PermissionSetHandle> {
        let handle = self
            .handle
            .get_or_try_init(|| async {
                let id = self
                    .sso
                    .create_permission_set(&self.instance_arn, &self.definition)
                    .await?;
                tracing::info!(
                    permission_set = %self.definition.name,
                    id = %id,
                    "Created administrative permission set"
                );

                Ok::<_, crate::error::ProvisionError>(Arc::new(PermissionSet {
                    id,
                    name: self.definition.name.clone(),
                    session_duration: self.definition.session_duration.clone(),
                    managed_policy_arns: self.definition.managed_policy_arns.clone(),
                }))
            })
            .await?;

        Ok(handle.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lz_cloud::InMemoryCloud;
    use lz_models::{ADMIN_PERMISSION_SET_NAME, ADMIN_SESSION_DURATION};

    #[tokio::test]
    async fn test_created_once_and_shared() {
        let cloud = Arc::new(InMemoryCloud::new());
        let registry =
            PermissionSetRegistry::new(cloud.clone(), sso_instance_arn("ssoins-1"));

        let first = registry.get_or_create().await.unwrap();
        let second = registry.get_or_create().await.unwrap();

        assert_eq!(first.id, second.id);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cloud.counts().permission_set_creates, 1);
    }

    #[tokio::test]
    async fn test_administrative_definition_is_fixed() {
        let cloud = Arc::new(InMemoryCloud::new());
        let registry =
            PermissionSetRegistry::new(cloud.clone(), sso_instance_arn("ssoins-1"));

        let handle = registry.get_or_create().await.unwrap();
        assert_eq!(handle.name, ADMIN_PERMISSION_SET_NAME);
        assert_eq!(handle.session_duration, ADMIN_SESSION_DURATION);
        assert_eq!(
            handle.managed_policy_arns,
            vec!["arn:aws:iam::aws:policy/AdministratorAccess".to_string()]
        );
    }

    #[test]
    fn test_instance_arn_template() {
        assert_eq!(
            sso_instance_arn("ssoins-abc"),
            "arn:aws:sso:::instance/ssoins-abc"
        );
    }
}
