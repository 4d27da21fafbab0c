use crate::error::Result;
use lz_cloud::OrganizationsApi;
use lz_models::{Account, CreateAccount, OuId};
use std::sync::Arc;
use validator::Validate;

/// Requests creation of isolated member accounts under an organizational
/// unit.
///
/// Creation is asynchronous at the remote service, so a returned account
/// is "request accepted", not "fully provisioned"; downstream assignment
/// requests reference it and the external orchestrator sequences them.
/// Email uniqueness across the organization is the remote API's call to
/// make — a rejection surfaces here untouched.
pub struct AccountFactory {
    organizations: Arc<dyn OrganizationsApi>,
}

impl AccountFactory {
    pub fn new(organizations: Arc<dyn OrganizationsApi>) -> Self {
        Self { organizations }
    }

    pub async fn create_account(
        &self,
        name: &str,
        email: &str,
        parent_ou: &OuId,
    ) -> Result<Account> {
        let request = CreateAccount {
            name: name.to_string(),
            email: email.to_string(),
            organizational_unit_id: parent_ou.clone(),
        };
        request.validate()?;

        let id = self.organizations.create_account(&request).await?;
        tracing::info!(account = name, id = %id, "Account creation request accepted");

        Ok(Account {
            id,
            name: request.name,
            email: request.email,
            organizational_unit_id: request.organizational_unit_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProvisionError;
    use lz_cloud::{CloudApiError, InMemoryCloud};

    async fn teams_ou(cloud: &Arc<InMemoryCloud>) -> OuId {
        let root = cloud.ensure_organization().await.unwrap();
        cloud.create_ou("OU - AWS Teams", root.as_str()).await.unwrap()
    }

    #[tokio::test]
    async fn test_account_is_placed_under_parent_ou() {
        let cloud = Arc::new(InMemoryCloud::new());
        let ou = teams_ou(&cloud).await;
        let factory = AccountFactory::new(cloud.clone());

        let account = factory
            .create_account("west-vader", "west-aws-vader@example.de", &ou)
            .await
            .unwrap();

        assert_eq!(account.organizational_unit_id, ou);
        assert_eq!(cloud.counts().account_creates, 1);
    }

    #[tokio::test]
    async fn test_remote_duplicate_email_surfaces() {
        let cloud = Arc::new(InMemoryCloud::new());
        let ou = teams_ou(&cloud).await;
        let factory = AccountFactory::new(cloud.clone());

        factory
            .create_account("first", "shared@example.de", &ou)
            .await
            .unwrap();
        let err = factory
            .create_account("second", "shared@example.de", &ou)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProvisionError::Cloud(CloudApiError::DuplicateAccountEmail(_))
        ));
    }

    #[tokio::test]
    async fn test_quota_exhaustion_surfaces() {
        let cloud = Arc::new(InMemoryCloud::new().with_account_quota(0));
        let ou = teams_ou(&cloud).await;
        let factory = AccountFactory::new(cloud.clone());

        let err = factory
            .create_account("west-vader", "west@example.de", &ou)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProvisionError::Cloud(CloudApiError::AccountQuotaExceeded)
        ));
    }

    #[tokio::test]
    async fn test_malformed_email_rejected_before_any_remote_call() {
        let cloud = Arc::new(InMemoryCloud::new());
        let ou = teams_ou(&cloud).await;
        let factory = AccountFactory::new(cloud.clone());

        assert!(factory
            .create_account("west-vader", "not-an-email", &ou)
            .await
            .is_err());
        assert_eq!(cloud.counts().account_creates, 0);
    }
}
