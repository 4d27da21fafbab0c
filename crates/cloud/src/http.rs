use crate::api::{IdentityStoreApi, OrganizationsApi, ParameterStoreApi, SsoAdminApi};
use crate::error::{CloudApiError, Result};
use async_trait::async_trait;
use lz_models::{
    AccountId, CreateAccount, OuId, PermissionSetDefinition, PermissionSetId, PrincipalId,
    PrincipalType, RootId,
};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CloudConfig {
    pub base_url: String,
    pub api_token: String,
    pub request_timeout: Duration,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".to_string(),
            api_token: String::new(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl CloudConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("CLOUD_API_URL").unwrap_or_else(|_| Self::default().base_url),
            api_token: std::env::var("CLOUD_API_TOKEN").unwrap_or_default(),
            request_timeout: Duration::from_secs(
                std::env::var("CLOUD_API_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }
}

/// JSON client for the control-plane endpoint fronting the organization,
/// SSO and parameter services.
#[derive(Clone)]
pub struct HttpCloudClient {
    client: reqwest::Client,
    config: CloudConfig,
}

#[derive(Debug, Deserialize)]
struct IdResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct RootResponse {
    root_id: String,
}

#[derive(Debug, Deserialize)]
struct ValueResponse {
    value: String,
}

#[derive(Debug, Deserialize)]
struct PrincipalResponse {
    principal_type: PrincipalType,
}

#[derive(Debug, Serialize)]
struct CreateOuBody<'a> {
    name: &'a str,
    parent_id: &'a str,
}

#[derive(Debug, Serialize)]
struct CreatePermissionSetBody<'a> {
    instance_arn: &'a str,
    #[serde(flatten)]
    definition: &'a PermissionSetDefinition,
}

#[derive(Debug, Serialize)]
struct CreateAssignmentBody<'a> {
    instance_arn: &'a str,
    account_id: &'a str,
    permission_set_id: &'a str,
    principal_id: &'a str,
    principal_type: PrincipalType,
}

impl HttpCloudClient {
    pub fn new(config: CloudConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CloudApiError::Unavailable(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.url(path))
            .bearer_auth(&self.config.api_token)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .get(self.url(path))
            .bearer_auth(&self.config.api_token)
    }

    /// Map a non-success status from a generic endpoint onto the error
    /// taxonomy. Account-creation statuses are mapped separately; a
    /// rate-limited lookup is an availability problem, not a quota one.
    fn status_error(status: StatusCode, context: &str, detail: &str) -> CloudApiError {
        match status {
            StatusCode::NOT_FOUND => CloudApiError::OuNotFound(context.to_string()),
            _ => CloudApiError::Unavailable(format!("{context}: {status} {detail}")),
        }
    }

    /// Statuses the account-creation endpoint alone gives meaning to.
    fn account_create_error(status: StatusCode, email: &str) -> Option<CloudApiError> {
        match status {
            StatusCode::CONFLICT => Some(CloudApiError::DuplicateAccountEmail(email.to_string())),
            StatusCode::TOO_MANY_REQUESTS => Some(CloudApiError::AccountQuotaExceeded),
            _ => None,
        }
    }

    async fn check(response: reqwest::Response, context: &str) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let detail = response.text().await.unwrap_or_default();
        Err(Self::status_error(status, context, &detail))
    }
}

#[async_trait]
impl OrganizationsApi for HttpCloudClient {
    async fn ensure_organization(&self) -> Result<RootId> {
        let response = self.post("/organization").send().await?;
        let response = Self::check(response, "ensure organization").await?;
        let body: RootResponse = response.json().await?;
        Ok(RootId::new(body.root_id))
    }

    async fn find_ou_by_name(&self, name: &str, parent_id: &str) -> Result<Option<OuId>> {
        let response = self
            .get("/organizational-units")
            .query(&[("name", name), ("parent_id", parent_id)])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::check(response, "find organizational unit").await?;
        let body: IdResponse = response.json().await?;
        Ok(Some(OuId::new(body.id)))
    }

    async fn create_ou(&self, name: &str, parent_id: &str) -> Result<OuId> {
        let response = self
            .post("/organizational-units")
            .json(&CreateOuBody { name, parent_id })
            .send()
            .await?;
        let response = Self::check(response, "create organizational unit").await?;
        let body: IdResponse = response.json().await?;
        Ok(OuId::new(body.id))
    }

    async fn create_account(&self, request: &CreateAccount) -> Result<AccountId> {
        let response = self.post("/accounts").json(request).send().await?;

        if let Some(err) = Self::account_create_error(response.status(), &request.email) {
            return Err(err);
        }
        let response = Self::check(response, "create account").await?;
        let body: IdResponse = response.json().await?;
        Ok(AccountId::new(body.id))
    }
}

#[async_trait]
impl SsoAdminApi for HttpCloudClient {
    async fn create_permission_set(
        &self,
        instance_arn: &str,
        definition: &PermissionSetDefinition,
    ) -> Result<PermissionSetId> {
        let response = self
            .post("/permission-sets")
            .json(&CreatePermissionSetBody {
                instance_arn,
                definition,
            })
            .send()
            .await?;
        let response = Self::check(response, "create permission set").await?;
        let body: IdResponse = response.json().await?;
        Ok(PermissionSetId::new(body.id))
    }

    async fn create_account_assignment(
        &self,
        instance_arn: &str,
        account_id: &AccountId,
        permission_set_id: &PermissionSetId,
        principal_id: &PrincipalId,
        principal_type: PrincipalType,
    ) -> Result<()> {
        let response = self
            .post("/account-assignments")
            .json(&CreateAssignmentBody {
                instance_arn,
                account_id: account_id.as_str(),
                permission_set_id: permission_set_id.as_str(),
                principal_id: principal_id.as_str(),
                principal_type,
            })
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            return Err(CloudApiError::AssignmentConflict {
                account_id: account_id.to_string(),
                principal_id: principal_id.to_string(),
            });
        }
        Self::check(response, "create account assignment").await?;
        Ok(())
    }
}

#[async_trait]
impl IdentityStoreApi for HttpCloudClient {
    async fn lookup_principal(
        &self,
        identity_store_id: &str,
        principal_id: &PrincipalId,
    ) -> Result<PrincipalType> {
        let response = self
            .get(&format!(
                "/identity-store/{identity_store_id}/principals/{principal_id}"
            ))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(CloudApiError::PrincipalNotFound(principal_id.to_string()));
        }
        let response = Self::check(response, "lookup principal").await?;
        let body: PrincipalResponse = response.json().await?;
        Ok(body.principal_type)
    }
}

#[async_trait]
impl ParameterStoreApi for HttpCloudClient {
    async fn get_parameter(&self, name: &str) -> Result<String> {
        let response = self.get(&format!("/parameters/{name}")).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(CloudApiError::ParameterNotFound(name.to_string()));
        }
        let response = Self::check(response, "get parameter").await?;
        let body: ValueResponse = response.json().await?;
        Ok(body.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_lookup_is_unavailable_not_quota() {
        let err = HttpCloudClient::status_error(
            StatusCode::TOO_MANY_REQUESTS,
            "get parameter",
            "slow down",
        );
        assert!(matches!(err, CloudApiError::Unavailable(_)));
    }

    #[test]
    fn test_missing_resource_maps_to_not_found() {
        let err = HttpCloudClient::status_error(
            StatusCode::NOT_FOUND,
            "find organizational unit",
            "",
        );
        assert!(matches!(err, CloudApiError::OuNotFound(_)));
    }

    #[test]
    fn test_server_error_maps_to_unavailable() {
        let err =
            HttpCloudClient::status_error(StatusCode::INTERNAL_SERVER_ERROR, "create account", "");
        assert!(matches!(err, CloudApiError::Unavailable(_)));
    }

    #[test]
    fn test_account_creation_statuses() {
        assert!(matches!(
            HttpCloudClient::account_create_error(StatusCode::CONFLICT, "taken@example.de"),
            Some(CloudApiError::DuplicateAccountEmail(email)) if email == "taken@example.de"
        ));
        assert!(matches!(
            HttpCloudClient::account_create_error(StatusCode::TOO_MANY_REQUESTS, "any@example.de"),
            Some(CloudApiError::AccountQuotaExceeded)
        ));
        assert!(
            HttpCloudClient::account_create_error(StatusCode::CREATED, "ok@example.de").is_none()
        );
    }
}
