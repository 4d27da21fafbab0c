use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProvisionError>;

#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Cloud API error: {0}")]
    Cloud(#[from] lz_cloud::CloudApiError),

    #[error("Parameter {name} not present after {attempts} attempts")]
    ParameterResolutionTimeout { name: String, attempts: u32 },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Email {email} is used by both '{first}' and '{second}' in this deployment")]
    DuplicateDescriptorEmail {
        email: String,
        first: String,
        second: String,
    },

    #[error("Account name '{0}' appears more than once in this deployment")]
    DuplicateAccountName(String),

    #[error("Organizational unit '{0}' is not declared in this deployment")]
    UnknownOrganizationalUnit(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for ProvisionError {
    fn from(err: validator::ValidationErrors) -> Self {
        ProvisionError::Validation(err.to_string())
    }
}
