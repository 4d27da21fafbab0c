use thiserror::Error;

pub type Result<T> = std::result::Result<T, CloudApiError>;

/// Failures surfaced by the remote collaborator APIs.
///
/// None of these trigger compensating rollback: emitted creations are
/// committed, and cleanup is an explicit operator decision.
#[derive(Debug, Error)]
pub enum CloudApiError {
    #[error("Parameter not found: {0}")]
    ParameterNotFound(String),

    #[error("Account email already in use: {0}")]
    DuplicateAccountEmail(String),

    #[error("Account quota exceeded")]
    AccountQuotaExceeded,

    #[error("Assignment already exists for principal {principal_id} on account {account_id}")]
    AssignmentConflict {
        account_id: String,
        principal_id: String,
    },

    #[error("Principal not found in identity store: {0}")]
    PrincipalNotFound(String),

    #[error("Organizational unit not found: {0}")]
    OuNotFound(String),

    #[error("Organization API unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed collaborator response: {0}")]
    Protocol(String),
}

impl From<reqwest::Error> for CloudApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CloudApiError::Protocol(err.to_string())
        } else {
            CloudApiError::Unavailable(err.to_string())
        }
    }
}
