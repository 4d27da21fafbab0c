use lz_provision::{ComposerConfig, RetryConfig};

#[derive(Debug, Clone)]
pub struct Config {
    pub teams_ou_name: String,
    pub sso_parameter: String,
    pub identity_store_parameter: String,
    pub parameter_max_attempts: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            teams_ou_name: std::env::var("TEAMS_OU_NAME")
                .unwrap_or_else(|_| "OU - AWS Teams".to_string()),
            sso_parameter: std::env::var("SSO_PARAMETER_NAME")
                .unwrap_or_else(|_| "sso-id".to_string()),
            identity_store_parameter: std::env::var("IDENTITY_STORE_PARAMETER_NAME")
                .unwrap_or_else(|_| "identity-store-id".to_string()),
            parameter_max_attempts: std::env::var("PARAMETER_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1),
        }
    }

    pub fn composer(&self) -> ComposerConfig {
        ComposerConfig {
            teams_ou_name: self.teams_ou_name.clone(),
            sso_parameter: self.sso_parameter.clone(),
            identity_store_parameter: self.identity_store_parameter.clone(),
            parameter_retry: RetryConfig::polling(self.parameter_max_attempts),
        }
    }
}
