use crate::error::{ProvisionError, Result};
use lz_cloud::{CloudApiError, ParameterStoreApi};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Polling budget for parameter stores that are not synchronously
/// consistent. The default performs a single attempt: a missing parameter
/// is then fatal immediately.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
        }
    }
}

impl RetryConfig {
    pub fn polling(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }
}

/// Fetches named configuration values from the remote parameter store and
/// memoizes them for the rest of the composition run, so resolving the
/// same name twice cannot observe drift.
pub struct ParameterResolver {
    store: Arc<dyn ParameterStoreApi>,
    retry: RetryConfig,
    cache: Mutex<HashMap<String, String>>,
}

impl ParameterResolver {
    pub fn new(store: Arc<dyn ParameterStoreApi>) -> Self {
        Self::with_retry(store, RetryConfig::default())
    }

    pub fn with_retry(store: Arc<dyn ParameterStoreApi>, retry: RetryConfig) -> Self {
        Self {
            store,
            retry,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub async fn resolve(&self, name: &str) -> Result<String> {
        if let Some(value) = self.cache.lock().unwrap().get(name) {
            return Ok(value.clone());
        }

        let value = self.fetch(name).await?;
        tracing::debug!(parameter = name, "Resolved deployment parameter");

        self.cache
            .lock()
            .unwrap()
            .insert(name.to_string(), value.clone());
        Ok(value)
    }

    async fn fetch(&self, name: &str) -> Result<String> {
        let mut delay = self.retry.initial_delay;

        for attempt in 1..=self.retry.max_attempts {
            match self.store.get_parameter(name).await {
                Ok(value) => return Ok(value),
                // Only a missing value is worth polling for; everything
                // else is surfaced as-is.
                Err(CloudApiError::ParameterNotFound(_)) if attempt < self.retry.max_attempts => {
                    tracing::debug!(
                        parameter = name,
                        attempt,
                        "Parameter not present yet, polling"
                    );
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(self.retry.max_delay);
                }
                Err(CloudApiError::ParameterNotFound(_)) if self.retry.max_attempts > 1 => {
                    return Err(ProvisionError::ParameterResolutionTimeout {
                        name: name.to_string(),
                        attempts: self.retry.max_attempts,
                    });
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(ProvisionError::Internal(format!(
            "parameter retry budget of zero attempts for {}",
            name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lz_cloud::InMemoryCloud;

    #[tokio::test]
    async fn test_resolving_twice_fetches_once() {
        let cloud = Arc::new(InMemoryCloud::new().with_parameter("sso-id", "ssoins-1"));
        let resolver = ParameterResolver::new(cloud.clone());

        assert_eq!(resolver.resolve("sso-id").await.unwrap(), "ssoins-1");
        assert_eq!(resolver.resolve("sso-id").await.unwrap(), "ssoins-1");
        assert_eq!(cloud.counts().parameter_fetches, 1);
    }

    #[tokio::test]
    async fn test_resolved_value_is_stable_across_external_mutation() {
        let cloud = Arc::new(InMemoryCloud::new().with_parameter("sso-id", "ssoins-1"));
        let resolver = ParameterResolver::new(cloud.clone());

        assert_eq!(resolver.resolve("sso-id").await.unwrap(), "ssoins-1");
        cloud.set_parameter("sso-id", "ssoins-2");
        assert_eq!(resolver.resolve("sso-id").await.unwrap(), "ssoins-1");
    }

    #[tokio::test]
    async fn test_missing_parameter_is_fatal_without_polling() {
        let cloud = Arc::new(InMemoryCloud::new());
        let resolver = ParameterResolver::new(cloud.clone());

        let err = resolver.resolve("identity-store-id").await.unwrap_err();
        assert!(matches!(
            err,
            ProvisionError::Cloud(CloudApiError::ParameterNotFound(_))
        ));
        assert_eq!(cloud.counts().parameter_fetches, 1);
    }

    #[tokio::test]
    async fn test_polling_budget_exhaustion_times_out() {
        let cloud = Arc::new(InMemoryCloud::new());
        let resolver = ParameterResolver::with_retry(
            cloud.clone(),
            RetryConfig {
                max_attempts: 3,
                initial_delay: Duration::from_millis(1),
                max_delay: Duration::from_millis(2),
            },
        );

        let err = resolver.resolve("sso-id").await.unwrap_err();
        assert!(matches!(
            err,
            ProvisionError::ParameterResolutionTimeout { attempts: 3, .. }
        ));
        assert_eq!(cloud.counts().parameter_fetches, 3);
    }

    #[tokio::test]
    async fn test_value_appearing_mid_poll_resolves() {
        let cloud = Arc::new(InMemoryCloud::new());
        let resolver = ParameterResolver::with_retry(
            cloud.clone(),
            RetryConfig {
                max_attempts: 5,
                initial_delay: Duration::from_millis(5),
                max_delay: Duration::from_millis(10),
            },
        );

        let writer = cloud.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(8)).await;
            writer.set_parameter("sso-id", "ssoins-late");
        });

        assert_eq!(resolver.resolve("sso-id").await.unwrap(), "ssoins-late");
        handle.await.unwrap();
    }
}
