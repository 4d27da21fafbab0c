pub mod api;
pub mod error;
pub mod http;
pub mod memory;

pub use api::{IdentityStoreApi, OrganizationsApi, ParameterStoreApi, SsoAdminApi};
pub use error::{CloudApiError, Result};
pub use http::{CloudConfig, HttpCloudClient};
pub use memory::{CallCounts, InMemoryCloud};
