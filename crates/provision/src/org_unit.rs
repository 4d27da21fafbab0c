use crate::error::Result;
use lz_cloud::OrganizationsApi;
use lz_models::{CreateOrganizationalUnit, OrganizationalUnit, OuId, RootId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use validator::Validate;

/// Creates organizational units keyed by stable logical name.
///
/// An OU that already exists under the same parent — from an earlier run
/// or earlier in this run — is adopted instead of re-created, so applying
/// a deployment twice is a no-op rather than a duplicate-creation error.
pub struct OuService {
    organizations: Arc<dyn OrganizationsApi>,
    root: RootId,
    /// (parent remote id, name) -> OU id, for this run.
    known: Mutex<HashMap<(String, String), OuId>>,
}

impl OuService {
    pub fn new(organizations: Arc<dyn OrganizationsApi>, root: RootId) -> Self {
        Self {
            organizations,
            root,
            known: Mutex::new(HashMap::new()),
        }
    }

    pub async fn ensure_ou(&self, request: &CreateOrganizationalUnit) -> Result<OrganizationalUnit> {
        request.validate()?;

        let parent_id = request.parent.remote_id(&self.root).to_string();
        let key = (parent_id.clone(), request.name.clone());

        if let Some(id) = self.known.lock().unwrap().get(&key) {
            return Ok(self.unit(id.clone(), request));
        }

        let id = match self
            .organizations
            .find_ou_by_name(&request.name, &parent_id)
            .await?
        {
            Some(existing) => {
                tracing::info!(ou = %request.name, id = %existing, "Adopted existing organizational unit");
                existing
            }
            None => {
                let created = self.organizations.create_ou(&request.name, &parent_id).await?;
                tracing::info!(ou = %request.name, id = %created, "Created organizational unit");
                created
            }
        };

        self.known.lock().unwrap().insert(key, id.clone());
        Ok(self.unit(id, request))
    }

    fn unit(&self, id: OuId, request: &CreateOrganizationalUnit) -> OrganizationalUnit {
        OrganizationalUnit {
            id,
            name: request.name.clone(),
            parent: request.parent.clone(),
        }
    }
}
