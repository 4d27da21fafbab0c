use crate::api::{IdentityStoreApi, OrganizationsApi, ParameterStoreApi, SsoAdminApi};
use crate::error::{CloudApiError, Result};
use async_trait::async_trait;
use lz_models::{
    AccountId, CreateAccount, OuId, PermissionSetDefinition, PermissionSetId, PrincipalId,
    PrincipalType, RootId,
};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use uuid::Uuid;

/// Per-API call counters, used by tests to pin down exactly how many
/// remote requests a composition emits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub parameter_fetches: u64,
    pub ou_creates: u64,
    pub account_creates: u64,
    pub permission_set_creates: u64,
    pub assignment_creates: u64,
}

#[derive(Debug, Default)]
struct State {
    root: Option<RootId>,
    /// (parent_id, name) -> OU id
    ous: HashMap<(String, String), OuId>,
    account_emails: HashSet<String>,
    accounts: HashMap<AccountId, CreateAccount>,
    permission_sets: HashMap<PermissionSetId, PermissionSetDefinition>,
    assignments: HashSet<(AccountId, PermissionSetId, PrincipalId)>,
    parameters: HashMap<String, String>,
    principals: HashMap<PrincipalId, PrincipalType>,
    account_quota: Option<usize>,
    counts: CallCounts,
}

/// In-process stand-in for the remote collaborators, enforcing the same
/// semantics the real services do: duplicate account emails and duplicate
/// assignments are rejected, OU lookup by name is idempotent, account ids
/// are minted on request acceptance.
///
/// Backs the test suites and the CLI dry-run mode.
#[derive(Debug, Default)]
pub struct InMemoryCloud {
    state: Mutex<State>,
    /// When set, unknown principal ids resolve as users instead of
    /// failing. Dry runs have no identity store to consult.
    resolve_unknown_principals: bool,
}

impl InMemoryCloud {
    pub fn new() -> Self {
        Self::default()
    }

    /// A variant for dry runs: every principal id resolves as a user.
    pub fn permissive() -> Self {
        Self {
            state: Mutex::default(),
            resolve_unknown_principals: true,
        }
    }

    pub fn with_parameter(self, name: &str, value: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .parameters
            .insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_principal(self, id: &str, principal_type: PrincipalType) -> Self {
        self.state
            .lock()
            .unwrap()
            .principals
            .insert(PrincipalId::new(id), principal_type);
        self
    }

    pub fn with_account_quota(self, quota: usize) -> Self {
        self.state.lock().unwrap().account_quota = Some(quota);
        self
    }

    pub fn set_parameter(&self, name: &str, value: &str) {
        self.state
            .lock()
            .unwrap()
            .parameters
            .insert(name.to_string(), value.to_string());
    }

    pub fn counts(&self) -> CallCounts {
        self.state.lock().unwrap().counts.clone()
    }

    pub fn account_count(&self) -> usize {
        self.state.lock().unwrap().accounts.len()
    }

    pub fn assignments(&self) -> Vec<(AccountId, PermissionSetId, PrincipalId)> {
        let state = self.state.lock().unwrap();
        let mut all: Vec<_> = state.assignments.iter().cloned().collect();
        all.sort();
        all
    }

    pub fn account_named(&self, name: &str) -> Option<AccountId> {
        let state = self.state.lock().unwrap();
        state
            .accounts
            .iter()
            .find(|(_, request)| request.name == name)
            .map(|(id, _)| id.clone())
    }

    fn mint(prefix: &str) -> String {
        format!("{}-{}", prefix, Uuid::new_v4())
    }
}

#[async_trait]
impl OrganizationsApi for InMemoryCloud {
    async fn ensure_organization(&self) -> Result<RootId> {
        let mut state = self.state.lock().unwrap();
        if state.root.is_none() {
            state.root = Some(RootId::new(Self::mint("r")));
        }
        Ok(state.root.clone().unwrap())
    }

    async fn find_ou_by_name(&self, name: &str, parent_id: &str) -> Result<Option<OuId>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .ous
            .get(&(parent_id.to_string(), name.to_string()))
            .cloned())
    }

    async fn create_ou(&self, name: &str, parent_id: &str) -> Result<OuId> {
        let mut state = self.state.lock().unwrap();
        let key = (parent_id.to_string(), name.to_string());
        if state.ous.contains_key(&key) {
            return Err(CloudApiError::Unavailable(format!(
                "organizational unit already exists: {}",
                name
            )));
        }
        let id = OuId::new(Self::mint("ou"));
        state.ous.insert(key, id.clone());
        state.counts.ou_creates += 1;
        Ok(id)
    }

    async fn create_account(&self, request: &CreateAccount) -> Result<AccountId> {
        let mut state = self.state.lock().unwrap();
        state.counts.account_creates += 1;

        if let Some(quota) = state.account_quota {
            if state.accounts.len() >= quota {
                return Err(CloudApiError::AccountQuotaExceeded);
            }
        }
        if !state.account_emails.insert(request.email.clone()) {
            return Err(CloudApiError::DuplicateAccountEmail(request.email.clone()));
        }

        let id = AccountId::new(Self::mint("acc"));
        state.accounts.insert(id.clone(), request.clone());
        Ok(id)
    }
}

#[async_trait]
impl SsoAdminApi for InMemoryCloud {
    async fn create_permission_set(
        &self,
        _instance_arn: &str,
        definition: &PermissionSetDefinition,
    ) -> Result<PermissionSetId> {
        let mut state = self.state.lock().unwrap();
        let id = PermissionSetId::new(Self::mint("ps"));
        state.permission_sets.insert(id.clone(), definition.clone());
        state.counts.permission_set_creates += 1;
        Ok(id)
    }

    async fn create_account_assignment(
        &self,
        _instance_arn: &str,
        account_id: &AccountId,
        permission_set_id: &PermissionSetId,
        principal_id: &PrincipalId,
        _principal_type: PrincipalType,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.counts.assignment_creates += 1;

        let key = (
            account_id.clone(),
            permission_set_id.clone(),
            principal_id.clone(),
        );
        if !state.assignments.insert(key) {
            return Err(CloudApiError::AssignmentConflict {
                account_id: account_id.to_string(),
                principal_id: principal_id.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityStoreApi for InMemoryCloud {
    async fn lookup_principal(
        &self,
        _identity_store_id: &str,
        principal_id: &PrincipalId,
    ) -> Result<PrincipalType> {
        let state = self.state.lock().unwrap();
        match state.principals.get(principal_id) {
            Some(principal_type) => Ok(*principal_type),
            None if self.resolve_unknown_principals => Ok(PrincipalType::User),
            None => Err(CloudApiError::PrincipalNotFound(principal_id.to_string())),
        }
    }
}

#[async_trait]
impl ParameterStoreApi for InMemoryCloud {
    async fn get_parameter(&self, name: &str) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.counts.parameter_fetches += 1;
        state
            .parameters
            .get(name)
            .cloned()
            .ok_or_else(|| CloudApiError::ParameterNotFound(name.to_string()))
    }
}
