//! In-memory identity provider for tests.
//!
//! Behaves like the admin API for the operations the service uses: creation
//! assigns an id and timestamp, duplicate usernames are rejected with 409,
//! unknown ids are not found. Every realm lookup and creation is recorded so
//! tests can assert on what reached the provider.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use http::StatusCode;
use uuid::Uuid;

use domain::UserRepresentation;

use super::{
    IdentityError, IdentityProvider, IdentityResult, RealmResource, UserResource, UsersResource,
};

#[derive(Default)]
struct FakeState {
    realms: HashMap<String, Vec<UserRepresentation>>,
    realm_lookups: Vec<String>,
    create_calls: usize,
    fault: Option<IdentityError>,
}

/// Shared, cloneable in-memory provider.
#[derive(Clone, Default)]
pub struct InMemoryIdentityProvider {
    state: Arc<Mutex<FakeState>>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a user directly, returning its id.
    pub fn seed(&self, realm: &str, mut representation: UserRepresentation) -> String {
        let id = representation
            .id
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .clone();
        self.lock()
            .realms
            .entry(realm.to_string())
            .or_default()
            .push(representation);
        id
    }

    /// Make every subsequent provider call fail with `fault`.
    pub fn fail_with(&self, fault: IdentityError) {
        self.lock().fault = Some(fault);
    }

    /// Users currently stored in `realm`
    pub fn users_in(&self, realm: &str) -> Vec<UserRepresentation> {
        self.lock().realms.get(realm).cloned().unwrap_or_default()
    }

    /// Realm names requested so far, in call order
    pub fn realm_lookups(&self) -> Vec<String> {
        self.lock().realm_lookups.clone()
    }

    /// Number of `create` calls that reached the provider
    pub fn create_calls(&self) -> usize {
        self.lock().create_calls
    }
}

impl IdentityProvider for InMemoryIdentityProvider {
    fn realm(&self, name: &str) -> Box<dyn RealmResource> {
        self.lock().realm_lookups.push(name.to_string());
        Box::new(FakeRealm {
            provider: self.clone(),
            realm: name.to_string(),
        })
    }
}

struct FakeRealm {
    provider: InMemoryIdentityProvider,
    realm: String,
}

impl RealmResource for FakeRealm {
    fn users(&self) -> Box<dyn UsersResource> {
        Box::new(FakeUsers {
            provider: self.provider.clone(),
            realm: self.realm.clone(),
        })
    }
}

struct FakeUsers {
    provider: InMemoryIdentityProvider,
    realm: String,
}

#[async_trait]
impl UsersResource for FakeUsers {
    async fn create(&self, mut representation: UserRepresentation) -> IdentityResult<StatusCode> {
        let mut state = self.provider.lock();
        state.create_calls += 1;
        if let Some(fault) = state.fault.clone() {
            return Err(fault);
        }

        let users = state.realms.entry(self.realm.clone()).or_default();
        if users.iter().any(|u| u.username == representation.username) {
            return Err(IdentityError::Rejected {
                status: StatusCode::CONFLICT,
                message: "User exists with same username".to_string(),
            });
        }

        representation.id = Some(Uuid::new_v4().to_string());
        representation.created_timestamp = Some(Utc::now().timestamp_millis());
        // The admin API never hands credentials back.
        representation.credentials = None;
        users.push(representation);

        Ok(StatusCode::CREATED)
    }

    fn get(&self, id: &str) -> Box<dyn UserResource> {
        Box::new(FakeUser {
            provider: self.provider.clone(),
            realm: self.realm.clone(),
            id: id.to_string(),
        })
    }

    async fn list(&self, first: u32, max: u32) -> IdentityResult<Vec<UserRepresentation>> {
        let state = self.provider.lock();
        if let Some(fault) = state.fault.clone() {
            return Err(fault);
        }

        Ok(state
            .realms
            .get(&self.realm)
            .map(|users| {
                users
                    .iter()
                    .skip(first as usize)
                    .take(max as usize)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

struct FakeUser {
    provider: InMemoryIdentityProvider,
    realm: String,
    id: String,
}

#[async_trait]
impl UserResource for FakeUser {
    async fn to_representation(&self) -> IdentityResult<UserRepresentation> {
        let state = self.provider.lock();
        if let Some(fault) = state.fault.clone() {
            return Err(fault);
        }

        state
            .realms
            .get(&self.realm)
            .and_then(|users| {
                users
                    .iter()
                    .find(|u| u.id.as_deref() == Some(self.id.as_str()))
            })
            .cloned()
            .ok_or(IdentityError::NotFound)
    }
}
