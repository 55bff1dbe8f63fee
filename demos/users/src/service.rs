//! In-memory user service
//!
//! The entity service is the collaborator that would normally speak HTTP.
//! This one keeps its users in a Vec behind a mutex so the demo runs without
//! a backend, but it honors the same contract: every call resolves to the
//! entity as stored, and failures come back as `ServiceError` rejections.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use crud_dispatch::{Entity, EntityService, ListParams, ServiceError};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

impl Entity for User {
    type Id = String;

    fn id(&self) -> String {
        self.id.clone()
    }
}

pub struct UserService {
    users: Mutex<Vec<User>>,
    next_id: AtomicU64,
}

impl UserService {
    pub fn new(seed: Vec<&str>) -> Self {
        let users: Vec<User> = seed
            .iter()
            .enumerate()
            .map(|(index, name)| User {
                id: (index + 1).to_string(),
                name: (*name).to_string(),
            })
            .collect();
        let next_id = AtomicU64::new(users.len() as u64 + 1);
        Self {
            users: Mutex::new(users),
            next_id,
        }
    }

    fn users(&self) -> std::sync::MutexGuard<'_, Vec<User>> {
        // A poisoned lock means another service call panicked; the demo has
        // nothing sensible to salvage at that point.
        self.users.lock().expect("user store lock poisoned")
    }
}

#[async_trait]
impl EntityService<User> for UserService {
    async fn list(&self, params: ListParams) -> Result<Vec<User>, ServiceError> {
        let users = self.users();
        let mut result: Vec<User> = match &params.search {
            Some(search) => users
                .iter()
                .filter(|u| u.name.to_lowercase().contains(&search.to_lowercase()))
                .cloned()
                .collect(),
            None => users.clone(),
        };
        if let Some(limit) = params.limit {
            result.truncate(limit as usize);
        }
        Ok(result)
    }

    async fn create(&self, entity: User) -> Result<User, ServiceError> {
        let created = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst).to_string(),
            name: entity.name,
        };
        self.users().push(created.clone());
        Ok(created)
    }

    async fn update(&self, entity: User) -> Result<User, ServiceError> {
        let mut users = self.users();
        match users.iter_mut().find(|u| u.id == entity.id) {
            Some(slot) => {
                *slot = entity.clone();
                Ok(entity)
            }
            None => Err(ServiceError::new(format!("user {} not found", entity.id))),
        }
    }

    async fn delete(&self, entity: User) -> Result<User, ServiceError> {
        let mut users = self.users();
        match users.iter().position(|u| u.id == entity.id) {
            Some(index) => Ok(users.remove(index)),
            None => Err(ServiceError::new(format!("user {} not found", entity.id))),
        }
    }

    async fn get(&self, id: String) -> Result<User, ServiceError> {
        self.users()
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| ServiceError::new(format!("user {} not found", id)))
    }
}
