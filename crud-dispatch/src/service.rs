//! Entity service contract
//!
//! The entity service is the external collaborator that performs the actual
//! backend calls for one resource. This layer never inspects or constructs
//! the request — HTTP method, URL shape and body format are entirely the
//! service's business. Thunks only await the returned futures and turn the
//! outcomes into actions.

use std::fmt::Display;

use async_trait::async_trait;

use crate::entity::{Entity, ListParams};
use crate::error::ServiceError;

/// The five backend calls behind one resource's CRUD actions.
///
/// Implementations are injected into
/// [`create_crud_thunks`](crate::thunk::create_crud_thunks) behind an `Arc`,
/// so they must be shareable across the spawned service futures. Substitutes
/// (see [`FakeService`](crate::testing::FakeService)) make the whole layer
/// testable without a backend.
#[async_trait]
pub trait EntityService<T: Entity>: Send + Sync {
    /// Fetch the entity collection. Params are forwarded opaquely.
    async fn list(&self, params: ListParams) -> Result<Vec<T>, ServiceError>;

    /// Persist a new entity; resolves to the entity as stored.
    async fn create(&self, entity: T) -> Result<T, ServiceError>;

    /// Persist changes to an existing entity; resolves to the stored version.
    async fn update(&self, entity: T) -> Result<T, ServiceError>;

    /// Remove an entity; resolves to the removed entity.
    async fn delete(&self, entity: T) -> Result<T, ServiceError>;

    /// Fetch a single entity by identifier.
    async fn get(&self, id: T::Id) -> Result<T, ServiceError>;
}

/// Compose the conventional name for a nested resource.
///
/// Child services are purely a naming convention for nested-resource paths:
/// a service for the members of team 42 would use
/// `child_entity_name("teams", 42, "members")` == `"teams/42/members"` as its
/// slice or entity name. Constructing the child service itself stays with the
/// collaborator.
pub fn child_entity_name(parent: &str, parent_id: impl Display, child: &str) -> String {
    format!("{}/{}/{}", parent, parent_id, child)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_entity_name_convention() {
        assert_eq!(child_entity_name("teams", 42, "members"), "teams/42/members");
        assert_eq!(
            child_entity_name("users", "abc-1", "posts"),
            "users/abc-1/posts"
        );
    }
}
