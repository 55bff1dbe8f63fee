//! Entity contract and per-resource state fragment

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

/// A uniquely-identified record managed through CRUD operations.
///
/// The layer only ever looks at the identifier, compared by equality when
/// matching update/delete targets. Everything else about the record is
/// opaque.
pub trait Entity: Clone + Debug + Send + Sync + 'static {
    /// Identifier type, compared by equality.
    type Id: Clone + Debug + PartialEq + Send + Sync + 'static;

    fn id(&self) -> Self::Id;
}

/// Per-resource state fragment.
///
/// Embeds verbatim inside a larger application state tree; the caller-supplied
/// accessor locates it. Serialized field names match the JS-shaped contract
/// (`isLoading`, `error`, `entityList`, `selectedEntity`).
///
/// Invariant: every settled operation clears the loading flag and the error
/// before applying its outcome, so at most one of "loading" and "a populated
/// error" is current at any time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityState<T> {
    /// True from dispatch until settlement of the most recent operation.
    pub is_loading: bool,

    /// Message of the most recent rejection; empty when the last operation
    /// settled successfully or is still in flight.
    pub error: String,

    /// Ordered sequence of entities for this resource.
    pub entity_list: Vec<T>,

    /// Entity selected by the most recent `get`.
    pub selected_entity: Option<T>,
}

impl<T> Default for EntityState<T> {
    fn default() -> Self {
        Self {
            is_loading: false,
            error: String::new(),
            entity_list: Vec::new(),
            selected_entity: None,
        }
    }
}

/// Sort direction for [`ListParams::order`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Parameters forwarded opaquely to the list operation.
///
/// This layer never interprets them; pagination, sorting and search semantics
/// belong to the entity service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct User {
        id: String,
        name: String,
    }

    impl Entity for User {
        type Id = String;

        fn id(&self) -> String {
            self.id.clone()
        }
    }

    #[test]
    fn test_default_state_is_idle_and_empty() {
        let state: EntityState<User> = EntityState::default();
        assert!(!state.is_loading);
        assert_eq!(state.error, "");
        assert!(state.entity_list.is_empty());
        assert!(state.selected_entity.is_none());
    }

    #[test]
    fn test_state_serializes_with_camel_case_contract() {
        let state = EntityState {
            is_loading: false,
            error: String::new(),
            entity_list: vec![User {
                id: "1".into(),
                name: "Sonikro".into(),
            }],
            selected_entity: None,
        };

        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(
            value,
            json!({
                "isLoading": false,
                "error": "",
                "entityList": [{"id": "1", "name": "Sonikro"}],
                "selectedEntity": null,
            })
        );
    }

    #[test]
    fn test_state_round_trips_from_embedded_tree() {
        let tree = json!({
            "isLoading": true,
            "error": "boom",
            "entityList": [],
            "selectedEntity": {"id": "7", "name": "Selected"},
        });

        let state: EntityState<User> = serde_json::from_value(tree).unwrap();
        assert!(state.is_loading);
        assert_eq!(state.error, "boom");
        assert_eq!(
            state.selected_entity,
            Some(User {
                id: "7".into(),
                name: "Selected".into()
            })
        );
    }

    #[test]
    fn test_list_params_skip_unset_fields() {
        let params = ListParams {
            page: Some(2),
            limit: Some(10),
            ..Default::default()
        };

        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(value, json!({"page": 2, "limit": 10}));
    }

    #[test]
    fn test_sort_order_serializes_lowercase() {
        assert_eq!(serde_json::to_value(SortOrder::Asc).unwrap(), json!("asc"));
        assert_eq!(
            serde_json::to_value(SortOrder::Desc).unwrap(),
            json!("desc")
        );
    }
}
