//! CRUD thunk generation and reducer wiring for entity collections
//!
//! Given one REST-shaped resource descriptor, this crate generates the five
//! standard asynchronous actions (create/update/delete/list/get) and the
//! reducer rules that merge their outcomes into a shared per-entity state
//! fragment. It is glue over a Redux-style store: no transport, no request
//! construction, no caching — the injected [`EntityService`] owns all of
//! that.
//!
//! # Core Concepts
//!
//! - **Entity**: a uniquely-identified record; only its id is inspected here
//! - **EntityService**: the external collaborator performing backend calls
//! - **CrudThunks**: five dispatchable three-phase action descriptors
//! - **EntityState**: the per-resource fragment (loading flag, error, list,
//!   selection) the generated rules mutate
//! - **CaseBuilder / CaseTable**: where the derived rules are registered
//!
//! # Basic Example
//!
//! ```ignore
//! use crud_dispatch::prelude::*;
//! use std::sync::Arc;
//! use tokio::sync::mpsc;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct User { id: String, name: String }
//!
//! impl Entity for User {
//!     type Id = String;
//!     fn id(&self) -> String { self.id.clone() }
//! }
//!
//! #[derive(Default)]
//! struct AppState { users: EntityState<User> }
//!
//! let (action_tx, mut action_rx) = mpsc::unbounded_channel();
//! let thunks = create_crud_thunks(CrudThunksConfig {
//!     entity_name: "user".into(),
//!     slice: "users".into(),
//!     service: Arc::new(my_user_service),
//!     action_tx,
//! });
//!
//! let mut table = CaseTable::new();
//! register_crud_reducers(&mut table, &thunks, |s: &mut AppState| &mut s.users);
//! let mut store = table.into_store(AppState::default());
//!
//! // Dispatch; pending arrives first, the settlement follows.
//! thunks.list.dispatch(ListParams::default());
//! while let Some(action) = action_rx.recv().await {
//!     store.dispatch(action);
//! }
//! ```
//!
//! # Lifecycle
//!
//! Each dispatched operation moves through pending -> fulfilled | rejected.
//! Pending marks the fragment loading and clears any stale error; the
//! settlement clears the loading flag and either applies the operation's
//! merge policy or stores the carried error message. A service rejection is
//! converted into an action, never re-thrown, so it can't escape the
//! dispatch loop.
//!
//! Across overlapping dispatches there is no ordering guarantee: if two
//! `list` calls are in flight, the later-settling one determines the final
//! list contents.

pub mod action;
pub mod entity;
pub mod error;
pub mod reducer;
pub mod service;
pub mod store;
pub mod testing;
pub mod thunk;

// Action exports
pub use action::{Action, ActionType, CrudAction, CrudOp, CrudPhase, CrudSuccess, PhaseKind};

// Entity exports
pub use entity::{Entity, EntityState, ListParams, SortOrder};

// Error exports
pub use error::ServiceError;

// Service exports
pub use service::{child_entity_name, EntityService};

// Thunk exports
pub use thunk::{create_crud_thunks, crud_thunk, CrudThunk, CrudThunks, CrudThunksConfig};

// Reducer exports
pub use reducer::{
    begin_pending, crud_cases, merge_success, register_crud_reducers, settle_fulfilled,
    settle_rejected, CaseBuilder, CaseHandler, CrudCase, StateAccessor,
};

// Store exports
pub use store::{
    BoxReducer, CaseTable, LoggingMiddleware, Middleware, NoopMiddleware, Store,
    StoreWithMiddleware,
};

// Testing exports
pub use testing::{FakeService, ThunkHarness};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{
        Action, ActionType, CrudAction, CrudOp, CrudPhase, CrudSuccess, PhaseKind,
    };
    pub use crate::entity::{Entity, EntityState, ListParams, SortOrder};
    pub use crate::error::ServiceError;
    pub use crate::reducer::{
        crud_cases, register_crud_reducers, CaseBuilder, CaseHandler, CrudCase, StateAccessor,
    };
    pub use crate::service::{child_entity_name, EntityService};
    pub use crate::store::{
        CaseTable, LoggingMiddleware, Middleware, NoopMiddleware, Store, StoreWithMiddleware,
    };
    pub use crate::thunk::{
        create_crud_thunks, crud_thunk, CrudThunk, CrudThunks, CrudThunksConfig,
    };
}
