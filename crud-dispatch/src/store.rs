//! Reference host pieces: case registry, store, middleware
//!
//! The generated reducer rules are host-framework-agnostic; this module
//! provides the reference host so applications (and the test suite) can run
//! a full dispatch loop without an external store. [`CaseTable`] is the
//! action-type registry the rules register into, and [`Store`] is the state
//! container that owns it.

use std::collections::HashMap;

use crate::action::{Action, ActionType, CrudAction, PhaseKind};
use crate::entity::Entity;
use crate::reducer::{CaseBuilder, CaseHandler};

struct PhaseHandlers<S, T> {
    pending: Option<CaseHandler<S, T>>,
    fulfilled: Option<CaseHandler<S, T>>,
    rejected: Option<CaseHandler<S, T>>,
}

impl<S, T> Default for PhaseHandlers<S, T> {
    fn default() -> Self {
        Self {
            pending: None,
            fulfilled: None,
            rejected: None,
        }
    }
}

impl<S, T> PhaseHandlers<S, T> {
    fn slot(&mut self, phase: PhaseKind) -> &mut Option<CaseHandler<S, T>> {
        match phase {
            PhaseKind::Pending => &mut self.pending,
            PhaseKind::Fulfilled => &mut self.fulfilled,
            PhaseKind::Rejected => &mut self.rejected,
        }
    }

    fn get(&self, phase: PhaseKind) -> Option<&CaseHandler<S, T>> {
        match phase {
            PhaseKind::Pending => self.pending.as_ref(),
            PhaseKind::Fulfilled => self.fulfilled.as_ref(),
            PhaseKind::Rejected => self.rejected.as_ref(),
        }
    }
}

/// The reference case registry: `(type id, phase) -> handler`.
///
/// This is the "internal action-type registry" the uniqueness constraint on
/// [`ActionType`] protects: if two resources register under the same triple,
/// the later registration overwrites the earlier one and every dispatch of
/// either action lands on the surviving handler. The overwrite is logged.
pub struct CaseTable<S, T: Entity> {
    cases: HashMap<String, PhaseHandlers<S, T>>,
}

impl<S, T: Entity> Default for CaseTable<S, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, T: Entity> CaseTable<S, T> {
    pub fn new() -> Self {
        Self {
            cases: HashMap::new(),
        }
    }

    /// Number of registered `(type id, phase)` rules.
    pub fn len(&self) -> usize {
        self.cases
            .values()
            .map(|handlers| {
                [PhaseKind::Pending, PhaseKind::Fulfilled, PhaseKind::Rejected]
                    .iter()
                    .filter(|phase| handlers.get(**phase).is_some())
                    .count()
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Apply the registered rule for this action, if any.
    ///
    /// Returns `true` if state changed. An unregistered action reduces to
    /// `false` — the host treats it as addressed to some other slice.
    pub fn reduce(&self, state: &mut S, action: &CrudAction<T>) -> bool {
        let type_id = action.action_type().type_id();
        match self
            .cases
            .get(type_id)
            .and_then(|handlers| handlers.get(action.phase().kind()))
        {
            Some(handler) => handler(state, action),
            None => {
                tracing::trace!(action_type = %type_id, "No case registered for action");
                false
            }
        }
    }
}

impl<S, T: Entity> CaseBuilder<S, T> for CaseTable<S, T> {
    fn add_case(&mut self, action_type: &ActionType, phase: PhaseKind, handler: CaseHandler<S, T>) {
        let slot = self
            .cases
            .entry(action_type.type_id().to_string())
            .or_default()
            .slot(phase);
        if slot.replace(handler).is_some() {
            tracing::warn!(
                action_type = %action_type,
                ?phase,
                "Colliding action type overwrites an existing case; \
                 dispatches will multiplex onto the surviving handler"
            );
        }
    }
}

impl<S, T> CaseTable<S, T>
where
    S: Send + 'static,
    T: Entity,
{
    /// Seal the registry into a ready-to-dispatch store.
    pub fn into_store(self, state: S) -> Store<S, CrudAction<T>> {
        Store::new(state, move |s: &mut S, action: CrudAction<T>| {
            self.reduce(s, &action)
        })
    }
}

/// A reducer installed into a [`Store`].
pub type BoxReducer<S, A> = Box<dyn Fn(&mut S, A) -> bool + Send>;

/// Centralized state container with a Redux-like reducer.
///
/// Holds the application state and provides the single point for state
/// mutations through `dispatch`. Each mutation is derived deterministically
/// from the previous state and the settling action, so the registered rules
/// are the only writers.
///
/// # Example
/// ```ignore
/// let mut table = CaseTable::new();
/// register_crud_reducers(&mut table, &thunks, |s: &mut AppState| &mut s.users);
/// let mut store = table.into_store(AppState::default());
///
/// thunks.list.dispatch(ListParams::default());
/// while let Some(action) = action_rx.recv().await {
///     store.dispatch(action);
/// }
/// ```
pub struct Store<S, A: Action> {
    state: S,
    reducer: BoxReducer<S, A>,
}

impl<S, A: Action> Store<S, A> {
    /// Create a new store with initial state and reducer.
    pub fn new(state: S, reducer: impl Fn(&mut S, A) -> bool + Send + 'static) -> Self {
        Self {
            state,
            reducer: Box::new(reducer),
        }
    }

    /// Dispatch an action to the store.
    ///
    /// Returns `true` if the state changed and a re-render is needed.
    pub fn dispatch(&mut self, action: A) -> bool {
        (self.reducer)(&mut self.state, action)
    }

    /// Get a reference to the current state.
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Get a mutable reference to the state.
    ///
    /// Use this sparingly - prefer dispatching actions for state changes.
    /// This is useful for initializing state.
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }
}

/// Middleware trait for intercepting actions
///
/// Implement this trait to add logging, persistence, or other
/// cross-cutting concerns to your store.
pub trait Middleware<A: Action> {
    /// Called before the action is dispatched to the reducer
    fn before(&mut self, action: &A);

    /// Called after the action is processed by the reducer
    fn after(&mut self, action: &A, state_changed: bool);
}

/// A no-op middleware that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMiddleware;

impl<A: Action> Middleware<A> for NoopMiddleware {
    fn before(&mut self, _action: &A) {}
    fn after(&mut self, _action: &A, _state_changed: bool) {}
}

/// Middleware that logs actions (for debugging)
#[derive(Debug, Clone, Default)]
pub struct LoggingMiddleware {
    /// Whether to log before dispatch
    pub log_before: bool,
    /// Whether to log after dispatch
    pub log_after: bool,
}

impl LoggingMiddleware {
    /// Create a new logging middleware with default settings (log after only)
    pub fn new() -> Self {
        Self {
            log_before: false,
            log_after: true,
        }
    }

    /// Create a logging middleware that logs both before and after
    pub fn verbose() -> Self {
        Self {
            log_before: true,
            log_after: true,
        }
    }
}

impl<A: Action> Middleware<A> for LoggingMiddleware {
    fn before(&mut self, action: &A) {
        if self.log_before {
            tracing::debug!(action = %action.name(), "Dispatching action");
        }
    }

    fn after(&mut self, action: &A, state_changed: bool) {
        if self.log_after {
            tracing::debug!(
                action = %action.name(),
                state_changed = state_changed,
                "Action processed"
            );
        }
    }
}

/// Store with middleware support
///
/// Wraps a [`Store`] and allows middleware to intercept actions
/// before and after they are processed by the reducer.
pub struct StoreWithMiddleware<S, A: Action, M: Middleware<A>> {
    store: Store<S, A>,
    middleware: M,
}

impl<S, A: Action, M: Middleware<A>> StoreWithMiddleware<S, A, M> {
    /// Create a new store with middleware
    pub fn new(
        state: S,
        reducer: impl Fn(&mut S, A) -> bool + Send + 'static,
        middleware: M,
    ) -> Self {
        Self {
            store: Store::new(state, reducer),
            middleware,
        }
    }

    /// Wrap an existing store
    pub fn wrap(store: Store<S, A>, middleware: M) -> Self {
        Self { store, middleware }
    }

    /// Dispatch an action through middleware and store
    pub fn dispatch(&mut self, action: A) -> bool {
        self.middleware.before(&action);
        let changed = self.store.dispatch(action.clone());
        self.middleware.after(&action, changed);
        changed
    }

    /// Get a reference to the current state
    pub fn state(&self) -> &S {
        self.store.state()
    }

    /// Get a mutable reference to the state
    pub fn state_mut(&mut self) -> &mut S {
        self.store.state_mut()
    }

    /// Get a reference to the middleware
    pub fn middleware(&self) -> &M {
        &self.middleware
    }

    /// Get a mutable reference to the middleware
    pub fn middleware_mut(&mut self) -> &mut M {
        &mut self.middleware
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{CrudOp, CrudSuccess};
    use crate::entity::EntityState;
    use crate::reducer::register_crud_reducers;
    use crate::testing::FakeService;
    use crate::thunk::{create_crud_thunks, CrudThunks, CrudThunksConfig};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    #[derive(Clone, Debug, PartialEq)]
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

    fn user(id: &str, name: &str) -> User {
        User {
            id: id.into(),
            name: name.into(),
        }
    }

    #[derive(Default)]
    struct AppState {
        users: EntityState<User>,
    }

    fn test_thunks(slice: &str) -> CrudThunks<User> {
        let (tx, _rx) = mpsc::unbounded_channel();
        create_crud_thunks(CrudThunksConfig {
            entity_name: "user".into(),
            slice: slice.into(),
            service: Arc::new(FakeService::new()),
            action_tx: tx,
        })
    }

    fn registered_table() -> (CaseTable<AppState, User>, CrudThunks<User>) {
        let thunks = test_thunks("users");
        let mut table = CaseTable::new();
        register_crud_reducers(&mut table, &thunks, |s: &mut AppState| &mut s.users);
        (table, thunks)
    }

    #[test]
    fn test_table_holds_fifteen_rules() {
        let (table, _thunks) = registered_table();
        assert_eq!(table.len(), 15);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_reduce_applies_registered_handler() {
        let (table, thunks) = registered_table();
        let mut state = AppState::default();

        let pending = CrudAction::pending(thunks.list.action_type().clone());
        assert!(table.reduce(&mut state, &pending));
        assert!(state.users.is_loading);

        let fulfilled = CrudAction::fulfilled(
            thunks.list.action_type().clone(),
            CrudSuccess::Listed(vec![user("10", "Existing User")]),
        );
        assert!(table.reduce(&mut state, &fulfilled));
        assert!(!state.users.is_loading);
        assert_eq!(state.users.entity_list, vec![user("10", "Existing User")]);
    }

    #[test]
    fn test_reduce_misses_unregistered_action() {
        let (table, _thunks) = registered_table();
        let other = test_thunks("admin");
        let mut state = AppState::default();

        let action = CrudAction::pending(other.create.action_type().clone());
        assert!(!table.reduce(&mut state, &action));
        assert!(!state.users.is_loading);
    }

    #[test]
    fn test_colliding_registration_overwrites() {
        let thunks = test_thunks("users");
        let mut table: CaseTable<AppState, User> = CaseTable::new();
        register_crud_reducers(&mut table, &thunks, |s: &mut AppState| &mut s.users);

        // Same slice/entity triple registered again: same 15 keys, overwritten.
        register_crud_reducers(&mut table, &thunks, |s: &mut AppState| &mut s.users);
        assert_eq!(table.len(), 15);
    }

    #[test]
    fn test_store_dispatch_and_state_access() {
        let (table, thunks) = registered_table();
        let mut store = table.into_store(AppState::default());

        let changed = store.dispatch(CrudAction::fulfilled(
            thunks.create.action_type().clone(),
            CrudSuccess::Created(user("1", "Sonikro")),
        ));

        assert!(changed);
        assert_eq!(store.state().users.entity_list, vec![user("1", "Sonikro")]);

        store.state_mut().users.entity_list.clear();
        assert!(store.state().users.entity_list.is_empty());
    }

    #[derive(Default)]
    struct CountingMiddleware {
        before_count: usize,
        after_count: usize,
    }

    impl<A: Action> Middleware<A> for CountingMiddleware {
        fn before(&mut self, _action: &A) {
            self.before_count += 1;
        }

        fn after(&mut self, _action: &A, _state_changed: bool) {
            self.after_count += 1;
        }
    }

    #[test]
    fn test_store_with_middleware_hooks_every_dispatch() {
        let (table, thunks) = registered_table();
        let mut store = StoreWithMiddleware::wrap(
            table.into_store(AppState::default()),
            CountingMiddleware::default(),
        );

        store.dispatch(CrudAction::pending(thunks.get.action_type().clone()));
        store.dispatch(CrudAction::rejected(
            thunks.get.action_type().clone(),
            "not found",
        ));

        assert_eq!(store.middleware().before_count, 2);
        assert_eq!(store.middleware().after_count, 2);
        assert_eq!(store.state().users.error, "not found");
    }

    #[test]
    fn test_noop_middleware_passes_through() {
        let (table, thunks) = registered_table();
        let mut store =
            StoreWithMiddleware::wrap(table.into_store(AppState::default()), NoopMiddleware);

        assert!(store.dispatch(CrudAction::pending(thunks.delete.action_type().clone())));
        assert!(store.state().users.is_loading);
        assert_eq!(
            thunks.delete.action_type().op(),
            CrudOp::Delete
        );
    }
}
