//! Test utilities for crud-dispatch applications
//!
//! - [`FakeService`]: a queueable substitute entity service, so the whole
//!   layer is testable without a backend
//! - [`ThunkHarness`]: channel + case table + store wired in one call
//! - `assert_action!` / `assert_no_action!`: pattern assertions over drained
//!   action lists
//!
//! # Example
//!
//! ```ignore
//! let service = Arc::new(FakeService::new());
//! service.respond_with(CrudOp::Create, Ok(created_user.clone()));
//!
//! let (mut harness, thunks) =
//!     ThunkHarness::new(AppState::default(), "users", "user", service, |s| &mut s.users);
//!
//! thunks.create.dispatch(new_user);
//! harness.settle().await;
//! assert_eq!(harness.state().users.entity_list, vec![created_user]);
//! ```

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::action::{CrudAction, CrudOp};
use crate::entity::{Entity, ListParams};
use crate::error::ServiceError;
use crate::reducer::{register_crud_reducers, StateAccessor};
use crate::service::EntityService;
use crate::store::{CaseTable, Store};
use crate::thunk::{create_crud_thunks, CrudThunks, CrudThunksConfig};

/// A substitute entity service with queueable responses.
///
/// Each operation pops from its own response queue. With nothing queued,
/// create/update/delete echo their input back, list resolves to an empty
/// collection, and get rejects. Calls are recorded for verification.
pub struct FakeService<T: Entity> {
    responses: Mutex<HashMap<CrudOp, VecDeque<Result<T, ServiceError>>>>,
    list_responses: Mutex<VecDeque<Result<Vec<T>, ServiceError>>>,
    calls: Mutex<Vec<CrudOp>>,
}

impl<T: Entity> Default for FakeService<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> FakeService<T> {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            list_responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a response for a single-entity operation (create/update/delete/get).
    pub fn respond_with(&self, op: CrudOp, result: Result<T, ServiceError>) {
        self.responses
            .lock()
            .expect("lock poisoned")
            .entry(op)
            .or_default()
            .push_back(result);
    }

    /// Queue a response for the list operation.
    pub fn respond_to_list(&self, result: Result<Vec<T>, ServiceError>) {
        self.list_responses
            .lock()
            .expect("lock poisoned")
            .push_back(result);
    }

    /// Operations called so far, in call order.
    pub fn calls(&self) -> Vec<CrudOp> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    fn record(&self, op: CrudOp) {
        self.calls.lock().expect("lock poisoned").push(op);
    }

    fn pop(&self, op: CrudOp) -> Option<Result<T, ServiceError>> {
        self.responses
            .lock()
            .expect("lock poisoned")
            .get_mut(&op)
            .and_then(VecDeque::pop_front)
    }
}

#[async_trait]
impl<T: Entity> EntityService<T> for FakeService<T> {
    async fn list(&self, _params: ListParams) -> Result<Vec<T>, ServiceError> {
        self.record(CrudOp::List);
        self.list_responses
            .lock()
            .expect("lock poisoned")
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn create(&self, entity: T) -> Result<T, ServiceError> {
        self.record(CrudOp::Create);
        self.pop(CrudOp::Create).unwrap_or(Ok(entity))
    }

    async fn update(&self, entity: T) -> Result<T, ServiceError> {
        self.record(CrudOp::Update);
        self.pop(CrudOp::Update).unwrap_or(Ok(entity))
    }

    async fn delete(&self, entity: T) -> Result<T, ServiceError> {
        self.record(CrudOp::Delete);
        self.pop(CrudOp::Delete).unwrap_or(Ok(entity))
    }

    async fn get(&self, id: T::Id) -> Result<T, ServiceError> {
        self.record(CrudOp::Get);
        self.pop(CrudOp::Get)
            .unwrap_or_else(|| Err(ServiceError::new(format!("no entity queued for get {:?}", id))))
    }
}

/// A wired dispatch loop for tests: thunks send into a channel, the harness
/// forwards each action into a store built from a registered [`CaseTable`].
pub struct ThunkHarness<S, T: Entity> {
    store: Store<S, CrudAction<T>>,
    rx: mpsc::UnboundedReceiver<CrudAction<T>>,
}

impl<S, T> ThunkHarness<S, T>
where
    S: Send + 'static,
    T: Entity,
{
    /// Build the channel, thunks, case table and store in one step.
    pub fn new<Svc>(
        state: S,
        slice: &str,
        entity_name: &str,
        service: Arc<Svc>,
        get_entity_state: StateAccessor<S, T>,
    ) -> (Self, CrudThunks<T>)
    where
        Svc: EntityService<T> + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let thunks = create_crud_thunks(CrudThunksConfig {
            entity_name: entity_name.into(),
            slice: slice.into(),
            service,
            action_tx: tx,
        });

        let mut table = CaseTable::new();
        register_crud_reducers(&mut table, &thunks, get_entity_state);

        let harness = Self {
            store: table.into_store(state),
            rx,
        };
        (harness, thunks)
    }

    /// The application state under test.
    pub fn state(&self) -> &S {
        self.store.state()
    }

    /// Forward the next generated action into the store and return it.
    ///
    /// # Panics
    ///
    /// Panics if no action arrives within one second.
    pub async fn step(&mut self) -> CrudAction<T> {
        let action = tokio::time::timeout(Duration::from_secs(1), self.rx.recv())
            .await
            .expect("timed out waiting for action")
            .expect("action channel closed");
        self.store.dispatch(action.clone());
        action
    }

    /// Run one dispatch to settlement: the pending action plus the
    /// fulfilled/rejected one.
    pub async fn settle(&mut self) -> (CrudAction<T>, CrudAction<T>) {
        let pending = self.step().await;
        let settled = self.step().await;
        (pending, settled)
    }
}

/// Assert that a drained action list contains an action matching a pattern.
///
/// # Example
///
/// ```ignore
/// assert_action!(actions, CrudPhase::Rejected(msg) if msg == "backend down");
/// ```
#[macro_export]
macro_rules! assert_action {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $actions.iter().any(|a| matches!(a.phase(), $pattern $(if $guard)?)),
            "Expected an action matching `{}`, but got: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Assert that a drained action list contains no action matching a pattern.
#[macro_export]
macro_rules! assert_no_action {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$actions.iter().any(|a| matches!(a.phase(), $pattern $(if $guard)?)),
            "Expected no action matching `{}`, but got: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}
