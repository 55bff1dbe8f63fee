//! Action factory: CRUD thunk generation
//!
//! A thunk is a dispatchable descriptor for one CRUD operation on one
//! resource. Dispatching it enqueues the pending action, spawns the service
//! call on tokio, and enqueues the fulfilled or rejected action when the call
//! settles — the same spawn-and-send-back pattern used for any async work in
//! this architecture. A rejection is converted into an action rather than
//! re-thrown, so a failing service call can never escape the dispatch loop as
//! a panic or an unhandled error.
//!
//! Ordering: for a single dispatch the pending action is enqueued before the
//! task is spawned, so it always precedes the settlement. Across overlapping
//! dispatches no ordering is guaranteed; the later-settling operation wins.
//! There is no cancellation and no timeout — a dispatched thunk runs to
//! settlement.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::action::{ActionType, CrudAction, CrudOp, CrudSuccess};
use crate::entity::{Entity, ListParams};
use crate::error::ServiceError;
use crate::service::EntityService;

/// A dispatchable descriptor for one CRUD operation.
///
/// Created once at setup time, immutable thereafter, shared across all
/// dispatches. `P` is the payload the operation takes: the entity for
/// create/update/delete, [`ListParams`] for list, the identifier for get.
pub struct CrudThunk<P> {
    action_type: ActionType,
    run: Arc<dyn Fn(P) + Send + Sync>,
}

impl<P> CrudThunk<P> {
    /// The identity this thunk's actions are dispatched under.
    pub fn action_type(&self) -> &ActionType {
        &self.action_type
    }

    /// Dispatch this operation with a payload.
    ///
    /// Enqueues the pending action and spawns the service call. Must be
    /// called from within a tokio runtime.
    pub fn dispatch(&self, payload: P) {
        (self.run)(payload)
    }
}

impl<P> Clone for CrudThunk<P> {
    fn clone(&self) -> Self {
        Self {
            action_type: self.action_type.clone(),
            run: Arc::clone(&self.run),
        }
    }
}

impl<P> fmt::Debug for CrudThunk<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrudThunk")
            .field("action_type", &self.action_type)
            .finish()
    }
}

/// Build a thunk for a single operation.
///
/// `call` is the zero-or-one-argument service function: it receives the
/// dispatch payload and resolves to the operation's [`CrudSuccess`] outcome.
/// The bundle factory [`create_crud_thunks`] uses this for each of the five
/// operations; it is public so callers with a non-standard service shape can
/// wire an individual action themselves.
pub fn crud_thunk<T, P, C, Fut>(
    action_type: ActionType,
    action_tx: mpsc::UnboundedSender<CrudAction<T>>,
    call: C,
) -> CrudThunk<P>
where
    T: Entity,
    P: Send + 'static,
    C: Fn(P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<CrudSuccess<T>, ServiceError>> + Send + 'static,
{
    let run_type = action_type.clone();
    let run: Arc<dyn Fn(P) + Send + Sync> = Arc::new(move |payload: P| {
        let _ = action_tx.send(CrudAction::pending(run_type.clone()));

        let tx = action_tx.clone();
        let ty = run_type.clone();
        let fut = call(payload);
        tokio::spawn(async move {
            let settled = match fut.await {
                Ok(success) => CrudAction::fulfilled(ty, success),
                Err(error) => CrudAction::rejected(ty, error.to_string()),
            };
            // Receiver gone means the store loop shut down; nothing to settle.
            let _ = tx.send(settled);
        });
    });

    CrudThunk { action_type, run }
}

/// Input to [`create_crud_thunks`]: one resource plus its service.
pub struct CrudThunksConfig<T: Entity, S: EntityService<T>> {
    /// Resource name, part of each action's identity.
    pub entity_name: String,
    /// State-slice name, part of each action's identity.
    pub slice: String,
    /// The collaborator performing the backend calls.
    pub service: Arc<S>,
    /// Channel the generated actions are enqueued on.
    pub action_tx: mpsc::UnboundedSender<CrudAction<T>>,
}

/// The five-action bundle for one resource.
///
/// The field set is fixed by design to the REST convention this layer
/// standardizes on — no operation can be omitted, renamed or parameterized
/// away.
#[derive(Clone, Debug)]
pub struct CrudThunks<T: Entity> {
    pub create: CrudThunk<T>,
    pub update: CrudThunk<T>,
    pub delete: CrudThunk<T>,
    pub list: CrudThunk<ListParams>,
    pub get: CrudThunk<T::Id>,
}

impl<T: Entity> CrudThunks<T> {
    /// The five action identities, in [`CrudOp::ALL`] order.
    pub fn action_types(&self) -> [&ActionType; 5] {
        [
            self.create.action_type(),
            self.update.action_type(),
            self.delete.action_type(),
            self.list.action_type(),
            self.get.action_type(),
        ]
    }
}

/// Build the five CRUD thunks for one resource.
///
/// Pure with respect to the config: the same descriptor always yields the
/// same five identities. Callers must keep the (slice, op, entity) triples
/// unique within one store; see [`ActionType`].
pub fn create_crud_thunks<T, S>(config: CrudThunksConfig<T, S>) -> CrudThunks<T>
where
    T: Entity,
    S: EntityService<T> + 'static,
{
    let CrudThunksConfig {
        entity_name,
        slice,
        service,
        action_tx,
    } = config;

    let create = {
        let service = Arc::clone(&service);
        crud_thunk(
            ActionType::new(&slice, &entity_name, CrudOp::Create),
            action_tx.clone(),
            move |entity: T| {
                let service = Arc::clone(&service);
                async move { service.create(entity).await.map(CrudSuccess::Created) }
            },
        )
    };

    let update = {
        let service = Arc::clone(&service);
        crud_thunk(
            ActionType::new(&slice, &entity_name, CrudOp::Update),
            action_tx.clone(),
            move |entity: T| {
                let service = Arc::clone(&service);
                async move { service.update(entity).await.map(CrudSuccess::Updated) }
            },
        )
    };

    let delete = {
        let service = Arc::clone(&service);
        crud_thunk(
            ActionType::new(&slice, &entity_name, CrudOp::Delete),
            action_tx.clone(),
            move |entity: T| {
                let service = Arc::clone(&service);
                async move { service.delete(entity).await.map(CrudSuccess::Deleted) }
            },
        )
    };

    let list = {
        let service = Arc::clone(&service);
        crud_thunk(
            ActionType::new(&slice, &entity_name, CrudOp::List),
            action_tx.clone(),
            move |params: ListParams| {
                let service = Arc::clone(&service);
                async move { service.list(params).await.map(CrudSuccess::Listed) }
            },
        )
    };

    let get = {
        let service = Arc::clone(&service);
        crud_thunk(
            ActionType::new(&slice, &entity_name, CrudOp::Get),
            action_tx,
            move |id: T::Id| {
                let service = Arc::clone(&service);
                async move { service.get(id).await.map(CrudSuccess::Fetched) }
            },
        )
    };

    CrudThunks {
        create,
        update,
        delete,
        list,
        get,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::CrudPhase;
    use crate::testing::FakeService;
    use std::time::Duration;

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

    fn thunks(
        service: Arc<FakeService<User>>,
    ) -> (CrudThunks<User>, mpsc::UnboundedReceiver<CrudAction<User>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let thunks = create_crud_thunks(CrudThunksConfig {
            entity_name: "user".into(),
            slice: "users".into(),
            service,
            action_tx: tx,
        });
        (thunks, rx)
    }

    async fn recv(rx: &mut mpsc::UnboundedReceiver<CrudAction<User>>) -> CrudAction<User> {
        tokio::time::timeout(Duration::from_millis(500), rx.recv())
            .await
            .expect("timed out waiting for action")
            .expect("action channel closed")
    }

    #[test]
    fn test_bundle_identities_are_unique() {
        let (thunks, _rx) = thunks(Arc::new(FakeService::new()));

        let ids: Vec<&str> = thunks
            .action_types()
            .iter()
            .map(|ty| ty.type_id())
            .collect();
        assert_eq!(
            ids,
            vec![
                "users/create/user",
                "users/update/user",
                "users/delete/user",
                "users/list/user",
                "users/get/user",
            ]
        );
    }

    #[tokio::test]
    async fn test_dispatch_sends_pending_then_fulfilled() {
        let service = Arc::new(FakeService::new());
        service.respond_with(CrudOp::Create, Ok(user("1", "Sonikro")));
        let (thunks, mut rx) = thunks(service);

        thunks.create.dispatch(user("", "Sonikro"));

        let first = recv(&mut rx).await;
        assert_eq!(*first.phase(), CrudPhase::Pending);
        assert_eq!(first.action_type().type_id(), "users/create/user");

        let second = recv(&mut rx).await;
        assert_eq!(
            *second.phase(),
            CrudPhase::Fulfilled(CrudSuccess::Created(user("1", "Sonikro")))
        );
    }

    #[tokio::test]
    async fn test_rejection_is_carried_not_thrown() {
        let service = Arc::new(FakeService::new());
        service.respond_with(CrudOp::Update, Err(ServiceError::new("backend down")));
        let (thunks, mut rx) = thunks(service);

        thunks.update.dispatch(user("1", "Sonikro"));

        let pending = recv(&mut rx).await;
        assert_eq!(*pending.phase(), CrudPhase::Pending);

        let settled = recv(&mut rx).await;
        assert_eq!(*settled.phase(), CrudPhase::Rejected("backend down".into()));
    }

    #[tokio::test]
    async fn test_get_dispatches_by_id() {
        let service = Arc::new(FakeService::new());
        service.respond_with(CrudOp::Get, Ok(user("10", "Existing User")));
        let (thunks, mut rx) = thunks(service);

        thunks.get.dispatch("10".into());

        let _pending = recv(&mut rx).await;
        let settled = recv(&mut rx).await;
        assert_eq!(
            *settled.phase(),
            CrudPhase::Fulfilled(CrudSuccess::Fetched(user("10", "Existing User")))
        );
    }

    #[tokio::test]
    async fn test_single_op_factory_with_custom_call() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let thunk = crud_thunk(
            ActionType::new("users", "user", CrudOp::Get),
            tx,
            |id: String| async move {
                if id == "10" {
                    Ok(CrudSuccess::Fetched(User {
                        id,
                        name: "Existing User".into(),
                    }))
                } else {
                    Err(ServiceError::new("not found"))
                }
            },
        );

        thunk.dispatch("999".into());
        let _pending = recv(&mut rx).await;
        let settled = recv(&mut rx).await;
        assert_eq!(*settled.phase(), CrudPhase::Rejected("not found".into()));
    }
}
