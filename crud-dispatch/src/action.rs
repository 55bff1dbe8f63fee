//! Action types for the generated CRUD lifecycle
//!
//! Every dispatched CRUD operation moves through three phases:
//! pending (dispatched, service call in flight), fulfilled (service resolved)
//! and rejected (service failed). One [`CrudAction`] value represents one
//! phase of one operation for one resource.

use std::fmt;

/// Marker trait for actions that can be dispatched to a store
///
/// Actions represent intents to change state. They should be:
/// - Clone: Actions may be logged, replayed, or sent to multiple handlers
/// - Debug: For debugging and logging
/// - Send + 'static: For async dispatch across threads
pub trait Action: Clone + fmt::Debug + Send + 'static {
    /// Get the action name for logging and filtering
    fn name(&self) -> &'static str;
}

/// The five CRUD operations this layer standardizes on.
///
/// This is a closed set: every REST-shaped resource gets exactly these five
/// operations, and the merge policy for each is selected by an exhaustive
/// match. Adding or removing an operation is a compile-time-checked change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CrudOp {
    Create,
    Update,
    Delete,
    List,
    Get,
}

impl CrudOp {
    /// All five operations, in the order the bundle factory generates them.
    pub const ALL: [CrudOp; 5] = [
        CrudOp::Create,
        CrudOp::Update,
        CrudOp::Delete,
        CrudOp::List,
        CrudOp::Get,
    ];

    /// Lowercase operation tag used in action type identities.
    pub fn as_str(self) -> &'static str {
        match self {
            CrudOp::Create => "create",
            CrudOp::Update => "update",
            CrudOp::Delete => "delete",
            CrudOp::List => "list",
            CrudOp::Get => "get",
        }
    }
}

impl fmt::Display for CrudOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one generated action: the (slice, operation, entity) triple.
///
/// The composed `type_id` string is the key under which reducer rules are
/// registered. Callers must keep the triple unique within one store —
/// colliding identities multiplex dispatches across unrelated operations.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ActionType {
    slice: String,
    entity: String,
    op: CrudOp,
    type_id: String,
}

impl ActionType {
    pub fn new(slice: impl Into<String>, entity: impl Into<String>, op: CrudOp) -> Self {
        let slice = slice.into();
        let entity = entity.into();
        let type_id = format!("{}/{}/{}", slice, op, entity);
        Self {
            slice,
            entity,
            op,
            type_id,
        }
    }

    /// The state-slice name this action belongs to.
    pub fn slice(&self) -> &str {
        &self.slice
    }

    /// The resource name this action operates on.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn op(&self) -> CrudOp {
        self.op
    }

    /// Registry key: `"{slice}/{op}/{entity}"`.
    pub fn type_id(&self) -> &str {
        &self.type_id
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_id)
    }
}

/// Successful outcome of one CRUD operation, carrying the resolved payload.
///
/// The variant, not a runtime string lookup, selects the merge policy applied
/// to the entity state (see [`merge_success`](crate::reducer::merge_success)).
#[derive(Clone, Debug, PartialEq)]
pub enum CrudSuccess<T> {
    /// `create` resolved: the entity as the service persisted it.
    Created(T),
    /// `update` resolved: the entity as the service persisted it.
    Updated(T),
    /// `delete` resolved: the entity that was removed.
    Deleted(T),
    /// `list` resolved: the full replacement sequence, in returned order.
    Listed(Vec<T>),
    /// `get` resolved: the entity to select.
    Fetched(T),
}

impl<T> CrudSuccess<T> {
    /// The operation this outcome belongs to.
    pub fn op(&self) -> CrudOp {
        match self {
            CrudSuccess::Created(_) => CrudOp::Create,
            CrudSuccess::Updated(_) => CrudOp::Update,
            CrudSuccess::Deleted(_) => CrudOp::Delete,
            CrudSuccess::Listed(_) => CrudOp::List,
            CrudSuccess::Fetched(_) => CrudOp::Get,
        }
    }
}

/// Lifecycle phase of one dispatched CRUD operation.
#[derive(Clone, Debug, PartialEq)]
pub enum CrudPhase<T> {
    /// Dispatched; the service call is in flight.
    Pending,
    /// The service call resolved.
    Fulfilled(CrudSuccess<T>),
    /// The service call failed; the message is carried as-is for display.
    Rejected(String),
}

impl<T> CrudPhase<T> {
    pub fn kind(&self) -> PhaseKind {
        match self {
            CrudPhase::Pending => PhaseKind::Pending,
            CrudPhase::Fulfilled(_) => PhaseKind::Fulfilled,
            CrudPhase::Rejected(_) => PhaseKind::Rejected,
        }
    }
}

/// Payload-free phase discriminant, used as a registry key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    Pending,
    Fulfilled,
    Rejected,
}

/// One phase of one CRUD operation for one resource.
///
/// Thunks construct these; registered reducer rules consume them. For a
/// single dispatch the pending action is always enqueued before the
/// fulfilled/rejected one.
#[derive(Clone, Debug, PartialEq)]
pub struct CrudAction<T> {
    action_type: ActionType,
    phase: CrudPhase<T>,
}

impl<T> CrudAction<T> {
    pub fn pending(action_type: ActionType) -> Self {
        Self {
            action_type,
            phase: CrudPhase::Pending,
        }
    }

    pub fn fulfilled(action_type: ActionType, success: CrudSuccess<T>) -> Self {
        Self {
            action_type,
            phase: CrudPhase::Fulfilled(success),
        }
    }

    pub fn rejected(action_type: ActionType, error: impl Into<String>) -> Self {
        Self {
            action_type,
            phase: CrudPhase::Rejected(error.into()),
        }
    }

    pub fn action_type(&self) -> &ActionType {
        &self.action_type
    }

    pub fn phase(&self) -> &CrudPhase<T> {
        &self.phase
    }
}

impl<T: Clone + fmt::Debug + Send + 'static> Action for CrudAction<T> {
    fn name(&self) -> &'static str {
        match (self.action_type.op(), self.phase.kind()) {
            (CrudOp::Create, PhaseKind::Pending) => "CreatePending",
            (CrudOp::Create, PhaseKind::Fulfilled) => "CreateFulfilled",
            (CrudOp::Create, PhaseKind::Rejected) => "CreateRejected",
            (CrudOp::Update, PhaseKind::Pending) => "UpdatePending",
            (CrudOp::Update, PhaseKind::Fulfilled) => "UpdateFulfilled",
            (CrudOp::Update, PhaseKind::Rejected) => "UpdateRejected",
            (CrudOp::Delete, PhaseKind::Pending) => "DeletePending",
            (CrudOp::Delete, PhaseKind::Fulfilled) => "DeleteFulfilled",
            (CrudOp::Delete, PhaseKind::Rejected) => "DeleteRejected",
            (CrudOp::List, PhaseKind::Pending) => "ListPending",
            (CrudOp::List, PhaseKind::Fulfilled) => "ListFulfilled",
            (CrudOp::List, PhaseKind::Rejected) => "ListRejected",
            (CrudOp::Get, PhaseKind::Pending) => "GetPending",
            (CrudOp::Get, PhaseKind::Fulfilled) => "GetFulfilled",
            (CrudOp::Get, PhaseKind::Rejected) => "GetRejected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_id_is_slice_op_entity() {
        let ty = ActionType::new("users", "user", CrudOp::Create);
        assert_eq!(ty.type_id(), "users/create/user");
        assert_eq!(ty.slice(), "users");
        assert_eq!(ty.entity(), "user");
        assert_eq!(ty.op(), CrudOp::Create);
        assert_eq!(ty.to_string(), "users/create/user");
    }

    #[test]
    fn test_distinct_triples_have_distinct_ids() {
        let a = ActionType::new("users", "user", CrudOp::Create);
        let b = ActionType::new("users", "user", CrudOp::Update);
        let c = ActionType::new("admin", "user", CrudOp::Create);
        assert_ne!(a.type_id(), b.type_id());
        assert_ne!(a.type_id(), c.type_id());
    }

    #[test]
    fn test_action_names_cover_op_and_phase() {
        let ty = ActionType::new("users", "user", CrudOp::Delete);
        let pending: CrudAction<u8> = CrudAction::pending(ty.clone());
        let rejected: CrudAction<u8> = CrudAction::rejected(ty.clone(), "boom");
        let fulfilled = CrudAction::fulfilled(ty, CrudSuccess::Deleted(3u8));

        assert_eq!(pending.name(), "DeletePending");
        assert_eq!(fulfilled.name(), "DeleteFulfilled");
        assert_eq!(rejected.name(), "DeleteRejected");
    }

    #[test]
    fn test_success_op_mapping() {
        assert_eq!(CrudSuccess::Created(1u8).op(), CrudOp::Create);
        assert_eq!(CrudSuccess::Updated(1u8).op(), CrudOp::Update);
        assert_eq!(CrudSuccess::Deleted(1u8).op(), CrudOp::Delete);
        assert_eq!(CrudSuccess::Listed(vec![1u8]).op(), CrudOp::List);
        assert_eq!(CrudSuccess::Fetched(1u8).op(), CrudOp::Get);
    }

    #[test]
    fn test_phase_kinds() {
        let pending: CrudPhase<u8> = CrudPhase::Pending;
        assert_eq!(pending.kind(), PhaseKind::Pending);
        assert_eq!(
            CrudPhase::Fulfilled(CrudSuccess::Fetched(1u8)).kind(),
            PhaseKind::Fulfilled
        );
        let rejected: CrudPhase<u8> = CrudPhase::Rejected("err".into());
        assert_eq!(rejected.kind(), PhaseKind::Rejected);
    }
}
