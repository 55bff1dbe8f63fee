//! Reducer rules for the generated CRUD actions
//!
//! Every operation shares the same three-phase shape: pending sets the
//! loading flag and clears the error, rejected stores the carried message,
//! and fulfilled clears both and applies the operation's merge policy to the
//! entity state. The policy is selected by an exhaustive match on the
//! [`CrudSuccess`] variant, so the five-operation set is closed at compile
//! time.
//!
//! Rule derivation is pure: [`crud_cases`] returns the full
//! `(action type, phase, handler)` set without touching any builder, and
//! [`register_crud_reducers`] folds that set into whatever [`CaseBuilder`]
//! the host provides.

use std::sync::Arc;

use crate::action::{ActionType, CrudAction, CrudPhase, CrudSuccess, PhaseKind};
use crate::entity::{Entity, EntityState};
use crate::thunk::CrudThunks;

/// Locates one resource's state fragment within the whole application state.
pub type StateAccessor<S, T> = fn(&mut S) -> &mut EntityState<T>;

/// A state-transition rule: previous state + settled action -> changed flag.
///
/// Handlers are shared behind `Arc` because the pending and rejected
/// transitions (and the fulfilled dispatch itself) are identical across all
/// five operations.
pub type CaseHandler<S, T> = Arc<dyn Fn(&mut S, &CrudAction<T>) -> bool + Send + Sync>;

/// One derived reducer rule, ready to be registered with a host builder.
pub struct CrudCase<S, T> {
    pub action_type: ActionType,
    pub phase: PhaseKind,
    pub handler: CaseHandler<S, T>,
}

/// The host framework's registration surface.
///
/// Registering a rule for an `(action type, phase)` pair that is already
/// taken multiplexes dispatches across unrelated operations; reference
/// implementations should surface that (see
/// [`CaseTable`](crate::store::CaseTable)).
pub trait CaseBuilder<S, T: Entity> {
    fn add_case(&mut self, action_type: &ActionType, phase: PhaseKind, handler: CaseHandler<S, T>);
}

/// Pending transition: mark in flight, drop any stale error.
pub fn begin_pending<T: Entity>(state: &mut EntityState<T>) {
    state.is_loading = true;
    state.error.clear();
}

/// Rejected transition: settle with the carried message. List and selection
/// are untouched.
pub fn settle_rejected<T: Entity>(state: &mut EntityState<T>, message: &str) {
    state.is_loading = false;
    state.error.clear();
    state.error.push_str(message);
}

/// Fulfilled transition: settle cleanly, then apply the merge policy.
pub fn settle_fulfilled<T: Entity>(state: &mut EntityState<T>, success: &CrudSuccess<T>) {
    state.is_loading = false;
    state.error.clear();
    merge_success(state, success);
}

/// Apply one operation's outcome to the entity state.
///
/// - `Created`: append to the end of the list. Arrival order, no
///   deduplication — repeated creates append repeated entries.
/// - `Updated`: replace every element whose id matches, in place. No match
///   is a deliberate silent no-op.
/// - `Deleted`: remove the first element whose id matches. No match is a
///   no-op.
/// - `Listed`: wholesale replacement in returned order. Selection untouched.
/// - `Fetched`: set the selection. List untouched.
pub fn merge_success<T: Entity>(state: &mut EntityState<T>, success: &CrudSuccess<T>) {
    match success {
        CrudSuccess::Created(entity) => state.entity_list.push(entity.clone()),
        CrudSuccess::Updated(entity) => {
            let id = entity.id();
            for slot in state.entity_list.iter_mut() {
                if slot.id() == id {
                    *slot = entity.clone();
                }
            }
        }
        CrudSuccess::Deleted(entity) => {
            let id = entity.id();
            if let Some(index) = state.entity_list.iter().position(|e| e.id() == id) {
                state.entity_list.remove(index);
            }
        }
        CrudSuccess::Listed(entities) => state.entity_list = entities.clone(),
        CrudSuccess::Fetched(entity) => state.selected_entity = Some(entity.clone()),
    }
}

/// Derive the full rule set for one resource's five actions.
///
/// Returns fifteen `(action type, phase)` rules backed by three shared
/// handlers. Pure: nothing is registered until the caller folds the rules
/// into a builder.
pub fn crud_cases<S, T>(
    thunks: &CrudThunks<T>,
    get_entity_state: StateAccessor<S, T>,
) -> Vec<CrudCase<S, T>>
where
    S: 'static,
    T: Entity,
{
    let pending: CaseHandler<S, T> = Arc::new(move |state: &mut S, _action: &CrudAction<T>| {
        begin_pending(get_entity_state(state));
        true
    });

    let fulfilled: CaseHandler<S, T> = Arc::new(move |state: &mut S, action: &CrudAction<T>| {
        if let CrudPhase::Fulfilled(success) = action.phase() {
            settle_fulfilled(get_entity_state(state), success);
            true
        } else {
            false
        }
    });

    let rejected: CaseHandler<S, T> = Arc::new(move |state: &mut S, action: &CrudAction<T>| {
        if let CrudPhase::Rejected(message) = action.phase() {
            settle_rejected(get_entity_state(state), message);
            true
        } else {
            false
        }
    });

    let mut cases = Vec::with_capacity(15);
    for action_type in thunks.action_types() {
        cases.push(CrudCase {
            action_type: action_type.clone(),
            phase: PhaseKind::Pending,
            handler: Arc::clone(&pending),
        });
        cases.push(CrudCase {
            action_type: action_type.clone(),
            phase: PhaseKind::Fulfilled,
            handler: Arc::clone(&fulfilled),
        });
        cases.push(CrudCase {
            action_type: action_type.clone(),
            phase: PhaseKind::Rejected,
            handler: Arc::clone(&rejected),
        });
    }
    cases
}

/// Fold the derived rule set into a host builder.
pub fn register_crud_reducers<S, T, B>(
    builder: &mut B,
    thunks: &CrudThunks<T>,
    get_entity_state: StateAccessor<S, T>,
) where
    S: 'static,
    T: Entity,
    B: CaseBuilder<S, T> + ?Sized,
{
    for case in crud_cases(thunks, get_entity_state) {
        builder.add_case(&case.action_type, case.phase, case.handler);
    }
}
