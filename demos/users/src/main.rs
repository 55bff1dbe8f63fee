//! Users demo - crud-dispatch example
//!
//! A scripted CRUD session over an in-memory user service:
//! 1. Thunks dispatch operations; each sends pending + settlement actions
//!    over the channel
//! 2. The main loop forwards actions into the store
//! 3. Registered case rules merge outcomes into the `users` state fragment
//! 4. After each settlement the fragment is printed as JSON
//!
//! # Usage
//!
//! ```sh
//! cargo run -p users-demo
//!
//! # With action logging
//! RUST_LOG=debug cargo run -p users-demo
//! ```

mod service;

use std::sync::Arc;

use crud_dispatch::prelude::*;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::service::{User, UserService};

#[derive(Default)]
struct AppState {
    users: EntityState<User>,
}

type UserStore = StoreWithMiddleware<AppState, CrudAction<User>, LoggingMiddleware>;

/// Forward one dispatch's pending + settlement actions into the store, then
/// print the resulting fragment.
async fn settle(
    label: &str,
    store: &mut UserStore,
    action_rx: &mut mpsc::UnboundedReceiver<CrudAction<User>>,
) {
    for _ in 0..2 {
        let action = action_rx.recv().await.expect("action channel closed");
        store.dispatch(action);
    }

    let snapshot =
        serde_json::to_string_pretty(&store.state().users).expect("state serializes to JSON");
    println!("--- after {label} ---\n{snapshot}\n");
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let service = Arc::new(UserService::new(vec!["Ada", "Grace"]));
    let (action_tx, mut action_rx) = mpsc::unbounded_channel();

    let thunks = create_crud_thunks(CrudThunksConfig {
        entity_name: "user".into(),
        slice: "users".into(),
        service,
        action_tx,
    });

    let mut table = CaseTable::new();
    register_crud_reducers(&mut table, &thunks, |s: &mut AppState| &mut s.users);
    let mut store = StoreWithMiddleware::wrap(
        table.into_store(AppState::default()),
        LoggingMiddleware::verbose(),
    );

    tracing::info!("Dispatching a scripted CRUD session for the `users` slice");

    thunks.list.dispatch(ListParams::default());
    settle("list", &mut store, &mut action_rx).await;

    thunks.create.dispatch(User {
        id: String::new(),
        name: "Sonikro".into(),
    });
    settle("create", &mut store, &mut action_rx).await;

    thunks.update.dispatch(User {
        id: "1".into(),
        name: "Ada Lovelace".into(),
    });
    settle("update", &mut store, &mut action_rx).await;

    thunks.get.dispatch("3".into());
    settle("get", &mut store, &mut action_rx).await;

    thunks.delete.dispatch(User {
        id: "2".into(),
        name: "Grace".into(),
    });
    settle("delete", &mut store, &mut action_rx).await;

    // A rejection lands in the error slot instead of crashing the loop.
    thunks.get.dispatch("999".into());
    settle("get (missing)", &mut store, &mut action_rx).await;
}
