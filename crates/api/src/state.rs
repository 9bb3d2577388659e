//! Shared application state and the connection lifecycle.

use std::sync::OnceLock;

use document_store::{Collection, DocumentStore};

pub const USERS: &str = "users";
pub const LISTINGS: &str = "listings";
pub const ORDERS: &str = "orders";

/// A connected store together with its collection handles.
#[derive(Clone)]
pub struct Database<S> {
    store: S,
    pub users: Collection<S>,
    pub listings: Collection<S>,
    pub orders: Collection<S>,
}

impl<S: DocumentStore + Clone> Database<S> {
    pub fn new(store: S) -> Self {
        Self {
            users: Collection::new(store.clone(), USERS),
            listings: Collection::new(store.clone(), LISTINGS),
            orders: Collection::new(store.clone(), ORDERS),
            store,
        }
    }

    /// The underlying store client.
    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Shared application state accessible from all handlers.
///
/// Starts without a database. Once [`AppState::mark_ready`] succeeds the
/// database stays set for the lifetime of the process.
pub struct AppState<S> {
    database: OnceLock<Database<S>>,
}

impl<S: DocumentStore + Clone> AppState<S> {
    /// State whose data routes answer 503 until a store is attached.
    pub fn new() -> Self {
        Self {
            database: OnceLock::new(),
        }
    }

    /// State that is ready from the start.
    pub fn with_store(store: S) -> Self {
        let state = Self::new();
        state.mark_ready(store);
        state
    }

    /// Attaches the connected store. Returns false if one was already attached.
    pub fn mark_ready(&self, store: S) -> bool {
        let attached = self.database.set(Database::new(store)).is_ok();
        if !attached {
            tracing::warn!("document store already attached; ignoring second connection");
        }
        attached
    }

    pub fn database(&self) -> Option<&Database<S>> {
        self.database.get()
    }

    pub fn is_ready(&self) -> bool {
        self.database.get().is_some()
    }
}

impl<S: DocumentStore + Clone> Default for AppState<S> {
    fn default() -> Self {
        Self::new()
    }
}
