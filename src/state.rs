use std::sync::Arc;

use crate::database::BlogStore;

/// Handles injected into every handler. Cloning shares the same store.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn BlogStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn BlogStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn BlogStore {
        self.store.as_ref()
    }
}
