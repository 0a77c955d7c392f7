use std::sync::Arc;

use crate::store::ResourceStore;

/// Shared state of every dev API handler.
#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<dyn ResourceStore>,
}

impl ApiContext {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }
}
