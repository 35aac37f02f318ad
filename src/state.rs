/*
 * Responsibility
 * - shared context attached to the Router (AppState)
 *   - stores: user / token / repository / permission lookups
 *   - objects: downstream object storage handlers
 * - Clone is cheap (everything is behind Arc)
 */
use std::sync::Arc;

use crate::services::objects::ObjectService;
use crate::stores::Stores;

#[derive(Clone)]
pub struct AppState {
    pub stores: Stores,
    pub objects: Arc<dyn ObjectService>,
}

impl AppState {
    pub fn new(stores: Stores, objects: Arc<dyn ObjectService>) -> Self {
        Self { stores, objects }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("stores", &self.stores)
            .finish_non_exhaustive()
    }
}
