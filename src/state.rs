/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 * - Cheap to Clone (everything behind Arc); nothing is mutated after startup
 */
use std::sync::Arc;

use crate::services::auth::{ValidationConfig, Validator};

#[derive(Clone, Debug)]
pub struct AppState {
    pub validator: Arc<Validator>,
    pub rules: Arc<ValidationConfig>,
    pub cors_allow_origin: Option<Arc<str>>,
}

impl AppState {
    pub fn new(validator: Arc<Validator>, rules: Arc<ValidationConfig>) -> Self {
        Self {
            validator,
            rules,
            cors_allow_origin: None,
        }
    }

    pub fn with_cors_allow_origin(mut self, origin: Option<String>) -> Self {
        self.cors_allow_origin = origin.map(Arc::from);
        self
    }
}
