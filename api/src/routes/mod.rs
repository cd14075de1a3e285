//! HTTP route handlers

pub mod admin;
pub mod health;
pub mod tokens;

use std::sync::Arc;

use tr_core::{RevocationSet, RotationManager, TokenStore};

/// Application state that holds shared services
pub struct AppState<S, R>
where
    S: TokenStore,
    R: RevocationSet,
{
    pub manager: Arc<RotationManager<S, R>>,
}

impl<S: TokenStore, R: RevocationSet> AppState<S, R> {
    pub fn new(manager: Arc<RotationManager<S, R>>) -> Self {
        Self { manager }
    }
}
