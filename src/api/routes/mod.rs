//! API routes module

pub mod push;

use std::sync::{Arc, RwLock};

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<RwLock<AppState>>;

/// Create the combined router
pub fn router() -> Router<SharedState> {
    // Push notification routes
    Router::new().nest("/push", push::router())
}
