use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::{AppState, handle_poll, health};
use crate::snmp::AgentQuery;

pub fn create_router<Q: AgentQuery + 'static>(state: AppState<Q>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/poll", post(handle_poll::<Q>))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}
