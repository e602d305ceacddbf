//! Liveness probe endpoint.

use axum::{Router, routing::get};

use crate::state::SharedState;

/// Answer the liveness probe.
pub async fn ping() -> &'static str {
    "Pong"
}

/// Configure the health routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/ping", get(ping))
}
