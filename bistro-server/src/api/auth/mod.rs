//! Authentication Routes

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

/// Build authentication router
/// - /jwt: public, exchanges an identity payload for a signed token
pub fn router() -> Router<ServerState> {
    Router::new().route("/jwt", post(handler::issue_token))
}
