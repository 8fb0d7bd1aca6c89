//! JWT Extractor
//!
//! Handlers that take a [`CurrentUser`] argument are authenticated even
//! without a pipeline in front of them.

use axum::{extract::FromRequestParts, http::request::Parts};

use super::middleware::require_auth;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::AppError;

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        // Reuses the user a guard already put into the extensions
        require_auth(state, parts)
    }
}
