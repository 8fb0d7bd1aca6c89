//! Authentication Handlers

use axum::{Json, extract::State};

use crate::api::ApiJson;
use crate::auth::{IdentityPayload, JwtError};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::{AppError, AppResult};
use shared::models::TokenResponse;

/// POST /jwt - 签发访问令牌
///
/// 请求体是任意 JSON 对象，必须包含 `email`；整个对象作为令牌载荷。
/// 这里不做身份核验，凭据由前端的身份提供方负责。
pub async fn issue_token(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<IdentityPayload>,
) -> AppResult<Json<TokenResponse>> {
    let email = payload.email.clone();

    let token = state
        .get_jwt_service()
        .generate_token(payload)
        .map_err(|e| match e {
            JwtError::MissingEmail => AppError::invalid_request("email is required"),
            other => AppError::internal(format!("Failed to sign token: {other}")),
        })?;

    security_log!(INFO, "token_issued", email = email);

    Ok(Json(TokenResponse { token }))
}
