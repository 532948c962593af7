//! Registration, login, logout and token refresh endpoints

use crate::domain::{LoginInput, RefreshTokenInput, RegisterInput, UserProfile};
use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::state::HasServices;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::MessageResponse;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub refresh: String,
    pub access: String,
    pub user: UserProfile,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RefreshResponse {
    pub access: String,
}

#[utoipa::path(
    post,
    path = "/user_register",
    tag = "Identity",
    request_body = RegisterInput,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid input or username/email already taken")
    )
)]
pub async fn register<S: HasServices>(
    State(state): State<S>,
    Json(input): Json<RegisterInput>,
) -> Result<impl IntoResponse> {
    let user = state.identity_service().register(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "user created successfully".to_string(),
            user: UserProfile::from(&user),
        }),
    ))
}

#[utoipa::path(
    post,
    path = "/user_login",
    tag = "Identity",
    request_body = LoginInput,
    responses(
        (status = 200, description = "Token pair issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login<S: HasServices>(
    State(state): State<S>,
    Json(input): Json<LoginInput>,
) -> Result<Json<LoginResponse>> {
    let result = state.identity_service().login(input).await?;
    Ok(Json(LoginResponse {
        refresh: result.refresh,
        access: result.access,
        user: UserProfile::from(&result.user),
    }))
}

#[utoipa::path(
    post,
    path = "/user_logout",
    tag = "Identity",
    request_body = RefreshTokenInput,
    security(("bearer_jwt" = [])),
    responses(
        (status = 205, description = "Refresh token revoked", body = MessageResponse),
        (status = 400, description = "Missing, invalid or already revoked refresh token"),
        (status = 401, description = "Not authenticated")
    )
)]
/// Revoke a refresh token. A request without a JSON body is treated as
/// carrying no token.
pub async fn logout<S: HasServices>(
    State(state): State<S>,
    auth: AuthUser,
    body: Option<Json<RefreshTokenInput>>,
) -> Result<impl IntoResponse> {
    let input = body.map(|Json(input)| input).unwrap_or_default();
    state.identity_service().logout(&input.refresh).await?;

    tracing::info!(user_id = auth.user_id, "User logged out");
    Ok((
        StatusCode::RESET_CONTENT,
        Json(MessageResponse::new("Successfully logged out")),
    ))
}

#[utoipa::path(
    post,
    path = "/token_refresh",
    tag = "Identity",
    request_body = RefreshTokenInput,
    responses(
        (status = 200, description = "New access token", body = RefreshResponse),
        (status = 401, description = "Invalid, expired or revoked refresh token")
    )
)]
pub async fn token_refresh<S: HasServices>(
    State(state): State<S>,
    Json(input): Json<RefreshTokenInput>,
) -> Result<Json<RefreshResponse>> {
    let access = state.identity_service().refresh(&input.refresh).await?;
    Ok(Json(RefreshResponse { access }))
}
